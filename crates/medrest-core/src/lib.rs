pub mod class;
pub mod error;
pub mod params;
pub mod registry;
pub mod representation;
pub mod resource;

pub use class::{ClassDescriptor, Typed};
pub use error::{CoreError, ErrorCategory, Result};
pub use params::{RequestContext, RequestParameters, reserved};
pub use registry::ResourceRegistry;
pub use representation::Representation;
pub use resource::{Resource, ResourceDefinition, ResourceProvider, SimpleObject};
