//! Class identities for domain objects.
//!
//! Resources are registered against the class of the domain object they
//! handle. A class is described by a static [`ClassDescriptor`] linked to its
//! parent, so the ancestor chain of any runtime class can be walked without
//! reflection. Every chain ends at [`ClassDescriptor::OBJECT`].

use std::fmt;

/// Static description of a domain class and its superclass.
#[derive(Debug)]
pub struct ClassDescriptor {
    name: &'static str,
    parent: Option<&'static ClassDescriptor>,
}

impl ClassDescriptor {
    /// Root of every class hierarchy.
    pub const OBJECT: ClassDescriptor = ClassDescriptor {
        name: "Object",
        parent: None,
    };

    /// Declare a class extending `parent`.
    pub const fn new(name: &'static str, parent: &'static ClassDescriptor) -> Self {
        Self {
            name,
            parent: Some(parent),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parent(&self) -> Option<&'static ClassDescriptor> {
        self.parent
    }

    /// Iterate over this class and its ancestors, most derived first.
    pub fn ancestors(&'static self) -> impl Iterator<Item = &'static ClassDescriptor> {
        std::iter::successors(Some(self), |class| class.parent)
    }

    /// Whether `self` is `other` or one of its subclasses.
    pub fn is_subclass_of(&'static self, other: &ClassDescriptor) -> bool {
        self.ancestors().any(|class| class == other)
    }
}

/// Two descriptors denote the same class when their whole chains match by name.
impl PartialEq for ClassDescriptor {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || (self.name == other.name && self.parent == other.parent)
    }
}

impl Eq for ClassDescriptor {}

impl fmt::Display for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Domain objects that know their runtime class.
pub trait Typed {
    fn class(&self) -> &'static ClassDescriptor;
}
