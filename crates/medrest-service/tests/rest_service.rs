//! End-to-end resolution through `RestService`: representations, resources
//! registered against a class hierarchy, and search handler selection.

use async_trait::async_trait;
use medrest_core::{
    ClassDescriptor, CoreError, RequestContext, RequestParameters, Representation, Resource,
    ResourceDefinition, ResourceProvider, SimpleObject, Typed,
};
use medrest_search::{SearchConfig, SearchError, SearchHandler, SearchHandlerProvider, SearchQuery};
use medrest_service::{AppConfig, RestService, ServiceError};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio_test::block_on;

static PERSON: ClassDescriptor = ClassDescriptor::new("Person", &ClassDescriptor::OBJECT);
static PATIENT: ClassDescriptor = ClassDescriptor::new("Patient", &PERSON);
static CHILD_PATIENT: ClassDescriptor = ClassDescriptor::new("ChildPatient", &PATIENT);
static CONCEPT: ClassDescriptor = ClassDescriptor::new("Concept", &ClassDescriptor::OBJECT);

/// In-memory adapter recording the calls it receives.
#[derive(Default)]
struct RecordingResource {
    name: &'static str,
    calls: Mutex<Vec<String>>,
}

impl RecordingResource {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Resource for RecordingResource {
    fn name(&self) -> &str {
        self.name
    }

    async fn create(
        &self,
        payload: SimpleObject,
        context: &RequestContext,
    ) -> medrest_core::Result<SimpleObject> {
        self.record(format!("create v={}", context.representation));
        Ok(payload)
    }

    async fn retrieve(
        &self,
        uuid: &str,
        _: &RequestContext,
    ) -> medrest_core::Result<SimpleObject> {
        self.record(format!("retrieve {uuid}"));
        let mut object = SimpleObject::new();
        object.insert("uuid".into(), json!(uuid));
        Ok(object)
    }

    async fn update(
        &self,
        uuid: &str,
        payload: SimpleObject,
        _: &RequestContext,
    ) -> medrest_core::Result<SimpleObject> {
        self.record(format!("update {uuid}"));
        Ok(payload)
    }

    async fn delete(
        &self,
        uuid: &str,
        reason: &str,
        _: &RequestContext,
    ) -> medrest_core::Result<()> {
        self.record(format!("delete {uuid} ({reason})"));
        Ok(())
    }

    async fn purge(&self, uuid: &str, _: &RequestContext) -> medrest_core::Result<()> {
        Err(CoreError::resource_not_found(self.name, uuid))
    }

    async fn list_sub_resource(
        &self,
        parent_uuid: &str,
        sub_resource: &str,
        context: &RequestContext,
    ) -> medrest_core::Result<Value> {
        if sub_resource != "names" {
            return Err(CoreError::unsupported_operation(self.name, sub_resource));
        }
        self.record(format!("list {parent_uuid}/{sub_resource}"));
        Ok(json!([{ "display": "John Doe", "v": context.representation.to_string() }]))
    }
}

struct PersonModule {
    person: Arc<RecordingResource>,
    patient: Arc<RecordingResource>,
}

impl ResourceProvider for PersonModule {
    fn resources(&self) -> Vec<ResourceDefinition> {
        vec![
            ResourceDefinition::new("person", &PERSON, self.person.clone()),
            ResourceDefinition::new("patient", &PATIENT, self.patient.clone()),
        ]
    }

    fn module_id(&self) -> &str {
        "person-module"
    }
}

struct StaticSearch(SearchConfig);

#[async_trait]
impl SearchHandler for StaticSearch {
    fn search_config(&self) -> &SearchConfig {
        &self.0
    }

    async fn search(
        &self,
        parameters: &RequestParameters,
        _: &RequestContext,
    ) -> Result<Value, SearchError> {
        let terms: Vec<String> = parameters
            .iter()
            .map(|(name, values)| format!("{name}={}", values.join(",")))
            .collect();
        Ok(json!({ "search": self.0.id, "terms": terms }))
    }
}

fn search(id: &str, resource: &str, versions: &str, required: &[&str], optional: &[&str]) -> Arc<dyn SearchHandler> {
    let query = SearchQuery::builder(format!("{id} search"))
        .with_required_parameters(required.iter().copied())
        .with_optional_parameters(optional.iter().copied())
        .build()
        .expect("valid query");
    Arc::new(StaticSearch(
        SearchConfig::for_versions(id, resource, versions, query).expect("valid versions"),
    ))
}

struct ConceptSearches;

impl SearchHandlerProvider for ConceptSearches {
    fn search_handlers(&self) -> Vec<Arc<dyn SearchHandler>> {
        vec![
            search("default", "concept", "1.8.* - 9.*", &["q"], &["class"]),
            search("byMapping", "concept", "1.9.* - 9.*", &["sourceName", "code"], &[]),
            search("bySource", "concept", "1.9.* - 9.*", &["sourceName"], &["code"]),
            search("legacy", "concept", "1.8.*", &["name"], &[]),
        ]
    }

    fn module_id(&self) -> &str {
        "concept-module"
    }
}

fn build_service(platform_version: Option<&str>) -> (RestService, Arc<RecordingResource>) {
    let mut config = AppConfig::default();
    config.platform.version = platform_version.map(str::to_string);

    let patient = Arc::new(RecordingResource::new("patient"));
    let module: Arc<dyn ResourceProvider> = Arc::new(PersonModule {
        person: Arc::new(RecordingResource::new("person")),
        patient: patient.clone(),
    });
    let searches: Arc<dyn SearchHandlerProvider> = Arc::new(ConceptSearches);

    let service = RestService::bootstrap(&config, &[module], &[searches]).expect("bootstrap");
    (service, patient)
}

#[test]
fn representation_tokens_resolve() {
    let (service, _) = build_service(None);

    assert_eq!(service.get_representation(None), Representation::Default);
    assert_eq!(service.get_representation(Some("")), Representation::Default);
    assert_eq!(service.get_representation(Some("ref")), Representation::Ref);
    assert_eq!(service.get_representation(Some("full")), Representation::Full);
    assert_eq!(
        service.get_representation(Some("custom:datatableslist")),
        Representation::Custom("datatableslist".into())
    );
    assert_eq!(
        service.get_representation(Some("UNKNOWNREPRESENTATION")),
        Representation::Named("UNKNOWNREPRESENTATION".into())
    );
}

#[test]
fn subclass_resolves_to_most_specific_resource() {
    struct ChildPatient;
    impl Typed for ChildPatient {
        fn class(&self) -> &'static ClassDescriptor {
            &CHILD_PATIENT
        }
    }

    let (service, _) = build_service(None);

    let resource = service.get_resource_for(&ChildPatient).expect("resource");
    assert_eq!(resource.name(), "patient");
    assert_eq!(
        service.get_resource_by_supported_class(&PERSON).unwrap().name(),
        "person"
    );

    let err = service.get_resource_by_supported_class(&CONCEPT).err().unwrap();
    assert!(matches!(err, ServiceError::Resource(CoreError::NoResourceForClass(_))));
    assert!(err.is_client_error());
}

#[test]
fn crud_and_sub_resources_delegate_to_adapter() {
    let (service, patient) = build_service(None);
    let params = RequestParameters::from_query("v=full");
    let context = service.request_context(&params);

    let resource = service.get_resource_by_name("patient").expect("patient resource");
    block_on(async {
        let created = resource
            .create(SimpleObject::new(), &context)
            .await
            .expect("create");
        assert!(created.is_empty());

        let fetched = resource.retrieve("abc-123", &context).await.expect("retrieve");
        assert_eq!(fetched["uuid"], "abc-123");

        resource
            .delete("abc-123", "duplicate record", &context)
            .await
            .expect("delete");

        let names = resource
            .list_sub_resource("abc-123", "names", &context)
            .await
            .expect("names");
        assert_eq!(names[0]["v"], "full");

        let err = resource
            .create_child("abc-123", "names", SimpleObject::new(), &context)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedOperation { .. }));

        let err = resource.purge("abc-123", &context).await.unwrap_err();
        assert!(matches!(err, CoreError::ResourceNotFound { .. }));
    });

    let calls = patient.calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            "create v=full",
            "retrieve abc-123",
            "delete abc-123 (duplicate record)",
            "list abc-123/names",
        ]
    );

    let err = service.get_resource_by_name("encounter").err().unwrap();
    assert_eq!(err.to_string(), "Unknown resource: encounter");
}

#[test]
fn search_handlers_resolve_by_signature_and_id() {
    let (service, _) = build_service(Some("2.4.0"));

    // legacy handler only supports 1.8.x
    assert_eq!(service.searches().handlers_for("concept").len(), 3);

    let params = RequestParameters::from_query("sourceName=SNOMED+CT&code=1234&v=ref");
    let handler = service
        .get_search_handler("concept", &params)
        .unwrap()
        .expect("a handler");
    assert_eq!(handler.id(), "byMapping");

    let params = RequestParameters::from_query("q=malaria&limit=10");
    let handler = service
        .get_search_handler("concept", &params)
        .unwrap()
        .expect("a handler");
    let context = service.request_context(&params);
    let result = block_on(handler.search(&params, &context)).unwrap();
    assert_eq!(result["search"], "default");

    let params = RequestParameters::from_query("s=bySource&q=ignored");
    let handler = service
        .get_search_handler("concept", &params)
        .unwrap()
        .expect("explicit handler");
    assert_eq!(handler.id(), "bySource");

    let params = RequestParameters::from_query("s=legacy&name=x");
    let err = service.get_search_handler("concept", &params).err().unwrap();
    assert!(matches!(
        err,
        ServiceError::Search(SearchError::UnknownSearchId { ref id, .. }) if id == "legacy"
    ));

    let params = RequestParameters::from_query("class=drug");
    assert!(service.get_search_handler("concept", &params).unwrap().is_none());
    assert!(service.get_search_handler("patient", &RequestParameters::from_query("q=x")).unwrap().is_none());
}

#[test]
fn legacy_platform_registers_legacy_handlers() {
    let (service, _) = build_service(Some("1.8.4"));

    let ids: Vec<String> = service
        .searches()
        .handlers_for("concept")
        .iter()
        .map(|handler| handler.id().to_string())
        .collect();
    assert_eq!(ids, vec!["default", "legacy"]);
}

#[test]
fn bootstrap_rejects_conflicting_registrations() {
    struct Duplicate;
    impl ResourceProvider for Duplicate {
        fn resources(&self) -> Vec<ResourceDefinition> {
            vec![ResourceDefinition::new(
                "patient2",
                &PATIENT,
                Arc::new(RecordingResource::new("patient2")),
            )]
        }

        fn module_id(&self) -> &str {
            "duplicate-module"
        }
    }

    let person: Arc<dyn ResourceProvider> = Arc::new(PersonModule {
        person: Arc::new(RecordingResource::new("person")),
        patient: Arc::new(RecordingResource::new("patient")),
    });
    let duplicate: Arc<dyn ResourceProvider> = Arc::new(Duplicate);

    let err = RestService::bootstrap(&AppConfig::default(), &[person, duplicate], &[])
        .err()
        .unwrap();
    assert!(matches!(
        err,
        ServiceError::Resource(CoreError::DuplicateSupportedClass { .. })
    ));
    assert!(!err.is_client_error());
}

#[test]
fn bootstrap_rejects_invalid_configuration() {
    let mut config = AppConfig::default();
    config.platform.version = Some("not-a-version".into());

    let err = RestService::bootstrap(&config, &[], &[]).err().unwrap();
    assert!(matches!(err, ServiceError::Configuration(_)));
}
