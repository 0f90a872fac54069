//! Container resolution tests
//!
//! Covers the resolution contract: singleton identity, transient freshness,
//! cycle detection, concurrent build collapse, tag ordering, factories,
//! calls, and configurators.

use serde_json::{json, Value};
use spindle_application::{
    instance, ClassEntry, ConstructorRegistry, Container, DefinitionBuilder, ResolvedArgument,
};
use spindle_domain::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

struct Logger {
    level: String,
}

struct App {
    logger: Arc<Logger>,
}

struct Middleware {
    name: String,
}

struct Pipeline {
    members: Vec<String>,
}

fn registry_with_counter(counter: Arc<AtomicUsize>) -> ConstructorRegistry {
    let mut registry = ConstructorRegistry::new();

    registry.register(ClassEntry::new(
        "Logger",
        "Structured logger",
        move |args| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                let level = args
                    .first()
                    .and_then(ResolvedArgument::as_literal)
                    .and_then(Value::as_str)
                    .unwrap_or("info")
                    .to_string();
                Ok(instance(Logger { level }))
            }
        },
    ));

    registry.register(ClassEntry::new("App", "Application root", |args| async move {
        let logger = args[0]
            .downcast::<Logger>()
            .ok_or_else(|| Error::internal("App expects a Logger"))?;
        Ok(instance(App { logger }))
    }));

    registry.register(ClassEntry::new("Middleware", "Tagged member", |args| async move {
        let name = args
            .first()
            .and_then(ResolvedArgument::as_literal)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Ok(instance(Middleware { name }))
    }));

    registry.register(ClassEntry::new("Pipeline", "Tag consumer", |args| async move {
        let members = args[0]
            .as_collection()
            .ok_or_else(|| Error::internal("Pipeline expects a collection"))?
            .iter()
            .map(|member| {
                member
                    .instance
                    .clone()
                    .downcast::<Middleware>()
                    .map(|middleware| middleware.name.clone())
                    .unwrap_or_default()
            })
            .collect();
        Ok(instance(Pipeline { members }))
    }));

    registry
}

fn registry() -> ConstructorRegistry {
    registry_with_counter(Arc::new(AtomicUsize::new(0)))
}

fn container(tree: Value, registry: ConstructorRegistry) -> Container {
    let definitions = DefinitionBuilder::new().build(&tree).unwrap();
    Container::new(definitions, registry)
}

#[tokio::test]
async fn test_singleton_returns_identical_instance() {
    let container = container(json!({"services": {"logger": {"class": "Logger"}}}), registry());

    let first = container.get("logger").await.unwrap();
    let second = container.get("logger").await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_transient_returns_fresh_instance() {
    let container = container(
        json!({"services": {"logger": {"class": "Logger", "scope": "transient"}}}),
        registry(),
    );

    let first = container.get("logger").await.unwrap();
    let second = container.get("logger").await.unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_injected_service_is_the_cached_singleton() {
    let container = container(
        json!({
            "services": {
                "logger": {"class": "Logger", "arguments": ["debug"]},
                "app": {"class": "App", "arguments": [{"service": "logger"}]}
            }
        }),
        registry(),
    );

    let app = container.get_as::<App>("app").await.unwrap();
    let logger = container.get_as::<Logger>("logger").await.unwrap();

    assert!(Arc::ptr_eq(&app.logger, &logger));
    assert_eq!(logger.level, "debug");
}

#[tokio::test]
async fn test_missing_service_reference_names_the_id() {
    let container = container(
        json!({
            "services": {
                "app": {"class": "App", "arguments": [{"service": "missing"}]}
            }
        }),
        registry(),
    );

    let error = container.get("app").await.unwrap_err();
    match error {
        Error::ServiceNotFound { id } => assert_eq!(id, "missing"),
        other => panic!("Expected ServiceNotFound, got {other}"),
    }
}

#[tokio::test]
async fn test_dependency_cycle_reports_full_chain() {
    let mut registry = ConstructorRegistry::new();
    registry.register(ClassEntry::new("Node", "cyclic", |_args| async {
        Ok(instance(()))
    }));

    let container = container(
        json!({
            "services": {
                "a": {"class": "Node", "arguments": [{"service": "b"}]},
                "b": {"class": "Node", "arguments": [{"service": "a"}]}
            }
        }),
        registry,
    );

    let error = container.get("a").await.unwrap_err();
    match error {
        Error::CircularDependency { chain } => {
            assert_eq!(chain, vec!["a".to_string(), "b".to_string(), "a".to_string()]);
        }
        other => panic!("Expected CircularDependency, got {other}"),
    }
}

#[tokio::test]
async fn test_concurrent_gets_construct_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    let container = Arc::new(container(
        json!({"services": {"logger": {"class": "Logger"}}}),
        registry_with_counter(counter.clone()),
    ));

    let mut handles = Vec::new();
    for _ in 0..32 {
        let container = container.clone();
        handles.push(tokio::spawn(async move {
            container.get("logger").await.unwrap()
        }));
    }

    let mut instances = Vec::new();
    for handle in handles {
        instances.push(handle.await.unwrap());
    }

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    for built in &instances[1..] {
        assert!(Arc::ptr_eq(&instances[0], built));
    }
}

#[tokio::test]
async fn test_failed_build_leaves_id_unbuilt() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let mut registry = ConstructorRegistry::new();
    let attempts_in_ctor = attempts.clone();
    registry.register(ClassEntry::new("Flaky", "fails once", move |_args| {
        let attempts = attempts_in_ctor.clone();
        async move {
            if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(Error::internal("first attempt fails"))
            } else {
                Ok(instance(()))
            }
        }
    }));

    let container = container(json!({"services": {"flaky": {"class": "Flaky"}}}), registry);

    assert!(container.get("flaky").await.is_err());
    // The cell was not poisoned: the retry constructs successfully
    assert!(container.get("flaky").await.is_ok());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_tag_collection_orders_by_priority_then_declaration() {
    let container = container(
        json!({
            "services": {
                "m1": {"class": "Middleware", "arguments": ["m1"],
                       "tags": [{"name": "mw", "priority": 10}]},
                "m2": {"class": "Middleware", "arguments": ["m2"],
                       "tags": [{"name": "mw", "priority": 5}]},
                "m3": {"class": "Middleware", "arguments": ["m3"],
                       "tags": [{"name": "mw", "priority": 5}]}
            }
        }),
        registry(),
    );

    let members = container.get_by_tag("mw").await.unwrap();
    let ids: Vec<&str> = members.iter().map(|member| member.id.as_str()).collect();
    // Ascending priority; m2 and m3 share priority 5 and keep declaration order
    assert_eq!(ids, vec!["m2", "m3", "m1"]);
    assert_eq!(members[2].tag_data, json!({"priority": 10}));
}

#[tokio::test]
async fn test_services_argument_injects_ordered_collection() {
    let container = container(
        json!({
            "services": {
                "m1": {"class": "Middleware", "arguments": ["outer"],
                       "tags": [{"name": "mw", "priority": 2}]},
                "m2": {"class": "Middleware", "arguments": ["inner"],
                       "tags": [{"name": "mw", "priority": 1}]},
                "pipeline": {"class": "Pipeline", "arguments": [{"services": "mw"}]}
            }
        }),
        registry(),
    );

    let pipeline = container.get_as::<Pipeline>("pipeline").await.unwrap();
    assert_eq!(pipeline.members, vec!["inner".to_string(), "outer".to_string()]);
}

#[tokio::test]
async fn test_parameter_resolution_with_default_and_missing() {
    let container = container(
        json!({
            "parameters": {"log.level": "warn"},
            "services": {
                "configured": {"class": "Logger", "arguments": [{"parameter": "log.level"}]},
                "defaulted": {"class": "Logger", "arguments": [{"parameter": "log.missing", "default": "error"}]},
                "broken": {"class": "Logger", "arguments": [{"parameter": "log.missing"}]}
            }
        }),
        registry(),
    );

    let configured = container.get_as::<Logger>("configured").await.unwrap();
    assert_eq!(configured.level, "warn");

    let defaulted = container.get_as::<Logger>("defaulted").await.unwrap();
    assert_eq!(defaulted.level, "error");

    let error = container.get("broken").await.unwrap_err();
    match error {
        Error::ParameterNotFound { path } => assert_eq!(path, "log.missing"),
        other => panic!("Expected ParameterNotFound, got {other}"),
    }
}

#[tokio::test]
async fn test_alias_resolves_to_target_instance() {
    let container = container(
        json!({
            "services": {"logger": {"class": "Logger"}},
            "aliases": {"log": "logger"}
        }),
        registry(),
    );

    let via_alias = container.get("log").await.unwrap();
    let direct = container.get("logger").await.unwrap();
    assert!(Arc::ptr_eq(&via_alias, &direct));
}

#[tokio::test]
async fn test_unresolved_alias_target_fails_at_resolution() {
    let container = container(json!({"aliases": {"log": "gone"}}), registry());

    let error = container.get("log").await.unwrap_err();
    match error {
        Error::ServiceNotFound { id } => assert_eq!(id, "gone"),
        other => panic!("Expected ServiceNotFound, got {other}"),
    }
}

#[tokio::test]
async fn test_factory_builds_the_instance() {
    let mut registry = ConstructorRegistry::new();
    registry.register(
        ClassEntry::new("Pool", "Connection pool", |_args| async {
            Ok(instance(AtomicUsize::new(0)))
        })
        .with_method("acquire", |receiver, args| async move {
            let pool = receiver
                .downcast::<AtomicUsize>()
                .map_err(|_| Error::internal("receiver is not a Pool"))?;
            let label = args
                .first()
                .and_then(ResolvedArgument::as_literal)
                .and_then(Value::as_str)
                .unwrap_or("conn")
                .to_string();
            let serial = pool.fetch_add(1, Ordering::SeqCst);
            Ok(Some(instance(format!("{label}-{serial}"))))
        }),
    );

    let container = container(
        json!({
            "services": {
                "pool": {"class": "Pool"},
                "conn": {
                    "factory": {"service": "pool", "method": "acquire"},
                    "arguments": ["primary"],
                    "scope": "transient"
                }
            }
        }),
        registry,
    );

    let first = container.get_as::<String>("conn").await.unwrap();
    let second = container.get_as::<String>("conn").await.unwrap();
    assert_eq!(first.as_str(), "primary-0");
    assert_eq!(second.as_str(), "primary-1");
}

#[tokio::test]
async fn test_awaited_call_runs_before_get_returns() {
    let journal: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let journal_in_method = journal.clone();

    let mut registry = ConstructorRegistry::new();
    registry.register(
        ClassEntry::new("Recorder", "records calls", |_args| async {
            Ok(instance(()))
        })
        .with_method("record", move |_receiver, args| {
            let journal = journal_in_method.clone();
            async move {
                let entry = args
                    .first()
                    .and_then(ResolvedArgument::as_literal)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                journal.lock().unwrap().push(entry);
                Ok(None)
            }
        }),
    );

    let container = container(
        json!({
            "services": {
                "recorder": {
                    "class": "Recorder",
                    "calls": [
                        {"method": "record", "arguments": ["first"], "await": true},
                        {"method": "record", "arguments": ["second"], "await": true}
                    ]
                }
            }
        }),
        registry,
    );

    container.get("recorder").await.unwrap();
    assert_eq!(
        *journal.lock().unwrap(),
        vec!["first".to_string(), "second".to_string()]
    );
}

#[tokio::test]
async fn test_configurator_replaces_the_instance() {
    let mut registry = ConstructorRegistry::new();
    registry.register(ClassEntry::new("Raw", "unfinished", |_args| async {
        Ok(instance("raw".to_string()))
    }));
    registry.register(
        ClassEntry::new("Finisher", "finalizes services", |_args| async {
            Ok(instance(()))
        })
        .with_method("finish", |_receiver, args| async move {
            let built = args
                .first()
                .and_then(ResolvedArgument::as_instance)
                .and_then(|inst| inst.clone().downcast::<String>().ok())
                .ok_or_else(|| Error::internal("expected the built instance"))?;
            Ok(Some(instance(format!("{built}+finished"))))
        }),
    );

    let container = container(
        json!({
            "services": {
                "finisher": {"class": "Finisher"},
                "svc": {
                    "class": "Raw",
                    "configurator": {"service": "finisher", "method": "finish"}
                }
            }
        }),
        registry,
    );

    let built = container.get_as::<String>("svc").await.unwrap();
    assert_eq!(built.as_str(), "raw+finished");
}

#[tokio::test]
async fn test_boot_builds_non_lazy_singletons_only() {
    let counter = Arc::new(AtomicUsize::new(0));
    let lazy_counter = Arc::new(AtomicUsize::new(0));

    let mut registry = registry_with_counter(counter.clone());
    let lazy_in_ctor = lazy_counter.clone();
    registry.register(ClassEntry::new("LazyThing", "built on demand", move |_args| {
        let lazy_counter = lazy_in_ctor.clone();
        async move {
            lazy_counter.fetch_add(1, Ordering::SeqCst);
            Ok(instance(()))
        }
    }));

    let container = container(
        json!({
            "services": {
                "logger": {"class": "Logger"},
                "slow": {"class": "LazyThing", "lazy": true}
            }
        }),
        registry,
    );

    container.boot().await.unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(lazy_counter.load(Ordering::SeqCst), 0);

    container.get("slow").await.unwrap();
    assert_eq!(lazy_counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_nullable_service_reference_resolves_to_null() {
    let mut registry = ConstructorRegistry::new();
    registry.register(ClassEntry::new("Optionalist", "tolerates absence", |args| async move {
        let is_null = args
            .first()
            .and_then(ResolvedArgument::as_literal)
            .map(Value::is_null)
            .unwrap_or(false);
        Ok(instance(is_null))
    }));

    let container = container(
        json!({
            "services": {
                "svc": {
                    "class": "Optionalist",
                    "arguments": [{"service": "absent", "nullable": true}]
                }
            }
        }),
        registry,
    );

    let got_null = container.get_as::<bool>("svc").await.unwrap();
    assert!(*got_null);
}
