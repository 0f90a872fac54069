//! End-to-end pipeline tests
//!
//! Entry file → loader → schema validation → definition build → container
//! resolution, over a real temporary directory.

use serde_json::{json, Value};
use spindle_application::{instance, ClassEntry, ResolvedArgument};
use spindle_domain::Error;
use spindle_infrastructure::bootstrap::ContainerBuilder;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

struct Logger {
    level: String,
}

struct App {
    logger: Arc<Logger>,
    middleware: Vec<String>,
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn builder() -> ContainerBuilder {
    ContainerBuilder::new()
        .register(ClassEntry::new("Logger", "structured logger", |args| async move {
            let level = args
                .first()
                .and_then(ResolvedArgument::as_literal)
                .and_then(Value::as_str)
                .unwrap_or("info")
                .to_string();
            Ok(instance(Logger { level }))
        }))
        .register(ClassEntry::new("App", "application root", |args| async move {
            let logger = args[0]
                .downcast::<Logger>()
                .ok_or_else(|| Error::internal("App expects a Logger"))?;
            let middleware = args
                .get(1)
                .and_then(ResolvedArgument::as_collection)
                .map(|members| {
                    members
                        .iter()
                        .map(|member| member.id.clone())
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            Ok(instance(App { logger, middleware }))
        }))
        .register(ClassEntry::new("Middleware", "request middleware", |_args| async {
            Ok(instance(()))
        }))
}

#[tokio::test]
async fn test_full_pipeline_resolves_service_graph() {
    let dir = TempDir::new().unwrap();
    let entry = write(
        &dir,
        "app.yml",
        r#"imports:
  - services/logging.yml
  - services/middleware.yml

parameters:
  app.env: production

services:
  app:
    class: App
    arguments:
      - service: logger
      - services: mw
"#,
    );
    write(
        &dir,
        "services/logging.yml",
        r#"services:
  logger:
    class: Logger
    arguments:
      - parameter: log.level
        default: warn
"#,
    );
    write(
        &dir,
        "services/middleware.yml",
        r#"services:
  auth:
    class: Middleware
    tags:
      - name: mw
        priority: 10
  tracing:
    class: Middleware
    tags:
      - name: mw
        priority: 5
"#,
    );

    let container = builder().build(&entry).await.unwrap();

    let app = container.get_as::<App>("app").await.unwrap();
    let logger = container.get_as::<Logger>("logger").await.unwrap();

    assert!(Arc::ptr_eq(&app.logger, &logger));
    assert_eq!(logger.level, "warn");
    // Ascending priority: tracing (5) before auth (10)
    assert_eq!(app.middleware, vec!["tracing".to_string(), "auth".to_string()]);
    assert_eq!(container.parameter("app.env"), Some(&json!("production")));
}

#[tokio::test]
async fn test_invalid_definition_aborts_before_container_exists() {
    let dir = TempDir::new().unwrap();
    let entry = write(
        &dir,
        "app.yml",
        r#"services:
  app:
    class: App
    scope: global
"#,
    );

    let error = builder().build(&entry).await.unwrap_err();
    assert!(matches!(error, Error::Schema { .. }));
}

#[tokio::test]
async fn test_unregistered_class_fails_at_resolution() {
    let dir = TempDir::new().unwrap();
    let entry = write(
        &dir,
        "app.yml",
        r#"services:
  exotic:
    class: Exotic
"#,
    );

    let container = builder().build(&entry).await.unwrap();
    let error = container.get("exotic").await.unwrap_err();
    match error {
        Error::ModuleResolution { module, searched } => {
            assert_eq!(module, "Exotic");
            assert!(searched.contains(&"Logger".to_string()));
        }
        other => panic!("Expected ModuleResolution, got {other}"),
    }
}

#[tokio::test]
async fn test_eager_boot_builds_non_lazy_services() {
    let dir = TempDir::new().unwrap();
    let entry = write(
        &dir,
        "app.yml",
        r#"services:
  logger:
    class: Logger
"#,
    );

    let container = ContainerBuilder::new()
        .register(ClassEntry::new("Logger", "structured logger", |_args| async {
            Ok(instance(Logger { level: "info".to_string() }))
        }))
        .with_eager_boot(true)
        .build(&entry)
        .await
        .unwrap();

    assert!(container.has("logger"));
}
