//! Spindle - Entry Point
//!
//! Configuration inspection binary. Loads a configuration entry file through
//! the full pipeline (imports, schema validation, definition build) and
//! reports what a container built from it would contain, without
//! constructing any service.

use clap::{Parser, Subcommand};
use spindle_application::DefinitionBuilder;
use spindle_domain::Scope;
use spindle_infrastructure::config::{ConfigLoader, SchemaValidator};
use spindle_infrastructure::logging::init_logging;
use std::path::PathBuf;

/// Command line interface for Spindle
#[derive(Parser, Debug)]
#[command(name = "spindle")]
#[command(about = "Spindle - Configuration-Driven Dependency Injection")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate a configuration entry file
    Check {
        /// Path to the configuration entry file
        config: PathBuf,
    },
    /// List the services, aliases, and parameters a configuration declares
    List {
        /// Path to the configuration entry file
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Command::Check { config } => check(&config).await,
        Command::List { config } => list(&config).await,
    }
}

/// Run the load pipeline and report definition counts
async fn check(config: &PathBuf) -> anyhow::Result<()> {
    let definitions = load_definitions(config).await?;
    println!(
        "OK: {} services, {} aliases",
        definitions.len(),
        definitions.alias_count()
    );
    Ok(())
}

/// Print every declared service with its construction strategy
async fn list(config: &PathBuf) -> anyhow::Result<()> {
    let definitions = load_definitions(config).await?;

    println!("Services:");
    for definition in definitions.services() {
        let strategy = match (&definition.class, &definition.factory) {
            (Some(class), _) => format!("class {class}"),
            (None, Some(factory)) => format!("factory {}.{}", factory.service, factory.method),
            (None, None) => "unconstructible".to_string(),
        };
        let scope = match definition.scope {
            Scope::Singleton => "singleton",
            Scope::Transient => "transient",
        };
        let tags: Vec<&str> = definition.tags.iter().map(|tag| tag.name.as_str()).collect();
        if tags.is_empty() {
            println!("  {} ({strategy}, {scope})", definition.id);
        } else {
            println!("  {} ({strategy}, {scope}, tags: {})", definition.id, tags.join(", "));
        }
    }

    Ok(())
}

async fn load_definitions(
    config: &PathBuf,
) -> anyhow::Result<spindle_application::Definitions> {
    let tree = ConfigLoader::new().load(config).await?;
    SchemaValidator::for_services()?.validate(&tree, Some(config))?;
    let definitions = DefinitionBuilder::new()
        .with_source_file(config)
        .build(&tree)?;
    Ok(definitions)
}
