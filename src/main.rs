// dskt-check/src/main.rs

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use dskt_check::{GithubClient, SchemaCheck, registry, run_full, run_newest};

#[derive(ValueEnum, Clone, Debug)]
enum Mode {
    /// Validate only the most recently appended registry entry.
    Newest,
    /// Validate every registry entry.
    Full,
}

#[derive(Parser)]
#[command(name = "dskt-check", version, about = "Validate mods.json entries against their dskt.json manifests")]
struct Args {
    /// Which entries to validate.
    #[arg(long, value_enum, default_value = "newest")]
    mode: Mode,
    /// Path to the registry file.
    #[arg(long, default_value = "mods.json")]
    registry: PathBuf,
    /// Schema the registry file itself must satisfy.
    #[arg(long, default_value = "schemas/mods.schema.json")]
    registry_schema: PathBuf,
    /// Schema each fetched dskt.json must satisfy.
    #[arg(long, default_value = "schemas/dskt.schema.json")]
    manifest_schema: PathBuf,
    /// Concurrent entry validations in full mode.
    #[arg(long, default_value_t = 8)]
    concurrency: usize,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("Validation failed: {err:#}");
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> Result<bool> {
    let doc = registry::load_document(&args.registry)?;
    let registry_schema = SchemaCheck::load(&args.registry_schema)?;
    let manifest_schema = SchemaCheck::load(&args.manifest_schema)?;
    let client = GithubClient::new()?;
    match args.mode {
        Mode::Full => {
            run_full(&client, &registry_schema, &manifest_schema, &doc, args.concurrency).await
        }
        Mode::Newest => run_newest(&client, &registry_schema, &manifest_schema, &doc).await,
    }
}
