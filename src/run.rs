// dskt-check/src/run.rs

use anyhow::{Context, Result};
use futures::{StreamExt, stream};
use tracing::info;

use crate::github::GithubClient;
use crate::registry::{Registry, RegistryEntry};
use crate::schema::{SchemaCheck, render_violations};
use crate::validate::{EntryError, validate_entry};

/// What happened to one registry entry.
pub struct Outcome {
    pub entry: RegistryEntry,
    pub result: Result<(), EntryError>,
}

impl Outcome {
    pub fn passed(&self) -> bool { self.result.is_ok() }

    /// Print the per-entry CI marker. Schema failures carry their itemized
    /// violation list in the error's Display.
    pub fn report(&self) {
        match &self.result {
            Ok(()) => println!("✓ Validated {} ({})", self.entry.name, self.entry.repo),
            Err(err) => eprintln!("✗ Failed to validate {}: {err}", self.entry.name),
        }
    }
}

/// Gate the raw registry document through its own schema before any per-entry
/// work. A violating registry is fatal, with every violation rendered.
fn check_registry(schema: &SchemaCheck, doc: &serde_json::Value) -> Result<Registry> {
    let violations = schema.check(doc);
    if !violations.is_empty() {
        anyhow::bail!(
            "registry does not match its schema:\n{}",
            render_violations(&violations)
        );
    }
    Registry::from_document(doc)
}

/// Validate every registry entry. Entries are independent, so they run
/// through a bounded concurrent stream; results are joined before the
/// aggregate verdict is computed. Returns Ok(true) iff every entry passed.
pub async fn run_full(
    client: &GithubClient,
    registry_schema: &SchemaCheck,
    manifest_schema: &SchemaCheck,
    doc: &serde_json::Value,
    concurrency: usize,
) -> Result<bool> {
    let registry = check_registry(registry_schema, doc)?;
    let outcomes: Vec<Outcome> = stream::iter(registry.entries().iter().map(|entry| async move {
        let result = validate_entry(client, manifest_schema, entry).await;
        Outcome { entry: entry.clone(), result }
    }))
    .buffer_unordered(concurrency.max(1))
    .collect()
    .await;

    let mut all_passed = true;
    for outcome in &outcomes {
        outcome.report();
        all_passed &= outcome.passed();
    }
    Ok(all_passed)
}

/// Validate only the most recently appended entry. The registry is
/// append-only and CI runs on every addition, so the last entry is the one
/// under review. An empty registry is a setup error.
pub async fn run_newest(
    client: &GithubClient,
    registry_schema: &SchemaCheck,
    manifest_schema: &SchemaCheck,
    doc: &serde_json::Value,
) -> Result<bool> {
    let registry = check_registry(registry_schema, doc)?;
    let entry = registry.newest().context("registry is empty, nothing to validate")?;
    info!("Validating newest mod: {}", entry.name);
    let result = validate_entry(client, manifest_schema, entry).await;
    let outcome = Outcome { entry: entry.clone(), result };
    outcome.report();
    Ok(outcome.passed())
}
