//! The `migrate` command: wires the pipeline together and runs it.
//!
//! Process exit reflects overall completion, not per-item success;
//! operators inspect the registry file and the logs for gaps.

use anyhow::{Context, Result};
use chatlift_api::{DestinationClient, SourceClient};
use chatlift_core::config::MigrationConfig;
use chatlift_migrate::{ConversationMigrator, IdentityResolver, MigrationRunner, Pacer};
use chatlift_store::{RegistryStore, read_roster};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub async fn run(config_path: &Path) -> Result<()> {
    let config = MigrationConfig::load(config_path)
        .with_context(|| format!("loading configuration from {:?}", config_path))?;

    let roster = read_roster(&config.run.roster_path)
        .with_context(|| format!("reading roster from {:?}", config.run.roster_path))?;
    info!(
        "found {} user(s) in the roster, starting migration",
        roster.len()
    );

    let source = Arc::new(SourceClient::new(&config.source));
    let destination = Arc::new(DestinationClient::new(&config.destination));
    let pacer = Pacer::new(config.run.request_delay());

    let resolver = Arc::new(IdentityResolver::new(
        source.clone(),
        destination.clone(),
        &config.destination,
    ));
    let migrator = ConversationMigrator::new(
        source.clone(),
        destination.clone(),
        resolver.clone(),
        &config.destination,
        pacer.clone(),
    );
    let runner = MigrationRunner::new(source, resolver, migrator, pacer);

    let results = runner.run(&roster).await;

    let store = RegistryStore::new(&config.run.registry_path);
    store
        .append_results(&results)
        .with_context(|| format!("writing registry to {:?}", config.run.registry_path))?;

    let migrated: usize = results.iter().map(|r| r.conversation_ids.len()).sum();
    info!(
        "migration finished: {} of {} user(s) processed, {} conversation(s) migrated",
        results.len(),
        roster.len(),
        migrated
    );
    info!("results: {}", serde_json::to_string(&results)?);
    Ok(())
}
