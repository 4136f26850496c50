use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::{connect_pool, migrate_legacy_vault, run_migrations, MigrationOutcome};

/// Operator-invoked legacy import: same path as the startup migration, with
/// the outcome reported on stdout.
pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let pool = connect_pool(&config).await?;
    run_migrations(&pool).await?;

    let outcome = migrate_legacy_vault(&pool, &config).await?;

    match output_format {
        OutputFormat::Json => {
            let body = match &outcome {
                MigrationOutcome::NoLegacyFile => json!({
                    "migrated": false,
                    "reason": "no legacy file",
                }),
                MigrationOutcome::Locked => json!({
                    "migrated": false,
                    "reason": "lock contention",
                }),
                MigrationOutcome::Quarantined { moved_to } => json!({
                    "migrated": false,
                    "reason": "corrupt file quarantined",
                    "moved_to": moved_to.display().to_string(),
                }),
                MigrationOutcome::Migrated { records } => json!({
                    "migrated": true,
                    "records": records,
                }),
            };
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => match &outcome {
            MigrationOutcome::NoLegacyFile => {
                println!("No legacy vault found; nothing to import.");
            }
            MigrationOutcome::Locked => {
                println!("Legacy vault is locked by another process; skipped.");
            }
            MigrationOutcome::Quarantined { moved_to } => {
                println!("Legacy vault was corrupt; moved to {}.", moved_to.display());
            }
            MigrationOutcome::Migrated { records } => {
                println!("Imported {records} legacy records.");
            }
        },
    }

    Ok(())
}
