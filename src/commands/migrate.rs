//! Migrate command - Manual schema management.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let db = Database::open(&config.database_url).await?;
    let result = run(&db, args.action).await;

    // Close the pool even when the action failed
    db.close().await?;
    result
}

async fn run(db: &Database, action: MigrateAction) -> AppResult<()> {
    match action {
        MigrateAction::Up => {
            db.migrate_up().await?;
            tracing::info!("Pending migrations applied");
        }
        MigrateAction::Down => {
            db.migrate_down().await?;
            tracing::info!("Last migration reverted");
        }
        MigrateAction::Status => {
            for state in db.migration_states().await? {
                let marker = if state.applied { "applied" } else { "pending" };
                println!("{:<50} {}", state.name, marker);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables before re-applying migrations");
            db.migrate_fresh().await?;
            tracing::info!("Schema rebuilt from scratch");
        }
    }
    Ok(())
}
