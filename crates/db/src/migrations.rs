use anyhow::anyhow;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub fn run_migrations(connection: &mut SqliteConnection) -> anyhow::Result<()> {
    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| anyhow!(err))?;
    for version in applied {
        log::info!("applied migration {}", version);
    }
    Ok(())
}
