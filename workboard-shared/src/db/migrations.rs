/// Schema migrations
///
/// SQL files live in `workboard-shared/migrations/` and are embedded at
/// compile time by `sqlx::migrate!`, so the binary carries its own schema.
///
/// # Example
///
/// ```no_run
/// use workboard_shared::db::migrations::{ensure_database_exists, run_migrations};
/// use workboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example(url: &str) -> Result<(), Box<dyn std::error::Error>> {
/// ensure_database_exists(url).await?;
/// let pool = create_pool(DatabaseConfig::new(url)).await?;
/// let applied = run_migrations(&pool).await?;
/// println!("{} migrations applied in total", applied);
/// # Ok(())
/// # }
/// ```

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{info, warn};

/// Applies pending migrations
///
/// # Returns
///
/// Total number of successfully applied migrations after the run.
///
/// # Errors
///
/// Returns the first migration failure; that migration's transaction is
/// rolled back.
pub async fn run_migrations(pool: &PgPool) -> Result<i64, sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    if let Err(e) = sqlx::migrate!("./migrations").run(pool).await {
        warn!("Migration failed: {}", e);
        return Err(e);
    }

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
        .fetch_one(pool)
        .await
        .map_err(sqlx::migrate::MigrateError::Execute)?;

    info!(applied, "Database schema up to date");
    Ok(applied)
}

/// Creates the database named in `url` if it does not exist yet
///
/// Meant for development and tests; production databases are provisioned
/// separately.
pub async fn ensure_database_exists(url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(url).await? {
        info!("Creating database");
        Postgres::create_database(url).await?;
    }

    Ok(())
}
