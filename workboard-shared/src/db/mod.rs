/// Database layer
///
/// - `pool`: Connection pool creation, health check and shutdown
/// - `migrations`: Embedded schema migrations
/// - `seed`: Idempotent role bootstrap run at start-up
///
/// Models live in the crate-level `models` module.
///
/// # Example
///
/// ```no_run
/// use workboard_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}, seed::seed_roles};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(DatabaseConfig::new(std::env::var("DATABASE_URL")?)).await?;
///     run_migrations(&pool).await?;
///     seed_roles(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
pub mod seed;
