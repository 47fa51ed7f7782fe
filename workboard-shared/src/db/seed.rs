/// Role bootstrap
///
/// Members reference role rows by id, so every [`RoleName`] needs a row
/// before the first registration. [`seed_roles`] is called once during
/// start-up, after migrations. It checks each role by name and inserts only
/// the missing ones. Existing rows (and their stored permission arrays) are
/// never modified, so running it again is a no-op.

use sqlx::PgPool;
use tracing::{debug, info};

use crate::auth::permissions::RoleName;
use crate::models::role::Role;

/// What a seeding run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Roles inserted by this run
    pub created: Vec<RoleName>,

    /// Roles that were already present
    pub existing: Vec<RoleName>,
}

/// Inserts any missing role rows
///
/// # Errors
///
/// Returns the first database error; roles inserted before it stay inserted,
/// which is harmless because each insert is independent and idempotent.
pub async fn seed_roles(pool: &PgPool) -> Result<SeedReport, sqlx::Error> {
    let mut report = SeedReport::default();

    for role in RoleName::ALL {
        if Role::find_by_name(pool, role).await?.is_some() {
            debug!(role = %role, "Role already present");
            report.existing.push(role);
            continue;
        }

        // Another instance may seed concurrently; the insert tolerates that.
        let permissions = role.permissions().to_names();
        if Role::insert_if_absent(pool, role, &permissions).await? {
            report.created.push(role);
        } else {
            report.existing.push(role);
        }
    }

    info!(
        created = report.created.len(),
        existing = report.existing.len(),
        "Role seeding finished"
    );

    Ok(report)
}
