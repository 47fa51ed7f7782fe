/// Registration and sign-in
///
/// Both registration paths (email/password and first Google sign-in) create
/// the user, an account row, a personal workspace and an OWNER membership in
/// a single transaction. If any step fails, none of it is kept.
///
/// # Example
///
/// ```no_run
/// use workboard_shared::services::onboarding::{login, register, RegisterUser};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let user = register(&pool, RegisterUser {
///     name: "Ada".to_string(),
///     email: "ada@example.com".to_string(),
///     password: "hunter22".to_string(),
/// }).await?;
/// assert!(user.current_workspace_id.is_some());
///
/// let same = login(&pool, "ada@example.com", "hunter22").await?;
/// assert_eq!(same.id, user.id);
/// # Ok(())
/// # }
/// ```

use sqlx::{Connection, PgConnection, PgPool};
use tracing::{info, warn};

use super::workspace::{self, NewWorkspace};
use super::{ServiceError, ServiceResult};
use crate::auth::oauth::GoogleProfile;
use crate::auth::password::{hash_password, verify_optional};
use crate::models::{
    account::{Account, AccountProvider},
    user::{CreateUser, User},
};

/// Registration input, already validated by the caller
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Registers a user on a pooled connection
pub async fn register(pool: &PgPool, input: RegisterUser) -> ServiceResult<User> {
    let mut conn = pool.acquire().await?;
    register_on(&mut *conn, input).await
}

/// Registers a user on the given connection
///
/// # Errors
///
/// - `Conflict` if the email is taken
/// - `NotFound("Owner role")` if roles were never seeded
pub async fn register_on(conn: &mut PgConnection, input: RegisterUser) -> ServiceResult<User> {
    let mut tx = conn.begin().await?;

    if User::find_by_email(&mut *tx, &input.email).await?.is_some() {
        return Err(ServiceError::Conflict("Email already exists".to_string()));
    }

    let password_hash = hash_password(&input.password)?;

    let user = User::create(
        &mut *tx,
        CreateUser {
            name: input.name,
            email: input.email,
            password_hash: Some(password_hash),
            profile_picture: None,
        },
    )
    .await?;

    Account::create(&mut *tx, user.id, AccountProvider::Email, &user.email).await?;

    let personal = workspace::create(&mut *tx, user.id, NewWorkspace::personal(&user.name)).await?;

    tx.commit().await?;

    info!(user_id = %user.id, workspace_id = %personal.id, "User registered");
    Ok(User {
        current_workspace_id: Some(personal.id),
        ..user
    })
}

/// Checks an email/password pair
///
/// Unknown email, wrong password, a user without a password and an inactive
/// user all give the same `InvalidCredentials`.
pub async fn login(pool: &PgPool, email: &str, password: &str) -> ServiceResult<User> {
    let user = User::find_by_email(pool, email)
        .await?
        .ok_or(ServiceError::InvalidCredentials)?;

    if !user.is_active {
        warn!(user_id = %user.id, "Login attempt for inactive user");
        return Err(ServiceError::InvalidCredentials);
    }

    if !verify_optional(password, user.password_hash.as_deref())? {
        return Err(ServiceError::InvalidCredentials);
    }

    User::update_last_login(pool, user.id).await?;

    info!(user_id = %user.id, "User logged in");
    Ok(user)
}

/// Signs a Google user in, onboarding them on first visit
///
/// A known email gains a Google account link if it has none, and a profile
/// picture if it has none.
pub async fn login_with_google(
    conn: &mut PgConnection,
    profile: &GoogleProfile,
) -> ServiceResult<User> {
    let mut tx = conn.begin().await?;

    let user_id = match User::find_by_email(&mut *tx, &profile.email).await? {
        Some(user) => {
            if !user.is_active {
                warn!(user_id = %user.id, "Google sign-in for inactive user");
                return Err(ServiceError::InvalidCredentials);
            }

            if !Account::user_has_provider(&mut *tx, user.id, AccountProvider::Google).await? {
                Account::create(&mut *tx, user.id, AccountProvider::Google, &profile.id).await?;
                info!(user_id = %user.id, "Google account linked");
            }

            if let Some(picture) = &profile.picture {
                User::fill_profile_picture(&mut *tx, user.id, picture).await?;
            }

            user.id
        }
        None => {
            let user = User::create(
                &mut *tx,
                CreateUser {
                    name: profile.display_name(),
                    email: profile.email.clone(),
                    password_hash: None,
                    profile_picture: profile.picture.clone(),
                },
            )
            .await?;

            Account::create(&mut *tx, user.id, AccountProvider::Google, &profile.id).await?;
            workspace::create(&mut *tx, user.id, NewWorkspace::personal(&user.name)).await?;

            info!(user_id = %user.id, "User registered via Google");
            user.id
        }
    };

    User::update_last_login(&mut *tx, user_id).await?;

    let user = User::find_by_id(&mut *tx, user_id)
        .await?
        .ok_or(ServiceError::NotFound("User"))?;

    tx.commit().await?;
    Ok(user)
}
