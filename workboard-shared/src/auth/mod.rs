/// Authentication and authorization
///
/// # Modules
///
/// - [`permissions`]: Static role → permission table
/// - [`authorization`]: Membership resolver and the resolve → check gate
/// - [`jwt`]: Access token issuance and validation
/// - [`password`]: Argon2id password hashing
/// - [`middleware`]: Bearer token extraction and the `AuthContext` extractor
/// - [`oauth`]: Google OAuth code exchange
///
/// # Example
///
/// ```no_run
/// use workboard_shared::auth::password::{hash_password, verify_password};
/// use workboard_shared::auth::jwt::{create_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let token = create_token(&Claims::new(Uuid::new_v4()), "secret-key-at-least-32-bytes-long")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod oauth;
pub mod password;
pub mod permissions;
