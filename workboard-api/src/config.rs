/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8000)
/// - `API_BASE_PATH`: Prefix for every API route (default: /api)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
/// - `PRODUCTION`: Enables HSTS when `true` (default: false)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Secret key for JWT signing (required, 32+ chars)
/// - `JWT_EXPIRES_IN_HOURS`: Access token lifetime (default: 24)
/// - `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`, `GOOGLE_CALLBACK_URL`,
///   `FRONTEND_GOOGLE_CALLBACK_URL`: Google sign-in; disabled unless all four are set
/// - `RUST_LOG`: Log filter (default: workboard_api=debug,tower_http=debug)
/// - `LOG_FORMAT`: `json` for JSON logs
///
/// # Example
///
/// ```no_run
/// use workboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;
use workboard_shared::auth::jwt::DEFAULT_EXPIRATION_HOURS;
use workboard_shared::auth::oauth::GoogleOAuthConfig;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,

    /// `None` when Google sign-in is not configured
    pub google: Option<GoogleConfig>,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Prefix under which all API routes are nested, e.g. `/api`
    pub base_path: String,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Production mode (enables HSTS)
    pub production: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    pub expires_in_hours: i64,
}

/// Google OAuth settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,

    /// Our callback, registered with Google
    pub callback_url: String,

    /// Frontend page that receives the outcome of a Google sign-in
    pub frontend_callback_url: String,
}

impl GoogleConfig {
    pub fn oauth(&self) -> GoogleOAuthConfig {
        GoogleOAuthConfig {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            redirect_url: self.callback_url.clone(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()?;
        let base_path = normalize_base_path(
            &env::var("API_BASE_PATH").unwrap_or_else(|_| "/api".to_string()),
        );
        let cors_origins = parse_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));
        let production = env::var("PRODUCTION")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let expires_in_hours = match env::var("JWT_EXPIRES_IN_HOURS") {
            Ok(v) => v.parse::<i64>()?,
            Err(_) => DEFAULT_EXPIRATION_HOURS,
        };

        if expires_in_hours <= 0 {
            anyhow::bail!("JWT_EXPIRES_IN_HOURS must be positive");
        }

        let google = match (
            env::var("GOOGLE_CLIENT_ID"),
            env::var("GOOGLE_CLIENT_SECRET"),
            env::var("GOOGLE_CALLBACK_URL"),
            env::var("FRONTEND_GOOGLE_CALLBACK_URL"),
        ) {
            (Ok(client_id), Ok(client_secret), Ok(callback_url), Ok(frontend_callback_url)) => {
                Some(GoogleConfig {
                    client_id,
                    client_secret,
                    callback_url,
                    frontend_callback_url,
                })
            }
            _ => None,
        };

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                base_path,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expires_in_hours,
            },
            google,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Leading slash, no trailing slash; empty or `/` means no prefix
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
                base_path: "/api".to_string(),
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 10,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
                expires_in_hours: 24,
            },
            google: None,
        }
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(test_config().bind_address(), "127.0.0.1:8000");
    }

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path("/api"), "/api");
        assert_eq!(normalize_base_path("api/"), "/api");
        assert_eq!(normalize_base_path("/v1/api/"), "/v1/api");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path(""), "");
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://a.test, http://b.test,,"),
            vec!["http://a.test", "http://b.test"]
        );
        assert_eq!(parse_origins("*"), vec!["*"]);
    }

    #[test]
    fn test_google_oauth_config() {
        let google = GoogleConfig {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            callback_url: "http://localhost:8000/api/auth/google/callback".to_string(),
            frontend_callback_url: "http://localhost:5173/google/callback".to_string(),
        };

        let oauth = google.oauth();
        assert_eq!(oauth.client_id, "id");
        assert_eq!(oauth.redirect_url, google.callback_url);
    }
}
