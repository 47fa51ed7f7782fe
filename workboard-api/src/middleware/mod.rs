/// Middleware modules for the API server
///
/// - `security`: Security response headers
///
/// Authentication and the workspace gate live in `app` and `access`.

pub mod security;
