use std::env;

/// AppConfig
///
/// Holds the application's configuration. Immutable once loaded and pulled into
/// handlers and extractors through `FromRef<AppState>`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Postgres connection string. `None` only in local mode, where the in-memory store is used.
    pub db_url: Option<String>,
    // Runtime environment marker.
    pub env: Env,
    // Secret key used to sign and verify session tokens (HS256).
    pub jwt_secret: String,
    // Lifetime of an issued session token, in seconds.
    pub session_ttl_secs: i64,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Whether the public registration endpoint may create ADMIN accounts.
    pub allow_admin_registration: bool,
    // Optional bootstrap administrator, created at startup if the email is unknown.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

#[derive(Clone, Debug)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// Env
///
/// Runtime context. `Local` enables developer conveniences (pretty logs, in-memory store,
/// open admin registration); `Production` demands every secret explicitly.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

pub const DEFAULT_SESSION_TTL_SECS: i64 = 60 * 60 * 24;
const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";

impl Default for AppConfig {
    /// Non-panicking configuration for tests; no environment variables are read.
    fn default() -> Self {
        Self {
            db_url: None,
            env: Env::Local,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            bind_addr: "127.0.0.1:0".to_string(),
            allow_admin_registration: false,
            bootstrap_admin: None,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics if `DATABASE_URL` or `JWT_SECRET` is missing in production, or if a numeric
    /// or boolean variable cannot be parsed. The server refuses to start half-configured.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let (db_url, jwt_secret) = match env {
            Env::Production => (
                Some(env::var("DATABASE_URL").expect("FATAL: DATABASE_URL required in prod")),
                env::var("JWT_SECRET").expect("FATAL: JWT_SECRET must be set in production."),
            ),
            Env::Local => (
                env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
                env::var("JWT_SECRET").unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string()),
            ),
        };

        let session_ttl_secs = env::var("SESSION_TTL_SECS")
            .map(|raw| {
                raw.parse::<i64>()
                    .expect("FATAL: SESSION_TTL_SECS must be an integer number of seconds")
            })
            .unwrap_or(DEFAULT_SESSION_TTL_SECS);

        let allow_admin_registration = env::var("ALLOW_ADMIN_REGISTRATION")
            .map(|raw| parse_flag(&raw))
            .unwrap_or(env == Env::Local);

        let bootstrap_admin = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(BootstrapAdmin { email, password }),
            _ => None,
        };

        Self {
            db_url,
            env,
            jwt_secret,
            session_ttl_secs,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            allow_admin_registration,
            bootstrap_admin,
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" | "" => false,
        other => panic!("FATAL: expected a boolean flag, got {other:?}"),
    }
}
