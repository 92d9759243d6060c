/// Configuration management for the API server
///
/// Configuration comes from environment variables, optionally seeded from a
/// `.env` file. Development defaults let the server start with no
/// configuration at all; `APP_ENV=production` makes the token secret and the
/// completion API key mandatory.
///
/// # Environment Variables
///
/// - `APP_ENV`: `development` (default) or `production`
/// - `HOST` / `PORT`: Listen address (default: 0.0.0.0:5000)
/// - `DB_PATH`: SQLite database file (default: ./data/onboard.db)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
/// - `JWT_SECRET`: Token signing secret (required in production, >= 32 chars)
/// - `JWT_EXPIRES_IN`: Token lifetime such as `7d`, `12h`, `30m` or `3600` (default: 7d)
/// - `OPENAI_API_KEY`: Completion API key (required in production)
/// - `OPENAI_MODEL`: Completion model (default: gpt-3.5-turbo)
/// - `OPENAI_BASE_URL`: Completion API base URL (default: https://api.openai.com/v1)
/// - `OPENAI_TIMEOUT_SECS`: Completion request timeout (default: 30)
/// - `CORS_ORIGIN`: Allowed origin(s), comma separated, `*` for any (default: http://localhost:3000)
///
/// # Example
///
/// ```no_run
/// use onboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;

/// Secret used when `JWT_SECRET` is unset outside production
pub const DEV_JWT_SECRET: &str = "dev-secret-key";

const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: Environment,

    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Completion service configuration
    pub openai: OpenAiSettings,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` allows any origin)
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`
    pub path: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Token lifetime in seconds
    pub expires_in_seconds: i64,
}

/// Completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiSettings {
    /// API key; `None` disables the service and every call uses its fallback
    pub api_key: Option<String>,

    pub model: String,

    pub base_url: String,

    pub timeout_seconds: u64,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A variable has an unparsable value
    /// - Production mode is missing `JWT_SECRET` or `OPENAI_API_KEY`
    /// - The production `JWT_SECRET` is shorter than 32 characters
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let environment = Environment::parse(&var("APP_ENV").unwrap_or_default());

        if environment == Environment::Production {
            let missing: Vec<&str> = ["JWT_SECRET", "OPENAI_API_KEY"]
                .into_iter()
                .filter(|key| var(*key).is_none())
                .collect();

            if !missing.is_empty() {
                anyhow::bail!(
                    "Missing required environment variables: {}",
                    missing.join(", ")
                );
            }
        }

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = var("PORT")
            .unwrap_or_else(|| "5000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let cors_origins = var("CORS_ORIGIN")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let db_path = var("DB_PATH").unwrap_or_else(|| "./data/onboard.db".to_string());
        let max_connections = var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.to_string());
        if environment == Environment::Production && jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN {
            anyhow::bail!(
                "JWT_SECRET must be at least {} characters long",
                MIN_PRODUCTION_SECRET_LEN
            );
        }

        let expires_in = var("JWT_EXPIRES_IN").unwrap_or_else(|| "7d".to_string());
        let expires_in_seconds = parse_duration_seconds(&expires_in)
            .with_context(|| format!("JWT_EXPIRES_IN has an invalid value: {}", expires_in))?;

        let timeout_seconds = var("OPENAI_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse::<u64>()
            .context("OPENAI_TIMEOUT_SECS must be a number of seconds")?;

        Ok(Self {
            environment,
            api: ApiConfig {
                host,
                port,
                cors_origins,
            },
            database: DatabaseConfig {
                path: db_path,
                max_connections,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expires_in_seconds,
            },
            openai: OpenAiSettings {
                api_key: var("OPENAI_API_KEY"),
                model: var("OPENAI_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
                base_url: var("OPENAI_BASE_URL")
                    .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
                timeout_seconds,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Lifetime of issued session tokens
    pub fn token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.jwt.expires_in_seconds)
    }

    /// Whether any origin may call the API
    pub fn allows_any_origin(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}

/// Parses `<n>[s|m|h|d]` or bare seconds into a positive number of seconds
pub fn parse_duration_seconds(value: &str) -> anyhow::Result<i64> {
    let value = value.trim();
    let (digits, multiplier) = match value.chars().last() {
        Some('s') => (&value[..value.len() - 1], 1),
        Some('m') => (&value[..value.len() - 1], 60),
        Some('h') => (&value[..value.len() - 1], 60 * 60),
        Some('d') => (&value[..value.len() - 1], 24 * 60 * 60),
        _ => (value, 1),
    };

    let amount = digits
        .parse::<i64>()
        .with_context(|| format!("expected a duration like 7d, 12h, 30m or 3600, got {:?}", value))?;

    if amount <= 0 {
        anyhow::bail!("duration must be positive, got {:?}", value);
    }

    // Must stay addable to the current time when tokens are issued
    let seconds = amount
        .checked_mul(multiplier)
        .filter(|&seconds| {
            chrono::Duration::try_seconds(seconds)
                .and_then(|lifetime| chrono::Utc::now().checked_add_signed(lifetime))
                .is_some()
        })
        .ok_or_else(|| anyhow::anyhow!("duration is too large: {:?}", value))?;

    Ok(seconds)
}
