use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub swagger: SwaggerConfig,
    pub notifications: NotificationConfig,
    pub assignments: AssignmentConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Bearer token verification settings.
///
/// Tokens are issued by the external auth provider and signed with the
/// project's shared HS256 secret.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub audience: String,
    pub issuer: Option<String>,
    pub jwt_leeway: Duration,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"***")
            .field("audience", &self.audience)
            .field("issuer", &self.issuer)
            .field("jwt_leeway", &self.jwt_leeway)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Real-time notification stream settings
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Capacity of the broadcast channel; lagging subscribers skip events past this
    pub channel_capacity: usize,
    /// Interval between SSE keep-alive comments
    pub keep_alive: Duration,
}

/// Assignment lifecycle policy
#[derive(Debug, Clone)]
pub struct AssignmentConfig {
    /// Whether a responder may decline an assignment they already accepted
    pub allow_decline_after_accept: bool,
    /// Pending assignments older than this count against organization health
    pub stale_pending_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            notifications: NotificationConfig::from_env()?,
            assignments: AssignmentConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = parse_env("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?;
        let min_connections = parse_env("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?;
        let acquire_timeout_secs =
            parse_env("DB_ACQUIRE_TIMEOUT_SECS", Self::DEFAULT_ACQUIRE_TIMEOUT_SECS)?;
        let idle_timeout_secs = parse_env("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?;
        let max_lifetime_secs = parse_env("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl AuthConfig {
    const DEFAULT_AUDIENCE: &'static str = "authenticated";
    const DEFAULT_JWT_LEEWAY_SECS: u64 = 60;

    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("AUTH_JWT_SECRET")
            .map_err(|_| "AUTH_JWT_SECRET environment variable is required".to_string())?;

        let audience =
            env::var("AUTH_AUDIENCE").unwrap_or_else(|_| Self::DEFAULT_AUDIENCE.to_string());

        let issuer = env::var("AUTH_ISSUER").ok().filter(|s| !s.is_empty());

        let jwt_leeway_secs = parse_env("JWT_LEEWAY", Self::DEFAULT_JWT_LEEWAY_SECS)?;

        Ok(Self {
            jwt_secret,
            audience,
            issuer,
            jwt_leeway: Duration::from_secs(jwt_leeway_secs),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Relief Ops API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Disaster response operations API".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl NotificationConfig {
    const DEFAULT_CHANNEL_CAPACITY: usize = 1024;
    const DEFAULT_KEEP_ALIVE_SECS: u64 = 15;

    pub fn from_env() -> Result<Self, String> {
        let channel_capacity =
            parse_env("NOTIFICATION_CHANNEL_CAPACITY", Self::DEFAULT_CHANNEL_CAPACITY)?;
        if channel_capacity == 0 {
            return Err("NOTIFICATION_CHANNEL_CAPACITY must be greater than 0".to_string());
        }

        let keep_alive_secs =
            parse_env("NOTIFICATION_KEEP_ALIVE_SECS", Self::DEFAULT_KEEP_ALIVE_SECS)?;

        Ok(Self {
            channel_capacity,
            keep_alive: Duration::from_secs(keep_alive_secs),
        })
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            channel_capacity: Self::DEFAULT_CHANNEL_CAPACITY,
            keep_alive: Duration::from_secs(Self::DEFAULT_KEEP_ALIVE_SECS),
        }
    }
}

impl AssignmentConfig {
    const DEFAULT_STALE_PENDING_HOURS: i64 = 24;

    pub fn from_env() -> Result<Self, String> {
        let allow_decline_after_accept =
            parse_bool_env("ASSIGNMENT_ALLOW_DECLINE_AFTER_ACCEPT", false)?;
        let stale_pending_hours = parse_env(
            "ASSIGNMENT_STALE_PENDING_HOURS",
            Self::DEFAULT_STALE_PENDING_HOURS,
        )?;

        Ok(Self {
            allow_decline_after_accept,
            stale_pending_hours,
        })
    }
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            allow_decline_after_accept: false,
            stale_pending_hours: Self::DEFAULT_STALE_PENDING_HOURS,
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr + ToString,
{
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .map_err(|_| format!("{} must be a valid number", key))
}

fn parse_bool_env(key: &str, default: bool) -> Result<bool, String> {
    match env::var(key) {
        Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(format!("{} must be a boolean", key)),
        },
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swagger_credentials_require_both_parts() {
        let mut swagger = SwaggerConfig {
            username: Some("admin".to_string()),
            password: None,
            title: String::new(),
            version: String::new(),
            description: String::new(),
        };
        assert!(swagger.credentials().is_none());

        swagger.password = Some("secret".to_string());
        assert_eq!(swagger.credentials().as_deref(), Some("admin:secret"));
    }

    #[test]
    fn test_auth_config_debug_hides_secret() {
        let auth = AuthConfig {
            jwt_secret: "super-secret-value".to_string(),
            audience: "authenticated".to_string(),
            issuer: None,
            jwt_leeway: Duration::from_secs(60),
        };
        let rendered = format!("{:?}", auth);
        assert!(!rendered.contains("super-secret-value"));
    }

    #[test]
    fn test_server_address() {
        let app = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_allowed_origins: vec!["*".to_string()],
        };
        assert_eq!(app.server_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_assignment_defaults_disallow_decline_after_accept() {
        let cfg = AssignmentConfig::default();
        assert!(!cfg.allow_decline_after_accept);
        assert_eq!(cfg.stale_pending_hours, 24);
    }
}
