use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
    pub polka: PolkaSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub platform: Platform,
}

/// Deployment platform. Destructive admin endpoints only run on `dev`.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Dev,
    #[default]
    #[serde(other)]
    Production,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }

    /// Server-level connection, used to create databases
    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port
        )
    }
}

/// Access and refresh token settings
#[derive(Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    /// Ceiling for access token lifetimes, in seconds
    #[serde(default = "default_access_token_max_ttl")]
    pub access_token_max_ttl: i64,
    /// Refresh token lifetime, in seconds
    #[serde(default = "default_refresh_token_ttl")]
    pub refresh_token_ttl: i64,
}

pub const DEFAULT_ACCESS_TOKEN_MAX_TTL: i64 = 3600;
pub const DEFAULT_REFRESH_TOKEN_TTL: i64 = 60 * 24 * 60 * 60;

fn default_access_token_max_ttl() -> i64 {
    DEFAULT_ACCESS_TOKEN_MAX_TTL
}

fn default_refresh_token_ttl() -> i64 {
    DEFAULT_REFRESH_TOKEN_TTL
}

impl JwtSettings {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_max_ttl: DEFAULT_ACCESS_TOKEN_MAX_TTL,
            refresh_token_ttl: DEFAULT_REFRESH_TOKEN_TTL,
        }
    }
}

// Keep the signing key out of debug output.
impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret_length", &self.secret.len())
            .field("access_token_max_ttl", &self.access_token_max_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}

/// Payment provider webhook settings
#[derive(Deserialize, Clone)]
pub struct PolkaSettings {
    pub api_key: String,
}

impl std::fmt::Debug for PolkaSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolkaSettings").finish_non_exhaustive()
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("jwt.secret".to_string()));
        }
        if self.jwt.access_token_max_ttl <= 0 {
            return Err(ConfigError::InvalidValue(
                "jwt.access_token_max_ttl must be positive".to_string(),
            ));
        }
        if self.jwt.refresh_token_ttl <= 0 {
            return Err(ConfigError::InvalidValue(
                "jwt.refresh_token_ttl must be positive".to_string(),
            ));
        }
        if self.polka.api_key.trim().is_empty() {
            return Err(ConfigError::MissingRequired("polka.api_key".to_string()));
        }
        Ok(())
    }
}

/// Load settings from `configuration.yaml` (optional) overlaid with
/// `APP_`-prefixed environment variables, e.g. `APP_JWT__SECRET`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    let settings = settings.try_deserialize::<Settings>()?;
    settings.validate()?;
    Ok(settings)
}
