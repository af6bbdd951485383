//! Process configuration from the environment.

use thiserror::Error;
use uuid::Uuid;

use transerp_core::TenantId;
use transerp_observability::{LogFormat, UnknownLogFormat};

pub const TENANT_ID_VAR: &str = "TRANSERP_TENANT_ID";
pub const LOG_FORMAT_VAR: &str = "TRANSERP_LOG_FORMAT";
pub const CURRENT_PATH_VAR: &str = "TRANSERP_CURRENT_PATH";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const USE_POSTGRES_VAR: &str = "TRANSERP_USE_POSTGRES";

pub const DEFAULT_CURRENT_PATH: &str = "/drivers";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TRANSERP_TENANT_ID is not a UUID: '{0}'")]
    InvalidTenantId(String),

    #[error(transparent)]
    LogFormat(#[from] UnknownLogFormat),

    #[error("{name} must be 'true' or 'false', got '{value}'")]
    InvalidFlag { name: &'static str, value: String },

    #[error("TRANSERP_USE_POSTGRES=true requires DATABASE_URL")]
    MissingDatabaseUrl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub tenant_id: TenantId,
    pub log_format: LogFormat,
    /// Page the demo session starts on.
    pub current_path: String,
    pub database_url: Option<String>,
    pub use_postgres: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let tenant_id = match var(TENANT_ID_VAR) {
            Some(raw) => Uuid::parse_str(raw.trim())
                .map(TenantId::from_uuid)
                .map_err(|_| ConfigError::InvalidTenantId(raw))?,
            None => {
                let generated = TenantId::new();
                tracing::warn!(tenant_id = %generated, "{TENANT_ID_VAR} not set; using a fresh tenant");
                generated
            }
        };

        let log_format = match var(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        let current_path = var(CURRENT_PATH_VAR).unwrap_or_else(|| DEFAULT_CURRENT_PATH.to_string());

        let use_postgres = match var(USE_POSTGRES_VAR) {
            Some(raw) => raw.trim().parse::<bool>().map_err(|_| ConfigError::InvalidFlag {
                name: USE_POSTGRES_VAR,
                value: raw,
            })?,
            None => false,
        };

        let database_url = var(DATABASE_URL_VAR);
        if use_postgres && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        Ok(Self {
            tenant_id,
            log_format,
            current_path,
            database_url,
            use_postgres,
        })
    }
}
