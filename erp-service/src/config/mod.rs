use chrono_tz::Tz;
use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct ErpConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub finance: FinanceConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: Secret<String>,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FinanceConfig {
    /// Timezone used for "today"/"this month" buckets and date parameters.
    pub timezone: Tz,
    /// Receipt numbers look like `{receipt_prefix}-{YYYY}-{seq}`.
    pub receipt_prefix: String,
    /// Zero-pad width of the sequence part of document numbers.
    pub number_width: usize,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Asia::Bangkok,
            receipt_prefix: "RC".to_string(),
            number_width: 3,
        }
    }
}

impl ErpConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let timezone_name = get_env("FINANCE_TIMEZONE", Some("Asia/Bangkok"), is_prod)?;
        let timezone = timezone_name.parse::<Tz>().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "Invalid FINANCE_TIMEZONE '{}': {}",
                timezone_name,
                e
            ))
        })?;

        let number_width = get_env("DOCUMENT_NUMBER_WIDTH", Some("3"), is_prod)?
            .parse::<usize>()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Invalid DOCUMENT_NUMBER_WIDTH: {}", e))
            })?;

        Ok(ErpConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: Secret::new(get_env("MONGODB_URI", None, is_prod)?),
                database: get_env("MONGODB_DATABASE", Some("erp_db"), is_prod)?,
            },
            finance: FinanceConfig {
                timezone,
                receipt_prefix: get_env("RECEIPT_NUMBER_PREFIX", Some("RC"), is_prod)?,
                number_width,
            },
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
