use std::time::Duration;

use fitfusion_core::tracing::LogFormat;

use crate::jobs::expiry_sweep::SweepWorkerConfig;
use crate::usecase::planner::DEFAULT_MAX_BATCH_OPS;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Cascade service configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeConfig {
    /// PostgreSQL connection URL of the document store.
    pub database_url: String,
    /// gRPC endpoint of the identity bridge (e.g. "http://identity:50052").
    pub identity_grpc_url: String,
    /// TCP port for the HTTP server (default 3114). Env var: `CASCADE_PORT`.
    pub cascade_port: u16,
    /// TCP port for the gRPC server (default 50053). Env var: `CASCADE_GRPC_PORT`.
    pub cascade_grpc_port: u16,
    /// Run the in-process expiry sweep worker (default true).
    pub sweep_enabled: bool,
    /// Sweep cadence (default 24h). Env var: `SWEEP_INTERVAL_SECS`.
    pub sweep_interval: Duration,
    /// Per-batch op limit of the store, at least 1 (default 500).
    pub max_batch_ops: usize,
    /// `json` or `pretty` (default json). Env var: `LOG_FORMAT`.
    pub log_format: LogFormat,
}

impl CascadeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let parsed = |name: &'static str, default| -> Result<u64, ConfigError> {
            match lookup(name) {
                None => Ok(default),
                Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { name, value: v }),
            }
        };
        let port = |name: &'static str, default: u16| -> Result<u16, ConfigError> {
            let value = parsed(name, u64::from(default))?;
            u16::try_from(value).map_err(|_| ConfigError::Invalid {
                name,
                value: value.to_string(),
            })
        };

        let sweep_enabled = match lookup("SWEEP_ENABLED") {
            None => true,
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "SWEEP_ENABLED",
                        value: v,
                    });
                }
            },
        };

        let sweep_interval_secs = parsed("SWEEP_INTERVAL_SECS", 86_400)?;
        if sweep_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "SWEEP_INTERVAL_SECS",
                value: "0".into(),
            });
        }

        let max_batch_ops = parsed("MAX_BATCH_OPS", DEFAULT_MAX_BATCH_OPS as u64)?;
        if max_batch_ops == 0 {
            return Err(ConfigError::Invalid {
                name: "MAX_BATCH_OPS",
                value: "0".into(),
            });
        }

        let log_format = match lookup("LOG_FORMAT") {
            None => LogFormat::default(),
            Some(v) => LogFormat::parse(v.trim()).ok_or(ConfigError::Invalid {
                name: "LOG_FORMAT",
                value: v,
            })?,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            identity_grpc_url: required("IDENTITY_GRPC_URL")?,
            cascade_port: port("CASCADE_PORT", 3114)?,
            cascade_grpc_port: port("CASCADE_GRPC_PORT", 50053)?,
            sweep_enabled,
            sweep_interval: Duration::from_secs(sweep_interval_secs),
            max_batch_ops: max_batch_ops as usize,
            log_format,
        })
    }

    pub fn sweep_worker(&self) -> SweepWorkerConfig {
        SweepWorkerConfig {
            enabled: self.sweep_enabled,
            interval: self.sweep_interval,
        }
    }
}
