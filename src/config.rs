//! Admission configuration.
//!
//! Per-kind validation rules are compiled in (see
//! [`webhooks::policies`](crate::webhooks::policies)). Only deployment-specific
//! values are read from the environment.

use tracing::warn;

use crate::crd::RABBITMQ_BROKER_CLASS;
use crate::error::{Error, Result};

/// Environment variable overriding the broker class this webhook serves
pub const BROKER_CLASS_ENV: &str = "BROKER_CLASS";

/// Runtime configuration for the admission adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionConfig {
    /// Triggers on brokers of any other class are accepted without validation
    pub broker_class: String,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            broker_class: RABBITMQ_BROKER_CLASS.to_string(),
        }
    }
}

impl AdmissionConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps variable names to values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let broker_class = match lookup(BROKER_CLASS_ENV) {
            Some(value) if value.trim().is_empty() => {
                return Err(Error::Config(format!("{} must not be empty", BROKER_CLASS_ENV)));
            }
            Some(value) => value.trim().to_string(),
            None => {
                warn!(
                    "{} not set, using '{}'",
                    BROKER_CLASS_ENV, RABBITMQ_BROKER_CLASS
                );
                RABBITMQ_BROKER_CLASS.to_string()
            }
        };
        Ok(Self { broker_class })
    }
}
