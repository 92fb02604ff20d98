// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, non-empty paths, and non-zero
//! intervals.

use crate::diagnostic::ConfigError;
use crate::model::PartylineConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PartylineConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.chat.inactivity_window_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "chat.inactivity_window_secs must be greater than zero".to_string(),
        });
    }

    if config.chat.sweep_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "chat.sweep_interval_secs must be greater than zero".to_string(),
        });
    }

    if config.chat.max_message_len == 0 {
        errors.push(ConfigError::Validation {
            message: "chat.max_message_len must be at least 1".to_string(),
        });
    }

    if config.chat.fanout_buffer == 0 {
        errors.push(ConfigError::Validation {
            message: "chat.fanout_buffer must be at least 1".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.log.level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.log.level
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
