// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./partyline.toml` > `~/.config/partyline/partyline.toml`
//! > `/etc/partyline/partyline.toml` with environment variable overrides via
//! the `PARTYLINE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PartylineConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/partyline/partyline.toml` (system-wide)
/// 3. `~/.config/partyline/partyline.toml` (user XDG config)
/// 4. `./partyline.toml` (local directory)
/// 5. `PARTYLINE_*` environment variables
pub fn load_config() -> Result<PartylineConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<PartylineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PartylineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PartylineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PartylineConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PartylineConfig::default()))
        .merge(Toml::file("/etc/partyline/partyline.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("partyline/partyline.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("partyline.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `PARTYLINE_CHAT_SWEEP_INTERVAL_SECS` must
/// map to `chat.sweep_interval_secs`, not `chat.sweep.interval.secs`.
fn env_provider() -> Env {
    Env::prefixed("PARTYLINE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: PARTYLINE_CHAT_MAX_MESSAGE_LEN -> "chat_max_message_len"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("chat_", "chat.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_any_source() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 4000);
        assert!(config.storage.wal_mode);
        assert_eq!(config.chat.inactivity_window_secs, 604_800);
        assert_eq!(config.chat.sweep_interval_secs, 3600);
        assert_eq!(config.chat.max_message_len, 4096);
        assert_eq!(config.chat.fanout_buffer, 64);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[server]
port = 8080

[chat]
inactivity_window_secs = 60
"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.chat.inactivity_window_secs, 60);
        assert_eq!(config.chat.sweep_interval_secs, 3600);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = load_config_from_str(
            r#"
[server]
prot = 8080
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn env_vars_override_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "partyline.toml",
                r#"
[server]
port = 8080
"#,
            )?;
            jail.set_env("PARTYLINE_SERVER_PORT", "9090");
            jail.set_env("PARTYLINE_CHAT_SWEEP_INTERVAL_SECS", "120");
            let config: PartylineConfig = build_figment().extract()?;
            assert_eq!(config.server.port, 9090);
            assert_eq!(config.chat.sweep_interval_secs, 120);
            Ok(())
        });
    }
}
