//! CLI configuration: config file + environment + flag overrides.
//!
//! Layered with figment: `config.toml` under the platform config
//! directory, then `HUBMATE_*` environment variables, then CLI flags.

use std::path::PathBuf;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use hubmate_core::{ControllerConfig, EweLinkCredentials, PollConfig, RebootConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── File schema ─────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FileConfig {
    pub hub_url: Option<String>,
    pub app_id: Option<String>,
    pub access_token: Option<String>,
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub update: UpdateSection,
    #[serde(default)]
    pub reboot: RebootSection,
    pub ewelink: Option<EweLinkSection>,
}

/// `[update]` — firmware update polling.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UpdateSection {
    pub max_attempts: Option<u32>,
    pub poll_delay_secs: Option<u64>,
}

/// `[reboot]` — deep reboot waits.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RebootSection {
    pub shutdown_wait_secs: Option<u64>,
    pub power_off_wait_secs: Option<u64>,
}

/// `[ewelink]` — smart plug cloud account for deep reboot.
#[derive(Debug, Deserialize, Serialize)]
pub struct EweLinkSection {
    pub base_url: String,
    pub email: String,
    pub password: String,
}

// ── Loading and resolution ──────────────────────────────────────────

/// Platform config file path (`~/.config/hubmate/config.toml` on Linux).
pub fn config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "hubmate")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

/// Load the layered configuration from a specific file path.
pub fn load_from(path: &std::path::Path) -> Result<FileConfig, CliError> {
    Figment::from(Serialized::defaults(FileConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HUBMATE_"))
        .extract()
        .map_err(|source| CliError::Config { source })
}

/// Translate the file config + global flags into a `ControllerConfig`.
///
/// CLI flag overrides take priority over file and environment values.
pub fn resolve(file: &FileConfig, global: &GlobalOpts) -> Result<ControllerConfig, CliError> {
    let url_str = global
        .hub_url
        .as_deref()
        .or(file.hub_url.as_deref())
        .ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;
    let base_url: Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "hub_url".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let app_id = global
        .app_id
        .clone()
        .or_else(|| file.app_id.clone())
        .ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;
    let access_token = global
        .access_token
        .clone()
        .or_else(|| file.access_token.clone())
        .ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;

    let mut config = ControllerConfig::new(base_url, app_id, SecretString::from(access_token));

    if let Some(secs) = global.timeout.or(file.timeout_secs) {
        config.timeout = Duration::from_secs(secs);
    }

    let defaults = PollConfig::default();
    config.poll = PollConfig {
        max_attempts: file.update.max_attempts.unwrap_or(defaults.max_attempts),
        poll_delay: file
            .update
            .poll_delay_secs
            .map_or(defaults.poll_delay, Duration::from_secs),
    };

    let defaults = RebootConfig::default();
    config.reboot = RebootConfig {
        shutdown_wait: file
            .reboot
            .shutdown_wait_secs
            .map_or(defaults.shutdown_wait, Duration::from_secs),
        power_off_wait: file
            .reboot
            .power_off_wait_secs
            .map_or(defaults.power_off_wait, Duration::from_secs),
    };

    if let Some(section) = &file.ewelink {
        let base_url: Url = section.base_url.parse().map_err(|_| CliError::Validation {
            field: "ewelink.base_url".into(),
            reason: format!("invalid URL: {}", section.base_url),
        })?;
        config.ewelink = Some(EweLinkCredentials {
            base_url,
            email: section.email.clone(),
            password: SecretString::from(section.password.clone()),
        });
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bare_global() -> GlobalOpts {
        GlobalOpts {
            hub_url: None,
            app_id: None,
            access_token: None,
            timeout: None,
            verbose: 0,
            quiet: false,
        }
    }

    #[test]
    fn test_file_values_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
hub_url = "http://192.168.1.40"
app_id = "77"
access_token = "tok"
timeout_secs = 10

[update]
max_attempts = 5
poll_delay_secs = 1
"#,
        )
        .unwrap();

        let file = load_from(&path).unwrap();
        let config = resolve(&file, &bare_global()).unwrap();

        assert_eq!(config.base_url.as_str(), "http://192.168.1.40/");
        assert_eq!(config.app_id, "77");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.poll.max_attempts, 5);
        assert_eq!(config.poll.poll_delay, Duration::from_secs(1));
        assert!(config.ewelink.is_none());
    }

    #[test]
    fn test_flags_override_file_values() {
        let file = FileConfig {
            hub_url: Some("http://192.168.1.40".into()),
            app_id: Some("77".into()),
            access_token: Some("tok".into()),
            ..FileConfig::default()
        };
        let global = GlobalOpts {
            hub_url: Some("http://10.0.0.2".into()),
            ..bare_global()
        };

        let config = resolve(&file, &global).unwrap();
        assert_eq!(config.base_url.as_str(), "http://10.0.0.2/");
    }

    #[test]
    fn test_missing_token_is_a_config_error() {
        let file = FileConfig {
            hub_url: Some("http://192.168.1.40".into()),
            app_id: Some("77".into()),
            ..FileConfig::default()
        };
        let err = resolve(&file, &bare_global()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }
}
