use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `HARK__`),
/// then an optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("HARK")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.playback.volume) {
            return Err("playback.volume must be within 0.0..=1.0".to_string());
        }
        if self.playback.rate <= 0.0 {
            return Err("playback.rate must be positive".to_string());
        }
        if self.controls.scrub_seconds == 0 {
            return Err("controls.scrub_seconds must be >= 1".to_string());
        }
        if self.controls.rate_step <= 0.0 {
            return Err("controls.rate_step must be positive".to_string());
        }
        Ok(())
    }

    /// The state-file path: explicit override or the XDG data default.
    pub fn state_path(&self) -> Option<PathBuf> {
        if let Some(p) = self.state.path.as_deref() {
            return Some(PathBuf::from(p));
        }
        default_data_dir().map(|d| d.join("state.json"))
    }

    /// The download-cache directory: explicit override or the XDG default.
    pub fn cache_dir(&self) -> Option<PathBuf> {
        if let Some(p) = self.state.cache_dir.as_deref() {
            return Some(PathBuf::from(p));
        }
        default_cache_dir()
    }
}

/// Resolve the config path from `HARK_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("HARK_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/hark/config.toml`
/// or `~/.config/hark/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("hark").join("config.toml"))
}

fn default_data_dir() -> Option<PathBuf> {
    let data_home = if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".local").join("share"))
    } else {
        None
    };

    data_home.map(|d| d.join("hark"))
}

fn default_cache_dir() -> Option<PathBuf> {
    let cache_home = if let Some(xdg) = env::var_os("XDG_CACHE_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".cache"))
    } else {
        None
    };

    cache_home.map(|d| d.join("hark"))
}
