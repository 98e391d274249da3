use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::FetchError,
    model::{Location, Units},
};

pub const API_KEY_ENV: &str = "SKYBOARD_API_KEY";
pub const GEOCODING_API_KEY_ENV: &str = "SKYBOARD_GEOCODING_API_KEY";
pub const LOCATION_ENV: &str = "SKYBOARD_LOCATION";
pub const UNITS_ENV: &str = "SKYBOARD_UNITS";

pub const DEFAULT_LOCATION: &str = "Vilnius,LT";
pub const DEFAULT_PROVIDER_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services";
pub const DEFAULT_GEOCODER_URL: &str = "https://api.openweathermap.org/geo/1.0";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_location = "Vilnius,LT"
/// units = "metric"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Weather provider key.
    pub api_key: Option<String>,

    /// Key for the city suggestion endpoint.
    pub geocoding_api_key: Option<String>,

    pub default_location: String,

    pub units: Units,

    pub provider_url: String,

    pub geocoder_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            geocoding_api_key: None,
            default_location: DEFAULT_LOCATION.to_string(),
            units: Units::default(),
            provider_url: DEFAULT_PROVIDER_URL.to_string(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
        }
    }
}

impl Config {
    /// Load config from disk, then apply environment overrides.
    pub fn resolve() -> Result<Self> {
        let mut cfg = Self::load()?;
        cfg.apply_env(|name| std::env::var(name).ok())?;
        Ok(cfg)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skyboard", "skyboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overlay values looked up through `lookup` (normally the process
    /// environment). Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(key) = get(GEOCODING_API_KEY_ENV) {
            self.geocoding_api_key = Some(key);
        }
        if let Some(location) = get(LOCATION_ENV) {
            self.default_location = location;
        }
        if let Some(units) = get(UNITS_ENV) {
            self.units = Units::try_from(units.as_str())
                .with_context(|| format!("Invalid value in {UNITS_ENV}"))?;
        }

        Ok(())
    }

    /// Weather provider key, failing before any request is built.
    pub fn require_api_key(&self) -> Result<&str, FetchError> {
        non_empty(self.api_key.as_deref()).ok_or(FetchError::MissingApiKey(API_KEY_ENV))
    }

    /// Key for the suggestion endpoint.
    pub fn require_geocoding_api_key(&self) -> Result<&str, FetchError> {
        non_empty(self.geocoding_api_key.as_deref())
            .ok_or(FetchError::MissingApiKey(GEOCODING_API_KEY_ENV))
    }

    pub fn default_location(&self) -> Result<Location, FetchError> {
        Location::new(self.default_location.as_str())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn require_api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.require_api_key().unwrap_err();

        assert!(err.to_string().contains("API key undefined"));
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());

        assert!(cfg.require_api_key().is_err());
    }

    #[test]
    fn defaults_point_at_vilnius_metric() {
        let cfg = Config::default();

        assert_eq!(cfg.default_location().unwrap().as_str(), "Vilnius,LT");
        assert_eq!(cfg.units, Units::Metric);
        assert_eq!(cfg.provider_url, DEFAULT_PROVIDER_URL);
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config {
            api_key: Some("FILE_KEY".into()),
            ..Config::default()
        };

        cfg.apply_env(env(&[
            (API_KEY_ENV, "ENV_KEY"),
            (LOCATION_ENV, "Riga,LV"),
            (UNITS_ENV, "us"),
        ]))
        .expect("valid env");

        assert_eq!(cfg.require_api_key().unwrap(), "ENV_KEY");
        assert_eq!(cfg.default_location, "Riga,LV");
        assert_eq!(cfg.units, Units::Us);
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut cfg = Config {
            api_key: Some("FILE_KEY".into()),
            ..Config::default()
        };

        cfg.apply_env(env(&[(API_KEY_ENV, "")])).expect("valid env");

        assert_eq!(cfg.require_api_key().unwrap(), "FILE_KEY");
    }

    #[test]
    fn invalid_units_env_is_rejected() {
        let mut cfg = Config::default();
        let err = cfg.apply_env(env(&[(UNITS_ENV, "kelvin")])).unwrap_err();

        assert!(format!("{err:#}").contains("Unknown unit group"));
    }

    #[test]
    fn save_and_load_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.default_location = "Kaunas,LT".into();
        cfg.units = Units::Uk;
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = Config::load_from(&dir.path().join("absent.toml")).expect("load");

        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"K\"\n").expect("write");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.api_key.as_deref(), Some("K"));
        assert_eq!(loaded.default_location, DEFAULT_LOCATION);
        assert_eq!(loaded.geocoder_url, DEFAULT_GEOCODER_URL);
    }
}
