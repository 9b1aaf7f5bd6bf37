//! Runtime configuration, read from a JSON file.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Point Swarm".to_owned(),
            width: 1280,
            height: 720,
            fullscreen: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    /// Anchors per random variant.
    pub point_count: usize,
    /// `None` picks a new set every run.
    pub seed: Option<u64>,
    /// Shape scale `a` of the random variants.
    pub shape_scale: f32,
    /// Shape scale `a` of the fixed layout.
    pub honeycomb_scale: f32,
    pub intensity: f32,
    pub base_color: Vec3,
    pub accent_color: Vec3,
    /// Root holding one directory of stage files per reloadable variant.
    pub shader_dir: PathBuf,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            point_count: 100,
            seed: None,
            shape_scale: 0.1,
            honeycomb_scale: 1.0,
            intensity: 1.0,
            base_color: Vec3::new(0.1, 1.0, 1.0),
            accent_color: Vec3::new(1.0, 0.45, 0.1),
            shader_dir: PathBuf::from("shaders"),
            log_level: "info".to_owned(),
        }
    }
}

impl Config {
    /// `<config_dir>/pointswarm/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pointswarm").join("config.json"))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` if given, otherwise the default path if it exists.
    /// Any failure falls back to the defaults. The returned message, if any,
    /// should be logged once logging is up.
    pub fn load_or_default(explicit: Option<&Path>) -> (Self, Option<String>) {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return (Self::default(), None),
            },
        };

        match Self::load(&path) {
            Ok(config) => (config, None),
            Err(err) => (Self::default(), Some(format!("{err}, using defaults"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: Config = serde_json::from_str(r#"{ "point_count": 12, "window": { "width": 640 } }"#).unwrap();
        assert_eq!(config.point_count, 12);
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.shape_scale, 0.1);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_round_trip() {
        let config = Config {
            seed: Some(99),
            base_color: Vec3::new(0.5, 0.25, 1.0),
            ..Config::default()
        };
        let text = serde_json::to_string_pretty(&config).unwrap();
        assert_eq!(serde_json::from_str::<Config>(&text).unwrap(), config);
    }

    #[test]
    fn test_bad_file_falls_back() {
        let path = std::env::temp_dir().join(format!("pointswarm-config-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let (config, warning) = Config::load_or_default(Some(&path));
        assert_eq!(config, Config::default());
        assert!(warning.unwrap().contains("invalid config"));
        std::fs::remove_file(path).ok();

        let (_, warning) = Config::load_or_default(Some(Path::new("/nonexistent/pointswarm.json")));
        assert!(warning.unwrap().contains("unable to read"));
    }
}
