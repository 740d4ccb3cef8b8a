use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;
use url::Url;

use crate::fs_util::read_toml;

pub const DEFAULT_CONFIG_PATH: &str = "tatort.toml";
pub const DEFAULT_EPISODE_FILE: &str = "data/Liste der Tatort-Folgen – Wikipedia.html";
pub const DEFAULT_INVENTORY_FILE: &str = "ingress/smb/N5550-file-list.txt";
pub const DEFAULT_SOURCE_URL: &str = "https://de.wikipedia.org/wiki/Liste_der_Tatort-Folgen";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Local copy of the episode list.
    pub episode_file: PathBuf,
    /// Newline separated names of the files held on the storage device.
    pub inventory_file: PathBuf,
    /// Where the episode list is downloaded from.
    pub source_url: Url,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            episode_file: DEFAULT_EPISODE_FILE.into(),
            inventory_file: DEFAULT_INVENTORY_FILE.into(),
            source_url: Url::parse(DEFAULT_SOURCE_URL).unwrap(),
        }
    }
}

impl Config {
    /// Reads the given file, or the default file if it exists.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => read_toml(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.try_exists()? {
                    read_toml(path)
                } else {
                    info!("{DEFAULT_CONFIG_PATH} not found, using the default configuration");
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{Config, DEFAULT_INVENTORY_FILE, DEFAULT_SOURCE_URL};

    #[test]
    fn partial_config() {
        let config: Config = toml::from_str(r#"episode_file = "list.html""#).unwrap();
        assert_eq!(config.episode_file, Path::new("list.html"));
        assert_eq!(config.inventory_file, Path::new(DEFAULT_INVENTORY_FILE));
        assert_eq!(config.source_url.as_str(), DEFAULT_SOURCE_URL);
    }

    #[test]
    fn full_config() {
        let config: Config = toml::from_str(
            r#"
            episode_file = "a.html"
            inventory_file = "b.txt"
            source_url = "https://example.org/list"
            "#,
        )
        .unwrap();
        assert_eq!(config.inventory_file, Path::new("b.txt"));
        assert_eq!(config.source_url.host_str(), Some("example.org"));
    }

    #[test]
    fn invalid_url() {
        assert!(toml::from_str::<Config>(r#"source_url = "not a url""#).is_err());
    }

    #[test]
    fn explicit_missing_file() {
        assert!(Config::load(Some(Path::new("/nonexistent/tatort.toml"))).is_err());
    }
}
