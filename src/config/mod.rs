use crate::error::{Error, Result};
use crate::http::headers;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TCP/TLS connect timeout in seconds. Default: 10.
    pub connect_timeout_secs: u64,

    /// `User-Agent` sent with every request.
    pub user_agent: Option<String>,

    /// Extra headers added to requests that don't already set them.
    pub headers: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            user_agent: None,
            headers: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Default config file location (`<config_dir>/ssefetch/config.toml`).
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("ssefetch").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".ssefetch/config.toml"))
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Add configured headers that `target` does not already contain.
    pub fn merge_headers(&self, target: &mut HeaderMap) -> Result<()> {
        for (name, value) in &self.headers {
            let (name, value) = headers::parse(name, value)?;
            if !target.contains_key(&name) {
                target.insert(name, value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{AUTHORIZATION, HeaderValue};
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.connect_timeout_secs, 10);
        assert!(config.user_agent.is_none());
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
user_agent = "ssefetch-test"

[headers]
Authorization = "Bearer abc"
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.user_agent.as_deref(), Some("ssefetch-test"));
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.headers.get("Authorization").unwrap(), "Bearer abc");
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "connect_timeout_secs = \"soon\"").unwrap();
        assert!(matches!(
            Config::load_from(file.path()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_merge_headers_keeps_explicit() {
        let mut config = Config::default();
        config
            .headers
            .insert("Authorization".into(), "Bearer config".into());
        config.headers.insert("X-Client".into(), "ssefetch".into());

        let mut target = HeaderMap::new();
        target.insert(AUTHORIZATION, HeaderValue::from_static("Bearer cli"));
        config.merge_headers(&mut target).unwrap();

        assert_eq!(target.get(AUTHORIZATION).unwrap(), "Bearer cli");
        assert_eq!(target.get("x-client").unwrap(), "ssefetch");
    }
}
