use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "spades.toml";
pub const DB_FILE_NAME: &str = "spades.db";
pub const ADMIN_PASSWORD_ENV: &str = "SPADES_ADMIN_PASSWORD";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Public base URL for external access (e.g., "https://spades.example.com").
    /// Used for invite links. Defaults to the bind address.
    pub public_base_url: Option<String>,
    /// Shared secret for the admin console.
    pub admin_password: Option<String>,
    /// Mark cookies `Secure`; enable when served over HTTPS.
    pub secure_cookies: bool,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> std::result::Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE_NAME)
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        match &self.public_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }

    /// Fills settings not given on the command line or environment from
    /// `{data_dir}/spades.toml`, if that file exists.
    pub fn merge_file(&mut self) -> Result<()> {
        let Some(file) = FileConfig::load(&self.config_path())? else {
            return Ok(());
        };

        if self.admin_password.is_none() {
            self.admin_password = file.admin_password;
        }
        if self.public_base_url.is_none() {
            self.public_base_url = file.public_base_url;
        }
        self.secure_cookies |= file.secure_cookies.unwrap_or(false);
        Ok(())
    }

    pub fn require_admin_password(&self) -> Result<&str> {
        match self.admin_password.as_deref() {
            Some(password) if !password.is_empty() => Ok(password),
            _ => Err(Error::Config(format!(
                "no admin password configured; set {ADMIN_PASSWORD_ENV} or run 'spades admin init'"
            ))),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            public_base_url: None,
            admin_password: None,
            secure_cookies: false,
        }
    }
}

/// On-disk settings written by `spades admin init`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_cookies: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let file = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Ok(Some(file))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> ServerConfig {
        ServerConfig {
            data_dir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_file_leaves_config_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.merge_file().unwrap();

        assert_eq!(config.admin_password, None);
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
        assert!(config.require_admin_password().is_err());
    }

    #[test]
    fn test_file_fills_unset_fields_only() {
        let dir = tempfile::tempdir().unwrap();
        FileConfig {
            admin_password: Some("from-file".to_string()),
            public_base_url: Some("https://spades.example.com/".to_string()),
            secure_cookies: Some(true),
        }
        .save(&dir.path().join(CONFIG_FILE_NAME))
        .unwrap();

        let mut config = config_in(dir.path());
        config.admin_password = Some("from-env".to_string());
        config.merge_file().unwrap();

        assert_eq!(config.require_admin_password().unwrap(), "from-env");
        assert_eq!(config.base_url(), "https://spades.example.com");
        assert!(config.secure_cookies);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "admin_password = [").unwrap();

        let mut config = config_in(dir.path());
        assert!(matches!(config.merge_file(), Err(Error::Config(_))));
    }

    #[test]
    fn test_paths_live_under_data_dir() {
        let config = config_in(Path::new("/srv/spades"));
        assert_eq!(config.db_path(), Path::new("/srv/spades/spades.db"));
        assert_eq!(config.config_path(), Path::new("/srv/spades/spades.toml"));
    }
}
