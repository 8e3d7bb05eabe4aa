use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_STATIC_DIR: &str = "static";

/// Server configuration loaded from file and/or environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served under `/static`; skipped when it does not exist.
    pub static_dir: PathBuf,
    /// Alternate activity list. The built-in list is used when unset.
    pub seed_file: Option<PathBuf>,
}

/// Raw TOML file structure for `~/.config/mergington/config.toml`.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    host: Option<String>,
    port: Option<u16>,
    static_dir: Option<PathBuf>,
    seed_file: Option<PathBuf>,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mergington").join("config.toml"))
}

impl ServerConfig {
    /// Load configuration from file and environment variables.
    ///
    /// Priority: environment variables override file values. A missing file
    /// is not an error; defaults are used instead.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let path = config_path.cloned().or_else(default_config_path);

        let file_config = match path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config: {}", path.display()))?;
                toml::from_str::<ConfigFile>(&content)
                    .with_context(|| format!("failed to parse config: {}", path.display()))?
            }
            _ => ConfigFile::default(),
        };

        Self::from_file_and_env(file_config, |key| std::env::var(key).ok())
    }

    /// Merge parsed file values with variables returned by `env`.
    fn from_file_and_env(
        file_config: ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let ConfigFile {
            host,
            port,
            static_dir,
            seed_file,
        } = file_config;

        let resolved_host = env("MERGINGTON_HOST").or(host);
        let resolved_port = match env("MERGINGTON_PORT") {
            Some(raw) => Some(
                raw.parse::<u16>()
                    .with_context(|| format!("invalid MERGINGTON_PORT '{}'", raw))?,
            ),
            None => port,
        };
        let resolved_static_dir = env("MERGINGTON_STATIC_DIR")
            .map(PathBuf::from)
            .or(static_dir);
        let resolved_seed_file = env("MERGINGTON_SEED_FILE")
            .map(PathBuf::from)
            .or(seed_file);

        Self::build(
            resolved_host,
            resolved_port,
            resolved_static_dir,
            resolved_seed_file,
        )
    }

    fn build(
        host: Option<String>,
        port: Option<u16>,
        static_dir: Option<PathBuf>,
        seed_file: Option<PathBuf>,
    ) -> Result<Self> {
        let host = match host {
            Some(h) if h.trim().is_empty() => bail!("host must not be empty"),
            Some(h) => h,
            None => DEFAULT_HOST.to_string(),
        };

        Ok(Self {
            host,
            port: port.unwrap_or(DEFAULT_PORT),
            static_dir: static_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            seed_file: seed_file.filter(|p| !p.as_os_str().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_build_defaults() {
        let config = ServerConfig::build(None, None, None, None).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert!(config.seed_file.is_none());
    }

    #[test]
    fn test_build_empty_host_errors() {
        let result = ServerConfig::build(Some("  ".to_string()), None, None, None);
        assert!(result.unwrap_err().to_string().contains("host"));
    }

    #[test]
    fn test_build_empty_seed_file_is_ignored() {
        let config = ServerConfig::build(None, None, None, Some(PathBuf::new())).unwrap();
        assert!(config.seed_file.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let toml_str = r#"
host = "0.0.0.0"
port = 9000
static_dir = "/srv/mergington/static"
seed_file = "/srv/mergington/activities.json"
"#;
        let file_config: ConfigFile = toml::from_str(toml_str).unwrap();
        assert_eq!(file_config.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(file_config.port, Some(9000));
        assert_eq!(
            file_config.seed_file,
            Some(PathBuf::from("/srv/mergington/activities.json"))
        );
    }

    #[test]
    fn test_config_file_rejects_invalid_port() {
        let result = toml::from_str::<ConfigFile>("port = \"eighty\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_file_rejects_unknown_field() {
        let result = toml::from_str::<ConfigFile>("max_signups = 3");
        assert!(result.is_err());
    }

    #[test]
    fn test_file_values_used_without_env() {
        let file = ConfigFile {
            host: Some("0.0.0.0".to_string()),
            port: Some(9000),
            ..ConfigFile::default()
        };
        let config = ServerConfig::from_file_and_env(file, no_env).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> = [
            ("MERGINGTON_HOST", "10.0.0.5"),
            ("MERGINGTON_PORT", "8080"),
            ("MERGINGTON_SEED_FILE", "/tmp/seed.json"),
        ]
        .into_iter()
        .collect();
        let file = ConfigFile {
            host: Some("0.0.0.0".to_string()),
            port: Some(9000),
            static_dir: Some(PathBuf::from("public")),
            seed_file: None,
        };

        let config =
            ServerConfig::from_file_and_env(file, |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.port, 8080);
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.seed_file, Some(PathBuf::from("/tmp/seed.json")));
    }

    #[test]
    fn test_env_invalid_port_errors() {
        let result = ServerConfig::from_file_and_env(ConfigFile::default(), |k| {
            (k == "MERGINGTON_PORT").then(|| "not-a-port".to_string())
        });
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("invalid MERGINGTON_PORT"));
    }

    #[test]
    fn test_load_from_file() {
        use std::fs;
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "port = 8123\nstatic_dir = \"web\"\n").unwrap();

        let config = ServerConfig::load(Some(&config_path)).unwrap();
        // MERGINGTON_PORT is not set in the test environment
        assert_eq!(config.port, 8123);
        assert_eq!(config.static_dir, PathBuf::from("web"));
    }

    #[test]
    fn test_load_malformed_file_errors() {
        use std::fs;
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "port = [").unwrap();

        let err = ServerConfig::load(Some(&config_path)).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }
}
