//! Configuration file loading and error types.

use std::{fs, io, path::Path};

use crate::Config;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unsupported config format")]
    UnsupportedFormat,
    #[error("validation: {0}")]
    Validation(String),
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)?;
    match path.extension().and_then(|s| s.to_str()).unwrap_or("") {
        "json" | "jsonc" => {
            let stripped = json_comments::StripComments::new(data.as_bytes());
            Ok(serde_json::from_reader(stripped)?)
        }
        "yaml" | "yml" => Ok(serde_yaml::from_str(&data)?),
        "toml" => Ok(toml::from_str(&data)?),
        _ => Err(ConfigError::UnsupportedFormat),
    }
}

/// Load `path`, or fall back to defaults if it does not exist.
///
/// Used for the implicit default config path; an explicitly requested file
/// should go through [`load_config`] so a missing file is an error.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    match load_config(path) {
        Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_toml() {
        let file = write_config(
            ".toml",
            r#"
[server]
listen = "127.0.0.1:9000"

[store]
path = "/tmp/users.json"
refresh_interval_secs = 2
"#,
        );
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.server.listen, "127.0.0.1:9000");
        assert_eq!(cfg.store.path, "/tmp/users.json");
        assert_eq!(cfg.store.refresh_interval_secs, 2);
    }

    #[test]
    fn load_jsonc_with_comments() {
        let file = write_config(
            ".jsonc",
            r#"{
  // verdict endpoint
  "server": { "listen": "[::1]:28262" },
  /* engine */
  "auth": { "mismatch_delay_ms": 100 }
}"#,
        );
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.server.listen, "[::1]:28262");
        assert_eq!(cfg.auth.mismatch_delay_ms, 100);
    }

    #[test]
    fn load_yaml() {
        let file = write_config(
            ".yaml",
            "store:\n  kind: http\n  url: https://panel.local/users\n  token: abc\n",
        );
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.store.kind, "http");
        assert_eq!(cfg.store.token.as_deref(), Some("abc"));
    }

    #[test]
    fn unsupported_extension() {
        let file = write_config(".ini", "listen=1");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::UnsupportedFormat)
        ));
    }

    #[test]
    fn missing_file_falls_back_only_when_implicit() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        assert!(matches!(load_config(&missing), Err(ConfigError::Io(_))));
        let cfg = load_config_or_default(&missing).unwrap();
        assert_eq!(cfg.server.listen, "127.0.0.1:28262");
    }

    #[test]
    fn broken_file_is_not_masked() {
        let file = write_config(".toml", "[server\nlisten = ");
        assert!(matches!(
            load_config_or_default(file.path()),
            Err(ConfigError::Toml(_))
        ));
    }
}
