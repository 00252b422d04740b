//! Where Persona keeps its files, and how `config.toml` is read.

use std::path::{Path, PathBuf};

use persona_types::config::GlobalConfig;

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `PERSONA_DATA_DIR` environment variable
/// 2. `~/.persona`
/// 3. `./.persona`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PERSONA_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".persona");
    }

    PathBuf::from(".persona")
}

/// SQLite URL for the configured database file inside `data_dir`.
///
/// `mode=rwc` creates the file on first open.
pub fn database_url(data_dir: &Path, config: &GlobalConfig) -> String {
    format!(
        "sqlite://{}?mode=rwc",
        data_dir.join(&config.database_file).display()
    )
}

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Load `{data_dir}/config.toml`.
///
/// Never fails: a missing file yields the defaults silently, an unreadable
/// or malformed one yields the defaults with a warning.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let path = data_dir.join(CONFIG_FILE);

    match tokio::fs::read_to_string(&path).await {
        Ok(content) => parse_config(&content, &path),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            GlobalConfig::default()
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "cannot read config, using defaults");
            GlobalConfig::default()
        }
    }
}

fn parse_config(content: &str, path: &Path) -> GlobalConfig {
    toml::from_str(content).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), error = %err, "invalid config, using defaults");
        GlobalConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.database_file, "persona.db");
        assert!(config.bootstrap.enabled);
    }

    #[tokio::test]
    async fn load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
database_file = "me.db"

[bootstrap]
enabled = false
"#,
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.database_file, "me.db");
        assert!(!config.bootstrap.enabled);
        assert!(config.bootstrap.seed().is_none());
    }

    #[tokio::test]
    async fn load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join(CONFIG_FILE), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.database_file, "persona.db");
    }

    #[tokio::test]
    async fn load_global_config_keeps_bootstrap_defaults_for_partial_file() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join(CONFIG_FILE), "[bootstrap]\nfirst_name = \"Ada\"\n")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.bootstrap.first_name, "Ada");
        assert_eq!(config.bootstrap.last_name, "Oyiboke");
        assert_eq!(config.database_file, "persona.db");
    }

    #[test]
    fn database_url_uses_configured_file() {
        let config = GlobalConfig {
            database_file: "profile.sqlite".to_string(),
            ..Default::default()
        };
        let url = database_url(Path::new("/tmp/persona"), &config);
        assert_eq!(url, "sqlite:///tmp/persona/profile.sqlite?mode=rwc");
    }

    #[test]
    fn resolve_data_dir_ends_with_persona_by_default() {
        if std::env::var("PERSONA_DATA_DIR").is_err() {
            assert!(resolve_data_dir().ends_with(".persona"));
        }
    }
}
