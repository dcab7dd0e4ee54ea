//! API key lookup: secrets file first, then the environment

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Name of the key in both the secrets file and the environment
pub const API_KEY_NAME: &str = "GEMINI_API_KEY";

/// Default secrets file: `<config dir>/korelasi/secrets.toml`
pub fn default_secrets_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("korelasi").join("secrets.toml"))
}

/// Read `GEMINI_API_KEY` from a TOML secrets file.
///
/// Returns `Ok(None)` when the file does not exist or has no such key.
pub fn read_secrets_file(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read secrets file: {}", path.display()))?;
    let secrets: HashMap<String, toml::Value> = toml::from_str(&content)
        .with_context(|| format!("Failed to parse secrets file: {}", path.display()))?;

    Ok(secrets
        .get(API_KEY_NAME)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string))
}

/// Resolve the API key. A missing key is not an error.
///
/// An unreadable secrets file is logged and skipped so the environment
/// variable can still be used.
pub fn resolve_api_key(secrets_path: Option<&Path>) -> Option<String> {
    resolve_with_env(secrets_path, std::env::var(API_KEY_NAME).ok())
}

fn resolve_with_env(secrets_path: Option<&Path>, env_value: Option<String>) -> Option<String> {
    let from_file = secrets_path.and_then(|path| match read_secrets_file(path) {
        Ok(key) => key,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring secrets file");
            None
        }
    });

    from_file.or_else(|| {
        env_value
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_secrets_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("secrets.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "GEMINI_API_KEY = \"  abc123 \"").unwrap();
        drop(file);

        assert_eq!(read_secrets_file(&path).unwrap(), Some("abc123".to_string()));
    }

    #[test]
    fn test_missing_secrets_file_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nope.toml");
        assert_eq!(read_secrets_file(&path).unwrap(), None);
    }

    #[test]
    fn test_blank_key_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "GEMINI_API_KEY = \"\"\nOTHER = \"x\"\n").unwrap();
        assert_eq!(read_secrets_file(&path).unwrap(), None);
    }

    #[test]
    fn test_malformed_secrets_file_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "GEMINI_API_KEY = ").unwrap();
        assert!(read_secrets_file(&path).is_err());
    }

    #[test]
    fn test_secrets_file_wins() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "GEMINI_API_KEY = \"from-file\"\n").unwrap();
        assert_eq!(
            resolve_with_env(Some(&path), Some("from-env".to_string())),
            Some("from-file".to_string())
        );
    }

    #[test]
    fn test_env_used_when_file_absent() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nope.toml");

        assert_eq!(
            resolve_with_env(Some(&path), Some(" from-env ".to_string())),
            Some("from-env".to_string())
        );
        assert_eq!(
            resolve_with_env(None, Some("from-env".to_string())),
            Some("from-env".to_string())
        );
    }

    #[test]
    fn test_env_used_when_file_malformed() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "GEMINI_API_KEY = [unterminated").unwrap();

        assert_eq!(
            resolve_with_env(Some(&path), Some("from-env".to_string())),
            Some("from-env".to_string())
        );
    }

    #[test]
    fn test_env_used_when_file_has_no_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "OTHER = \"x\"\n").unwrap();

        assert_eq!(
            resolve_with_env(Some(&path), Some("from-env".to_string())),
            Some("from-env".to_string())
        );
    }

    #[test]
    fn test_blank_env_is_absent() {
        assert_eq!(resolve_with_env(None, Some("   ".to_string())), None);
        assert_eq!(resolve_with_env(None, Some(String::new())), None);
        assert_eq!(resolve_with_env(None, None), None);
    }

    // The only test in this crate that touches the process environment.
    #[test]
    fn test_resolve_reads_process_environment() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nope.toml");
        let previous = std::env::var(API_KEY_NAME).ok();

        std::env::set_var(API_KEY_NAME, "env-key");
        let with_key = resolve_api_key(Some(&path));
        std::env::set_var(API_KEY_NAME, "  ");
        let blank = resolve_api_key(Some(&path));
        std::env::remove_var(API_KEY_NAME);
        let unset = resolve_api_key(Some(&path));

        match previous {
            Some(value) => std::env::set_var(API_KEY_NAME, value),
            None => std::env::remove_var(API_KEY_NAME),
        }

        assert_eq!(with_key, Some("env-key".to_string()));
        assert_eq!(blank, None);
        assert_eq!(unset, None);
    }
}
