use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use shared::protocol::BOOKS_PATH;
use tracing::warn;
use url::Url;

use crate::error::ClientError;

pub const SETTINGS_FILE: &str = "bookshelf.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".into(),
            request_timeout_secs: 10,
            page_size: 10,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
    page_size: Option<u32>,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Absolute URL of the books collection, e.g. `http://localhost:5000/api/books`.
    pub fn books_endpoint(&self) -> Result<Url, ClientError> {
        let raw = self.api_url.trim();
        let mut base = Url::parse(raw)
            .map_err(|err| ClientError::Config(format!("api url '{raw}' is not a URL: {err}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "api url '{raw}' must use http or https"
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(BOOKS_PATH)
            .map_err(|err| ClientError::Config(format!("cannot join '{BOOKS_PATH}' onto '{raw}': {err}")))
    }

    fn apply_file(&mut self, file_cfg: FileSettings) {
        if let Some(v) = file_cfg.api_url {
            self.api_url = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs.filter(|v| *v > 0) {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file_cfg.page_size.filter(|v| *v > 0) {
            self.page_size = v;
        }
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BOOKSHELF_API_URL") {
            self.api_url = v;
        }
        if let Some(v) = lookup("APP__API_URL") {
            self.api_url = v;
        }

        if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(parsed) if parsed > 0 => self.request_timeout_secs = parsed,
                _ => warn!(value = %v, "ignoring invalid APP__REQUEST_TIMEOUT_SECS"),
            }
        }

        if let Some(v) = lookup("APP__PAGE_SIZE") {
            match v.parse::<u32>() {
                Ok(parsed) if parsed > 0 => self.page_size = parsed,
                _ => warn!(value = %v, "ignoring invalid APP__PAGE_SIZE"),
            }
        }
    }
}

/// Defaults, then `bookshelf.toml` in the working directory, then environment.
pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from<F>(path: &Path, env_lookup: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => settings.apply_file(file_cfg),
            Err(err) => warn!(path = %path.display(), "ignoring unreadable settings file: {err}"),
        }
    }

    settings.apply_env(env_lookup);
    settings
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn temp_settings_file(contents: &str) -> std::path::PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("bookshelf_settings_test_{suffix}.toml"));
        fs::write(&path, contents).expect("write settings");
        path
    }

    #[test]
    fn missing_file_and_env_yield_defaults() {
        let settings = load_settings_from(Path::new("./does-not-exist.toml"), |_| None);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn env_overrides_file_values() {
        let path = temp_settings_file(
            "api_url = \"http://books.internal:8080\"\nrequest_timeout_secs = 3\npage_size = 25\n",
        );
        let env: HashMap<&str, &str> = [("APP__API_URL", "https://catalog.example")].into();

        let settings = load_settings_from(&path, |key| env.get(key).map(|v| v.to_string()));
        fs::remove_file(&path).expect("cleanup");

        assert_eq!(settings.api_url, "https://catalog.example");
        assert_eq!(settings.request_timeout_secs, 3);
        assert_eq!(settings.page_size, 25);
    }

    #[test]
    fn zero_and_garbage_numbers_are_ignored() {
        let path = temp_settings_file("page_size = 0\n");
        let env: HashMap<&str, &str> = [
            ("APP__REQUEST_TIMEOUT_SECS", "soon"),
            ("APP__PAGE_SIZE", "0"),
        ]
        .into();

        let settings = load_settings_from(&path, |key| env.get(key).map(|v| v.to_string()));
        fs::remove_file(&path).expect("cleanup");

        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.request_timeout_secs, 10);
    }

    #[test]
    fn books_endpoint_keeps_base_path() {
        let mut settings = Settings::default();
        assert_eq!(
            settings.books_endpoint().expect("endpoint").as_str(),
            "http://localhost:5000/api/books"
        );

        settings.api_url = "https://example.com/catalog".into();
        assert_eq!(
            settings.books_endpoint().expect("endpoint").as_str(),
            "https://example.com/catalog/api/books"
        );
    }

    #[test]
    fn books_endpoint_rejects_non_http_urls() {
        let settings = Settings {
            api_url: "localhost:5000".into(),
            ..Settings::default()
        };
        let err = settings.books_endpoint().expect_err("must fail");
        assert_eq!(err.kind(), crate::error::ClientErrorKind::Config);
    }
}
