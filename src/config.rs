use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "MedAssist";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Mandatory disclaimer attached to every analysis result.
pub const DISCLAIMER: &str = "This is an assistive tool and not a medical diagnosis.";

/// Per-file upload cap (20 MB).
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Character budget for patient-side report text before inference.
pub const PATIENT_MAX_CHARS: usize = 12_000;

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "medassist=info,medassist_lib=info,tower_http=info"
}

/// Get the application data directory
/// (platform data dir, falling back to the working directory).
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the dashboard database.
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("hospital_dashboard.db")
}

/// Runtime configuration, read once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Local model identifier on the Ollama runtime.
    pub model_id: String,
    /// Skip local model probing entirely; the mock tier answers.
    pub force_mock: bool,
    pub legacy_enabled: bool,
    pub legacy_base_url: String,
    pub legacy_timeout: Duration,
    pub ollama_base_url: String,
    pub max_new_tokens: u32,
    pub db_path: PathBuf,
    pub listen_addr: SocketAddr,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_id: "medgemma:4b".into(),
            force_mock: false,
            legacy_enabled: true,
            legacy_base_url: "http://127.0.0.1:8085".into(),
            legacy_timeout: Duration::from_secs(25),
            ollama_base_url: "http://localhost:11434".into(),
            max_new_tokens: 1024,
            db_path: default_db_path(),
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
        }
    }
}

impl AppConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unparsable values keep their defaults and log a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string());

        let legacy_timeout = match get("AI_BACKEND_TIMEOUT_SECONDS") {
            Some(raw) => match raw.parse::<f64>() {
                Ok(secs) if secs.is_finite() && secs > 0.0 => Duration::from_secs_f64(secs),
                _ => {
                    tracing::warn!(value = %raw, "Invalid AI_BACKEND_TIMEOUT_SECONDS, using default");
                    defaults.legacy_timeout
                }
            },
            None => defaults.legacy_timeout,
        };

        let max_new_tokens = match get("MAX_NEW_TOKENS") {
            Some(raw) => raw.parse::<u32>().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid MAX_NEW_TOKENS, using default");
                defaults.max_new_tokens
            }),
            None => defaults.max_new_tokens,
        };

        let host = get("HOST").unwrap_or_else(|| defaults.listen_addr.ip().to_string());
        let port = get("PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(defaults.listen_addr.port());
        let listen_addr = format!("{host}:{port}").parse().unwrap_or_else(|_| {
            tracing::warn!(%host, port, "Invalid HOST/PORT, using default listen address");
            defaults.listen_addr
        });

        Self {
            model_id: get("MEDGEMMA_MODEL_ID")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.model_id),
            force_mock: get("FORCE_MOCK").is_some_and(|v| v == "1"),
            legacy_enabled: get("AI_BACKEND_ENABLED").map_or(defaults.legacy_enabled, |v| v == "1"),
            legacy_base_url: get("AI_BACKEND_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.legacy_base_url)
                .trim_end_matches('/')
                .to_string(),
            legacy_timeout,
            ollama_base_url: get("OLLAMA_BASE_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.ollama_base_url)
                .trim_end_matches('/')
                .to_string(),
            max_new_tokens,
            db_path: get("MEDASSIST_DB_PATH")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            listen_addr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_empty() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.model_id, "medgemma:4b");
        assert!(!config.force_mock);
        assert!(config.legacy_enabled);
        assert_eq!(config.legacy_base_url, "http://127.0.0.1:8085");
        assert_eq!(config.legacy_timeout, Duration::from_secs(25));
        assert_eq!(config.max_new_tokens, 1024);
        assert_eq!(config.listen_addr.port(), 8000);
    }

    #[test]
    fn force_mock_only_on_exact_one() {
        assert!(AppConfig::from_lookup(lookup_from(&[("FORCE_MOCK", "1")])).force_mock);
        assert!(!AppConfig::from_lookup(lookup_from(&[("FORCE_MOCK", "true")])).force_mock);
        assert!(!AppConfig::from_lookup(lookup_from(&[("FORCE_MOCK", "0")])).force_mock);
    }

    #[test]
    fn legacy_can_be_disabled() {
        let config = AppConfig::from_lookup(lookup_from(&[("AI_BACKEND_ENABLED", "0")]));
        assert!(!config.legacy_enabled);
    }

    #[test]
    fn legacy_url_trailing_slash_stripped() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("AI_BACKEND_URL", "http://10.0.0.5:9000/")]));
        assert_eq!(config.legacy_base_url, "http://10.0.0.5:9000");
    }

    #[test]
    fn fractional_timeout_parsed() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("AI_BACKEND_TIMEOUT_SECONDS", "2.5")]));
        assert_eq!(config.legacy_timeout, Duration::from_millis(2500));
    }

    #[test]
    fn invalid_numbers_keep_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("AI_BACKEND_TIMEOUT_SECONDS", "soon"),
            ("MAX_NEW_TOKENS", "-3"),
            ("PORT", "not-a-port"),
        ]));
        assert_eq!(config.legacy_timeout, Duration::from_secs(25));
        assert_eq!(config.max_new_tokens, 1024);
        assert_eq!(config.listen_addr.port(), 8000);
    }

    #[test]
    fn listen_address_from_host_and_port() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("HOST", "127.0.0.1"), ("PORT", "9123")]));
        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:9123");
    }

    #[test]
    fn default_db_path_under_app_data() {
        let path = default_db_path();
        assert!(path.starts_with(app_data_dir()));
        assert!(path.ends_with("hospital_dashboard.db"));
    }

    #[test]
    fn app_name_is_medassist() {
        assert_eq!(APP_NAME, "MedAssist");
    }
}
