use crate::advice::{CoachProvider, DEFAULT_MODEL, GeminiCoach};
use crate::storage::default_data_path;
use std::{env, net::SocketAddr, path::PathBuf, sync::Arc};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    /// Without a key every advice request gets the fallback pair.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    /// Override for the Gemini endpoint, mostly for local stubs.
    pub gemini_base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            data_path: default_data_path(),
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Self {
            port: non_empty("PORT")
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            data_path: non_empty("FITCHECK_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            gemini_model: non_empty("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: non_empty("GEMINI_BASE_URL"),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn coach_provider(&self) -> Option<Arc<dyn CoachProvider>> {
        let key = self.gemini_api_key.as_ref()?;
        let mut coach = GeminiCoach::new(key.clone()).with_model(self.gemini_model.clone());
        if let Some(base_url) = &self.gemini_base_url {
            coach = coach.with_base_url(base_url.clone());
        }
        Some(Arc::new(coach))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_path, PathBuf::from("data/fitcheck_records.json"));
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_model, DEFAULT_MODEL);
        assert!(config.coach_provider().is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("PORT", "9001"),
            ("FITCHECK_DATA_PATH", "/tmp/records.json"),
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-1.5-flash"),
        ]);
        assert_eq!(config.addr().port(), 9001);
        assert_eq!(config.data_path, PathBuf::from("/tmp/records.json"));
        assert_eq!(config.gemini_api_key.as_deref(), Some("secret"));
        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert!(config.coach_provider().is_some());
    }

    #[test]
    fn blank_or_invalid_values_fall_back() {
        let config = config_from(&[("PORT", "not-a-port"), ("GEMINI_API_KEY", "  ")]);
        assert_eq!(config.port, 8080);
        assert!(config.gemini_api_key.is_none());
    }
}
