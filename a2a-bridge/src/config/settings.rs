use crate::config::env_resolver::{EnvKey, EnvResolverFn};
use crate::errors::{BridgeError, BridgeResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8006;
pub const DEFAULT_APP_NAME: &str = "a2a_bridge";
pub const DEFAULT_USER_ID: &str = "a2a_bridge_user";
pub const DEFAULT_AGENT_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_LOCATION: &str = "us-central1";

/// A skill advertised on the agent card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillSettings {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// Service settings.
///
/// Loaded from the environment (after reading a `.env` file if present) or
/// from a YAML/JSON document. Missing fields take the defaults above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    pub host: String,
    pub port: u16,
    /// Application name sessions are scoped under; also the agent card name.
    pub app_name: String,
    /// User id sessions are created for.
    pub user_id: String,
    pub agent_model: String,
    pub project_id: Option<String>,
    pub location: String,
    pub description: String,
    pub version: String,
    /// URL advertised on the agent card; derived from host and port when unset.
    pub public_url: Option<String>,
    pub skills: Vec<SkillSettings>,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            app_name: DEFAULT_APP_NAME.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
            agent_model: DEFAULT_AGENT_MODEL.to_string(),
            project_id: None,
            location: DEFAULT_LOCATION.to_string(),
            description: "Agent exposed over the A2A protocol".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            public_url: None,
            skills: Vec::new(),
        }
    }
}

impl BridgeSettings {
    /// Reads settings from the process environment, loading `.env` first.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but malformed, or if the
    /// result fails [`BridgeSettings::validate`].
    pub fn from_env() -> BridgeResult<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
            Err(err) if err.not_found() => {}
            Err(err) => tracing::warn!(error = %err, "failed to load .env file"),
        }
        Self::from_resolver(None)
    }

    /// Reads settings through `resolver` (or `std::env` when `None`).
    ///
    /// # Errors
    ///
    /// Same as [`BridgeSettings::from_env`].
    pub fn from_resolver(resolver: Option<&EnvResolverFn>) -> BridgeResult<Self> {
        let read = |key: &str| EnvKey::new(key).resolve_optional_with(resolver);
        let mut settings = Self::default();

        if let Some(host) = read("A2A_HOST") {
            settings.host = host;
        }
        if let Some(port) = read("A2A_PORT") {
            settings.port = port
                .trim()
                .parse()
                .map_err(|_| BridgeError::InvalidConfiguration {
                    field: "A2A_PORT".to_string(),
                    reason: format!("'{port}' is not a valid port"),
                })?;
        }
        if let Some(app_name) = read("A2A_APP_NAME") {
            settings.app_name = app_name;
        }
        if let Some(user_id) = read("A2A_USER_ID") {
            settings.user_id = user_id;
        }
        if let Some(url) = read("A2A_PUBLIC_URL") {
            settings.public_url = Some(url);
        }
        if let Some(model) = read("AGENT_MODEL") {
            settings.agent_model = model;
        }
        settings.project_id = read("GOOGLE_CLOUD_PROJECT");
        if let Some(location) = read("GOOGLE_CLOUD_LOCATION") {
            settings.location = location;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// # Errors
    ///
    /// Returns a serialization error for malformed YAML or a validation error.
    pub fn from_yaml(yaml: &str) -> BridgeResult<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// # Errors
    ///
    /// Returns a serialization error for malformed JSON or a validation error.
    pub fn from_json(json: &str) -> BridgeResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidConfiguration`] for an empty host, app
    /// name or user id, or a zero port.
    pub fn validate(&self) -> BridgeResult<()> {
        let required = [
            ("host", &self.host),
            ("app_name", &self.app_name),
            ("user_id", &self.user_id),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(BridgeError::InvalidConfiguration {
                    field: field.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }
        if self.port == 0 {
            return Err(BridgeError::InvalidConfiguration {
                field: "port".to_string(),
                reason: "must be between 1 and 65535".to_string(),
            });
        }
        Ok(())
    }

    /// `host:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL advertised to other agents.
    pub fn advertised_url(&self) -> String {
        self.public_url.clone().unwrap_or_else(|| {
            let host = if self.host == DEFAULT_HOST {
                "localhost"
            } else {
                self.host.as_str()
            };
            format!("http://{host}:{}/", self.port)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn resolver(vars: &[(&str, &str)]) -> EnvResolverFn {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Arc::new(move |key| {
            vars.get(key)
                .cloned()
                .ok_or_else(|| BridgeError::MissingConfiguration {
                    field: key.to_string(),
                })
        })
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let settings = BridgeSettings::from_resolver(Some(&resolver(&[]))).expect("settings");
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8006);
        assert_eq!(settings.location, "us-central1");
        assert_eq!(settings.project_id, None);
        assert_eq!(settings.advertised_url(), "http://localhost:8006/");
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = BridgeSettings::from_resolver(Some(&resolver(&[
            ("A2A_HOST", "127.0.0.1"),
            ("A2A_PORT", "9000"),
            ("A2A_APP_NAME", "imports"),
            ("GOOGLE_CLOUD_PROJECT", "demo-project"),
        ])))
        .expect("settings");

        assert_eq!(settings.bind_address(), "127.0.0.1:9000");
        assert_eq!(settings.app_name, "imports");
        assert_eq!(settings.project_id.as_deref(), Some("demo-project"));
        assert_eq!(settings.advertised_url(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn malformed_port_is_rejected() {
        let err = BridgeSettings::from_resolver(Some(&resolver(&[("A2A_PORT", "eighty")])))
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidConfiguration { ref field, .. } if field == "A2A_PORT"));
    }

    #[test]
    fn yaml_with_skills() {
        let yaml = r#"
app_name: imports
port: 8010
skills:
  - id: tariffs
    name: Tariffs and Taxes
    tags: [tariffs, taxes]
"#;
        let settings = BridgeSettings::from_yaml(yaml).expect("yaml");
        assert_eq!(settings.port, 8010);
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.skills.len(), 1);
        assert_eq!(settings.skills[0].tags, vec!["tariffs", "taxes"]);
    }

    #[test]
    fn json_validation_rejects_zero_port() {
        let err = BridgeSettings::from_json(r#"{"port": 0}"#).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidConfiguration { ref field, .. } if field == "port"));
    }

    #[test]
    fn empty_app_name_is_rejected() {
        let err = BridgeSettings::from_yaml("app_name: ''").unwrap_err();
        assert!(matches!(err, BridgeError::InvalidConfiguration { .. }));
    }
}
