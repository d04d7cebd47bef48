//! Project configuration for variant resolution.
//!
//! Everything the resolver needs besides the signing credentials lives in
//! an explicit, immutable [`ProjectConfig`]. Defaults match the Playcado
//! Android shell; a project may override them with an optional
//! `buildvariant.yaml` (or HUML) file:
//!
//! ```yaml
//! base_application_id: com.playcado.app
//! app_name: Playcado
//! key_properties: key.properties
//! signing_policy: strict
//! toolchain:
//!   min_sdk: "21"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VariantError};

/// Default project config file name, looked up in the Android project dir.
pub const CONFIG_FILE_NAME: &str = "buildvariant.yaml";

/// Default credentials file name, relative to the Android project dir.
pub const KEY_PROPERTIES_FILE: &str = "key.properties";

/// Format of the project config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Huml,
}

/// How to treat incomplete release signing credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SigningPolicy {
    /// Resolve anyway with empty fields and log a warning.
    #[default]
    Lenient,
    /// Fail release resolution with `IncompleteSigning`.
    Strict,
}

/// Values supplied by the Flutter toolchain.
///
/// Opaque to the resolver: copied into every descriptor unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainValues {
    pub compile_sdk: Option<String>,
    pub min_sdk: Option<String>,
    pub target_sdk: Option<String>,
    pub ndk_version: Option<String>,
    pub version_code: Option<String>,
    pub version_name: Option<String>,
}

impl ToolchainValues {
    /// Returns `self` with every field that is set in `overrides` replaced.
    pub fn overridden_by(self, overrides: ToolchainValues) -> Self {
        Self {
            compile_sdk: overrides.compile_sdk.or(self.compile_sdk),
            min_sdk: overrides.min_sdk.or(self.min_sdk),
            target_sdk: overrides.target_sdk.or(self.target_sdk),
            ndk_version: overrides.ndk_version.or(self.ndk_version),
            version_code: overrides.version_code.or(self.version_code),
            version_name: overrides.version_name.or(self.version_name),
        }
    }
}

/// Explicit configuration consumed by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Kotlin/Java namespace of the app module.
    pub namespace: String,
    /// Application ID of the prod flavor; other flavors append a suffix.
    pub base_application_id: String,
    /// Launcher label of the prod flavor.
    pub app_name: String,
    pub flavor_dimension: String,
    /// Java source/target compatibility and Kotlin JVM target.
    pub jvm_target: String,
    /// Credentials file, relative to the project dir unless absolute.
    pub key_properties: PathBuf,
    pub signing_policy: SigningPolicy,
    pub toolchain: ToolchainValues,
    /// Android project directory; set by the caller, not the file.
    #[serde(skip)]
    pub project_dir: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            namespace: "com.playcado.app".to_string(),
            base_application_id: "com.playcado.app".to_string(),
            app_name: "Playcado".to_string(),
            flavor_dimension: "flavor".to_string(),
            jvm_target: "17".to_string(),
            key_properties: PathBuf::from(KEY_PROPERTIES_FILE),
            signing_policy: SigningPolicy::Lenient,
            toolchain: ToolchainValues::default(),
            project_dir: PathBuf::from("."),
        }
    }
}

impl ProjectConfig {
    /// Loads the project config file at `path`.
    ///
    /// Returns the defaults if the file doesn't exist.
    /// Returns an error if the file exists but is invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No project config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let (config, format) = Self::parse_auto(&content).map_err(|e| match e {
            VariantError::Configuration(msg) => {
                VariantError::Configuration(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        tracing::debug!("Loaded {:?} project config from {}", format, path.display());

        Ok(config)
    }

    /// Parses a config, auto-detecting format from content.
    ///
    /// - If starts with `%HUML` → parse as HUML
    /// - Otherwise → parse as YAML
    pub fn parse_auto(content: &str) -> Result<(Self, ConfigFormat)> {
        let (config, format) = if content.trim_start().starts_with("%HUML") {
            let config: Self = huml_rs::serde::from_str(content)
                .map_err(|e| VariantError::Configuration(format!("Invalid HUML: {}", e)))?;
            (config, ConfigFormat::Huml)
        } else if content.trim().is_empty() {
            (Self::default(), ConfigFormat::Yaml)
        } else {
            let config: Self = serde_yaml::from_str(content)
                .map_err(|e| VariantError::Configuration(format!("Invalid YAML: {}", e)))?;
            (config, ConfigFormat::Yaml)
        };

        config.validate()?;
        Ok((config, format))
    }

    /// Sets the Android project directory.
    pub fn with_project_dir(mut self, project_dir: impl Into<PathBuf>) -> Self {
        self.project_dir = project_dir.into();
        self
    }

    pub fn with_signing_policy(mut self, policy: SigningPolicy) -> Self {
        self.signing_policy = policy;
        self
    }

    /// Applies toolchain values supplied on the command line or environment.
    pub fn with_toolchain_overrides(mut self, overrides: ToolchainValues) -> Self {
        self.toolchain = self.toolchain.overridden_by(overrides);
        self
    }

    /// Location of `key.properties`.
    pub fn key_properties_path(&self) -> PathBuf {
        if self.key_properties.is_absolute() {
            self.key_properties.clone()
        } else {
            self.project_dir.join(&self.key_properties)
        }
    }

    /// Directory Gradle's `file()` resolves against inside the app build script.
    pub fn app_module_dir(&self) -> PathBuf {
        self.project_dir.join("app")
    }

    fn validate(&self) -> Result<()> {
        if !is_reverse_domain(&self.base_application_id) {
            return Err(VariantError::Configuration(format!(
                "base_application_id '{}' is not a valid application ID",
                self.base_application_id
            )));
        }
        if !is_reverse_domain(&self.namespace) {
            return Err(VariantError::Configuration(format!(
                "namespace '{}' is not a valid package name",
                self.namespace
            )));
        }
        if self.app_name.trim().is_empty() {
            return Err(VariantError::Configuration(
                "app_name must not be empty".to_string(),
            ));
        }
        if self.flavor_dimension.trim().is_empty() {
            return Err(VariantError::Configuration(
                "flavor_dimension must not be empty".to_string(),
            ));
        }
        if self.key_properties.as_os_str().is_empty() {
            return Err(VariantError::Configuration(
                "key_properties must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Checks Android application ID rules: two or more dot-separated segments,
/// each starting with a letter and containing only `[A-Za-z0-9_]`.
pub fn is_reverse_domain(id: &str) -> bool {
    let segments: Vec<&str> = id.split('.').collect();
    segments.len() >= 2
        && segments.iter().all(|segment| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProjectConfig::default();
        assert_eq!(config.base_application_id, "com.playcado.app");
        assert_eq!(config.namespace, "com.playcado.app");
        assert_eq!(config.app_name, "Playcado");
        assert_eq!(config.jvm_target, "17");
        assert_eq!(config.signing_policy, SigningPolicy::Lenient);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_key_properties_path_is_relative_to_project_dir() {
        let config = ProjectConfig::default().with_project_dir("/work/android");
        assert_eq!(
            config.key_properties_path(),
            PathBuf::from("/work/android/key.properties")
        );
        assert_eq!(config.app_module_dir(), PathBuf::from("/work/android/app"));
    }

    #[test]
    fn test_absolute_key_properties_path_is_kept() {
        let mut config = ProjectConfig::default().with_project_dir("/work/android");
        config.key_properties = PathBuf::from("/secrets/key.properties");
        assert_eq!(
            config.key_properties_path(),
            PathBuf::from("/secrets/key.properties")
        );
    }

    #[test]
    fn test_parse_yaml_partial_override() {
        let yaml = r#"
base_application_id: com.example.shop
app_name: Shop
signing_policy: strict
toolchain:
  min_sdk: "21"
"#;

        let (config, format) = ProjectConfig::parse_auto(yaml).unwrap();
        assert_eq!(format, ConfigFormat::Yaml);
        assert_eq!(config.base_application_id, "com.example.shop");
        assert_eq!(config.app_name, "Shop");
        assert_eq!(config.signing_policy, SigningPolicy::Strict);
        assert_eq!(config.toolchain.min_sdk.as_deref(), Some("21"));
        // untouched fields keep defaults
        assert_eq!(config.namespace, "com.playcado.app");
        assert_eq!(config.flavor_dimension, "flavor");
    }

    #[test]
    fn test_parse_auto_detects_huml() {
        let huml = "%HUML v0.2.0
app_name: \"Shop\"
";

        let (config, format) = ProjectConfig::parse_auto(huml).unwrap();
        assert_eq!(format, ConfigFormat::Huml);
        assert_eq!(config.app_name, "Shop");
    }

    #[test]
    fn test_parse_empty_content_uses_defaults() {
        let (config, _) = ProjectConfig::parse_auto("\n").unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_parse_rejects_unknown_fields() {
        let result = ProjectConfig::parse_auto("application_id: com.example.app\n");
        assert!(matches!(result, Err(VariantError::Configuration(_))));
    }

    #[test]
    fn test_parse_rejects_invalid_application_id() {
        let result = ProjectConfig::parse_auto("base_application_id: playcado\n");
        assert!(matches!(result, Err(VariantError::Configuration(_))));

        let result = ProjectConfig::parse_auto("base_application_id: com.1playcado\n");
        assert!(matches!(result, Err(VariantError::Configuration(_))));
    }

    #[test]
    fn test_parse_rejects_empty_app_name() {
        let result = ProjectConfig::parse_auto("app_name: \"  \"\n");
        assert!(matches!(result, Err(VariantError::Configuration(_))));
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProjectConfig::load(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_load_invalid_file_mentions_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "app_name: [unclosed\n").unwrap();

        let err = ProjectConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_toolchain_overrides() {
        let base = ToolchainValues {
            min_sdk: Some("21".to_string()),
            target_sdk: Some("34".to_string()),
            ..Default::default()
        };
        let overrides = ToolchainValues {
            target_sdk: Some("35".to_string()),
            version_name: Some("1.2.0".to_string()),
            ..Default::default()
        };

        let merged = base.overridden_by(overrides);
        assert_eq!(merged.min_sdk.as_deref(), Some("21"));
        assert_eq!(merged.target_sdk.as_deref(), Some("35"));
        assert_eq!(merged.version_name.as_deref(), Some("1.2.0"));
        assert!(merged.compile_sdk.is_none());
    }

    #[test]
    fn test_is_reverse_domain() {
        assert!(is_reverse_domain("com.playcado.app"));
        assert!(is_reverse_domain("com.playcado.app_dev"));
        assert!(!is_reverse_domain("playcado"));
        assert!(!is_reverse_domain("com..app"));
        assert!(!is_reverse_domain("com.playcado-app"));
        assert!(!is_reverse_domain(""));
    }
}
