//! Signing models: credentials loaded from `key.properties` and the
//! signing configuration bound to each build type.

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::properties::Properties;

// ============================================================================
// key.properties keys
// ============================================================================

pub const KEY_ALIAS: &str = "keyAlias";
pub const KEY_PASSWORD: &str = "keyPassword";
pub const STORE_FILE: &str = "storeFile";
pub const STORE_PASSWORD: &str = "storePassword";

/// Every key recognised in `key.properties`, in the order they are written.
pub const SIGNING_KEYS: [&str; 4] = [STORE_PASSWORD, KEY_PASSWORD, KEY_ALIAS, STORE_FILE];

// ============================================================================
// Built-in debug keystore
// ============================================================================

/// Alias of the key in the SDK-generated debug keystore.
pub const DEBUG_KEY_ALIAS: &str = "androiddebugkey";
/// Location of the debug keystore relative to the user's home directory.
pub const DEBUG_KEYSTORE_PATH: &str = ".android/debug.keystore";

// ============================================================================
// Signing Credentials
// ============================================================================

/// Release signing credentials.
///
/// Every field is optional: a missing `key.properties` yields an all-empty
/// value, and a partial file leaves the absent keys empty.
#[derive(Debug, Default)]
pub struct SigningCredentials {
    pub key_alias: Option<String>,
    pub key_password: Option<SecretString>,
    /// Keystore path exactly as written in `key.properties`.
    pub store_file: Option<PathBuf>,
    pub store_password: Option<SecretString>,
}

impl SigningCredentials {
    /// Picks the recognised signing keys out of parsed properties.
    pub fn from_properties(properties: &Properties) -> Self {
        Self {
            key_alias: properties.get(KEY_ALIAS).map(str::to_string),
            key_password: properties.get(KEY_PASSWORD).map(secret),
            store_file: properties.get(STORE_FILE).map(PathBuf::from),
            store_password: properties.get(STORE_PASSWORD).map(secret),
        }
    }

    /// True when no field is populated.
    pub fn is_empty(&self) -> bool {
        self.key_alias.is_none()
            && self.key_password.is_none()
            && self.store_file.is_none()
            && self.store_password.is_none()
    }

    /// True when all four fields are populated.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Names of the `key.properties` keys that are absent.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.store_password.is_none() {
            missing.push(STORE_PASSWORD);
        }
        if self.key_password.is_none() {
            missing.push(KEY_PASSWORD);
        }
        if self.key_alias.is_none() {
            missing.push(KEY_ALIAS);
        }
        if self.store_file.is_none() {
            missing.push(STORE_FILE);
        }
        missing
    }
}

impl Clone for SigningCredentials {
    fn clone(&self) -> Self {
        Self {
            key_alias: self.key_alias.clone(),
            key_password: self.key_password.as_ref().map(clone_secret),
            store_file: self.store_file.clone(),
            store_password: self.store_password.as_ref().map(clone_secret),
        }
    }
}

impl PartialEq for SigningCredentials {
    fn eq(&self, other: &Self) -> bool {
        self.key_alias == other.key_alias
            && self.store_file == other.store_file
            && secrets_eq(&self.key_password, &other.key_password)
            && secrets_eq(&self.store_password, &other.store_password)
    }
}

impl Eq for SigningCredentials {}

fn secret(value: &str) -> SecretString {
    SecretString::from(value.to_owned())
}

fn clone_secret(value: &SecretString) -> SecretString {
    secret(value.expose_secret())
}

/// Compares two optional secrets in constant time.
fn secrets_eq(a: &Option<SecretString>, b: &Option<SecretString>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => {
            let (a, b) = (a.expose_secret().as_bytes(), b.expose_secret().as_bytes());
            a.len() == b.len() && bool::from(a.ct_eq(b))
        }
        (None, None) => true,
        _ => false,
    }
}

// ============================================================================
// Signing Config
// ============================================================================

/// Signing configuration bound to a build type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningConfig {
    /// The SDK's self-signed debug keystore.
    Debug,
    /// Credentials loaded from `key.properties`.
    Release(SigningCredentials),
}

impl SigningConfig {
    /// Name of the Gradle `signingConfigs` entry.
    pub fn name(&self) -> &'static str {
        match self {
            SigningConfig::Debug => "debug",
            SigningConfig::Release(_) => "release",
        }
    }

    /// Release credentials, if this is the release configuration.
    pub fn credentials(&self) -> Option<&SigningCredentials> {
        match self {
            SigningConfig::Debug => None,
            SigningConfig::Release(credentials) => Some(credentials),
        }
    }
}

/// Signing configuration view with secrets reduced to presence flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigningSummary {
    pub config: String,
    pub key_alias: Option<String>,
    pub store_file: Option<String>,
    pub key_password_set: bool,
    pub store_password_set: bool,
}

impl From<&SigningConfig> for SigningSummary {
    fn from(config: &SigningConfig) -> Self {
        match config {
            SigningConfig::Debug => Self {
                config: config.name().to_string(),
                key_alias: Some(DEBUG_KEY_ALIAS.to_string()),
                store_file: Some(format!("~/{}", DEBUG_KEYSTORE_PATH)),
                key_password_set: true,
                store_password_set: true,
            },
            SigningConfig::Release(credentials) => Self {
                config: config.name().to_string(),
                key_alias: credentials.key_alias.clone(),
                store_file: credentials
                    .store_file
                    .as_ref()
                    .map(|p| p.display().to_string()),
                key_password_set: credentials.key_password.is_some(),
                store_password_set: credentials.store_password.is_some(),
            },
        }
    }
}

// ============================================================================
// Keystore Type
// ============================================================================

/// Keystore container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeystoreType {
    Jks,
    Pkcs12,
}

impl KeystoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeystoreType::Jks => "jks",
            KeystoreType::Pkcs12 => "pkcs12",
        }
    }
}

impl std::fmt::Display for KeystoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_properties() -> Properties {
        Properties::parse(
            "storePassword=storepass\nkeyPassword=keypass\nkeyAlias=upload\nstoreFile=release.keystore\n",
        )
        .unwrap()
    }

    #[test]
    fn test_from_properties_reads_all_keys() {
        let creds = SigningCredentials::from_properties(&full_properties());

        assert_eq!(creds.key_alias.as_deref(), Some("upload"));
        assert_eq!(creds.store_file, Some(PathBuf::from("release.keystore")));
        assert_eq!(creds.key_password.unwrap().expose_secret(), "keypass");
        assert_eq!(creds.store_password.unwrap().expose_secret(), "storepass");
    }

    #[test]
    fn test_from_properties_ignores_unknown_keys() {
        let props = Properties::parse("keyAlias=upload\nflutter.sdk=/opt/flutter\n").unwrap();
        let creds = SigningCredentials::from_properties(&props);

        assert_eq!(creds.key_alias.as_deref(), Some("upload"));
        assert_eq!(
            creds.missing_fields(),
            vec![STORE_PASSWORD, KEY_PASSWORD, STORE_FILE]
        );
    }

    #[test]
    fn test_default_is_empty_and_incomplete() {
        let creds = SigningCredentials::default();
        assert!(creds.is_empty());
        assert!(!creds.is_complete());
        assert_eq!(creds.missing_fields().len(), 4);
    }

    #[test]
    fn test_complete_credentials() {
        let creds = SigningCredentials::from_properties(&full_properties());
        assert!(creds.is_complete());
        assert!(!creds.is_empty());
    }

    #[test]
    fn test_equality_compares_secrets() {
        let a = SigningCredentials::from_properties(&full_properties());
        let mut b = a.clone();
        assert_eq!(a, b);

        b.key_password = Some(SecretString::from("other".to_string()));
        assert_ne!(a, b);

        b.key_password = None;
        assert_ne!(a, b);
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let creds = SigningCredentials::from_properties(&full_properties());
        let debug = format!("{:?}", creds);

        assert!(!debug.contains("keypass"));
        assert!(!debug.contains("storepass"));
        assert!(debug.contains("upload"));
    }

    #[test]
    fn test_summary_hides_secret_values() {
        let creds = SigningCredentials::from_properties(&full_properties());
        let summary = SigningSummary::from(&SigningConfig::Release(creds));
        let json = serde_json::to_string(&summary).unwrap();

        assert!(!json.contains("keypass"));
        assert!(!json.contains("storepass"));
        assert!(summary.key_password_set);
        assert_eq!(summary.store_file.as_deref(), Some("release.keystore"));
    }

    #[test]
    fn test_debug_summary_uses_builtin_keystore() {
        let summary = SigningSummary::from(&SigningConfig::Debug);
        assert_eq!(summary.config, "debug");
        assert_eq!(summary.key_alias.as_deref(), Some(DEBUG_KEY_ALIAS));
    }
}
