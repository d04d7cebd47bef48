//! Release signing: loading `key.properties`, generating it, and checking
//! that the referenced keystore is usable.
//!
//! The Gradle build script reads `key.properties` from the Android project
//! root to configure the `release` signing config. The file is optional:
//! without it the release config simply has no credentials.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::models::{
    KEY_ALIAS, KEY_PASSWORD, KeystoreType, SIGNING_KEYS, STORE_FILE, STORE_PASSWORD,
    SigningCredentials,
};
use crate::properties::{Properties, format_entry};

/// Loads signing credentials from a `key.properties` file.
///
/// A missing file is not an error: the result has no fields populated.
/// A file that exists but cannot be parsed fails with `MalformedProperties`.
pub fn load_credentials(path: &Path) -> Result<SigningCredentials> {
    let Some(properties) = Properties::load(path)? else {
        tracing::debug!("No signing properties at {}", path.display());
        return Ok(SigningCredentials::default());
    };

    check_file_permissions(path);

    for (key, _) in properties.iter() {
        if !SIGNING_KEYS.contains(&key) {
            tracing::debug!("Ignoring unrecognized key '{}' in {}", key, path.display());
        }
    }

    let credentials = SigningCredentials::from_properties(&properties);
    tracing::debug!(
        "Loaded signing properties from {} (missing: {:?})",
        path.display(),
        credentials.missing_fields()
    );

    Ok(credentials)
}

/// Generates `key.properties` content for Flutter/Gradle.
pub fn generate_key_properties(
    keystore_path: &Path,
    keystore_password: &str,
    key_alias: &str,
    key_password: &str,
) -> String {
    let keystore_path = keystore_path.display().to_string();
    [
        (STORE_PASSWORD, keystore_password),
        (KEY_PASSWORD, key_password),
        (KEY_ALIAS, key_alias),
        (STORE_FILE, keystore_path.as_str()),
    ]
    .iter()
    .map(|(key, value)| format_entry(key, value) + "\n")
    .collect()
}

/// Writes `key.properties` content to `path`.
///
/// The parent directory must already exist. The file is restricted to the
/// owner on Unix.
pub fn write_key_properties(
    path: &Path,
    keystore_path: &Path,
    keystore_password: &str,
    key_alias: &str,
    key_password: &str,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Directory not found: {}", parent.display()),
            )
            .into());
        }
    }

    let content = generate_key_properties(keystore_path, keystore_password, key_alias, key_password);

    std::fs::write(path, content)?;
    restrict_permissions(path)?;

    tracing::debug!("Wrote signing properties to {}", path.display());

    Ok(())
}

/// Removes the `key.properties` file at `path`.
///
/// Returns whether a file was removed.
pub fn cleanup_key_properties(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }

    std::fs::remove_file(path)?;
    tracing::debug!("Removed signing properties {}", path.display());

    Ok(true)
}

/// Detects the keystore type from its magic bytes.
pub fn detect_keystore_type(data: &[u8]) -> KeystoreType {
    // JKS files start with magic bytes 0xFEEDFEED
    if data.starts_with(&[0xFE, 0xED, 0xFE, 0xED]) {
        return KeystoreType::Jks;
    }

    // Default to PKCS12 for other formats
    KeystoreType::Pkcs12
}

/// Readiness of the release signing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigningReport {
    /// Keys absent from `key.properties`.
    pub missing_fields: Vec<&'static str>,
    /// Keystore path after resolving it against the app module dir.
    pub store_path: Option<PathBuf>,
    pub store_exists: bool,
    pub keystore_type: Option<KeystoreType>,
}

impl SigningReport {
    /// True when every key is present and the keystore exists.
    pub fn is_ready(&self) -> bool {
        self.missing_fields.is_empty() && self.store_exists
    }
}

/// Checks release credentials against the file system.
///
/// A relative `storeFile` resolves against `module_dir`, matching Gradle's
/// `file()` inside the app module's build script.
pub fn check_release_signing(credentials: &SigningCredentials, module_dir: &Path) -> SigningReport {
    let store_path = credentials.store_file.as_ref().map(|store_file| {
        if store_file.is_absolute() {
            store_file.clone()
        } else {
            module_dir.join(store_file)
        }
    });

    let keystore_type = store_path
        .as_deref()
        .filter(|path| path.is_file())
        .and_then(|path| std::fs::read(path).ok())
        .map(|data| detect_keystore_type(&data));

    SigningReport {
        missing_fields: credentials.missing_fields(),
        store_exists: store_path.as_deref().is_some_and(Path::is_file),
        store_path,
        keystore_type,
    }
}

/// Warn if the credentials file is readable by group or others (on Unix).
#[cfg(unix)]
fn check_file_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = std::fs::metadata(path) {
        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            tracing::warn!(
                "{} has overly permissive permissions ({:o}). Consider running: chmod 600 {}",
                path.display(),
                mode & 0o777,
                path.display()
            );
        }
    }
}

#[cfg(not(unix))]
fn check_file_permissions(_path: &Path) {}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
