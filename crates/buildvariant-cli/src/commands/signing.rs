//! `buildvariant signing` commands for release signing setup.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use buildvariant_core::signing::{
    check_release_signing, cleanup_key_properties, load_credentials, write_key_properties,
};
use buildvariant_core::{ProjectConfig, SigningPolicy};
use clap::Subcommand;
use secrecy::{ExposeSecret, SecretString};

use crate::output::{or_dash, print_key_value, print_success, print_warning, yes_no};

#[derive(Subcommand)]
pub enum SigningCommands {
    /// Report whether release signing is ready
    Check {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the configured key.properties file
    WriteKeyProperties {
        /// Keystore path (relative paths resolve against the app module)
        #[arg(long)]
        store_file: PathBuf,

        /// Key alias inside the keystore
        #[arg(long)]
        key_alias: String,

        /// Keystore password
        #[arg(long, env = "BUILDVARIANT_STORE_PASSWORD", hide_env_values = true)]
        store_password: String,

        /// Key password
        #[arg(long, env = "BUILDVARIANT_KEY_PASSWORD", hide_env_values = true)]
        key_password: String,

        /// Overwrite an existing key.properties
        #[arg(long)]
        force: bool,
    },

    /// Remove the configured key.properties file
    Clean,
}

pub fn handle_signing_command(config: ProjectConfig, cmd: SigningCommands) -> Result<()> {
    match cmd {
        SigningCommands::Check { json } => check(&config, json),
        SigningCommands::WriteKeyProperties {
            store_file,
            key_alias,
            store_password,
            key_password,
            force,
        } => write(
            &config,
            store_file,
            &key_alias,
            SecretString::from(store_password),
            SecretString::from(key_password),
            force,
        ),
        SigningCommands::Clean => clean(&config),
    }
}

fn check(config: &ProjectConfig, json: bool) -> Result<()> {
    let key_properties = config.key_properties_path();
    let credentials = load_credentials(&key_properties)
        .with_context(|| format!("Failed to read {}", key_properties.display()))?;
    let report = check_release_signing(&credentials, &config.app_module_dir());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let store_path = report.store_path.as_ref().map(|p| p.display().to_string());
        let keystore_type = report.keystore_type.map(|t| t.to_string());
        let missing = report.missing_fields.join(", ");

        print_key_value("key.properties", &key_properties.display().to_string());
        print_key_value("Present", yes_no(key_properties.exists()));
        print_key_value("Missing keys", if missing.is_empty() { "-" } else { missing.as_str() });
        print_key_value("Keystore", or_dash(store_path.as_deref()));
        print_key_value("Keystore exists", yes_no(report.store_exists));
        print_key_value("Keystore type", or_dash(keystore_type.as_deref()));
        println!();
    }

    if report.is_ready() {
        if !json {
            print_success("Release signing is ready");
        }
    } else if config.signing_policy == SigningPolicy::Strict {
        bail!("Release signing is not ready");
    } else if !json {
        print_warning("Release signing is not ready; release builds will not be signable");
    }

    Ok(())
}

fn write(
    config: &ProjectConfig,
    store_file: PathBuf,
    key_alias: &str,
    store_password: SecretString,
    key_password: SecretString,
    force: bool,
) -> Result<()> {
    let target = config.key_properties_path();
    if target.exists() && !force {
        bail!(
            "{} already exists. Use --force to overwrite.",
            target.display()
        );
    }

    write_key_properties(
        &target,
        &store_file,
        store_password.expose_secret(),
        key_alias,
        key_password.expose_secret(),
    )
    .with_context(|| format!("Failed to write {}", target.display()))?;

    print_success(&format!("Wrote {}", target.display()));
    Ok(())
}

fn clean(config: &ProjectConfig) -> Result<()> {
    let target = config.key_properties_path();
    if cleanup_key_properties(&target)
        .with_context(|| format!("Failed to remove {}", target.display()))?
    {
        print_success(&format!("Removed {}", target.display()));
    } else {
        println!("No key.properties at {}", target.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    /// Project in a temp dir whose config points at `secure/key.properties`.
    fn project_with_custom_key_properties(dir: &Path) -> ProjectConfig {
        std::fs::create_dir_all(dir.join("secure")).unwrap();
        let mut config = ProjectConfig::default().with_project_dir(dir);
        config.key_properties = PathBuf::from("secure/key.properties");
        config
    }

    fn write_command(force: bool) -> SigningCommands {
        SigningCommands::WriteKeyProperties {
            store_file: PathBuf::from("upload.jks"),
            key_alias: "upload".to_string(),
            store_password: "storepass".to_string(),
            key_password: "keypass".to_string(),
            force,
        }
    }

    #[test]
    fn test_write_uses_configured_key_properties() {
        let dir = tempfile::tempdir().unwrap();
        let config = project_with_custom_key_properties(dir.path());

        handle_signing_command(config.clone(), write_command(false)).unwrap();

        assert!(dir.path().join("secure/key.properties").exists());
        assert!(!dir.path().join("key.properties").exists());

        let creds = load_credentials(&config.key_properties_path()).unwrap();
        assert!(creds.is_complete());
        assert_eq!(creds.key_alias.as_deref(), Some("upload"));
    }

    #[test]
    fn test_write_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let config = project_with_custom_key_properties(dir.path());
        let target = config.key_properties_path();
        std::fs::write(&target, "keyAlias=existing\n").unwrap();

        let result = handle_signing_command(config.clone(), write_command(false));
        assert!(result.unwrap_err().to_string().contains("already exists"));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "keyAlias=existing\n");

        handle_signing_command(config, write_command(true)).unwrap();
        assert!(std::fs::read_to_string(&target).unwrap().contains("keyAlias=upload"));
    }

    #[test]
    fn test_clean_removes_only_configured_key_properties() {
        let dir = tempfile::tempdir().unwrap();
        let config = project_with_custom_key_properties(dir.path());
        let configured = config.key_properties_path();
        let default = dir.path().join("key.properties");
        std::fs::write(&configured, "keyAlias=upload\n").unwrap();
        std::fs::write(&default, "keyAlias=other\n").unwrap();

        handle_signing_command(config.clone(), SigningCommands::Clean).unwrap();

        assert!(!configured.exists());
        assert!(default.exists());

        // Nothing left to remove is not an error
        handle_signing_command(config, SigningCommands::Clean).unwrap();
    }
}
