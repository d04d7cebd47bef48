//! Project configuration resolution for the CLI.
//!
//! Priority order: CLI flags > environment variables > `buildvariant.yaml`
//! > built-in defaults.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use buildvariant_core::config::CONFIG_FILE_NAME;
use buildvariant_core::{ProjectConfig, SigningPolicy, ToolchainValues};
use clap::Args;

/// Flags shared by every command that resolves variants.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Android project directory (holds key.properties and app/)
    #[arg(long, global = true, default_value = ".", env = "BUILDVARIANT_PROJECT_DIR")]
    pub project_dir: PathBuf,

    /// Project config file (defaults to <project-dir>/buildvariant.yaml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to key.properties (overrides the project config)
    #[arg(long, global = true)]
    pub key_properties: Option<PathBuf>,

    /// Fail when release signing credentials are incomplete
    #[arg(long, global = true)]
    pub strict_signing: bool,

    #[command(flatten)]
    pub toolchain: ToolchainArgs,
}

/// Values the Flutter toolchain hands to the Android build.
#[derive(Args, Debug, Clone, Default)]
pub struct ToolchainArgs {
    /// compileSdk passed through to descriptors
    #[arg(long, global = true, env = "FLUTTER_COMPILE_SDK_VERSION")]
    pub compile_sdk: Option<String>,

    /// minSdk passed through to descriptors
    #[arg(long, global = true, env = "FLUTTER_MIN_SDK_VERSION")]
    pub min_sdk: Option<String>,

    /// targetSdk passed through to descriptors
    #[arg(long, global = true, env = "FLUTTER_TARGET_SDK_VERSION")]
    pub target_sdk: Option<String>,

    /// ndkVersion passed through to descriptors
    #[arg(long, global = true, env = "FLUTTER_NDK_VERSION")]
    pub ndk_version: Option<String>,

    /// versionCode passed through to descriptors
    #[arg(long, global = true, env = "FLUTTER_VERSION_CODE")]
    pub version_code: Option<String>,

    /// versionName passed through to descriptors
    #[arg(long, global = true, env = "FLUTTER_VERSION_NAME")]
    pub version_name: Option<String>,
}

impl From<ToolchainArgs> for ToolchainValues {
    fn from(args: ToolchainArgs) -> Self {
        Self {
            compile_sdk: args.compile_sdk,
            min_sdk: args.min_sdk,
            target_sdk: args.target_sdk,
            ndk_version: args.ndk_version,
            version_code: args.version_code,
            version_name: args.version_name,
        }
    }
}

/// Builds the project configuration from the config file and CLI flags.
pub fn resolve_project_config(args: &ProjectArgs) -> Result<ProjectConfig> {
    let config_path = match &args.config {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            path.clone()
        }
        None => args.project_dir.join(CONFIG_FILE_NAME),
    };

    let mut config = ProjectConfig::load(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?
        .with_project_dir(&args.project_dir)
        .with_toolchain_overrides(args.toolchain.clone().into());

    if let Some(key_properties) = &args.key_properties {
        config.key_properties = key_properties.clone();
    }
    if args.strict_signing {
        config = config.with_signing_policy(SigningPolicy::Strict);
    }

    tracing::debug!(
        "Resolved project config: dir={}, key.properties={}, policy={:?}",
        config.project_dir.display(),
        config.key_properties_path().display(),
        config.signing_policy
    );

    Ok(config)
}
