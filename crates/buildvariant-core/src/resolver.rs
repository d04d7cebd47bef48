//! Build configuration resolver.
//!
//! Resolves flavors and build types into [`BuildDescriptor`]s:
//! 1. Flavor name → application ID and display name
//! 2. Build type name → signing config and optimization flags
//! 3. Flavor × build type → descriptor
//!
//! Resolution is a pure function of the [`ProjectConfig`] and the
//! [`SigningCredentials`]; the only I/O is [`Resolver::from_project`]
//! reading `key.properties`.

use std::collections::BTreeMap;

use crate::config::{ProjectConfig, SigningPolicy};
use crate::error::{Result, VariantError};
use crate::models::{
    APP_NAME_RES, BuildDescriptor, BuildType, BuildTypeSpec, Flavor, FlavorSpec, SigningConfig,
    SigningCredentials, variant_name,
};
use crate::signing::load_credentials;

/// Resolves build variants against an explicit configuration.
#[derive(Debug, Clone)]
pub struct Resolver {
    config: ProjectConfig,
    credentials: SigningCredentials,
}

impl Resolver {
    pub fn new(config: ProjectConfig, credentials: SigningCredentials) -> Self {
        Self {
            config,
            credentials,
        }
    }

    /// Creates a resolver, loading credentials from the project's
    /// `key.properties` (absent file → empty credentials).
    pub fn from_project(config: ProjectConfig) -> Result<Self> {
        let credentials = load_credentials(&config.key_properties_path())?;
        Ok(Self::new(config, credentials))
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn credentials(&self) -> &SigningCredentials {
        &self.credentials
    }

    /// Resolves a flavor by name.
    pub fn flavor(&self, name: &str) -> Result<FlavorSpec> {
        let flavor: Flavor = name.parse()?;
        Ok(flavor_spec(&self.config, flavor))
    }

    /// Resolves a build type by name.
    pub fn build_type(&self, name: &str) -> Result<BuildTypeSpec> {
        let build_type: BuildType = name.parse()?;
        build_type_spec(build_type, &self.credentials, self.config.signing_policy)
    }

    /// Combines resolved values using this resolver's configuration.
    pub fn combine(&self, flavor: &FlavorSpec, build_type: &BuildTypeSpec) -> BuildDescriptor {
        combine(&self.config, flavor, build_type)
    }

    /// Resolves a single variant by flavor and build type names.
    pub fn descriptor(&self, flavor: &str, build_type: &str) -> Result<BuildDescriptor> {
        let flavor = self.flavor(flavor)?;
        let build_type = self.build_type(build_type)?;
        Ok(self.combine(&flavor, &build_type))
    }

    /// Resolves every variant: flavors in declaration order, each with
    /// `debug` then `release`.
    pub fn all(&self) -> Result<Vec<BuildDescriptor>> {
        let build_types = BuildType::ALL
            .iter()
            .map(|&bt| build_type_spec(bt, &self.credentials, self.config.signing_policy))
            .collect::<Result<Vec<_>>>()?;

        let descriptors = Flavor::ALL
            .iter()
            .flat_map(|&flavor| {
                let flavor = flavor_spec(&self.config, flavor);
                build_types
                    .iter()
                    .map(move |build_type| combine(&self.config, &flavor, build_type))
                    .collect::<Vec<_>>()
            })
            .collect();

        Ok(descriptors)
    }
}

/// Resolves a flavor with the default project configuration.
pub fn resolve_flavor(name: &str) -> Result<FlavorSpec> {
    let flavor: Flavor = name.parse()?;
    Ok(flavor_spec(&ProjectConfig::default(), flavor))
}

/// Resolves a build type, binding `credentials` to `release`.
///
/// Incomplete credentials are accepted (lenient policy).
pub fn resolve_build_type(name: &str, credentials: &SigningCredentials) -> Result<BuildTypeSpec> {
    let build_type: BuildType = name.parse()?;
    build_type_spec(build_type, credentials, SigningPolicy::Lenient)
}

/// Combines a resolved flavor and build type with the default project
/// configuration.
///
/// Namespace, flavor dimension and JVM target always come from
/// `ProjectConfig::default()`, even when `flavor` was produced by a
/// `Resolver` with a custom config. Use [`Resolver::combine`] to keep that
/// resolver's project values.
pub fn resolve_descriptor(flavor: &FlavorSpec, build_type: &BuildTypeSpec) -> BuildDescriptor {
    combine(&ProjectConfig::default(), flavor, build_type)
}

/// Resolves the full variant matrix with the default project configuration.
pub fn resolve_all(credentials: &SigningCredentials) -> Result<Vec<BuildDescriptor>> {
    Resolver::new(ProjectConfig::default(), credentials.clone()).all()
}

fn flavor_spec(config: &ProjectConfig, flavor: Flavor) -> FlavorSpec {
    FlavorSpec {
        flavor,
        application_id: format!(
            "{}{}",
            config.base_application_id,
            flavor.application_id_suffix().unwrap_or_default()
        ),
        display_name: format!(
            "{}{}",
            config.app_name,
            flavor.display_name_suffix().unwrap_or_default()
        ),
    }
}

fn build_type_spec(
    build_type: BuildType,
    credentials: &SigningCredentials,
    policy: SigningPolicy,
) -> Result<BuildTypeSpec> {
    match build_type {
        BuildType::Debug => Ok(BuildTypeSpec {
            build_type,
            signing: SigningConfig::Debug,
            minify: false,
            shrink_resources: false,
            debuggable: true,
        }),
        BuildType::Release => {
            let missing = credentials.missing_fields();
            if !missing.is_empty() {
                match policy {
                    SigningPolicy::Strict => {
                        return Err(VariantError::IncompleteSigning { missing });
                    }
                    SigningPolicy::Lenient => {
                        tracing::warn!(
                            "Release signing is incomplete (missing: {}); release builds will not be signable",
                            missing.join(", ")
                        );
                    }
                }
            }

            Ok(BuildTypeSpec {
                build_type,
                signing: SigningConfig::Release(credentials.clone()),
                minify: false,
                shrink_resources: false,
                debuggable: false,
            })
        }
    }
}

fn combine(config: &ProjectConfig, flavor: &FlavorSpec, build_type: &BuildTypeSpec) -> BuildDescriptor {
    let mut res_values = BTreeMap::new();
    res_values.insert(APP_NAME_RES.to_string(), flavor.display_name.clone());

    BuildDescriptor {
        name: variant_name(flavor.flavor, build_type.build_type),
        flavor: flavor.clone(),
        build_type: build_type.clone(),
        namespace: config.namespace.clone(),
        flavor_dimension: config.flavor_dimension.clone(),
        jvm_target: config.jvm_target.clone(),
        res_values,
        toolchain: config.toolchain.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::Properties;
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn full_credentials() -> SigningCredentials {
        let props = Properties::parse(
            "storePassword=storepass\nkeyPassword=keypass\nkeyAlias=upload\nstoreFile=release.keystore\n",
        )
        .unwrap();
        SigningCredentials::from_properties(&props)
    }

    #[test]
    fn test_resolve_flavor_defaults() {
        let dev = resolve_flavor("dev").unwrap();
        assert_eq!(dev.application_id, "com.playcado.app.dev");
        assert_eq!(dev.display_name, "Playcado Dev");

        let staging = resolve_flavor("staging").unwrap();
        assert_eq!(staging.application_id, "com.playcado.app.staging");
        assert_eq!(staging.display_name, "Playcado Staging");

        let prod = resolve_flavor("prod").unwrap();
        assert_eq!(prod.application_id, "com.playcado.app");
        assert_eq!(prod.display_name, "Playcado");
    }

    #[test]
    fn test_application_ids_are_unique() {
        let ids: HashSet<String> = ["dev", "staging", "prod"]
            .iter()
            .map(|name| resolve_flavor(name).unwrap().application_id)
            .collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_resolve_unknown_flavor_fails() {
        let err = resolve_flavor("qa").unwrap_err();
        assert!(matches!(err, VariantError::UnknownFlavor(ref name) if name == "qa"));
    }

    #[test]
    fn test_resolve_unknown_build_type_fails() {
        for creds in [SigningCredentials::default(), full_credentials()] {
            let err = resolve_build_type("unknown", &creds).unwrap_err();
            assert!(matches!(err, VariantError::UnknownBuildType(ref name) if name == "unknown"));
        }
    }

    #[test]
    fn test_resolve_debug_uses_builtin_signing() {
        let debug = resolve_build_type("debug", &full_credentials()).unwrap();
        assert_eq!(debug.signing, SigningConfig::Debug);
        assert!(!debug.minify);
        assert!(!debug.shrink_resources);
        assert!(debug.debuggable);
    }

    #[test]
    fn test_resolve_release_binds_credentials() {
        let creds = full_credentials();
        let release = resolve_build_type("release", &creds).unwrap();

        assert_eq!(release.signing, SigningConfig::Release(creds));
        assert!(!release.minify);
        assert!(!release.shrink_resources);
        assert!(!release.debuggable);
    }

    #[test]
    fn test_resolve_release_with_empty_credentials_is_lenient() {
        let release = resolve_build_type("release", &SigningCredentials::default()).unwrap();
        let creds = release.signing.credentials().unwrap();
        assert!(creds.is_empty());
    }

    #[test]
    fn test_strict_policy_rejects_incomplete_release() {
        let config = ProjectConfig::default().with_signing_policy(SigningPolicy::Strict);
        let mut creds = full_credentials();
        creds.store_password = None;
        let resolver = Resolver::new(config, creds);

        let err = resolver.build_type("release").unwrap_err();
        match err {
            VariantError::IncompleteSigning { missing } => {
                assert_eq!(missing, vec!["storePassword"]);
            }
            other => panic!("expected IncompleteSigning, got {:?}", other),
        }

        // debug does not depend on release credentials
        assert!(resolver.descriptor("dev", "debug").is_ok());
    }

    #[test]
    fn test_strict_policy_accepts_complete_release() {
        let config = ProjectConfig::default().with_signing_policy(SigningPolicy::Strict);
        let resolver = Resolver::new(config, full_credentials());
        assert!(resolver.descriptor("prod", "release").is_ok());
    }

    #[test]
    fn test_dev_debug_scenario() {
        let flavor = resolve_flavor("dev").unwrap();
        let build_type = resolve_build_type("debug", &SigningCredentials::default()).unwrap();
        let descriptor = resolve_descriptor(&flavor, &build_type);

        assert_eq!(descriptor.name, "devDebug");
        assert_eq!(descriptor.application_id(), "com.playcado.app.dev");
        assert_eq!(descriptor.signing(), &SigningConfig::Debug);
        assert!(!descriptor.minify());
        assert_eq!(descriptor.res_values.get(APP_NAME_RES).map(String::as_str), Some("Playcado Dev"));
    }

    #[test]
    fn test_prod_release_scenario() {
        let flavor = resolve_flavor("prod").unwrap();
        let build_type = resolve_build_type("release", &full_credentials()).unwrap();
        let descriptor = resolve_descriptor(&flavor, &build_type);

        assert_eq!(descriptor.name, "prodRelease");
        assert_eq!(descriptor.application_id(), "com.playcado.app");
        let creds = descriptor.signing().credentials().unwrap();
        assert_eq!(creds.store_file, Some(PathBuf::from("release.keystore")));
        assert!(!descriptor.minify());
        assert!(!descriptor.shrink_resources());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let resolver = Resolver::new(ProjectConfig::default(), full_credentials());
        assert_eq!(
            resolver.descriptor("staging", "release").unwrap(),
            resolver.descriptor("staging", "release").unwrap()
        );
        assert_eq!(resolve_all(&full_credentials()).unwrap(), resolve_all(&full_credentials()).unwrap());
    }

    #[test]
    fn test_all_produces_full_matrix_in_order() {
        let names: Vec<String> = resolve_all(&SigningCredentials::default())
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();

        assert_eq!(
            names,
            vec![
                "devDebug",
                "devRelease",
                "stagingDebug",
                "stagingRelease",
                "prodDebug",
                "prodRelease"
            ]
        );
    }

    #[test]
    fn test_custom_config_flows_into_descriptors() {
        let mut config = ProjectConfig::default();
        config.base_application_id = "com.example.shop".to_string();
        config.app_name = "Shop".to_string();
        config.toolchain.min_sdk = Some("23".to_string());

        let resolver = Resolver::new(config, SigningCredentials::default());
        let descriptor = resolver.descriptor("staging", "debug").unwrap();

        assert_eq!(descriptor.application_id(), "com.example.shop.staging");
        assert_eq!(descriptor.display_name(), "Shop Staging");
        assert_eq!(descriptor.toolchain.min_sdk.as_deref(), Some("23"));
        assert_eq!(descriptor.namespace, "com.playcado.app");
    }

    #[test]
    fn test_combine_keeps_resolver_project_values() {
        let mut config = ProjectConfig::default();
        config.namespace = "com.example.shop".to_string();
        config.base_application_id = "com.example.shop".to_string();
        config.jvm_target = "21".to_string();

        let resolver = Resolver::new(config, SigningCredentials::default());
        let flavor = resolver.flavor("dev").unwrap();
        let build_type = resolver.build_type("debug").unwrap();

        let descriptor = resolver.combine(&flavor, &build_type);
        assert_eq!(descriptor.namespace, "com.example.shop");
        assert_eq!(descriptor.jvm_target, "21");
        assert_eq!(descriptor.application_id(), "com.example.shop.dev");

        // The free function only knows the default project values
        let default_descriptor = resolve_descriptor(&flavor, &build_type);
        assert_eq!(default_descriptor.namespace, "com.playcado.app");
        assert_eq!(default_descriptor.jvm_target, "17");
        assert_eq!(default_descriptor.application_id(), "com.example.shop.dev");
    }

    #[test]
    fn test_from_project_without_key_properties() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = Resolver::from_project(ProjectConfig::default().with_project_dir(dir.path())).unwrap();
        assert!(resolver.credentials().is_empty());
    }
}
