//! Fully resolved build descriptors (one per flavor × build type).

use std::collections::BTreeMap;

use serde::Serialize;

use super::{BuildType, BuildTypeSpec, Flavor, FlavorSpec, SigningConfig, SigningSummary};
use crate::config::ToolchainValues;

/// Resource value name carrying the launcher label.
pub const APP_NAME_RES: &str = "app_name";

/// The resolved configuration of one build variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDescriptor {
    /// Variant name, e.g. `devDebug`.
    pub name: String,
    pub flavor: FlavorSpec,
    pub build_type: BuildTypeSpec,
    pub namespace: String,
    pub flavor_dimension: String,
    pub jvm_target: String,
    /// Generated string resources.
    pub res_values: BTreeMap<String, String>,
    /// Values owned by the Flutter toolchain, passed through untouched.
    pub toolchain: ToolchainValues,
}

impl BuildDescriptor {
    pub fn application_id(&self) -> &str {
        &self.flavor.application_id
    }

    pub fn display_name(&self) -> &str {
        &self.flavor.display_name
    }

    pub fn signing(&self) -> &SigningConfig {
        &self.build_type.signing
    }

    pub fn minify(&self) -> bool {
        self.build_type.minify
    }

    pub fn shrink_resources(&self) -> bool {
        self.build_type.shrink_resources
    }
}

/// Builds a Gradle variant name: flavor followed by the capitalized build type.
pub fn variant_name(flavor: Flavor, build_type: BuildType) -> String {
    format!("{}{}", flavor.as_str(), build_type.capitalized())
}

/// Descriptor view for output (no secrets).
#[derive(Debug, Clone, Serialize)]
pub struct BuildDescriptorResponse {
    pub name: String,
    pub flavor: Flavor,
    pub build_type: BuildType,
    pub application_id: String,
    pub display_name: String,
    pub namespace: String,
    pub flavor_dimension: String,
    pub minify: bool,
    pub shrink_resources: bool,
    pub debuggable: bool,
    pub jvm_target: String,
    pub res_values: BTreeMap<String, String>,
    pub toolchain: ToolchainValues,
    pub signing: SigningSummary,
}

impl From<&BuildDescriptor> for BuildDescriptorResponse {
    fn from(descriptor: &BuildDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            flavor: descriptor.flavor.flavor,
            build_type: descriptor.build_type.build_type,
            application_id: descriptor.flavor.application_id.clone(),
            display_name: descriptor.flavor.display_name.clone(),
            namespace: descriptor.namespace.clone(),
            flavor_dimension: descriptor.flavor_dimension.clone(),
            minify: descriptor.build_type.minify,
            shrink_resources: descriptor.build_type.shrink_resources,
            debuggable: descriptor.build_type.debuggable,
            jvm_target: descriptor.jvm_target.clone(),
            res_values: descriptor.res_values.clone(),
            toolchain: descriptor.toolchain.clone(),
            signing: SigningSummary::from(&descriptor.build_type.signing),
        }
    }
}
