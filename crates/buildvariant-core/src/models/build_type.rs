//! Build types: optimization and signing behaviour.

use serde::{Deserialize, Serialize};

use super::SigningConfig;
use crate::error::VariantError;

/// A build type, the second axis of the variant matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    Debug,
    Release,
}

impl BuildType {
    /// All build types in declaration order.
    pub const ALL: [BuildType; 2] = [BuildType::Debug, BuildType::Release];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "debug",
            BuildType::Release => "release",
        }
    }

    /// Name as it appears inside a variant name (`devDebug`).
    pub fn capitalized(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
        }
    }
}

impl std::str::FromStr for BuildType {
    type Err = VariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            _ => Err(VariantError::UnknownBuildType(s.to_string())),
        }
    }
}

impl std::fmt::Display for BuildType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A build type with its signing configuration bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTypeSpec {
    pub build_type: BuildType,
    pub signing: SigningConfig,
    /// R8 code shrinking / obfuscation.
    pub minify: bool,
    /// Unused resource removal. Requires `minify` in the Android plugin.
    pub shrink_resources: bool,
    pub debuggable: bool,
}
