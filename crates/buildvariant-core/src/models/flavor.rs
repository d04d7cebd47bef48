//! Product flavors: application identity and branding per environment.

use serde::{Deserialize, Serialize};

use crate::error::VariantError;

/// A product flavor in the `flavor` dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    Dev,
    Staging,
    Prod,
}

impl Flavor {
    /// All flavors in declaration order.
    pub const ALL: [Flavor; 3] = [Flavor::Dev, Flavor::Staging, Flavor::Prod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Flavor::Dev => "dev",
            Flavor::Staging => "staging",
            Flavor::Prod => "prod",
        }
    }

    /// Suffix appended to the base application ID.
    ///
    /// Prod ships under the base package identifier itself.
    pub fn application_id_suffix(&self) -> Option<&'static str> {
        match self {
            Flavor::Dev => Some(".dev"),
            Flavor::Staging => Some(".staging"),
            Flavor::Prod => None,
        }
    }

    /// Suffix appended to the base app name for the launcher label.
    pub fn display_name_suffix(&self) -> Option<&'static str> {
        match self {
            Flavor::Dev => Some(" Dev"),
            Flavor::Staging => Some(" Staging"),
            Flavor::Prod => None,
        }
    }
}

impl std::str::FromStr for Flavor {
    type Err = VariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Flavor::Dev),
            "staging" => Ok(Flavor::Staging),
            "prod" => Ok(Flavor::Prod),
            _ => Err(VariantError::UnknownFlavor(s.to_string())),
        }
    }
}

impl std::fmt::Display for Flavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A flavor resolved against the project's base identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FlavorSpec {
    pub flavor: Flavor,
    /// Reverse-domain application ID, e.g. `com.playcado.app.dev`.
    pub application_id: String,
    /// Value of the `app_name` string resource.
    pub display_name: String,
}
