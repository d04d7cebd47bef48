//! Domain models for build variant resolution.

pub mod build_type;
pub mod descriptor;
pub mod flavor;
pub mod signing;

pub use build_type::*;
pub use descriptor::*;
pub use flavor::*;
pub use signing::*;
