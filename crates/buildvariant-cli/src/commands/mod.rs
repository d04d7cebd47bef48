pub mod signing;
pub mod variants;
