pub mod barrier;
pub mod manifest;
pub mod registry;
