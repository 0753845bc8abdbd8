pub mod animation;
pub mod builder;
pub mod input;
pub mod labels;
pub mod lighting;
pub mod loader;
pub mod speed;
