use wasm_bindgen::prelude::*;

/// Eight planets around a glowing sun, textured, with one ringed body.
pub const SYSTEM_JSON: &str = include_str!("../assets/system.json");

orrery_web::export_orrery!(SYSTEM_JSON, "star-system");
