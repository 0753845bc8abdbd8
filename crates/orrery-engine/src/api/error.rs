/// Errors surfaced while loading the system description or applying input.
///
/// None of these ever reach the viewer: the web bridge logs them and keeps
/// rendering with the previous state.
#[derive(Debug, thiserror::Error)]
pub enum OrreryError {
    #[error("failed to parse system manifest: {0}")]
    Manifest(#[source] serde_json::Error),
    #[error("failed to parse config: {0}")]
    Config(#[source] serde_json::Error),
    #[error("invalid body `{name}`: {reason}")]
    InvalidBody { name: String, reason: &'static str },
    #[error("duplicate body name `{0}`")]
    DuplicateBody(String),
    #[error("invalid speed `{raw}` for body `{name}`")]
    InvalidSpeed { name: String, raw: String },
}
