use std::io;

/// All error types for the scene-mirror converter.
#[derive(thiserror::Error, Debug)]
pub enum SceneMirrorError {
    #[error("Resolution error: {0}")]
    Resolution(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),
    #[error("Scene state error: {0}")]
    SceneState(String),
    #[error("Asset error: {0}")]
    Asset(String),
    #[error("Output error: {0}")]
    Output(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SceneMirrorError>;
