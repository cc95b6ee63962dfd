//! Error types reported by the component layer.
//!
//! All of these are local precondition failures reported synchronously to the
//! caller. None of them leave partial state behind.

use thiserror::Error;

/// Failures from clip preparation and animator playback control.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationError {
    #[error("invalid animation clip: {reason}")]
    InvalidClip { reason: String },

    #[error("no animation registered under key {key}")]
    UnknownAnimationKey { key: String },

    #[error("frame index {index} out of range for clip with {len} frames")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Failures from renderable configuration and queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("tile map has no layer named '{name}'")]
    UnknownLayer { name: String },

    #[error("tile map component has no collision layer")]
    MissingCollisionLayer,
}

/// Failures while loading JSON asset descriptions.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read asset file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse asset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("animation '{key}': {source}")]
    Clip {
        key: String,
        #[source]
        source: AnimationError,
    },
}
