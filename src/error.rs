//! Error handling for effect-sync
//!
//! Engine call failures carry the stage (feature or lifecycle step) that
//! issued the failing call.

use thiserror::Error;

use crate::engine::{EngineCallError, MediaKind};

/// Result type alias for effect-sync operations
pub type Result<T> = std::result::Result<T, EffectError>;

/// Main error type for effect-sync operations
#[derive(Error, Debug)]
pub enum EffectError {
    // Lifecycle Errors
    #[error("Unsupported media kind: {kind} (only video tracks can be processed)")]
    UnsupportedMediaKind { kind: MediaKind },

    #[error("Initialization already in flight")]
    ConcurrentInitialization,

    #[error("Engine dropped the readiness signal without firing it")]
    ReadinessLost,

    #[error("Processor has been destroyed")]
    ProcessorDestroyed,

    // Engine Errors
    #[error("Engine call failed while applying {stage}: {source}")]
    EngineCallFailure {
        stage: &'static str,
        #[source]
        source: EngineCallError,
    },

    // Input Errors
    #[error("Invalid JSON document: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EffectError {
    /// Wrap an engine failure with the stage that issued the call
    pub fn engine(stage: &'static str, source: EngineCallError) -> Self {
        EffectError::EngineCallFailure { stage, source }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            EffectError::UnsupportedMediaKind { .. } => "UNSUPPORTED_MEDIA_KIND",
            EffectError::ConcurrentInitialization => "CONCURRENT_INITIALIZATION",
            EffectError::ReadinessLost => "READINESS_LOST",
            EffectError::ProcessorDestroyed => "PROCESSOR_DESTROYED",
            EffectError::EngineCallFailure { .. } => "ENGINE_CALL_FAILURE",
            EffectError::InvalidJson(_) => "INVALID_JSON",
            EffectError::Io(_) => "IO_ERROR",
        }
    }

    /// Check if the caller can retry the failed operation on the same processor
    ///
    /// A destroyed processor never recovers; build a fresh one instead.
    pub fn is_recoverable(&self) -> bool {
        match self {
            EffectError::ConcurrentInitialization => true,
            EffectError::EngineCallFailure { .. } => true,
            EffectError::ReadinessLost => true,
            EffectError::UnsupportedMediaKind { .. } => true,
            EffectError::InvalidJson(_) => true,
            _ => false,
        }
    }
}
