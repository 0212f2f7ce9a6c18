//! Effects Engine Module
//!
//! The imperative engine boundary:
//! - The `EffectsEngine` capability trait
//! - Media stream types and the readiness signal
//! - A recording engine for dry runs and tests

mod effects_engine;
mod media;
pub mod recording;

pub use effects_engine::{
    Background, EffectsEngine, EngineCallError, EngineResult, ReadySignal, SharpnessConfig,
};
pub use media::{MediaKind, MediaStream};
pub use recording::{EngineCall, EngineProbe, RecordingEngine};
