//! effect-sync - Declarative Video Effects State
//!
//! Effects engines expose imperative enable/disable/configure calls and keep
//! no record of what is active. effect-sync lets callers describe the
//! effects they want as state and takes care of the calls.
//!
//! # Architecture
//!
//! - `state`: effect state, partial deltas, and the `StateReconciler` that
//!   turns deltas into engine calls while mirroring what is active
//! - `engine`: the `EffectsEngine` capability trait and a recording engine
//! - `processor`: `EffectsVideoProcessor`, the track lifecycle adapter that
//!   binds a source track, waits for readiness and replays state

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod processor;
pub mod state;

pub use config::EngineConfig;
pub use error::{EffectError, Result};
pub use processor::{EffectsVideoProcessor, MediaTrackProcessor, ProcessorOptions, ProcessorPhase};
pub use state::{EffectChange, EffectDelta, EffectStateSet, LayoutMode, StateReconciler};
