//! The imperative effects engine interface
//!
//! The engine keeps no record of which effects are active. Every capability
//! is a fire-and-forget call; the reconciler in [`crate::state`] is the only
//! place that knows what the engine currently has switched on.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::oneshot;

use super::media::MediaStream;
use crate::config::EngineConfig;
use crate::state::LayoutMode;

/// Result of a single imperative engine call
pub type EngineResult = std::result::Result<(), EngineCallError>;

/// A single engine call raised an error
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{call} failed: {reason}")]
pub struct EngineCallError {
    /// Name of the engine operation that failed
    pub call: &'static str,
    pub reason: String,
}

impl EngineCallError {
    pub fn new(call: &'static str, reason: impl Into<String>) -> Self {
        Self {
            call,
            reason: reason.into(),
        }
    }
}

/// Background mode selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    /// Solid fill using the color set by `set_background_color`
    Color,
    /// Replacement image, by reference
    Image(String),
}

/// Sharpness effect parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SharpnessConfig {
    pub power: f64,
}

/// Single-shot readiness notification handed to the engine
///
/// Firing consumes the signal, so an engine cannot notify twice for the same
/// stream. Dropping it unfired tells the waiting processor that readiness
/// will never arrive.
#[derive(Debug)]
pub struct ReadySignal {
    tx: oneshot::Sender<()>,
}

impl ReadySignal {
    /// Create a signal and the receiver that resolves when it fires
    pub fn channel() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Notify that the engine is bound to its stream and has an output
    pub fn fire(self) {
        // The waiting side may already be gone (processor destroyed).
        let _ = self.tx.send(());
    }
}

/// Capabilities required from an effects-processing engine
///
/// Method names follow the engine's own vocabulary. Implementations must not
/// remember state between calls on the caller's behalf.
pub trait EffectsEngine {
    /// Handle type for tracks flowing in and out of the engine
    type Track: Clone;

    // Setup
    fn config(&mut self, config: &EngineConfig) -> EngineResult;
    fn preload(&mut self) -> EngineResult;

    // Processing
    fn run(&mut self) -> EngineResult;
    fn stop(&mut self) -> EngineResult;
    /// Detach the current stream and drop all pipeline state
    fn clear(&mut self) -> EngineResult;

    // Blur
    fn set_blur(&mut self, strength: f64) -> EngineResult;
    fn clear_blur(&mut self) -> EngineResult;

    // Background
    fn set_background_color(&mut self, color: u32) -> EngineResult;
    fn set_background(&mut self, background: Background) -> EngineResult;
    fn clear_background(&mut self) -> EngineResult;

    // Color corrector
    fn enable_color_corrector(&mut self) -> EngineResult;
    fn disable_color_corrector(&mut self) -> EngineResult;
    fn set_color_corrector_power(&mut self, power: f64) -> EngineResult;

    // Low light
    fn enable_low_light_effect(&mut self) -> EngineResult;
    fn disable_low_light_effect(&mut self) -> EngineResult;
    fn set_low_light_effect_power(&mut self, power: f64) -> EngineResult;

    // Mirroring and freeze
    fn enable_mirroring(&mut self) -> EngineResult;
    fn disable_mirroring(&mut self) -> EngineResult;
    fn freeze(&mut self) -> EngineResult;
    fn unfreeze(&mut self) -> EngineResult;

    // Smart zoom
    fn enable_smart_zoom(&mut self) -> EngineResult;
    fn disable_smart_zoom(&mut self) -> EngineResult;
    fn set_face_area(&mut self, area: f64) -> EngineResult;

    // Beautification
    fn enable_beautification(&mut self) -> EngineResult;
    fn disable_beautification(&mut self) -> EngineResult;
    fn set_boundary_level(&mut self, level: f64) -> EngineResult;

    // Sharpness
    fn enable_sharpness_effect(&mut self) -> EngineResult;
    fn disable_sharpness_effect(&mut self) -> EngineResult;
    fn set_sharpness_effect_config(&mut self, config: SharpnessConfig) -> EngineResult;

    // Layout
    fn set_layout(&mut self, layout: LayoutMode) -> EngineResult;

    // Stream binding
    /// Register the signal to fire once the next stream is bound
    fn on_ready(&mut self, signal: ReadySignal);
    /// Feed a source stream into the engine
    fn use_stream(&mut self, stream: MediaStream<Self::Track>) -> EngineResult;
    /// The processed output stream, once one exists
    fn output_stream(&self) -> Option<MediaStream<Self::Track>>;
}
