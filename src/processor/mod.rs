//! Track Processor Module
//!
//! Lifecycle adapter between the transport layer and an effects engine:
//! - Processor phases
//! - The transport-facing `MediaTrackProcessor` contract
//! - `EffectsVideoProcessor`, which drives the engine from effect state

mod phase;
mod track_processor;
mod video;

pub use phase::ProcessorPhase;
pub use track_processor::{MediaTrackProcessor, ProcessorOptions};
pub use video::{EffectsVideoProcessor, PROCESSOR_NAME};
