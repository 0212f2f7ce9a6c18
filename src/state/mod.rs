//! State Management Module
//!
//! Declarative effect state, partial deltas, and the reconciler that keeps
//! the engine in step with them.

pub mod delta;
pub mod effect_state;
pub mod reconciler;

pub use delta::EffectDelta;
pub use effect_state::{EffectChange, EffectStateSet, Feature, LayoutMode};
pub use reconciler::StateReconciler;
