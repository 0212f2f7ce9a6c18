//! State reconciliation
//!
//! The engine forgets everything between calls, so the reconciler keeps the
//! authoritative record of what is switched on and turns each delta into the
//! imperative calls that realize it.
//!
//! # Failure policy
//!
//! Calls are not retried. If a call fails part way through a delta, only the
//! features whose whole call sequence succeeded are merged into the mirror;
//! the failing feature and everything after it keep their previous values.

use super::delta::EffectDelta;
use super::effect_state::{EffectChange, EffectStateSet};
use crate::engine::{Background, EffectsEngine, EngineResult, SharpnessConfig};
use crate::error::{EffectError, Result};

/// Owns the mirror of the engine's active effects
#[derive(Debug, Clone, Default)]
pub struct StateReconciler {
    mirror: EffectStateSet,
}

impl StateReconciler {
    /// Create a reconciler whose mirror holds the default state
    pub fn new() -> Self {
        Self::default()
    }

    /// What the engine is believed to have active
    pub fn current(&self) -> &EffectStateSet {
        &self.mirror
    }

    /// Push every change in `delta` into the engine, then merge it
    ///
    /// Features are processed in delta order. The mirror is merged exactly
    /// once, after the engine calls, whether or not they all succeeded.
    pub fn apply<E>(&mut self, engine: &mut E, delta: &EffectDelta) -> Result<()>
    where
        E: EffectsEngine + ?Sized,
    {
        let mut applied = 0;
        let mut failure = None;

        for change in delta {
            if let Err(source) = push_change(engine, change) {
                failure = Some(EffectError::engine(change.feature().as_str(), source));
                break;
            }
            applied += 1;
        }

        for change in delta.iter().take(applied) {
            self.mirror.merge(change);
        }

        tracing::trace!(
            applied,
            requested = delta.len(),
            "reconciled delta against engine"
        );

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Replay the whole mirror against an engine that remembers nothing
    pub fn update<E>(&mut self, engine: &mut E) -> Result<()>
    where
        E: EffectsEngine + ?Sized,
    {
        let full = EffectDelta::from(&self.mirror);
        self.apply(engine, &full)
    }

    /// Switch everything off and return the mirror to the defaults
    pub fn reset<E>(&mut self, engine: &mut E) -> Result<()>
    where
        E: EffectsEngine + ?Sized,
    {
        let defaults = EffectDelta::from(&EffectStateSet::default());
        self.apply(engine, &defaults)
    }

    /// Merge a delta without touching any engine
    ///
    /// Used while no engine is bound; the next [`update`](Self::update)
    /// carries the recorded values across.
    pub fn record(&mut self, delta: &EffectDelta) {
        for change in delta {
            self.mirror.merge(change);
        }
    }
}

/// Issue the call sequence for one feature
fn push_change<E>(engine: &mut E, change: &EffectChange) -> EngineResult
where
    E: EffectsEngine + ?Sized,
{
    let on = change.is_on();
    match change {
        EffectChange::Running(_) => {
            if on {
                engine.run()
            } else {
                engine.stop()
            }
        }
        EffectChange::Blur(strength) => {
            if on {
                engine.set_blur(*strength)
            } else {
                engine.clear_blur()
            }
        }
        EffectChange::Color(rgb) => {
            if on {
                engine.set_background_color(*rgb)?;
                engine.set_background(Background::Color)
            } else {
                engine.clear_background()
            }
        }
        // Shares the background with `Color`; the last mode selected wins.
        EffectChange::Replace(image) => {
            if on {
                engine.set_background(Background::Image(image.clone()))
            } else {
                engine.clear_background()
            }
        }
        EffectChange::ColorCorrection(power) => {
            if on {
                engine.enable_color_corrector()?;
                engine.set_color_corrector_power(*power)
            } else {
                engine.disable_color_corrector()
            }
        }
        EffectChange::LowLight(power) => {
            if on {
                engine.enable_low_light_effect()?;
                engine.set_low_light_effect_power(*power)
            } else {
                engine.disable_low_light_effect()
            }
        }
        EffectChange::Mirroring(_) => {
            if on {
                engine.enable_mirroring()
            } else {
                engine.disable_mirroring()
            }
        }
        EffectChange::Freeze(_) => {
            if on {
                engine.freeze()
            } else {
                engine.unfreeze()
            }
        }
        EffectChange::SmartZoom(face_area) => {
            if on {
                engine.enable_smart_zoom()?;
                engine.set_face_area(*face_area)
            } else {
                engine.disable_smart_zoom()
            }
        }
        EffectChange::Beautification(level) => {
            if on {
                engine.enable_beautification()?;
                engine.set_boundary_level(*level)
            } else {
                engine.disable_beautification()
            }
        }
        EffectChange::Sharpness(power) => {
            if on {
                engine.enable_sharpness_effect()?;
                engine.set_sharpness_effect_config(SharpnessConfig { power: *power })
            } else {
                engine.disable_sharpness_effect()
            }
        }
        EffectChange::Layout(layout) => engine.set_layout(*layout),
    }
}
