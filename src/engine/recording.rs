//! Recording engine
//!
//! An in-process [`EffectsEngine`] that performs no video work. It logs every
//! successful call as an [`EngineCall`], can be told to fail on matching
//! calls, and lets the holder of an [`EngineProbe`] decide when readiness
//! fires. Used for dry-run planning and for pipeline testing.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

use super::effects_engine::{
    Background, EffectsEngine, EngineCallError, EngineResult, ReadySignal, SharpnessConfig,
};
use super::media::{MediaKind, MediaStream};
use crate::config::EngineConfig;
use crate::state::LayoutMode;

/// One imperative call as received by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Config { customer_id: String },
    Preload,
    Run,
    Stop,
    Clear,
    SetBlur(f64),
    ClearBlur,
    SetBackgroundColor(u32),
    SetBackground(Background),
    ClearBackground,
    EnableColorCorrector,
    DisableColorCorrector,
    SetColorCorrectorPower(f64),
    EnableLowLightEffect,
    DisableLowLightEffect,
    SetLowLightEffectPower(f64),
    EnableMirroring,
    DisableMirroring,
    Freeze,
    Unfreeze,
    EnableSmartZoom,
    DisableSmartZoom,
    SetFaceArea(f64),
    EnableBeautification,
    DisableBeautification,
    SetBoundaryLevel(f64),
    EnableSharpnessEffect,
    DisableSharpnessEffect,
    SetSharpnessEffectConfig(SharpnessConfig),
    SetLayout(LayoutMode),
    UseStream(Vec<String>),
}

impl EngineCall {
    /// Engine operation name, as used in [`EngineCallError::call`]
    pub fn name(&self) -> &'static str {
        match self {
            EngineCall::Config { .. } => "config",
            EngineCall::Preload => "preload",
            EngineCall::Run => "run",
            EngineCall::Stop => "stop",
            EngineCall::Clear => "clear",
            EngineCall::SetBlur(_) => "set_blur",
            EngineCall::ClearBlur => "clear_blur",
            EngineCall::SetBackgroundColor(_) => "set_background_color",
            EngineCall::SetBackground(_) => "set_background",
            EngineCall::ClearBackground => "clear_background",
            EngineCall::EnableColorCorrector => "enable_color_corrector",
            EngineCall::DisableColorCorrector => "disable_color_corrector",
            EngineCall::SetColorCorrectorPower(_) => "set_color_corrector_power",
            EngineCall::EnableLowLightEffect => "enable_low_light_effect",
            EngineCall::DisableLowLightEffect => "disable_low_light_effect",
            EngineCall::SetLowLightEffectPower(_) => "set_low_light_effect_power",
            EngineCall::EnableMirroring => "enable_mirroring",
            EngineCall::DisableMirroring => "disable_mirroring",
            EngineCall::Freeze => "freeze",
            EngineCall::Unfreeze => "unfreeze",
            EngineCall::EnableSmartZoom => "enable_smart_zoom",
            EngineCall::DisableSmartZoom => "disable_smart_zoom",
            EngineCall::SetFaceArea(_) => "set_face_area",
            EngineCall::EnableBeautification => "enable_beautification",
            EngineCall::DisableBeautification => "disable_beautification",
            EngineCall::SetBoundaryLevel(_) => "set_boundary_level",
            EngineCall::EnableSharpnessEffect => "enable_sharpness_effect",
            EngineCall::DisableSharpnessEffect => "disable_sharpness_effect",
            EngineCall::SetSharpnessEffectConfig(_) => "set_sharpness_effect_config",
            EngineCall::SetLayout(_) => "set_layout",
            EngineCall::UseStream(_) => "use_stream",
        }
    }
}

impl fmt::Display for EngineCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        match self {
            EngineCall::Config { customer_id } => write!(f, "{}({})", name, customer_id),
            EngineCall::SetBlur(v)
            | EngineCall::SetColorCorrectorPower(v)
            | EngineCall::SetLowLightEffectPower(v)
            | EngineCall::SetFaceArea(v)
            | EngineCall::SetBoundaryLevel(v) => write!(f, "{}({})", name, v),
            EngineCall::SetBackgroundColor(color) => write!(f, "{}(#{:06x})", name, color),
            EngineCall::SetBackground(Background::Color) => write!(f, "{}(color)", name),
            EngineCall::SetBackground(Background::Image(image)) => {
                write!(f, "{}({:?})", name, image)
            }
            EngineCall::SetSharpnessEffectConfig(config) => {
                write!(f, "{}(power={})", name, config.power)
            }
            EngineCall::SetLayout(layout) => write!(f, "{}({})", name, layout),
            EngineCall::UseStream(tracks) => write!(f, "{}({})", name, tracks.join(", ")),
            _ => write!(f, "{}()", name),
        }
    }
}

type FailurePredicate = Box<dyn Fn(&EngineCall) -> bool + Send>;

struct Recorder {
    calls: Vec<EngineCall>,
    fail_when: Option<FailurePredicate>,
    pending_ready: Option<ReadySignal>,
    auto_ready: bool,
    output: Option<MediaStream<String>>,
}

/// Engine that records calls instead of processing video
///
/// Tracks are plain string ids. The output stream carries one processed
/// track per source video track, named `<source>+effects`.
pub struct RecordingEngine {
    shared: Arc<Mutex<Recorder>>,
}

impl RecordingEngine {
    /// Engine whose readiness fires only through [`EngineProbe::fire_ready`]
    pub fn new() -> Self {
        Self::with_auto_ready(false)
    }

    /// Engine that fires readiness as soon as a stream is bound
    pub fn auto_ready() -> Self {
        Self::with_auto_ready(true)
    }

    fn with_auto_ready(auto_ready: bool) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Recorder {
                calls: Vec::new(),
                fail_when: None,
                pending_ready: None,
                auto_ready,
                output: None,
            })),
        }
    }

    /// Handle for inspecting and steering this engine after it is moved
    pub fn probe(&self) -> EngineProbe {
        EngineProbe {
            shared: Arc::clone(&self.shared),
        }
    }

    fn record(&self, call: EngineCall) -> EngineResult {
        let mut recorder = self.shared.lock();
        if let Some(predicate) = &recorder.fail_when {
            if predicate(&call) {
                return Err(EngineCallError::new(call.name(), "injected failure"));
            }
        }
        tracing::trace!(call = %call, "engine call");
        recorder.calls.push(call);
        Ok(())
    }
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectsEngine for RecordingEngine {
    type Track = String;

    fn config(&mut self, config: &EngineConfig) -> EngineResult {
        self.record(EngineCall::Config {
            customer_id: config.customer_id.clone(),
        })
    }

    fn preload(&mut self) -> EngineResult {
        self.record(EngineCall::Preload)
    }

    fn run(&mut self) -> EngineResult {
        self.record(EngineCall::Run)
    }

    fn stop(&mut self) -> EngineResult {
        self.record(EngineCall::Stop)
    }

    fn clear(&mut self) -> EngineResult {
        self.record(EngineCall::Clear)?;
        self.shared.lock().output = None;
        Ok(())
    }

    fn set_blur(&mut self, strength: f64) -> EngineResult {
        self.record(EngineCall::SetBlur(strength))
    }

    fn clear_blur(&mut self) -> EngineResult {
        self.record(EngineCall::ClearBlur)
    }

    fn set_background_color(&mut self, color: u32) -> EngineResult {
        self.record(EngineCall::SetBackgroundColor(color))
    }

    fn set_background(&mut self, background: Background) -> EngineResult {
        self.record(EngineCall::SetBackground(background))
    }

    fn clear_background(&mut self) -> EngineResult {
        self.record(EngineCall::ClearBackground)
    }

    fn enable_color_corrector(&mut self) -> EngineResult {
        self.record(EngineCall::EnableColorCorrector)
    }

    fn disable_color_corrector(&mut self) -> EngineResult {
        self.record(EngineCall::DisableColorCorrector)
    }

    fn set_color_corrector_power(&mut self, power: f64) -> EngineResult {
        self.record(EngineCall::SetColorCorrectorPower(power))
    }

    fn enable_low_light_effect(&mut self) -> EngineResult {
        self.record(EngineCall::EnableLowLightEffect)
    }

    fn disable_low_light_effect(&mut self) -> EngineResult {
        self.record(EngineCall::DisableLowLightEffect)
    }

    fn set_low_light_effect_power(&mut self, power: f64) -> EngineResult {
        self.record(EngineCall::SetLowLightEffectPower(power))
    }

    fn enable_mirroring(&mut self) -> EngineResult {
        self.record(EngineCall::EnableMirroring)
    }

    fn disable_mirroring(&mut self) -> EngineResult {
        self.record(EngineCall::DisableMirroring)
    }

    fn freeze(&mut self) -> EngineResult {
        self.record(EngineCall::Freeze)
    }

    fn unfreeze(&mut self) -> EngineResult {
        self.record(EngineCall::Unfreeze)
    }

    fn enable_smart_zoom(&mut self) -> EngineResult {
        self.record(EngineCall::EnableSmartZoom)
    }

    fn disable_smart_zoom(&mut self) -> EngineResult {
        self.record(EngineCall::DisableSmartZoom)
    }

    fn set_face_area(&mut self, area: f64) -> EngineResult {
        self.record(EngineCall::SetFaceArea(area))
    }

    fn enable_beautification(&mut self) -> EngineResult {
        self.record(EngineCall::EnableBeautification)
    }

    fn disable_beautification(&mut self) -> EngineResult {
        self.record(EngineCall::DisableBeautification)
    }

    fn set_boundary_level(&mut self, level: f64) -> EngineResult {
        self.record(EngineCall::SetBoundaryLevel(level))
    }

    fn enable_sharpness_effect(&mut self) -> EngineResult {
        self.record(EngineCall::EnableSharpnessEffect)
    }

    fn disable_sharpness_effect(&mut self) -> EngineResult {
        self.record(EngineCall::DisableSharpnessEffect)
    }

    fn set_sharpness_effect_config(&mut self, config: SharpnessConfig) -> EngineResult {
        self.record(EngineCall::SetSharpnessEffectConfig(config))
    }

    fn set_layout(&mut self, layout: LayoutMode) -> EngineResult {
        self.record(EngineCall::SetLayout(layout))
    }

    fn on_ready(&mut self, signal: ReadySignal) {
        self.shared.lock().pending_ready = Some(signal);
    }

    fn use_stream(&mut self, stream: MediaStream<String>) -> EngineResult {
        let sources: Vec<String> = stream.video_tracks().cloned().collect();
        self.record(EngineCall::UseStream(sources.clone()))?;

        let mut output = MediaStream::new();
        for source in sources {
            output.add_track(MediaKind::Video, format!("{}+effects", source));
        }

        let mut recorder = self.shared.lock();
        recorder.output = Some(output);
        if recorder.auto_ready {
            if let Some(signal) = recorder.pending_ready.take() {
                signal.fire();
            }
        }
        Ok(())
    }

    fn output_stream(&self) -> Option<MediaStream<String>> {
        self.shared.lock().output.clone()
    }
}

/// Shared view into a [`RecordingEngine`]
#[derive(Clone)]
pub struct EngineProbe {
    shared: Arc<Mutex<Recorder>>,
}

impl EngineProbe {
    /// Calls received so far
    pub fn calls(&self) -> Vec<EngineCall> {
        self.shared.lock().calls.clone()
    }

    /// Drain the call log
    pub fn take_calls(&self) -> Vec<EngineCall> {
        std::mem::take(&mut self.shared.lock().calls)
    }

    /// Make every call matching `predicate` fail without being recorded
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&EngineCall) -> bool + Send + 'static,
    {
        self.shared.lock().fail_when = Some(Box::new(predicate));
    }

    pub fn stop_failing(&self) {
        self.shared.lock().fail_when = None;
    }

    /// Whether a readiness signal is registered and unfired
    pub fn is_waiting_for_ready(&self) -> bool {
        self.shared.lock().pending_ready.is_some()
    }

    /// Fire the pending readiness signal. Returns false if none was pending.
    pub fn fire_ready(&self) -> bool {
        let signal = self.shared.lock().pending_ready.take();
        match signal {
            Some(signal) => {
                signal.fire();
                true
            }
            None => false,
        }
    }

    /// Drop the pending readiness signal without firing it
    pub fn drop_ready(&self) -> bool {
        self.shared.lock().pending_ready.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_records_calls_in_order() {
        let mut engine = RecordingEngine::new();
        let probe = engine.probe();

        engine.set_blur(0.4).unwrap();
        engine.set_layout(LayoutMode::RightBottom).unwrap();
        engine.clear_blur().unwrap();

        assert_eq!(
            probe.calls(),
            vec![
                EngineCall::SetBlur(0.4),
                EngineCall::SetLayout(LayoutMode::RightBottom),
                EngineCall::ClearBlur,
            ]
        );
    }

    #[test]
    fn test_injected_failure_is_not_recorded() {
        let mut engine = RecordingEngine::new();
        let probe = engine.probe();
        probe.fail_when(|call| matches!(call, EngineCall::Freeze));

        let err = engine.freeze().unwrap_err();
        assert_eq!(err.call, "freeze");
        assert!(probe.calls().is_empty());

        probe.stop_failing();
        engine.freeze().unwrap();
        assert_eq!(probe.calls(), vec![EngineCall::Freeze]);
    }

    #[test]
    fn test_use_stream_derives_output() {
        let mut engine = RecordingEngine::new();
        assert!(engine.output_stream().is_none());

        engine
            .use_stream(MediaStream::from_track(MediaKind::Video, "cam".to_string()))
            .unwrap();
        let output = engine.output_stream().unwrap();
        assert_eq!(
            output.video_tracks().cloned().collect::<Vec<_>>(),
            vec!["cam+effects".to_string()]
        );

        engine.clear().unwrap();
        assert!(engine.output_stream().is_none());
    }

    #[tokio::test]
    async fn test_auto_ready_fires_on_use_stream() {
        let mut engine = RecordingEngine::auto_ready();
        let probe = engine.probe();
        let (signal, rx) = ReadySignal::channel();

        engine.on_ready(signal);
        assert!(probe.is_waiting_for_ready());
        engine
            .use_stream(MediaStream::from_track(MediaKind::Video, "cam".to_string()))
            .unwrap();

        assert!(!probe.is_waiting_for_ready());
        assert!(rx.await.is_ok());
    }

    #[test]
    fn test_manual_ready() {
        let mut engine = RecordingEngine::new();
        let probe = engine.probe();
        assert!(!probe.fire_ready());

        let (signal, _rx) = ReadySignal::channel();
        engine.on_ready(signal);
        assert!(probe.fire_ready());
        assert!(!probe.fire_ready());
    }

    #[test]
    fn test_call_display() {
        assert_eq!(EngineCall::SetBlur(5.0).to_string(), "set_blur(5)");
        assert_eq!(
            EngineCall::SetBackgroundColor(0x00ff00).to_string(),
            "set_background_color(#00ff00)"
        );
        assert_eq!(
            EngineCall::SetBackground(Background::Image("beach.jpg".into())).to_string(),
            "set_background(\"beach.jpg\")"
        );
        assert_eq!(
            EngineCall::SetLayout(LayoutMode::LeftBottom).to_string(),
            "set_layout(left-bottom)"
        );
        assert_eq!(EngineCall::ClearBackground.to_string(), "clear_background()");
    }
}
