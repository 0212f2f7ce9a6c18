//! Effects video processor
//!
//! Binds a [`StateReconciler`] to one engine and the track lifecycle:
//! feed a source track in, wait for the engine to report readiness, expose
//! the engine's output track, and replay the current state into it.
//!
//! Methods take `&self` so deltas can be applied while an `init` is
//! suspended. The lock is never held across the readiness await.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::phase::ProcessorPhase;
use super::track_processor::{MediaTrackProcessor, ProcessorOptions};
use crate::config::EngineConfig;
use crate::engine::{EffectsEngine, MediaKind, MediaStream, ReadySignal};
use crate::error::{EffectError, Result};
use crate::state::{EffectDelta, EffectStateSet, StateReconciler};

/// Name reported to the transport layer
pub const PROCESSOR_NAME: &str = "effects-sdk";

struct Inner<E: EffectsEngine> {
    engine: E,
    reconciler: StateReconciler,
    phase: ProcessorPhase,
    processed_track: Option<E::Track>,
}

/// Video track processor driving an effects engine from declarative state
pub struct EffectsVideoProcessor<E: EffectsEngine> {
    inner: Mutex<Inner<E>>,
}

impl<E: EffectsEngine> EffectsVideoProcessor<E> {
    /// Configure the engine and start preloading its models
    ///
    /// The engine is owned for the processor's whole life and never replaced.
    pub fn new(mut engine: E, config: &EngineConfig) -> Result<Self> {
        engine
            .config(config)
            .map_err(|e| EffectError::engine("config", e))?;
        engine
            .preload()
            .map_err(|e| EffectError::engine("preload", e))?;

        tracing::debug!(provider = %config.provider, "effects processor constructed");

        Ok(Self {
            inner: Mutex::new(Inner {
                engine,
                reconciler: StateReconciler::new(),
                phase: ProcessorPhase::Uninitialized,
                processed_track: None,
            }),
        })
    }

    pub fn name(&self) -> &str {
        PROCESSOR_NAME
    }

    pub fn phase(&self) -> ProcessorPhase {
        self.inner.lock().phase
    }

    /// Output track captured when the last `init` completed
    pub fn processed_track(&self) -> Option<E::Track> {
        self.inner.lock().processed_track.clone()
    }

    /// Snapshot of the mirrored effect state
    pub fn current_state(&self) -> EffectStateSet {
        self.inner.lock().reconciler.current().clone()
    }

    /// Bind a source track and wait for the engine to become ready
    ///
    /// Resolves once the output track is captured and the full current state
    /// has been replayed. Rejects overlapping calls with
    /// [`EffectError::ConcurrentInitialization`]. There is no timeout: if the
    /// engine never signals, this never resolves.
    pub async fn init(&self, options: ProcessorOptions<E::Track>) -> Result<()> {
        if options.kind != MediaKind::Video {
            return Err(EffectError::UnsupportedMediaKind { kind: options.kind });
        }

        let ready = self.bind_source(options.track)?;

        if ready.await.is_err() {
            let mut inner = self.inner.lock();
            if inner.phase == ProcessorPhase::Destroyed {
                return Err(EffectError::ProcessorDestroyed);
            }
            inner.phase = ProcessorPhase::Uninitialized;
            return Err(EffectError::ReadinessLost);
        }

        self.complete_init()
    }

    /// Swap in a new source track (camera switch) on a live processor
    pub async fn restart(&self, options: ProcessorOptions<E::Track>) -> Result<()> {
        tracing::debug!(phase = %self.phase(), "restarting with new source track");
        self.init(options).await
    }

    /// Apply a delta
    ///
    /// Reaches the engine only when `Ready`. In any other phase the delta is
    /// recorded and replayed when the next `init` completes.
    pub fn apply_delta(&self, delta: &EffectDelta) -> Result<()> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        if inner.phase.accepts_engine_calls() {
            inner.reconciler.apply(&mut inner.engine, delta)
        } else {
            tracing::trace!(phase = %inner.phase, "engine not ready, recording delta");
            inner.reconciler.record(delta);
            Ok(())
        }
    }

    /// Switch every effect off, following the same phase rule as `apply_delta`
    pub fn reset(&self) -> Result<()> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        if inner.phase.accepts_engine_calls() {
            inner.reconciler.reset(&mut inner.engine)
        } else {
            inner
                .reconciler
                .record(&EffectDelta::from(&EffectStateSet::default()));
            Ok(())
        }
    }

    /// Stop and clear the engine and drop the output track. Idempotent.
    ///
    /// An `init` suspended at this point resolves with
    /// [`EffectError::ProcessorDestroyed`].
    pub fn destroy(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.phase == ProcessorPhase::Destroyed {
            return Ok(());
        }

        let stopped = inner
            .engine
            .stop()
            .map_err(|e| EffectError::engine("stop", e));
        let cleared = inner
            .engine
            .clear()
            .map_err(|e| EffectError::engine("clear", e));
        inner.processed_track = None;
        inner.phase = ProcessorPhase::Destroyed;
        tracing::debug!("effects processor destroyed");

        stopped.and(cleared)
    }

    /// Register a fresh readiness signal and feed the track into the engine
    fn bind_source(&self, track: E::Track) -> Result<tokio::sync::oneshot::Receiver<()>> {
        let mut inner = self.inner.lock();
        match inner.phase {
            ProcessorPhase::Initializing => return Err(EffectError::ConcurrentInitialization),
            ProcessorPhase::Destroyed => return Err(EffectError::ProcessorDestroyed),
            ProcessorPhase::Uninitialized | ProcessorPhase::Ready => {}
        }

        let (signal, ready) = ReadySignal::channel();
        inner.engine.on_ready(signal);
        inner.processed_track = None;

        match feed_source(&mut inner.engine, track) {
            Ok(()) => {
                inner.phase = ProcessorPhase::Initializing;
                tracing::debug!("source track bound, waiting for engine readiness");
                Ok(ready)
            }
            Err(err) => {
                inner.phase = ProcessorPhase::Uninitialized;
                Err(err)
            }
        }
    }

    /// Capture the output track and replay the mirror into the engine
    ///
    /// The processor is `Ready` even if the replay fails: the engine is bound
    /// and the output track exists, so a later delta or `reset` can repair it.
    fn complete_init(&self) -> Result<()> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        if inner.phase == ProcessorPhase::Destroyed {
            return Err(EffectError::ProcessorDestroyed);
        }

        inner.processed_track = inner
            .engine
            .output_stream()
            .and_then(|stream| stream.first_video_track().cloned());
        inner.phase = ProcessorPhase::Ready;
        tracing::debug!(
            has_output = inner.processed_track.is_some(),
            "engine ready, replaying effect state"
        );

        inner.reconciler.update(&mut inner.engine)
    }
}

/// Detach whatever the engine was processing and feed it `track`
fn feed_source<E: EffectsEngine>(engine: &mut E, track: E::Track) -> Result<()> {
    engine
        .clear()
        .map_err(|e| EffectError::engine("clear", e))?;
    engine
        .use_stream(MediaStream::from_track(MediaKind::Video, track))
        .map_err(|e| EffectError::engine("use_stream", e))
}

#[async_trait]
impl<E> MediaTrackProcessor for EffectsVideoProcessor<E>
where
    E: EffectsEngine + Send + 'static,
    E::Track: Send + Sync + 'static,
{
    type Track = E::Track;

    fn name(&self) -> &str {
        PROCESSOR_NAME
    }

    async fn init(&self, options: ProcessorOptions<E::Track>) -> Result<()> {
        EffectsVideoProcessor::init(self, options).await
    }

    async fn restart(&self, options: ProcessorOptions<E::Track>) -> Result<()> {
        EffectsVideoProcessor::restart(self, options).await
    }

    async fn destroy(&self) -> Result<()> {
        EffectsVideoProcessor::destroy(self)
    }

    fn processed_track(&self) -> Option<E::Track> {
        EffectsVideoProcessor::processed_track(self)
    }

    async fn on_publish(&self, room: &str) -> Result<()> {
        tracing::debug!(room, "processed track published");
        Ok(())
    }

    async fn on_unpublish(&self) -> Result<()> {
        tracing::debug!("processed track unpublished");
        Ok(())
    }
}
