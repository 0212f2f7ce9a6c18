//! Processor lifecycle phases

use std::fmt;

/// Where a processor is in its track lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessorPhase {
    /// Constructed, no track bound yet (default state)
    #[default]
    Uninitialized,
    /// A source track was fed in; waiting for the engine's readiness signal
    Initializing,
    /// Engine bound, output track available, state replayed
    Ready,
    /// Engine stopped and cleared; terminal
    Destroyed,
}

impl ProcessorPhase {
    /// Whether delta application reaches the engine in this phase
    pub fn accepts_engine_calls(&self) -> bool {
        *self == ProcessorPhase::Ready
    }
}

impl fmt::Display for ProcessorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessorPhase::Uninitialized => write!(f, "Uninitialized"),
            ProcessorPhase::Initializing => write!(f, "Initializing"),
            ProcessorPhase::Ready => write!(f, "Ready"),
            ProcessorPhase::Destroyed => write!(f, "Destroyed"),
        }
    }
}
