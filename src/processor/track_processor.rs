//! Transport-facing processor contract

use async_trait::async_trait;

use crate::engine::MediaKind;
use crate::error::Result;

/// Source track handed to a processor by the transport layer
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorOptions<T> {
    pub kind: MediaKind,
    pub track: T,
}

impl<T> ProcessorOptions<T> {
    pub fn new(kind: MediaKind, track: T) -> Self {
        Self { kind, track }
    }

    pub fn video(track: T) -> Self {
        Self::new(MediaKind::Video, track)
    }
}

/// A stage the transport layer inserts between a capture track and the room
///
/// After `init` resolves the processor exposes an output track of the same
/// kind. `restart` swaps the source without a full teardown.
#[async_trait]
pub trait MediaTrackProcessor: Send + Sync {
    type Track: Clone + Send + Sync + 'static;

    fn name(&self) -> &str;

    async fn init(&self, options: ProcessorOptions<Self::Track>) -> Result<()>;

    async fn restart(&self, options: ProcessorOptions<Self::Track>) -> Result<()>;

    async fn destroy(&self) -> Result<()>;

    /// Output track produced by the last completed `init`
    fn processed_track(&self) -> Option<Self::Track>;

    async fn on_publish(&self, room: &str) -> Result<()>;

    async fn on_unpublish(&self) -> Result<()>;
}
