//! Notifications emitted while contour annotations are rendered.

use std::sync::mpsc::Sender;

/// Events downstream segmentation caches listen for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentationEvent {
    /// Geometry of a segmentation changed; derived statistics are stale.
    DataModified {
        /// Segmentation that changed
        segmentation_id: String,
    },
}

/// Receiver of segmentation events.
pub trait SegmentationEventSink {
    /// Deliver one event.
    fn emit(&self, event: SegmentationEvent);
}

impl SegmentationEventSink for Sender<SegmentationEvent> {
    fn emit(&self, event: SegmentationEvent) {
        if self.send(event).is_err() {
            log::debug!("Segmentation event receiver dropped");
        }
    }
}
