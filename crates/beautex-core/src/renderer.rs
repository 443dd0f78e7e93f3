//! Draw-loop side of the protocol.

use tracing::trace;

use crate::callback::{FrameStatus, ProcessVideoFrame};
use crate::frame::{TextureFrame, TextureId};

/// Per-status frame counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub frames: u64,
    pub success: u64,
    pub create_frame_failed: u64,
    pub process_failed: u64,
    pub get_buffer_failed: u64,
    pub config_invalid: u64,
}

impl FrameStats {
    pub fn record(&mut self, status: FrameStatus) {
        self.frames += 1;
        let slot = match status {
            FrameStatus::Success => &mut self.success,
            FrameStatus::CreateFrameFailed => &mut self.create_frame_failed,
            FrameStatus::ProcessFailed => &mut self.process_failed,
            FrameStatus::GetBufferFailed => &mut self.get_buffer_failed,
            FrameStatus::ConfigInvalid => &mut self.config_invalid,
        };
        *slot += 1;
    }

    pub fn count(&self, status: FrameStatus) -> u64 {
        match status {
            FrameStatus::Success => self.success,
            FrameStatus::CreateFrameFailed => self.create_frame_failed,
            FrameStatus::ProcessFailed => self.process_failed,
            FrameStatus::GetBufferFailed => self.get_buffer_failed,
            FrameStatus::ConfigInvalid => self.config_invalid,
        }
    }

    /// Frames shown without processing.
    pub fn fallbacks(&self) -> u64 {
        self.frames - self.success
    }
}

/// What one draw cycle put on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawOutcome {
    pub status: FrameStatus,
    pub displayed: TextureFrame,
}

/// Renderer that hands its source texture to a frame callback every draw cycle.
///
/// Shows the processed texture on success and the untouched source otherwise.
pub struct TextureRenderer<P> {
    source: Option<TextureFrame>,
    processor: P,
    stats: FrameStats,
}

impl<P: ProcessVideoFrame> TextureRenderer<P> {
    pub fn new(source: TextureFrame, processor: P) -> Self {
        Self {
            source: Some(source),
            processor,
            stats: FrameStats::default(),
        }
    }

    pub fn processor_mut(&mut self) -> &mut P {
        &mut self.processor
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Runs one draw cycle. `None` after [`Self::cleanup`].
    pub fn draw_frame(&mut self) -> Option<DrawOutcome> {
        let source = self.source?;
        let mut dst = TextureFrame::default();
        let status = self.processor.on_process_video_frame(&source, &mut dst);
        self.stats.record(status);

        let displayed = if status.is_success() { dst } else { source };
        trace!(%status, texture = %displayed.texture_id, "frame drawn");
        Some(DrawOutcome { status, displayed })
    }

    /// Stops drawing and hands back the source texture so the caller can delete it.
    pub fn cleanup(&mut self) -> Option<TextureId> {
        self.source.take().map(|source| source.texture_id)
    }
}
