use crate::error::SdkError;
use crate::frame::TextureId;

/// Failures the software engine injects on purpose.
///
/// `*_every: Some(n)` fails the n-th, 2n-th, ... call (counted from 1). `Some(0)` never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultPlan {
    /// `create_engine` fails with this error.
    pub reject_engine: Option<SdkError>,
    /// `create_frame_with_texture` returns `None`.
    pub fail_create_every: Option<u64>,
    /// `process_image` returns `None`.
    pub null_output_every: Option<u64>,
    /// `process_image` returns a frame without texture.
    pub empty_output_every: Option<u64>,
    /// Texture name the engine renders into instead of allocating its own.
    pub output_texture: Option<TextureId>,
}

impl FaultPlan {
    pub fn none() -> Self {
        Self::default()
    }

    pub(crate) fn hits(every: Option<u64>, count: u64) -> bool {
        matches!(every, Some(n) if n > 0 && count % n == 0)
    }
}
