use std::fmt;

use crate::sdk::BeautySdk;

/// Bytes per pixel of the RGBA textures exchanged with the engine.
pub const BYTES_PER_PIXEL_RGBA: u32 = 4;

/// Non-owning GPU texture name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureId(pub u32);

impl TextureId {
    /// "No texture" sentinel.
    pub const NONE: TextureId = TextureId(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tex#{}", self.0)
    }
}

/// Texture descriptor exchanged with the renderer once per draw cycle.
///
/// Only valid for the render pass that produced it; callers receive it by reference and must not
/// keep it past the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextureFrame {
    pub texture_id: TextureId,
    pub width: u32,
    pub height: u32,
}

impl TextureFrame {
    pub const fn new(texture_id: TextureId, width: u32, height: u32) -> Self {
        Self {
            texture_id,
            width,
            height,
        }
    }
}

/// Identifier the engine assigns to each frame it creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameType {
    /// Still image: the engine processes each frame independently.
    #[default]
    Image,
    /// Live video stream: the engine may carry state across frames.
    Video,
}

/// Raw engine-side frame descriptor.
///
/// Plain data; whoever holds it is responsible for handing it back to
/// [`BeautySdk::release_frame`]. Inside this crate it only travels wrapped in an [`ImageFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdkFrame {
    pub id: FrameId,
    pub texture_id: TextureId,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub frame_type: FrameType,
}

/// Owned engine frame.
///
/// Releases its engine resources exactly once, either through [`ImageFrame::release`] or when
/// dropped.
pub struct ImageFrame<'s, S: BeautySdk + ?Sized> {
    sdk: &'s S,
    raw: Option<SdkFrame>,
}

impl<'s, S: BeautySdk + ?Sized> ImageFrame<'s, S> {
    /// Takes ownership of a frame the engine just handed out.
    pub fn from_raw(sdk: &'s S, raw: SdkFrame) -> Self {
        Self {
            sdk,
            raw: Some(raw),
        }
    }

    // `raw` is only taken by `release` and `drop`, which both end the guard.
    fn inner(&self) -> &SdkFrame {
        match &self.raw {
            Some(raw) => raw,
            None => unreachable!("image frame accessed after release"),
        }
    }

    pub fn raw(&self) -> &SdkFrame {
        self.inner()
    }

    pub fn texture_id(&self) -> TextureId {
        self.inner().texture_id
    }

    pub fn width(&self) -> u32 {
        self.inner().width
    }

    pub fn height(&self) -> u32 {
        self.inner().height
    }

    pub fn stride(&self) -> u32 {
        self.inner().stride
    }

    pub fn frame_type(&self) -> FrameType {
        self.inner().frame_type
    }

    pub fn set_frame_type(&mut self, frame_type: FrameType) {
        if let Some(raw) = self.raw.as_mut() {
            raw.frame_type = frame_type;
        }
    }

    /// The SDK that created this frame.
    pub fn sdk(&self) -> &'s S {
        self.sdk
    }

    /// Releases the engine resources now.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if let Some(raw) = self.raw.take() {
            self.sdk.release_frame(raw);
        }
    }
}

impl<S: BeautySdk + ?Sized> Drop for ImageFrame<'_, S> {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl<S: BeautySdk + ?Sized> fmt::Debug for ImageFrame<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFrame").field("raw", &self.raw).finish()
    }
}
