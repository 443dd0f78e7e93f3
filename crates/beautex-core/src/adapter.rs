//! Conversion between renderer textures and engine frames.

use crate::error::{CreateFrameError, ExtractError};
use crate::frame::{BYTES_PER_PIXEL_RGBA, FrameType, ImageFrame, TextureFrame};
use crate::sdk::BeautySdk;

/// Row stride of an RGBA texture `width` pixels wide, `None` on overflow.
#[inline]
pub fn rgba_stride(width: u32) -> Option<u32> {
    width.checked_mul(BYTES_PER_PIXEL_RGBA)
}

/// Wraps a renderer texture into an engine frame tagged as a still image.
pub fn wrap<'s, S>(
    sdk: &'s S,
    source: &TextureFrame,
) -> Result<ImageFrame<'s, S>, CreateFrameError>
where
    S: BeautySdk + ?Sized,
{
    let TextureFrame {
        texture_id,
        width,
        height,
    } = *source;
    if texture_id.is_none() {
        return Err(CreateFrameError::NoTexture);
    }
    let invalid = CreateFrameError::InvalidGeometry { width, height };
    if width == 0 || height == 0 {
        return Err(invalid);
    }
    let stride = rgba_stride(width).ok_or(invalid)?;

    let raw = sdk
        .create_frame_with_texture(texture_id, width, height, stride)
        .ok_or(CreateFrameError::Rejected {
            texture_id,
            width,
            height,
            stride,
        })?;
    let mut frame = ImageFrame::from_raw(sdk, raw);
    frame.set_frame_type(FrameType::Image);
    Ok(frame)
}

/// Reads the texture the engine rendered into.
pub fn unwrap<S>(frame: &ImageFrame<'_, S>) -> Result<TextureFrame, ExtractError>
where
    S: BeautySdk + ?Sized,
{
    let texture_id = frame.texture_id();
    if texture_id.is_none() {
        return Err(ExtractError::NoTexture);
    }
    Ok(TextureFrame::new(texture_id, frame.width(), frame.height()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::TextureId;
    use crate::sim::{FaultPlan, SimSdk};

    #[test]
    fn stride_is_four_bytes_per_pixel() {
        let sdk = SimSdk::new();
        let tex = sdk.create_texture(640, 480);
        let frame = wrap(&sdk, &TextureFrame::new(tex, 640, 480)).expect("wrap");
        assert_eq!(frame.stride(), 2560);
        assert_eq!(frame.frame_type(), FrameType::Image);
        assert_eq!(frame.texture_id(), tex);
    }

    #[test]
    fn rejects_sentinel_and_empty_geometry_without_calling_engine() {
        let sdk = SimSdk::new();
        assert_eq!(
            wrap(&sdk, &TextureFrame::new(TextureId::NONE, 4, 4)).expect_err("no texture"),
            CreateFrameError::NoTexture
        );
        assert_eq!(
            wrap(&sdk, &TextureFrame::new(TextureId(3), 0, 4)).expect_err("zero width"),
            CreateFrameError::InvalidGeometry {
                width: 0,
                height: 4
            }
        );
        assert_eq!(
            wrap(&sdk, &TextureFrame::new(TextureId(3), 4, 0)).expect_err("zero height"),
            CreateFrameError::InvalidGeometry {
                width: 4,
                height: 0
            }
        );
        assert_eq!(
            wrap(&sdk, &TextureFrame::new(TextureId(3), u32::MAX, 4)).expect_err("overflow"),
            CreateFrameError::InvalidGeometry {
                width: u32::MAX,
                height: 4
            }
        );
        assert_eq!(sdk.frames_created(), 0);
    }

    #[test]
    fn unknown_texture_is_rejected_by_engine() {
        let sdk = SimSdk::new();
        let err = wrap(&sdk, &TextureFrame::new(TextureId(99), 16, 16)).expect_err("unbound");
        assert!(matches!(err, CreateFrameError::Rejected { stride: 64, .. }));
    }

    #[test]
    fn unwrap_reports_missing_output_texture() {
        let sdk = SimSdk::with_faults(FaultPlan {
            empty_output_every: Some(1),
            ..FaultPlan::default()
        });
        let tex = sdk.create_texture(2, 2);
        let input = wrap(&sdk, &TextureFrame::new(tex, 2, 2)).expect("wrap");
        assert_eq!(
            unwrap(&input).expect("input has a texture"),
            TextureFrame::new(tex, 2, 2)
        );

        let mut engine = sdk
            .create_engine(&crate::EngineConfig::from_parts("a", "b", true))
            .expect("engine");
        let raw = crate::SdkEngine::process_image(&mut engine, input.raw()).expect("output");
        let output = ImageFrame::from_raw(&sdk, raw);
        assert_eq!(unwrap(&output), Err(ExtractError::NoTexture));
        drop(output);
        drop(input);
        assert_eq!(sdk.live_frames(), 0);
    }
}
