//! Per-frame external-texture processing protocol.
//!
//! A renderer hands each captured [`TextureFrame`] to a [`ProcessVideoFrame`] callback. The
//! callback lazily opens a single [`EngineHandle`] over an opaque [`BeautySdk`], wraps the
//! texture into an engine-side [`ImageFrame`], runs the engine, and copies the processed texture
//! back into the renderer's destination slot. Every outcome is reported as a [`FrameStatus`].
//!
//! - [`sim::SimSdk`] is an in-memory engine used by the demo and the tests.
//! - [`renderer::TextureRenderer`] drives draw cycles and falls back to the source texture.

pub mod adapter;
pub mod callback;
pub mod config;
pub mod error;
pub mod frame;
pub mod handle;
pub mod params;
pub mod renderer;
pub mod sdk;
pub mod sim;

pub use callback::{BeautyFrameProcessor, CallbackState, FrameStatus, ProcessVideoFrame};
pub use config::{EngineConfig, LogConfig, SdkLogLevel};
pub use error::{
    ConfigError, CreateFrameError, EngineOpenError, ExtractError, FrameError, ProcessError,
    SdkError,
};
pub use frame::{
    BYTES_PER_PIXEL_RGBA, FrameId, FrameType, ImageFrame, SdkFrame, TextureFrame, TextureId,
};
pub use handle::EngineHandle;
pub use params::{
    BasicParam, BeautyControls, EffectCategories, EffectCategory, ParamChannel, ParamKey,
    ParamSnapshot, ReshapeParam, slider_value,
};
pub use renderer::{DrawOutcome, FrameStats, TextureRenderer};
pub use sdk::{BeautySdk, SdkEngine};
