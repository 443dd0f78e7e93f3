//! Contract of the external beauty engine.
//!
//! The engine is opaque: the core only creates frames around renderer textures, hands them to
//! the engine and releases whatever comes back. [`crate::sim::SimSdk`] is an in-memory
//! implementation.

use crate::config::{EngineConfig, LogConfig};
use crate::error::SdkError;
use crate::frame::{SdkFrame, TextureId};
use crate::params::{EffectCategory, ParamKey};

/// Library-level entry points of the engine.
pub trait BeautySdk: Send + Sync {
    type Engine: SdkEngine;

    /// Sets the engine's own diagnostics. Called once, before [`Self::create_engine`].
    fn set_log_config(&self, config: &LogConfig);

    fn create_engine(&self, config: &EngineConfig) -> Result<Self::Engine, SdkError>;

    /// Wraps an existing GL texture. `None` when the texture cannot be bound.
    fn create_frame_with_texture(
        &self,
        texture_id: TextureId,
        width: u32,
        height: u32,
        stride: u32,
    ) -> Option<SdkFrame>;

    /// Frees a frame created by this SDK. Best effort; never fails.
    fn release_frame(&self, frame: SdkFrame);
}

/// One live engine instance.
pub trait SdkEngine: Send {
    fn enable_beauty_type(&mut self, category: EffectCategory, enabled: bool);

    fn set_beauty_param(&mut self, key: ParamKey, value: f32);

    /// Runs every enabled category over `input`. `None` when the engine produced nothing.
    ///
    /// The returned frame is owned by the caller and must be released through the SDK.
    fn process_image(&mut self, input: &SdkFrame) -> Option<SdkFrame>;

    fn release(&mut self);
}
