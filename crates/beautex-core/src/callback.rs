//! Per-frame entry point called by the renderer.

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::adapter;
use crate::config::{EngineConfig, LogConfig};
use crate::error::{ConfigError, FrameError, ProcessError};
use crate::frame::TextureFrame;
use crate::handle::EngineHandle;
use crate::params::{EffectCategories, EffectCategory, ParamChannel};
use crate::sdk::BeautySdk;

/// Result of one frame, returned to the renderer as an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum FrameStatus {
    Success = 0,
    CreateFrameFailed = -1,
    ProcessFailed = -2,
    GetBufferFailed = -3,
    ConfigInvalid = -4,
}

impl FrameStatus {
    pub const ALL: [FrameStatus; 5] = [
        FrameStatus::Success,
        FrameStatus::CreateFrameFailed,
        FrameStatus::ProcessFailed,
        FrameStatus::GetBufferFailed,
        FrameStatus::ConfigInvalid,
    ];

    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.code() == code)
    }

    #[inline]
    pub fn is_success(self) -> bool {
        self == FrameStatus::Success
    }
}

impl fmt::Display for FrameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameStatus::Success => "SUCCESS",
            FrameStatus::CreateFrameFailed => "CREATE_FRAME_FAILED",
            FrameStatus::ProcessFailed => "PROCESS_FAILED",
            FrameStatus::GetBufferFailed => "GET_BUFFER_FAILED",
            FrameStatus::ConfigInvalid => "CONFIG_INVALID",
        };
        write!(f, "{name}({})", self.code())
    }
}

/// Callback the renderer invokes once per draw cycle.
///
/// `dst` must only be written when [`FrameStatus::Success`] is returned.
pub trait ProcessVideoFrame {
    fn on_process_video_frame(
        &mut self,
        src: &TextureFrame,
        dst: &mut TextureFrame,
    ) -> FrameStatus;
}

impl<F> ProcessVideoFrame for F
where
    F: FnMut(&TextureFrame, &mut TextureFrame) -> FrameStatus,
{
    fn on_process_video_frame(
        &mut self,
        src: &TextureFrame,
        dst: &mut TextureFrame,
    ) -> FrameStatus {
        self(src, dst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackState {
    /// No frame has arrived yet.
    Uninitialized,
    /// Engine built. A frame in flight holds `&mut self`, so processing is never observed here.
    Ready,
    /// Terminal: the configuration was rejected.
    ConfigInvalid,
    /// Terminal: the engine was torn down.
    Released,
}

enum EngineSlot<H> {
    Uninitialized,
    Ready(H),
    ConfigInvalid(ConfigError),
    Released,
}

/// Everything needed to build the engine on the first frame.
#[derive(Debug, Clone)]
struct EngineSetup {
    config: EngineConfig,
    log_config: LogConfig,
    categories: EffectCategories,
    controls: ParamChannel,
}

/// Frame callback that runs every frame through the beauty engine.
///
/// The engine is created on the first frame and lives until [`Self::release`] (or drop). A
/// rejected configuration is terminal: every later frame returns
/// [`FrameStatus::ConfigInvalid`] without another construction attempt.
pub struct BeautyFrameProcessor<S: BeautySdk> {
    sdk: S,
    setup: EngineSetup,
    slot: EngineSlot<EngineHandle<S::Engine>>,
}

impl<S: BeautySdk> BeautyFrameProcessor<S> {
    pub fn new(sdk: S, config: EngineConfig, controls: ParamChannel) -> Self {
        Self {
            sdk,
            setup: EngineSetup {
                config,
                log_config: LogConfig::default(),
                categories: EffectCategories::BASIC | EffectCategories::RESHAPE,
                controls,
            },
            slot: EngineSlot::Uninitialized,
        }
    }

    pub fn with_log_config(mut self, log_config: LogConfig) -> Self {
        self.setup.log_config = log_config;
        self
    }

    /// Categories enabled when the engine is built. Defaults to `BASIC | RESHAPE`.
    pub fn with_categories(mut self, categories: EffectCategories) -> Self {
        self.setup.categories = categories;
        self
    }

    /// Channel the UI writes smoothing/whitening into.
    pub fn controls(&self) -> &ParamChannel {
        &self.setup.controls
    }

    pub fn engine(&self) -> Option<&EngineHandle<S::Engine>> {
        match &self.slot {
            EngineSlot::Ready(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn state(&self) -> CallbackState {
        match &self.slot {
            EngineSlot::Uninitialized => CallbackState::Uninitialized,
            EngineSlot::Ready(_) => CallbackState::Ready,
            EngineSlot::ConfigInvalid(_) => CallbackState::ConfigInvalid,
            EngineSlot::Released => CallbackState::Released,
        }
    }

    /// Tears the engine down. Later frames fail with [`FrameStatus::ProcessFailed`].
    pub fn release(&mut self) {
        if let EngineSlot::Ready(mut handle) =
            std::mem::replace(&mut self.slot, EngineSlot::Released)
        {
            handle.release();
        }
    }

    fn run_frame(&mut self, src: &TextureFrame) -> Result<TextureFrame, FrameError> {
        let handle = ensure_engine(&self.sdk, &mut self.slot, &self.setup)?;

        let input = adapter::wrap(&self.sdk, src)?;
        handle.apply_controls(self.setup.controls.snapshot());

        let output = handle.process(&input);

        // `output` is dropped before `input`; both go back to the engine on every path.
        let output = output?;
        let texture = adapter::unwrap(&output)?;
        Ok(texture)
    }
}

fn ensure_engine<'a, S: BeautySdk>(
    sdk: &S,
    slot: &'a mut EngineSlot<EngineHandle<S::Engine>>,
    setup: &EngineSetup,
) -> Result<&'a mut EngineHandle<S::Engine>, FrameError> {
    if let EngineSlot::Uninitialized = slot {
        *slot = match open_engine(sdk, setup) {
            Ok(handle) => EngineSlot::Ready(handle),
            Err(err) => {
                warn!("beauty engine disabled: {err}");
                EngineSlot::ConfigInvalid(err)
            }
        };
    }
    match slot {
        EngineSlot::Ready(handle) => Ok(handle),
        EngineSlot::ConfigInvalid(err) => Err(FrameError::Config(err.clone())),
        EngineSlot::Released | EngineSlot::Uninitialized => Err(ProcessError::Released.into()),
    }
}

fn open_engine<S: BeautySdk>(
    sdk: &S,
    setup: &EngineSetup,
) -> Result<EngineHandle<S::Engine>, ConfigError> {
    setup.config.validate()?;
    sdk.set_log_config(&setup.log_config);

    let mut handle = EngineHandle::open(sdk, &setup.config)?;
    for category in EffectCategory::ALL {
        if setup.categories.contains(category.into()) {
            handle.enable_effect_category(category, true);
        }
    }

    let initial = setup.controls.snapshot();
    handle.apply_controls(initial);
    info!(
        smoothing = initial.smoothing,
        whitening = initial.whitening,
        "beauty engine initialized"
    );
    Ok(handle)
}

impl<S: BeautySdk> ProcessVideoFrame for BeautyFrameProcessor<S> {
    fn on_process_video_frame(
        &mut self,
        src: &TextureFrame,
        dst: &mut TextureFrame,
    ) -> FrameStatus {
        match self.run_frame(src) {
            Ok(texture) => {
                *dst = texture;
                FrameStatus::Success
            }
            Err(err) => {
                let status = err.status();
                if status == FrameStatus::ConfigInvalid {
                    debug!(%status, "frame skipped: {err}");
                } else {
                    error!(%status, source = %src.texture_id, "frame dropped: {err}");
                }
                status
            }
        }
    }
}

impl<S: BeautySdk + fmt::Debug> fmt::Debug for BeautyFrameProcessor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeautyFrameProcessor")
            .field("sdk", &self.sdk)
            .field("state", &self.state())
            .field("controls", &self.setup.controls)
            .finish()
    }
}
