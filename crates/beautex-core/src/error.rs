use crate::callback::FrameStatus;
use crate::frame::TextureId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("appId and appKey must be configured")]
    MissingCredentials,
    #[error("appId must be configured")]
    MissingAppId,
    #[error("appKey must be configured")]
    MissingAppKey,
    #[error("engine rejected the configuration: {0}")]
    Rejected(SdkError),
}

/// Failures reported by the engine itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SdkError {
    #[error("license rejected: {reason}")]
    License { reason: String },
    #[error("no usable GL context")]
    NoContext,
    #[error("engine failure: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineOpenError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to construct engine: {0}")]
    Sdk(#[from] SdkError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreateFrameError {
    #[error("source frame has no texture")]
    NoTexture,
    #[error("invalid frame geometry {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },
    #[error("engine could not bind {texture_id} ({width}x{height}, stride {stride})")]
    Rejected {
        texture_id: TextureId,
        width: u32,
        height: u32,
        stride: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcessError {
    #[error("engine returned no output frame")]
    NullOutput,
    #[error("engine handle already released")]
    Released,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("output frame has no texture")]
    NoTexture,
}

/// Anything that can go wrong while processing one frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("engine configuration invalid: {0}")]
    Config(#[from] ConfigError),
    #[error("createWithTexture failed: {0}")]
    CreateFrame(#[from] CreateFrameError),
    #[error("processImage failed: {0}")]
    Process(#[from] ProcessError),
    #[error("getTexture failed: {0}")]
    Extract(#[from] ExtractError),
}

impl FrameError {
    pub fn status(&self) -> FrameStatus {
        match self {
            Self::Config(_) => FrameStatus::ConfigInvalid,
            Self::CreateFrame(_) => FrameStatus::CreateFrameFailed,
            Self::Process(_) => FrameStatus::ProcessFailed,
            Self::Extract(_) => FrameStatus::GetBufferFailed,
        }
    }
}

impl From<EngineOpenError> for ConfigError {
    fn from(value: EngineOpenError) -> Self {
        match value {
            EngineOpenError::Config(err) => err,
            EngineOpenError::Sdk(err) => ConfigError::Rejected(err),
        }
    }
}
