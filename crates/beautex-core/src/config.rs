use crate::error::ConfigError;

/// Credentials and context mode the engine is built with.
///
/// Immutable once the engine exists; [`crate::EngineHandle`] keeps its own copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub app_id: String,
    pub app_key: String,
    /// The engine renders into the caller's current GL context instead of creating its own.
    pub external_context: bool,
}

impl EngineConfig {
    pub fn from_parts(
        app_id: impl Into<String>,
        app_key: impl Into<String>,
        external_context: bool,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: app_key.into(),
            external_context,
        }
    }

    /// Checks that both credentials are non-empty after trimming whitespace.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let id_missing = self.app_id.trim().is_empty();
        let key_missing = self.app_key.trim().is_empty();
        match (id_missing, key_missing) {
            (false, false) => Ok(()),
            (true, true) => Err(ConfigError::MissingCredentials),
            (true, false) => Err(ConfigError::MissingAppId),
            (false, true) => Err(ConfigError::MissingAppKey),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_key: String::new(),
            external_context: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum SdkLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<tracing::Level> for SdkLogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Self::Trace,
            tracing::Level::DEBUG => Self::Debug,
            tracing::Level::INFO => Self::Info,
            tracing::Level::WARN => Self::Warn,
            _ => Self::Error,
        }
    }
}

/// Diagnostics side channel of the engine, set once before it is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    pub level: SdkLogLevel,
    pub console_enabled: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: SdkLogLevel::Info,
            console_enabled: true,
        }
    }
}
