use clap::Parser;
use tracing::Level;

/// Beautex external-texture demo
///
/// Feeds a synthetic camera texture through the beauty engine once per draw cycle while a
/// scripted slider panel moves the smoothing and whitening controls.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Engine application id
    #[arg(long, env = "BEAUTEX_APP_ID", default_value = "")]
    pub app_id: String,

    /// Engine application key
    #[arg(long, env = "BEAUTEX_APP_KEY", default_value = "", hide_env_values = true)]
    pub app_key: String,

    /// Render into the caller's GL context. Disable with `--external-context=false`.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub external_context: bool,

    /// Number of draw cycles to run
    #[arg(short, long, default_value = "120")]
    pub frames: u64,

    /// Source texture width in pixels
    #[arg(long, default_value = "640")]
    pub width: u32,

    /// Source texture height in pixels
    #[arg(long, default_value = "480")]
    pub height: u32,

    /// Delay between draw cycles
    #[arg(long, default_value = "16")]
    pub frame_interval_ms: u64,

    /// Initial smoothing slider position (0-100)
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u32).range(0..=100))]
    pub smoothing: u32,

    /// Initial whitening slider position (0-100)
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u32).range(0..=100))]
    pub whitening: u32,

    /// Delay between scripted slider moves
    #[arg(long, default_value = "50")]
    pub slider_interval_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: Level,

    /// Let the engine write its own log to the console
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sdk_console_log: bool,

    /// Fail every n-th frame creation
    #[arg(long)]
    pub fail_create_every: Option<u64>,

    /// Make every n-th process call return no frame
    #[arg(long)]
    pub null_output_every: Option<u64>,

    /// Make every n-th process call return a frame without texture
    #[arg(long)]
    pub empty_output_every: Option<u64>,
}
