use std::{thread, time::Duration};

use anyhow::{Context, Result};
use beautex_core::{
    BeautyFrameProcessor, EngineConfig, FrameStats, FrameStatus, LogConfig, ParamChannel,
    TextureFrame, TextureRenderer, slider_value,
    sim::{FaultPlan, SimSdk},
};
use tracing::{info, warn};

use crate::{
    args::Args,
    ui::{SliderEvent, SliderPanel, slider_script},
};

type Renderer = TextureRenderer<BeautyFrameProcessor<SimSdk>>;

pub struct App {
    sdk: SimSdk,
    renderer: Renderer,
    sliders: SliderPanel,
    frames: u64,
    frame_interval: Duration,
}

impl App {
    pub fn new(args: Args) -> Result<Self> {
        let sdk = SimSdk::with_faults(FaultPlan {
            fail_create_every: args.fail_create_every,
            null_output_every: args.null_output_every,
            empty_output_every: args.empty_output_every,
            ..FaultPlan::default()
        });

        // Stand-in for the camera texture the surface renders every frame.
        let source_texture = sdk.create_texture(args.width, args.height);
        let source = TextureFrame::new(source_texture, args.width, args.height);

        let controls =
            ParamChannel::new(slider_value(args.smoothing), slider_value(args.whitening));
        let config = EngineConfig::from_parts(args.app_id, args.app_key, args.external_context);
        let processor = BeautyFrameProcessor::new(sdk.clone(), config, controls.clone())
            .with_log_config(LogConfig {
                level: args.log_level.into(),
                console_enabled: args.sdk_console_log,
            });

        let sliders = SliderPanel::spawn(
            controls,
            slider_script(args.smoothing, args.whitening),
            Duration::from_millis(args.slider_interval_ms),
        );

        info!(
            texture = %source_texture,
            width = args.width,
            height = args.height,
            "renderer ready"
        );

        Ok(Self {
            sdk,
            renderer: TextureRenderer::new(source, processor),
            sliders,
            frames: args.frames,
            frame_interval: Duration::from_millis(args.frame_interval_ms),
        })
    }

    pub fn run(&mut self) -> Result<()> {
        let mut last_status = None;
        for frame in 0..self.frames {
            for event in self.sliders.drain() {
                match event {
                    SliderEvent::Smoothing(progress) => info!(progress, "smoothing slider moved"),
                    SliderEvent::Whitening(progress) => info!(progress, "whitening slider moved"),
                }
            }

            let Some(outcome) = self.renderer.draw_frame() else {
                break;
            };
            if last_status != Some(outcome.status) {
                info!(
                    frame,
                    status = %outcome.status,
                    shown = %outcome.displayed.texture_id,
                    "frame status changed"
                );
                last_status = Some(outcome.status);
            }

            if !self.frame_interval.is_zero() {
                thread::sleep(self.frame_interval);
            }
        }

        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        self.sliders.stop().context("Failed to stop slider panel")?;

        if let Some(texture) = self.renderer.cleanup() {
            self.sdk.delete_texture(texture);
        }
        self.renderer.processor_mut().release();

        report(&self.renderer.stats());
        let leaked = self.sdk.live_frames();
        if leaked > 0 {
            warn!(leaked, "engine frames were not released");
        }
        Ok(())
    }
}

fn report(stats: &FrameStats) {
    info!(
        frames = stats.frames,
        processed = stats.success,
        fallbacks = stats.fallbacks(),
        "session finished"
    );
    for status in FrameStatus::ALL {
        let count = stats.count(status);
        if !status.is_success() && count > 0 {
            warn!(%status, count, "frames shown unprocessed");
        }
    }
}
