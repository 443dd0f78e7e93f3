//! In-memory beauty engine.
//!
//! Behaves like the real SDK at the protocol level (frame creation, ownership, engine
//! construction and release) without touching a GPU. Calls can be recorded for inspection
//! ([`SimSdk::recording`]), and a [`FaultPlan`] can make individual calls fail.

mod faults;
mod textures;

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;

use crate::config::{EngineConfig, LogConfig};
use crate::error::SdkError;
use crate::frame::{BYTES_PER_PIXEL_RGBA, FrameId, FrameType, SdkFrame, TextureId};
use crate::params::{EffectCategories, EffectCategory, ParamKey};
use crate::sdk::{BeautySdk, SdkEngine};

pub use faults::FaultPlan;
use textures::TextureRegistry;

/// One recorded call into the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SdkCall {
    SetLogConfig(LogConfig),
    CreateEngine { external_context: bool },
    EnableBeautyType(EffectCategory, bool),
    SetParam(ParamKey, f32),
    CreateFrame(FrameId),
    Process {
        input: FrameId,
        categories: EffectCategories,
        smoothing: f32,
        whitening: f32,
    },
    ReleaseFrame(FrameId),
    ReleaseEngine,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimCounters {
    pub engines_created: u64,
    pub engines_released: u64,
    pub frames_created: u64,
    pub frames_released: u64,
    /// Releases of frames that were not live (already released or never created).
    pub bad_releases: u64,
    pub create_attempts: u64,
    pub process_calls: u64,
}

#[derive(Debug)]
struct SimState {
    textures: TextureRegistry,
    live: HashMap<FrameId, SdkFrame>,
    next_frame: u64,
    counters: SimCounters,
    recording: bool,
    calls: Vec<SdkCall>,
}

impl SimState {
    fn record(&mut self, call: SdkCall) {
        if self.recording {
            self.calls.push(call);
        }
    }

    fn new_frame(
        &mut self,
        texture_id: TextureId,
        width: u32,
        height: u32,
        stride: u32,
    ) -> SdkFrame {
        self.next_frame += 1;
        let frame = SdkFrame {
            id: FrameId(self.next_frame),
            texture_id,
            width,
            height,
            stride,
            frame_type: FrameType::Image,
        };
        self.live.insert(frame.id, frame);
        self.counters.frames_created += 1;
        self.record(SdkCall::CreateFrame(frame.id));
        frame
    }
}

/// Software implementation of [`BeautySdk`]. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SimSdk {
    state: Arc<Mutex<SimState>>,
    faults: Arc<FaultPlan>,
    log_config: Arc<ArcSwapOption<LogConfig>>,
}

impl SimSdk {
    pub fn new() -> Self {
        Self::with_faults(FaultPlan::none())
    }

    pub fn with_faults(faults: FaultPlan) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                textures: TextureRegistry::new(),
                live: HashMap::new(),
                next_frame: 0,
                counters: SimCounters::default(),
                recording: false,
                calls: Vec::new(),
            })),
            faults: Arc::new(faults),
            log_config: Arc::new(ArcSwapOption::const_empty()),
        }
    }

    /// Turns on the call log read by [`Self::calls`]. Off by default, so long runs keep a
    /// bounded footprint.
    pub fn recording(self) -> Self {
        self.state.lock().recording = true;
        self
    }

    /// Allocates a texture, like `glGenTextures` + `glTexImage2D`.
    pub fn create_texture(&self, width: u32, height: u32) -> TextureId {
        self.state.lock().textures.create(width, height)
    }

    /// Makes `id` a valid texture name of the given size.
    pub fn bind_texture(&self, id: TextureId, width: u32, height: u32) {
        self.state.lock().textures.ensure(id, width, height);
    }

    pub fn delete_texture(&self, id: TextureId) -> bool {
        self.state.lock().textures.delete(id)
    }

    pub fn texture_size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.state.lock().textures.size(id)
    }

    pub fn log_config(&self) -> Option<LogConfig> {
        self.log_config.load().as_deref().copied()
    }

    pub fn counters(&self) -> SimCounters {
        self.state.lock().counters
    }

    /// Calls recorded since [`Self::recording`] was enabled.
    pub fn calls(&self) -> Vec<SdkCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn engines_created(&self) -> u64 {
        self.counters().engines_created
    }

    pub fn engines_released(&self) -> u64 {
        self.counters().engines_released
    }

    pub fn frames_created(&self) -> u64 {
        self.counters().frames_created
    }

    pub fn frames_released(&self) -> u64 {
        self.counters().frames_released
    }

    pub fn bad_releases(&self) -> u64 {
        self.counters().bad_releases
    }

    /// Frames created and not yet released.
    pub fn live_frames(&self) -> usize {
        self.state.lock().live.len()
    }
}

impl Default for SimSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SimSdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimSdk")
            .field("counters", &self.counters())
            .field("faults", &self.faults)
            .finish()
    }
}

impl BeautySdk for SimSdk {
    type Engine = SimEngine;

    fn set_log_config(&self, config: &LogConfig) {
        self.log_config.store(Some(Arc::new(*config)));
        self.state.lock().record(SdkCall::SetLogConfig(*config));
    }

    fn create_engine(&self, config: &EngineConfig) -> Result<SimEngine, SdkError> {
        if let Some(err) = &self.faults.reject_engine {
            return Err(err.clone());
        }
        let mut state = self.state.lock();
        state.counters.engines_created += 1;
        state.record(SdkCall::CreateEngine {
            external_context: config.external_context,
        });
        drop(state);

        Ok(SimEngine {
            state: Arc::clone(&self.state),
            faults: Arc::clone(&self.faults),
            categories: EffectCategories::empty(),
            params: HashMap::new(),
            output: None,
            released: false,
        })
    }

    fn create_frame_with_texture(
        &self,
        texture_id: TextureId,
        width: u32,
        height: u32,
        stride: u32,
    ) -> Option<SdkFrame> {
        let mut state = self.state.lock();
        state.counters.create_attempts += 1;
        if FaultPlan::hits(self.faults.fail_create_every, state.counters.create_attempts) {
            return None;
        }
        if width == 0 || height == 0 || stride < width.saturating_mul(BYTES_PER_PIXEL_RGBA) {
            return None;
        }
        state.textures.size(texture_id)?;
        Some(state.new_frame(texture_id, width, height, stride))
    }

    fn release_frame(&self, frame: SdkFrame) {
        let mut state = self.state.lock();
        if state.live.remove(&frame.id).is_some() {
            state.counters.frames_released += 1;
        } else {
            state.counters.bad_releases += 1;
        }
        state.record(SdkCall::ReleaseFrame(frame.id));
    }
}

/// Engine instance created by [`SimSdk`].
pub struct SimEngine {
    state: Arc<Mutex<SimState>>,
    faults: Arc<FaultPlan>,
    categories: EffectCategories,
    params: HashMap<ParamKey, f32>,
    /// Render target owned by the engine, reused across frames of the same size.
    output: Option<(TextureId, u32, u32)>,
    released: bool,
}

impl SimEngine {
    fn param(&self, key: ParamKey) -> Option<f32> {
        self.params.get(&key).copied()
    }

    fn output_texture(&mut self, state: &mut SimState, width: u32, height: u32) -> TextureId {
        if let Some(id) = self.faults.output_texture {
            state.textures.ensure(id, width, height);
            return id;
        }
        match self.output {
            Some((id, w, h)) if w == width && h == height => id,
            previous => {
                if let Some((old, _, _)) = previous {
                    state.textures.delete(old);
                }
                let id = state.textures.create(width, height);
                self.output = Some((id, width, height));
                id
            }
        }
    }
}

impl SdkEngine for SimEngine {
    fn enable_beauty_type(&mut self, category: EffectCategory, enabled: bool) {
        if self.released {
            return;
        }
        self.categories.set(category.into(), enabled);
        self.state
            .lock()
            .record(SdkCall::EnableBeautyType(category, enabled));
    }

    fn set_beauty_param(&mut self, key: ParamKey, value: f32) {
        if self.released {
            return;
        }
        self.params.insert(key, value);
        self.state.lock().record(SdkCall::SetParam(key, value));
    }

    fn process_image(&mut self, input: &SdkFrame) -> Option<SdkFrame> {
        if self.released {
            return None;
        }
        let state = Arc::clone(&self.state);
        let mut state = state.lock();
        state.counters.process_calls += 1;
        state.record(SdkCall::Process {
            input: input.id,
            categories: self.categories,
            smoothing: self.param(ParamKey::SMOOTHING).unwrap_or(0.0),
            whitening: self.param(ParamKey::WHITENING).unwrap_or(0.0),
        });

        let count = state.counters.process_calls;
        if FaultPlan::hits(self.faults.null_output_every, count) {
            return None;
        }
        // Frames the engine does not know about (or released ones) are rejected.
        if !state.live.contains_key(&input.id) {
            return None;
        }
        let texture_id = if FaultPlan::hits(self.faults.empty_output_every, count) {
            TextureId::NONE
        } else {
            self.output_texture(&mut state, input.width, input.height)
        };
        let stride = input.width.saturating_mul(BYTES_PER_PIXEL_RGBA);
        Some(state.new_frame(texture_id, input.width, input.height, stride))
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let mut state = self.state.lock();
        if let Some((id, _, _)) = self.output.take() {
            state.textures.delete(id);
        }
        state.counters.engines_released += 1;
        state.record(SdkCall::ReleaseEngine);
    }
}

impl Drop for SimEngine {
    fn drop(&mut self) {
        // An engine dropped without release still frees its render target.
        if !self.released {
            if let Some((id, _, _)) = self.output.take() {
                self.state.lock().textures.delete(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig::from_parts("id", "key", true)
    }

    #[test]
    fn frame_lifecycle_is_accounted() {
        let sdk = SimSdk::new();
        let tex = sdk.create_texture(4, 2);
        let frame = sdk
            .create_frame_with_texture(tex, 4, 2, 16)
            .expect("bound texture");
        assert_eq!(sdk.live_frames(), 1);

        sdk.release_frame(frame);
        sdk.release_frame(frame);
        assert_eq!(sdk.live_frames(), 0);
        assert_eq!(sdk.frames_released(), 1);
        assert_eq!(sdk.bad_releases(), 1);
    }

    #[test]
    fn unknown_texture_or_short_stride_is_rejected() {
        let sdk = SimSdk::new();
        assert!(sdk.create_frame_with_texture(TextureId(5), 4, 4, 16).is_none());
        let tex = sdk.create_texture(4, 4);
        assert!(sdk.create_frame_with_texture(tex, 4, 4, 8).is_none());
        assert_eq!(sdk.frames_created(), 0);
    }

    #[test]
    fn engine_reuses_render_target_until_size_changes() {
        let sdk = SimSdk::new();
        let mut engine = sdk.create_engine(&config()).expect("engine");
        let small = sdk.create_texture(2, 2);
        let large = sdk.create_texture(4, 4);

        let a = sdk.create_frame_with_texture(small, 2, 2, 8).expect("a");
        let out1 = engine.process_image(&a).expect("out1");
        let out2 = engine.process_image(&a).expect("out2");
        assert_eq!(out1.texture_id, out2.texture_id);
        assert_ne!(out1.texture_id, small);

        let b = sdk.create_frame_with_texture(large, 4, 4, 16).expect("b");
        let out3 = engine.process_image(&b).expect("out3");
        assert_ne!(out3.texture_id, out1.texture_id);
        assert_eq!(sdk.texture_size(out1.texture_id), None);
        assert_eq!(sdk.texture_size(out3.texture_id), Some((4, 4)));

        for frame in [a, b, out1, out2, out3] {
            sdk.release_frame(frame);
        }
        engine.release();
        assert_eq!(sdk.texture_size(out3.texture_id), None);
        assert_eq!(sdk.live_frames(), 0);
    }

    #[test]
    fn released_input_is_rejected() {
        let sdk = SimSdk::new();
        let mut engine = sdk.create_engine(&config()).expect("engine");
        let tex = sdk.create_texture(2, 2);
        let frame = sdk.create_frame_with_texture(tex, 2, 2, 8).expect("frame");
        sdk.release_frame(frame);
        assert!(engine.process_image(&frame).is_none());
    }

    #[test]
    fn fixed_output_texture_and_rejected_engine() {
        let sdk = SimSdk::with_faults(FaultPlan {
            output_texture: Some(TextureId(42)),
            ..FaultPlan::default()
        });
        let mut engine = sdk.create_engine(&config()).expect("engine");
        let tex = sdk.create_texture(640, 480);
        let input = sdk
            .create_frame_with_texture(tex, 640, 480, 2560)
            .expect("input");
        let out = engine.process_image(&input).expect("output");
        assert_eq!(out.texture_id, TextureId(42));
        assert_eq!((out.width, out.height), (640, 480));

        let rejecting = SimSdk::with_faults(FaultPlan {
            reject_engine: Some(SdkError::NoContext),
            ..FaultPlan::default()
        });
        assert_eq!(
            rejecting.create_engine(&config()).err(),
            Some(SdkError::NoContext)
        );
        assert_eq!(rejecting.engines_created(), 0);
    }

    #[test]
    fn call_log_is_opt_in() {
        let quiet = SimSdk::new();
        let mut engine = quiet.create_engine(&config()).expect("engine");
        engine.set_beauty_param(ParamKey::SMOOTHING, 0.5);
        engine.release();
        assert!(quiet.calls().is_empty());
        assert_eq!(quiet.engines_released(), 1);

        let recording = SimSdk::new().recording();
        let mut engine = recording.create_engine(&config()).expect("engine");
        engine.release();
        assert_eq!(
            recording.calls(),
            vec![
                SdkCall::CreateEngine {
                    external_context: true
                },
                SdkCall::ReleaseEngine
            ]
        );
        recording.clear_calls();
        assert!(recording.calls().is_empty());
    }

    #[test]
    fn log_config_is_stored() {
        let sdk = SimSdk::new();
        assert_eq!(sdk.log_config(), None);
        sdk.set_log_config(&LogConfig::default());
        assert_eq!(sdk.log_config(), Some(LogConfig::default()));
    }
}
