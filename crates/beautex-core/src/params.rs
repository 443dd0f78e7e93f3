use std::sync::{
    Arc,
    atomic::{AtomicU32, AtomicU64, Ordering},
};

use bitflags::bitflags;

/// Default smoothing applied when the slider has not been touched yet.
pub const DEFAULT_SMOOTHING: f32 = 0.2;
/// Default whitening applied when the slider has not been touched yet.
pub const DEFAULT_WHITENING: f32 = 0.0;

/// Effect families the engine can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectCategory {
    Basic,
    Reshape,
    Makeup,
    VirtualBackground,
}

impl EffectCategory {
    pub const ALL: [EffectCategory; 4] = [
        EffectCategory::Basic,
        EffectCategory::Reshape,
        EffectCategory::Makeup,
        EffectCategory::VirtualBackground,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EffectCategory::Basic => "BASIC",
            EffectCategory::Reshape => "RESHAPE",
            EffectCategory::Makeup => "MAKEUP",
            EffectCategory::VirtualBackground => "VIRTUAL_BACKGROUND",
        }
    }
}

bitflags! {
    /// Set of enabled [`EffectCategory`] values.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EffectCategories: u8 {
        const BASIC = 0b0000_0001;
        const RESHAPE = 0b0000_0010;
        const MAKEUP = 0b0000_0100;
        const VIRTUAL_BACKGROUND = 0b0000_1000;
    }
}

impl From<EffectCategory> for EffectCategories {
    fn from(category: EffectCategory) -> Self {
        match category {
            EffectCategory::Basic => EffectCategories::BASIC,
            EffectCategory::Reshape => EffectCategories::RESHAPE,
            EffectCategory::Makeup => EffectCategories::MAKEUP,
            EffectCategory::VirtualBackground => EffectCategories::VIRTUAL_BACKGROUND,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BasicParam {
    Smoothing,
    Sharpening,
    Whitening,
    Rosiness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReshapeParam {
    FaceThin,
    FaceVShape,
    FaceNarrow,
    FaceShort,
    Cheekbone,
    Jawbone,
    Chin,
    NoseSlim,
    EyeSize,
    EyeDistance,
}

/// Key of one engine parameter. Every value lives in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamKey {
    Basic(BasicParam),
    Reshape(ReshapeParam),
}

impl ParamKey {
    pub const SMOOTHING: ParamKey = ParamKey::Basic(BasicParam::Smoothing);
    pub const WHITENING: ParamKey = ParamKey::Basic(BasicParam::Whitening);

    pub fn category(self) -> EffectCategory {
        match self {
            ParamKey::Basic(_) => EffectCategory::Basic,
            ParamKey::Reshape(_) => EffectCategory::Reshape,
        }
    }
}

impl From<BasicParam> for ParamKey {
    fn from(value: BasicParam) -> Self {
        ParamKey::Basic(value)
    }
}

impl From<ReshapeParam> for ParamKey {
    fn from(value: ReshapeParam) -> Self {
        ParamKey::Reshape(value)
    }
}

/// Clamps a parameter into `[0, 1]`; NaN becomes `0`.
#[inline]
pub fn clamp_param(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Converts slider progress (`0..=100`) into a parameter value.
#[inline]
pub fn slider_value(progress: u32) -> f32 {
    progress.min(100) as f32 / 100.0
}

/// UI-facing parameter surface.
pub trait BeautyControls: Send + Sync {
    fn set_smoothing(&self, value: f32);
    fn set_whitening(&self, value: f32);
}

/// Values published by the UI, read by the frame thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    pub smoothing: f32,
    pub whitening: f32,
    pub generation: u64,
}

struct ParamCells {
    smoothing: AtomicU32,
    whitening: AtomicU32,
    generation: AtomicU64,
}

/// Lock-free hand-off of the two UI-driven parameters.
///
/// Writers store the value and then bump the generation; the frame thread compares the
/// generation before each `process` call, so every write that completed before that point is
/// seen by the frame.
#[derive(Clone)]
pub struct ParamChannel {
    cells: Arc<ParamCells>,
}

impl ParamChannel {
    pub fn new(smoothing: f32, whitening: f32) -> Self {
        Self {
            cells: Arc::new(ParamCells {
                smoothing: AtomicU32::new(clamp_param(smoothing).to_bits()),
                whitening: AtomicU32::new(clamp_param(whitening).to_bits()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn smoothing(&self) -> f32 {
        f32::from_bits(self.cells.smoothing.load(Ordering::Acquire))
    }

    pub fn whitening(&self) -> f32 {
        f32::from_bits(self.cells.whitening.load(Ordering::Acquire))
    }

    pub fn generation(&self) -> u64 {
        self.cells.generation.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> ParamSnapshot {
        let generation = self.generation();
        ParamSnapshot {
            smoothing: self.smoothing(),
            whitening: self.whitening(),
            generation,
        }
    }

    fn store(&self, cell: &AtomicU32, value: f32) {
        cell.store(clamp_param(value).to_bits(), Ordering::Release);
        self.cells.generation.fetch_add(1, Ordering::AcqRel);
    }
}

impl Default for ParamChannel {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING, DEFAULT_WHITENING)
    }
}

impl BeautyControls for ParamChannel {
    fn set_smoothing(&self, value: f32) {
        self.store(&self.cells.smoothing, value);
    }

    fn set_whitening(&self, value: f32) {
        self.store(&self.cells.whitening, value);
    }
}

impl std::fmt::Debug for ParamChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamChannel")
            .field("smoothing", &self.smoothing())
            .field("whitening", &self.whitening())
            .field("generation", &self.generation())
            .finish()
    }
}
