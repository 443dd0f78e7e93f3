use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{EngineOpenError, ProcessError};
use crate::frame::ImageFrame;
use crate::params::{EffectCategories, EffectCategory, ParamKey, ParamSnapshot, clamp_param};
use crate::sdk::{BeautySdk, SdkEngine};

/// Owner of the single live engine instance.
///
/// Tracks what has been pushed to the engine so that repeated toggles and unchanged parameter
/// values never reach it twice. The engine is released exactly once, by [`Self::release`] or on
/// drop.
pub struct EngineHandle<E: SdkEngine> {
    engine: Option<E>,
    categories: EffectCategories,
    params: BTreeMap<ParamKey, f32>,
    applied_generation: Option<u64>,
}

impl<E: SdkEngine> EngineHandle<E> {
    /// Validates `config` and builds the engine. Nothing is constructed when validation fails.
    pub fn open<S>(sdk: &S, config: &EngineConfig) -> Result<Self, EngineOpenError>
    where
        S: BeautySdk<Engine = E> + ?Sized,
    {
        config.validate()?;
        let engine = sdk.create_engine(config)?;
        info!(
            external_context = config.external_context,
            "beauty engine constructed"
        );
        Ok(Self {
            engine: Some(engine),
            categories: EffectCategories::empty(),
            params: BTreeMap::new(),
            applied_generation: None,
        })
    }

    pub fn is_released(&self) -> bool {
        self.engine.is_none()
    }

    pub fn enabled_categories(&self) -> EffectCategories {
        self.categories
    }

    /// Current value of `key`; `0.0` until it is set.
    pub fn parameter(&self, key: ParamKey) -> f32 {
        self.params.get(&key).copied().unwrap_or(0.0)
    }

    pub fn enable_effect_category(&mut self, category: EffectCategory, enabled: bool) {
        let flag = EffectCategories::from(category);
        if self.categories.contains(flag) == enabled {
            return;
        }
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        engine.enable_beauty_type(category, enabled);
        self.categories.set(flag, enabled);
        debug!(category = category.name(), enabled, "effect category toggled");
    }

    /// Stores `value` (clamped to `[0, 1]`) for `key`. Applies from the next `process` call.
    pub fn set_parameter(&mut self, key: ParamKey, value: f32) {
        let value = clamp_param(value);
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        engine.set_beauty_param(key, value);
        self.params.insert(key, value);
        debug!(?key, value, "beauty parameter set");
    }

    /// Forwards UI-published values when they changed since the last call.
    pub fn apply_controls(&mut self, snapshot: ParamSnapshot) {
        if self.applied_generation == Some(snapshot.generation) {
            return;
        }
        for (key, value) in [
            (ParamKey::SMOOTHING, snapshot.smoothing),
            (ParamKey::WHITENING, snapshot.whitening),
        ] {
            if self.params.get(&key) != Some(&value) {
                self.set_parameter(key, value);
            }
        }
        self.applied_generation = Some(snapshot.generation);
    }

    /// Runs the engine over `input` and takes ownership of the result.
    pub fn process<'s, S>(
        &mut self,
        input: &ImageFrame<'s, S>,
    ) -> Result<ImageFrame<'s, S>, ProcessError>
    where
        S: BeautySdk<Engine = E> + ?Sized,
    {
        let engine = self.engine.as_mut().ok_or(ProcessError::Released)?;
        let output = engine
            .process_image(input.raw())
            .ok_or(ProcessError::NullOutput)?;
        Ok(ImageFrame::from_raw(input.sdk(), output))
    }

    /// Frees the engine. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.release();
            info!("beauty engine released");
        }
    }
}

impl<E: SdkEngine> Drop for EngineHandle<E> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<E: SdkEngine> std::fmt::Debug for EngineHandle<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("released", &self.is_released())
            .field("categories", &self.categories)
            .field("params", &self.params)
            .finish()
    }
}
