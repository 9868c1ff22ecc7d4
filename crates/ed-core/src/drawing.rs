//! The doodle collection for one drawing.
//!
//! `Drawing` owns the doodles in back-to-front order and is the only place
//! that runs the full update sequence: validate → resolve dependents →
//! propagate links → rebuild transforms.

use crate::config::{DoodleEnv, DrawingConfig, Eye};
use crate::doodle::Doodle;
use crate::error::{ConfigError, EngineError};
use crate::id::DoodleId;
use crate::linked;
use crate::param::{Param, ParamValue};
use crate::resolve::{self, Resolution};
use crate::shapes::Shape;
use crate::transform::PlaneTransform;

#[derive(Debug, Clone)]
pub struct Drawing {
    config: DrawingConfig,
    doodles: Vec<Doodle>,
    plane: PlaneTransform,
}

impl Drawing {
    pub fn new(config: DrawingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let plane = PlaneTransform::new(&config);
        Ok(Self {
            config,
            doodles: Vec::new(),
            plane,
        })
    }

    pub fn config(&self) -> &DrawingConfig {
        &self.config
    }

    pub fn env(&self) -> DoodleEnv {
        self.config.env()
    }

    pub fn eye(&self) -> Eye {
        self.config.eye
    }

    /// Switch laterality and rebuild every transform.
    pub fn set_eye(&mut self, eye: Eye) {
        self.config.eye = eye;
        self.plane = PlaneTransform::new(&self.config);
        let env = self.env();
        for d in &mut self.doodles {
            d.rebuild(&env);
        }
    }

    pub fn plane_width(&self) -> f64 {
        self.config.plane_width
    }

    pub fn plane_height(&self) -> f64 {
        self.config.plane_height
    }

    pub fn plane(&self) -> &PlaneTransform {
        &self.plane
    }

    // ─── Collection ──────────────────────────────────────────────────────

    /// Create a doodle of `shape` with its defaults and add it on top.
    pub fn add_doodle(&mut self, shape: Shape) -> Result<DoodleId, ConfigError> {
        let doodle = Doodle::new(shape, &self.env())?;
        self.insert_doodle(doodle)
    }

    /// Add an existing doodle on top after checking its definition.
    /// A clashing id is replaced by the next free number of its class.
    pub fn insert_doodle(&mut self, mut doodle: Doodle) -> Result<DoodleId, ConfigError> {
        let env = self.env();
        resolve::check_definition(&doodle, &env)?;
        if self.index_of(doodle.id()).is_some() {
            let taken = self.doodles.iter().map(Doodle::id);
            doodle.base.id = DoodleId::next_free(doodle.class_name(), taken);
        }
        doodle.rebuild(&env);
        let id = doodle.id();
        log::debug!("added {id}");
        self.doodles.push(doodle);
        Ok(id)
    }

    pub fn remove_doodle(&mut self, id: DoodleId) -> Option<Doodle> {
        let idx = self.index_of(id)?;
        log::debug!("removed {id}");
        Some(self.doodles.remove(idx))
    }

    pub fn clear(&mut self) {
        self.doodles.clear();
    }

    pub fn doodles(&self) -> &[Doodle] {
        &self.doodles
    }

    pub fn index_of(&self, id: DoodleId) -> Option<usize> {
        self.doodles.iter().position(|d| d.id() == id)
    }

    pub fn doodle(&self, id: DoodleId) -> Option<&Doodle> {
        self.doodles.iter().find(|d| d.id() == id)
    }

    pub fn doodle_mut(&mut self, id: DoodleId) -> Option<&mut Doodle> {
        self.doodles.iter_mut().find(|d| d.id() == id)
    }

    // ─── Class queries ───────────────────────────────────────────────────

    pub fn first_doodle_of_class(&self, class: &str) -> Option<&Doodle> {
        self.doodles.iter().find(|d| d.class_name() == class)
    }

    pub fn last_doodle_of_class(&self, class: &str) -> Option<&Doodle> {
        self.doodles.iter().rev().find(|d| d.class_name() == class)
    }

    pub fn all_doodles_of_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Doodle> {
        self.doodles.iter().filter(move |d| d.class_name() == class)
    }

    pub fn number_of_doodles_of_class(&self, class: &str) -> usize {
        self.all_doodles_of_class(class).count()
    }

    pub fn has_doodle_of_class(&self, class: &str) -> bool {
        self.first_doodle_of_class(class).is_some()
    }

    // ─── Updates ─────────────────────────────────────────────────────────

    /// Programmatic parameter change with full resolution.
    pub fn set_parameter(
        &mut self,
        id: DoodleId,
        param: Param,
        value: impl Into<ParamValue>,
    ) -> Result<Resolution, EngineError> {
        let env = self.env();
        let idx = self.index_of(id).ok_or(EngineError::UnknownDoodle(id))?;
        let resolution = self.doodles[idx].set_parameter(param, value, &env)?;
        self.propagate_links(idx, &resolution);
        Ok(resolution)
    }

    /// Resolve dependents of parameters that were written directly during a
    /// gesture, then propagate links. Runs once per gesture end.
    pub fn finish_change(&mut self, id: DoodleId, touched: &[Param]) -> Result<Resolution, EngineError> {
        let env = self.env();
        let idx = self.index_of(id).ok_or(EngineError::UnknownDoodle(id))?;
        let mut resolution = Resolution::default();
        for &param in touched {
            let Some(value) = self.doodles[idx].base.value(param).cloned() else {
                continue;
            };
            let pass = resolve::on_parameter_changed(&mut self.doodles[idx], &env, param, value)?;
            resolution.merge(pass);
        }
        self.doodles[idx].rebuild(&env);
        self.propagate_links(idx, &resolution);
        Ok(resolution)
    }

    fn propagate_links(&mut self, idx: usize, resolution: &Resolution) {
        let env = self.env();
        for param in resolution.params() {
            for target in linked::propagate(&mut self.doodles, idx, param) {
                self.doodles[target].rebuild(&env);
            }
        }
    }

    /// Replace all doodles at once (undo/redo and loading).
    pub fn restore(&mut self, doodles: Vec<Doodle>) {
        self.doodles = doodles;
        let env = self.env();
        for d in &mut self.doodles {
            d.rebuild(&env);
        }
    }

    /// Descriptions of every doodle that has one, back to front.
    pub fn report(&self) -> Vec<String> {
        let env = self.env();
        self.doodles
            .iter()
            .map(|d| d.description(&env))
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Default for Drawing {
    fn default() -> Self {
        let config = DrawingConfig::default();
        let plane = PlaneTransform::new(&config);
        Self {
            config,
            doodles: Vec::new(),
            plane,
        }
    }
}
