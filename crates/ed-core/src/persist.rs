//! Saving and loading drawings as JSON.
//!
//! A drawing is stored as an array of doodles, each with its class name and
//! a flat map of parameter name → scalar. Parameters are written in `Param`
//! order so the same drawing always produces the same bytes.
//!
//! ```json
//! [
//!   { "id": "Lens_3", "subclass": "Lens",
//!     "params": { "originX": 0.0, "originY": 0.0, "scaleX": 1.0, ... } }
//! ]
//! ```

use crate::config::DrawingConfig;
use crate::doodle::{Doodle, Squiggle};
use crate::drawing::Drawing;
use crate::error::{ConfigError, PersistError};
use crate::id::DoodleId;
use crate::param::{Param, ParamValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize)]
struct SavedDoodle {
    id: DoodleId,
    subclass: String,
    params: BTreeMap<Param, ParamValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    squiggles: Vec<Squiggle>,
}

/// Serialize every doodle, back to front.
pub fn save(drawing: &Drawing) -> Result<String, PersistError> {
    let saved: Vec<SavedDoodle> = drawing
        .doodles()
        .iter()
        .map(|d| SavedDoodle {
            id: d.id(),
            subclass: d.class_name().to_string(),
            params: d.base.values().clone(),
            squiggles: d.base.squiggles.clone(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&saved)?)
}

/// Rebuild a drawing from `save` output.
///
/// Values are type-coerced but neither clamped nor resolved, so a drawing
/// reloads exactly as it was saved. Unknown or mistyped parameters keep the
/// class default and are logged.
pub fn load(json: &str, config: DrawingConfig) -> Result<Drawing, PersistError> {
    let saved: Vec<SavedDoodle> = serde_json::from_str(json)?;
    let mut drawing = Drawing::new(config)?;
    let env = drawing.env();

    for entry in saved {
        let mut doodle = Doodle::from_class_name(&entry.subclass, &env)?;
        doodle.base.id = entry.id;
        for (param, raw) in &entry.params {
            match doodle.base.validator.coerce(*param, raw) {
                Ok(value) => doodle.base.set_unvalidated(*param, value),
                Err(e) => log::warn!("{}: ignoring saved {param}: {e}", entry.id),
            }
        }
        if !entry.squiggles.is_empty() {
            doodle.base.squiggles = entry.squiggles;
        }
        if doodle.base.squiggles.iter().any(|s| s.points.is_empty()) {
            return Err(ConfigError::InvalidConfig(format!(
                "{}: empty squiggle",
                entry.id
            ))
            .into());
        }
        doodle.refresh_ranges(&env);
        drawing.insert_doodle(doodle)?;
    }
    log::debug!("loaded {} doodles", drawing.doodles().len());
    Ok(drawing)
}
