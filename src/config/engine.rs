//! Engine thresholds

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::detection::DetectionRules;
use crate::domain::selection::SelectionPolicy;

/// Tunable thresholds for detection and selection.
///
/// - `DIGITAL_TWIN__ENGINE__DETECTION__MIN_EVIDENCE=5`
/// - `DIGITAL_TWIN__ENGINE__SELECTION__DEFAULT_LIMIT=20`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub detection: DetectionRules,

    #[serde(default)]
    pub selection: SelectionPolicy,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.detection.validate()?;
        self.selection.validate()?;
        Ok(())
    }
}
