// rust/engine/src/config.rs
#![forbid(unsafe_code)]

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::control::ActuatorConfig;
use crate::error::Result;
use crate::policy::ExpertConfig;

/**
 * All controller tunables in one document.
 *
 * Every field defaults to the calibrated value, so a JSON file only needs to
 * name what it overrides, e.g.
 *
 *   { "expert": { "hazard_jump_hold": 24, "terrain": { "big_gap_delay": 12 } } }
 */
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub expert: ExpertConfig,
    pub actuator: ActuatorConfig,
}

impl ControllerConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(ControllerConfig::from_json_str("{}").unwrap(), ControllerConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = ControllerConfig::from_json_str(
            r#"{ "expert": { "hazard_jump_hold": 24, "terrain": { "big_gap_delay": 12 } } }"#,
        )
        .unwrap();
        assert_eq!(cfg.expert.hazard_jump_hold, 24);
        assert_eq!(cfg.expert.terrain.big_gap_delay, 12);
        assert_eq!(cfg.expert.terrain.drop_delay, 50);
        assert_eq!(cfg.expert.attempt_cap, 8);
        assert_eq!(cfg.actuator.min_hold, 5);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(ControllerConfig::from_json_str("{ \"expert\": 3 }").is_err());
    }
}
