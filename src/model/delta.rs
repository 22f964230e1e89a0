//! Signal K delta rendering of a [`SensorUpdate`].
//!
//! This is the wire format the Wi-Fi bridge and the log speak:
//!
//! ```json
//! {"updates":[{"$source":"nmea2000.35","timestamp":"2017-01-01T10:00:00.000Z",
//!   "source":{"label":"nmea2000","pgn":127250,"src":"35"},
//!   "values":[{"path":"navigation.headingTrue","value":3.1416}]}]}
//! ```

use crate::model::update::SensorUpdate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub updates: Vec<DeltaUpdate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaUpdate {
    #[serde(rename = "$source")]
    pub source_ref: String,
    pub timestamp: String,
    pub source: DeltaSource,
    pub values: Vec<PathValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaSource {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pgn: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub src: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathValue {
    pub path: String,
    pub value: f64,
}

impl SensorUpdate {
    /// Build the Signal K delta for this update. Empty updates have no delta.
    pub fn to_delta(&self) -> Option<Delta> {
        if self.is_empty() {
            return None;
        }
        let source = self.source();
        let values = self
            .iter()
            .map(|a| PathValue {
                path: a.quantity.path().to_string(),
                value: a.value,
            })
            .collect();

        Some(Delta {
            updates: vec![DeltaUpdate {
                source_ref: source.label(),
                timestamp: self.timestamp().to_rfc3339(),
                source: DeltaSource {
                    label: source.input.label(),
                    pgn: source.bus.map(|b| b.pgn),
                    src: source.bus.map(|b| b.address.to_string()),
                },
                values,
            }],
        })
    }

    /// Compact JSON for the delta, or `None` for an empty update.
    pub fn to_delta_json(&self) -> Option<String> {
        self.to_delta()
            .and_then(|delta| serde_json::to_string(&delta).ok())
    }
}
