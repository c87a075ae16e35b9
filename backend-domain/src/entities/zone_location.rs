// Zone location entity
// Map coordinates for zones that have a known position.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneLocation {
    pub zone_id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ZoneLocation {
    pub fn defaults() -> Vec<ZoneLocation> {
        vec![
            ZoneLocation {
                zone_id: "Z1".to_string(),
                latitude: 28.6139,
                longitude: 77.2090,
                label: Some("Delhi".to_string()),
            },
            ZoneLocation {
                zone_id: "Z2".to_string(),
                latitude: 19.0760,
                longitude: 72.8777,
                label: Some("Mumbai".to_string()),
            },
            ZoneLocation {
                zone_id: "Z3".to_string(),
                latitude: 12.9716,
                longitude: 77.5946,
                label: Some("Bangalore".to_string()),
            },
        ]
    }
}
