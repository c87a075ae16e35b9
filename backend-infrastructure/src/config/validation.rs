use std::collections::HashSet;

use anyhow::{anyhow, Result};

use backend_domain::ZoneLocation;

pub fn validate_contamination(value: f64) -> Result<()> {
    if !(value > 0.0 && value <= 0.5) {
        return Err(anyhow!("contamination must be in (0, 0.5], got {}", value));
    }
    Ok(())
}

pub fn validate_zones(zones: &[ZoneLocation]) -> Result<()> {
    let mut seen = HashSet::new();
    for zone in zones {
        let id = zone.zone_id.trim();
        if id.is_empty() {
            return Err(anyhow!("zone id is empty"));
        }
        if !seen.insert(id) {
            return Err(anyhow!("zone '{}' is configured twice", id));
        }
        if !(-90.0..=90.0).contains(&zone.latitude) {
            return Err(anyhow!("zone '{}' latitude {} out of range", id, zone.latitude));
        }
        if !(-180.0..=180.0).contains(&zone.longitude) {
            return Err(anyhow!("zone '{}' longitude {} out of range", id, zone.longitude));
        }
    }
    Ok(())
}
