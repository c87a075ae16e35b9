use std::ops::RangeInclusive;

use chrono::NaiveDateTime;
use rand::Rng;
use tracing::debug;

use crate::entities::Reading;
use crate::error::DomainError;
use crate::utils::format_timestamp;

pub const USAGE_OFFSET_RANGE: RangeInclusive<i64> = -50..=200;
pub const PRESSURE_OFFSET_RANGE: RangeInclusive<f64> = -0.3..=0.2;

/// Emulates a fresh sensor sample: one uniformly chosen row gets perturbed usage and
/// pressure and is stamped with `now`. The caller's table is left untouched.
pub fn inject_live_reading<R: Rng + ?Sized>(
    readings: &[Reading],
    rng: &mut R,
    now: NaiveDateTime,
) -> Result<Vec<Reading>, DomainError> {
    if readings.is_empty() {
        return Err(DomainError::EmptyInput);
    }
    let row = rng.gen_range(0..readings.len());
    let usage_offset = rng.gen_range(USAGE_OFFSET_RANGE) as f64;
    let pressure_offset = rng.gen_range(PRESSURE_OFFSET_RANGE);

    let mut updated = readings.to_vec();
    let target = &mut updated[row];
    target.usage = target.usage.map(|usage| usage + usage_offset);
    target.pressure = target.pressure.map(|pressure| pressure + pressure_offset);
    target.timestamp = format_timestamp(&now);
    debug!(
        row,
        zone = %target.zone_id,
        usage_offset,
        pressure_offset,
        "injected live reading"
    );
    Ok(updated)
}
