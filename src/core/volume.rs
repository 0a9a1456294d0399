//! Volume-weighted x-axis mapping.
//!
//! Each category (or date) owns a slice of the axis proportional to its
//! volume. Positions between categories interpolate inside the owning slice,
//! so the mapping stays continuous and invertible as long as every slice has
//! a positive width.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::primitives::datetime_to_unix_seconds;
use crate::core::types::DataType;

/// Upper bound on placeholder days inserted by gap filling.
const MAX_FILLED_DAYS: usize = 100_000;

/// Precomputed slice of the axis owned by one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeEntry {
    /// Cumulative fraction at the end of this slice.
    pub value: f64,
    /// Fraction of the axis owned by this slice.
    pub width: f64,
    pub x1: f64,
    pub x2: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeHelper {
    x_values: Vec<f64>,
    volumes: Vec<f64>,
    x_data_min: f64,
    x_data_max: f64,
    entries: Vec<VolumeEntry>,
}

impl VolumeHelper {
    /// Builds the mapper from parallel volume and x-value arrays.
    ///
    /// Without x-values the categories are the ordinals `0..volumes.len()`.
    /// With x-values, entries are ordered by x and exact duplicates merge
    /// their volumes. Date-typed x-values (Unix seconds) are gap-filled day
    /// by day with zero-volume placeholders. Invalid or negative volumes
    /// count as zero.
    #[must_use]
    pub fn new(
        volumes: &[f64],
        x_values: Option<&[f64]>,
        x_data_min: Option<f64>,
        x_data_max: Option<f64>,
        x_data_type: DataType,
    ) -> Self {
        let (x_values, volumes): (Vec<f64>, Vec<f64>) = match x_values.filter(|xs| !xs.is_empty()) {
            Some(xs) => {
                let mut by_x: BTreeMap<OrderedFloat<f64>, f64> = BTreeMap::new();
                for (i, &x) in xs.iter().enumerate() {
                    if !x.is_finite() {
                        continue;
                    }
                    let volume = sanitize_volume(volumes.get(i).copied().unwrap_or(0.0));
                    *by_x.entry(OrderedFloat(x)).or_insert(0.0) += volume;
                }
                if x_data_type == DataType::Date {
                    fill_gaps(&mut by_x);
                }
                by_x.into_iter().map(|(x, v)| (x.0, v)).unzip()
            }
            None => (
                Vec::new(),
                volumes.iter().copied().map(sanitize_volume).collect(),
            ),
        };

        let x_data_min = x_data_min
            .filter(|v| v.is_finite())
            .or_else(|| x_values.first().copied())
            .unwrap_or(f64::NAN);
        let x_data_max = x_data_max
            .filter(|v| v.is_finite())
            .or_else(|| x_values.last().copied())
            .unwrap_or(f64::NAN);
        let entries = calc_entries(&volumes);

        Self {
            x_values,
            volumes,
            x_data_min,
            x_data_max,
            entries,
        }
    }

    /// Linear remap of `value` from `[old_min, old_max]` into `[new_min, new_max]`.
    ///
    /// Returns 0 for degenerate ranges.
    #[must_use]
    pub fn convert_to_range(
        value: f64,
        new_min: f64,
        new_max: f64,
        old_min: f64,
        old_max: f64,
    ) -> f64 {
        if new_min == new_max || old_min == old_max {
            return 0.0;
        }
        (value - old_min) * (new_max - new_min) / (old_max - old_min) + new_min
    }

    #[must_use]
    pub fn entries(&self) -> &[VolumeEntry] {
        &self.entries
    }

    /// Category x-values after ordering and gap filling (empty for ordinals).
    #[must_use]
    pub fn x_values(&self) -> &[f64] {
        &self.x_values
    }

    #[must_use]
    pub fn volumes(&self) -> &[f64] {
        &self.volumes
    }

    /// `false` when the total volume is zero and nothing can be placed.
    #[must_use]
    pub fn has_bars(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Maps `x` into the `[0, 1]` window spanned by `min` and `max`.
    ///
    /// A window collapsed onto one position maps every `x` to its centre.
    #[must_use]
    pub fn convert(&self, x: f64, min: f64, max: f64) -> Option<f64> {
        let value = self.fraction(x)?;
        let lo = self.fraction(min)?;
        let hi = self.fraction(max)?;
        let span = hi - lo;
        if !span.is_finite() {
            return None;
        }
        if span == 0.0 {
            return Some(0.5);
        }
        Some((value - lo) / span)
    }

    /// Inverse of [`VolumeHelper::convert`].
    #[must_use]
    pub fn convert_back(&self, value: f64, min: f64, max: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let lo = self.fraction(min)?;
        let hi = self.fraction(max)?;
        let fraction = lo + value * (hi - lo);

        let index = self
            .entries
            .iter()
            .position(|entry| entry.width > 0.0 && fraction < entry.x2)
            .or_else(|| self.entries.iter().rposition(|entry| entry.width > 0.0))?;
        let entry = self.entries[index];
        let position = index as f64 - 0.5 + (fraction - entry.x1) / entry.width;
        Some(self.position_to_x(position))
    }

    /// Fractional position of `x` along the whole axis.
    fn fraction(&self, x: f64) -> Option<f64> {
        let position = self.position(x)?;
        let last = self.entries.len().checked_sub(1)?;
        let index = position.round().clamp(0.0, last as f64) as usize;
        let entry = self.entries[index];
        Some(entry.x1 + (position - index as f64 + 0.5) * entry.width)
    }

    /// Ordinal position of `x`: exact match, then containing interval, then
    /// linear extrapolation over the data range.
    fn position(&self, x: f64) -> Option<f64> {
        if !x.is_finite() {
            return None;
        }
        let xs = &self.x_values;
        if xs.is_empty() {
            return Some(x);
        }

        let last = xs.len() - 1;
        match xs.binary_search_by(|probe| probe.total_cmp(&x)) {
            Ok(index) => Some(index as f64),
            Err(insert) if insert > 0 && insert <= last => {
                let i = insert - 1;
                Some(i as f64 + (x - xs[i]) / (xs[insert] - xs[i]))
            }
            Err(_) => Some(Self::convert_to_range(
                x,
                0.0,
                last as f64,
                self.x_data_min,
                self.x_data_max,
            )),
        }
    }

    fn position_to_x(&self, position: f64) -> f64 {
        let xs = &self.x_values;
        if xs.is_empty() {
            return position;
        }

        let last = xs.len() - 1;
        if last == 0 || position < 0.0 || position > last as f64 {
            return Self::convert_to_range(
                position,
                self.x_data_min,
                self.x_data_max,
                0.0,
                last as f64,
            );
        }
        let i = (position.floor() as usize).min(last - 1);
        xs[i] + (position - i as f64) * (xs[i + 1] - xs[i])
    }
}

fn sanitize_volume(volume: f64) -> f64 {
    if volume.is_finite() && volume > 0.0 {
        volume
    } else {
        0.0
    }
}

fn calc_entries(volumes: &[f64]) -> Vec<VolumeEntry> {
    let total: f64 = volumes.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        if !volumes.is_empty() {
            warn!(count = volumes.len(), "volume axis has zero total volume");
        }
        return Vec::new();
    }

    let mut cumulative = 0.0;
    volumes
        .iter()
        .map(|&volume| {
            let width = volume / total;
            let x1 = cumulative;
            cumulative += width;
            VolumeEntry {
                value: cumulative,
                width,
                x1,
                x2: cumulative,
            }
        })
        .collect()
}

/// Inserts zero-volume placeholders for every missing day between the first
/// and last date.
fn fill_gaps(by_x: &mut BTreeMap<OrderedFloat<f64>, f64>) {
    let (Some(first), Some(last)) = (
        by_x.keys().next().map(|x| x.0),
        by_x.keys().next_back().map(|x| x.0),
    ) else {
        return;
    };
    let Some(mut day) = DateTime::<Utc>::from_timestamp_millis((first * 1000.0).round() as i64)
    else {
        return;
    };

    let mut inserted = 0usize;
    loop {
        let Some(next) = day.checked_add_days(Days::new(1)) else {
            return;
        };
        day = next;
        let key = datetime_to_unix_seconds(day);
        if key >= last {
            return;
        }
        if inserted >= MAX_FILLED_DAYS {
            warn!(inserted, "date gap filling stopped at placeholder limit");
            return;
        }
        by_x.entry(OrderedFloat(key)).or_insert_with(|| {
            inserted += 1;
            0.0
        });
    }
}
