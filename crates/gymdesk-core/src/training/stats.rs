//! Extrema reduction over logged sets.
//!
//! Ties on weight go to the earliest `created_at`; if that also ties, the
//! sample that appears first in the input wins.

use chrono::{DateTime, Datelike, FixedOffset, Utc};
use gymdesk_types::training::{ExerciseStats, SetSample, StatPoint};

/// Japan Standard Time is UTC+9 with no daylight saving.
const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Heaviest and lightest sample, or `None` for an empty slice.
pub fn compute_extrema(samples: &[SetSample]) -> Option<ExerciseStats> {
    let first = samples.first()?;
    let mut max = first;
    let mut min = first;

    for sample in &samples[1..] {
        if sample.weight > max.weight
            || (sample.weight == max.weight && sample.created_at < max.created_at)
        {
            max = sample;
        }
        if sample.weight < min.weight
            || (sample.weight == min.weight && sample.created_at < min.created_at)
        {
            min = sample;
        }
    }

    Some(ExerciseStats {
        max: to_point(max),
        min: to_point(min),
    })
}

fn to_point(sample: &SetSample) -> StatPoint {
    StatPoint {
        weight: sample.weight,
        reps: sample.reps,
        date: format_ja_date(&sample.created_at),
    }
}

/// Calendar date as rendered by the `ja-JP` locale: `YYYY/M/D` in JST.
pub fn format_ja_date(at: &DateTime<Utc>) -> String {
    let local = FixedOffset::east_opt(JST_OFFSET_SECS)
        .map_or_else(|| at.date_naive(), |jst| at.with_timezone(&jst).date_naive());
    format!("{}/{}/{}", local.year(), local.month(), local.day())
}
