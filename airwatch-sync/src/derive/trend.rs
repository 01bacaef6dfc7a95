//! Last-delta trend classification.

use airwatch_types::{Metric, Reading, Trend, TrendDirection};

/// Trend for `metric` from the two most recent points at which it is
/// present.
///
/// `readings` must be ascending by timestamp (as produced by the series
/// store and the window filter). Readings where the metric is absent are
/// skipped rather than treated as zero; fewer than two present points is
/// flat with zero magnitude.
pub fn evaluate(readings: &[Reading], metric: Metric) -> Trend {
    let mut previous = None;
    let mut latest = None;

    for reading in readings {
        if let Some(value) = reading.value(metric) {
            previous = latest;
            latest = Some(value);
        }
    }

    let (Some(previous), Some(latest)) = (previous, latest) else {
        return Trend::flat();
    };

    let direction = if latest > previous {
        TrendDirection::Rising
    } else if latest < previous {
        TrendDirection::Falling
    } else {
        TrendDirection::Flat
    };

    Trend {
        direction,
        magnitude: (latest - previous).abs(),
    }
}
