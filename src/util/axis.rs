/// Value-axis bounds for one chart axis group.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisScale {
    pub min:      f64,
    pub max:      f64,
    pub interval: f64,
}

/// Shared min/max/interval across every value of every series.
///
/// No values at all gives the (0, 0, 0) placeholder axis. A flat range is
/// widened to `min + 1` so the axis never has zero height. All three numbers
/// are rounded to hundredths independently. Non-finite values (NaN, ±inf) are
/// skipped.
pub fn calc_scale(splits: u32, series: &[&[f64]]) -> AxisScale {
    let mut bounds: Option<(f64, f64)> = None;
    for &v in series.iter().flat_map(|s| s.iter()) {
        if !v.is_finite() {
            continue;
        }
        bounds = Some(match bounds {
            None             => (v, v),
            Some((lo, hi))   => (lo.min(v), hi.max(v)),
        });
    }

    let Some((min, mut max)) = bounds else {
        return AxisScale::default();
    };
    if max == min {
        max = min + 1.0;
    }
    let interval = (max - min) / f64::from(splits.max(1));

    AxisScale {
        min:      round2(min),
        max:      round2(max),
        interval: round2(interval),
    }
}

/// Round half away from zero at the hundredths digit.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
