// 🧩 Backfill Rules - Forward/backward scans over year-indexed arrays
//
// Each rule is a pure scan over `[Option<f64>]` where index 0 is the first
// year of the timeline. Rules that need anchors fail loudly when the anchor
// is absent instead of silently skipping the field.

use crate::error::{ReconstructionError, ReconstructionResult};

/// Value at `year`, or `AnchorMissing` if it is outside the timeline or empty
fn anchor(
    values: &[Option<f64>],
    first_year: i32,
    year: i32,
    rule: &'static str,
    field: &str,
) -> ReconstructionResult<f64> {
    let offset = year - first_year;
    if offset < 0 || offset as usize >= values.len() {
        return Err(ReconstructionError::AnchorMissing {
            rule,
            detail: format!("year {} is outside the observed timeline", year),
        });
    }

    values[offset as usize].ok_or_else(|| ReconstructionError::AnchorMissing {
        rule,
        detail: format!("{} has no value for year {}", field, year),
    })
}

// ============================================================================
// LINEAR (LEVEL) BACKWARD FILL
// ============================================================================

/// Average yearly change in level between two anchor years:
/// `(v[end] - v[start]) / (end - start)`.
pub fn level_growth_rate(
    values: &[Option<f64>],
    first_year: i32,
    start_year: i32,
    end_year: i32,
) -> ReconstructionResult<f64> {
    const RULE: &str = "schooling level growth";

    let start = anchor(values, first_year, start_year, RULE, "schooling_years")?;
    let end = anchor(values, first_year, end_year, RULE, "schooling_years")?;

    Ok((end - start) / (end_year - start_year) as f64)
}

/// Walk backward from the earliest populated slot: `v[i] = v[i+1] - rate`.
///
/// Returns how many slots were filled. A series with no value at all is left untouched.
pub fn backward_linear_fill(values: &mut [Option<f64>], rate: f64) -> usize {
    let Some(first) = values.iter().position(|v| v.is_some()) else {
        return 0;
    };

    for i in (0..first).rev() {
        values[i] = values[i + 1].map(|next| next - rate);
    }

    first
}

// ============================================================================
// RATIO IMPUTATION
// ============================================================================

/// `Σ investment / Σ gdp` over the inclusive window, using only years that
/// have both values.
pub fn investment_ratio(
    investment: &[Option<f64>],
    gdp: &[Option<f64>],
    first_year: i32,
    start_year: i32,
    end_year: i32,
) -> ReconstructionResult<f64> {
    let mut investment_sum = 0.0;
    let mut gdp_sum = 0.0;
    let mut paired = 0usize;

    for year in start_year..=end_year {
        let offset = year - first_year;
        if offset < 0 || offset as usize >= investment.len() {
            continue;
        }
        let idx = offset as usize;
        if let (Some(inv), Some(g)) = (investment[idx], gdp[idx]) {
            investment_sum += inv;
            gdp_sum += g;
            paired += 1;
        }
    }

    if paired == 0 {
        return Err(ReconstructionError::AnchorMissing {
            rule: "investment ratio",
            detail: format!(
                "no year in {}..={} has both capital investment and GDP per capita",
                start_year, end_year
            ),
        });
    }

    if gdp_sum <= 0.0 {
        return Err(ReconstructionError::Domain {
            field: "gdp_per_capita",
            year: start_year,
            value: gdp_sum,
        });
    }

    log::debug!(
        "Investment/GDP ratio from {} paired years in {}..={}",
        paired,
        start_year,
        end_year
    );

    Ok(investment_sum / gdp_sum)
}

/// For every slot before `threshold`, set `investment = gdp × ratio`.
///
/// Observed investment before the threshold is overwritten. Slots whose GDP
/// is missing are left as they were. Returns the indices written.
pub fn ratio_backfill(
    investment: &mut [Option<f64>],
    gdp: &[Option<f64>],
    threshold: usize,
    ratio: f64,
) -> Vec<usize> {
    let end = threshold.min(investment.len());
    let mut written = Vec::with_capacity(end);

    for i in (0..end).rev() {
        if let Some(g) = gdp[i] {
            investment[i] = Some(g * ratio);
            written.push(i);
        }
    }

    written
}

// ============================================================================
// GEOMETRIC BACKWARD FILL
// ============================================================================

/// Average annual geometric growth rate over the first `observations`
/// populated slots: `(v_last / v_first)^(1 / years) - 1`.
///
/// Returns the rate and the index of the first populated slot.
pub fn geometric_growth_rate(
    values: &[Option<f64>],
    first_year: i32,
    observations: usize,
) -> ReconstructionResult<(f64, usize)> {
    let anchors: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .take(observations)
        .collect();

    if anchors.len() < 2 {
        return Err(ReconstructionError::AnchorMissing {
            rule: "labor force geometric growth",
            detail: format!(
                "need at least 2 labor_force observations, found {}",
                anchors.len()
            ),
        });
    }

    let (first_idx, first_value) = anchors[0];
    let (last_idx, last_value) = anchors[anchors.len() - 1];

    for (idx, value) in [(first_idx, first_value), (last_idx, last_value)] {
        if value <= 0.0 {
            return Err(ReconstructionError::Domain {
                field: "labor_force",
                year: first_year + idx as i32,
                value,
            });
        }
    }

    let span = (last_idx - first_idx) as f64;
    let rate = (last_value / first_value).powf(1.0 / span) - 1.0;

    Ok((rate, first_idx))
}

/// Walk backward from the earliest populated slot: `v[i] = v[i+1] / (1 + rate)`.
pub fn backward_geometric_fill(values: &mut [Option<f64>], rate: f64) -> usize {
    let Some(first) = values.iter().position(|v| v.is_some()) else {
        return 0;
    };

    for i in (0..first).rev() {
        values[i] = values[i + 1].map(|next| next / (1.0 + rate));
    }

    first
}

// ============================================================================
// LINEAR INTERPOLATION
// ============================================================================

/// Fill gaps between two observed values linearly in year offset. Leading and
/// trailing gaps stay empty.
pub fn interpolate_internal(values: &mut [Option<f64>]) -> usize {
    let mut filled = 0;
    let mut last_valid: Option<(usize, f64)> = None;

    for j in 0..values.len() {
        let Some(current) = values[j] else {
            continue;
        };

        if let Some((i, previous)) = last_valid {
            let gap = j - i;
            for k in (i + 1)..j {
                let t = (k - i) as f64 / gap as f64;
                values[k] = Some(previous + (current - previous) * t);
                filled += 1;
            }
        }

        last_valid = Some((j, current));
    }

    filled
}

/// [`interpolate_internal`], then gaps after the last value hold that value.
/// Gaps before the first value stay empty.
pub fn interpolate_linear(values: &mut [Option<f64>]) -> usize {
    let mut filled = interpolate_internal(values);

    if let Some(i) = values.iter().rposition(Option::is_some) {
        let last = values[i];
        for slot in values.iter_mut().skip(i + 1) {
            *slot = last;
            filled += 1;
        }
    }

    filled
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_level_growth_rate() {
        let mut values = vec![None; 11];
        values[0] = Some(15.0);
        values[10] = Some(17.0);

        let rate = level_growth_rate(&values, 1990, 1990, 2000).unwrap();
        assert!(approx(rate, 0.2));
    }

    #[test]
    fn test_level_growth_rate_missing_anchor() {
        let values = vec![Some(15.0), None, Some(16.0)];

        let out_of_range = level_growth_rate(&values, 1990, 1990, 2000);
        assert!(matches!(
            out_of_range,
            Err(ReconstructionError::AnchorMissing { .. })
        ));

        let empty_slot = level_growth_rate(&values, 1990, 1990, 1991);
        assert!(matches!(
            empty_slot,
            Err(ReconstructionError::AnchorMissing { .. })
        ));
    }

    #[test]
    fn test_backward_linear_fill() {
        let mut values = vec![None, None, None, Some(16.0), None, Some(16.4)];
        let filled = backward_linear_fill(&mut values, 0.2);

        assert_eq!(filled, 3);
        assert!(approx(values[2].unwrap(), 15.8));
        assert!(approx(values[1].unwrap(), 15.6));
        assert!(approx(values[0].unwrap(), 15.4));
        // Internal gap is not touched by the backward walk
        assert_eq!(values[4], None);
    }

    #[test]
    fn test_investment_ratio_uses_paired_years() {
        let investment = vec![None, Some(10.0), Some(20.0), None];
        let gdp = vec![Some(100.0), Some(100.0), Some(100.0), Some(100.0)];

        let ratio = investment_ratio(&investment, &gdp, 1969, 1969, 1972).unwrap();
        assert!(approx(ratio, 30.0 / 200.0));
    }

    #[test]
    fn test_investment_ratio_window_absent() {
        let investment = vec![Some(10.0); 5];
        let gdp = vec![Some(100.0); 5];

        // Timeline is 1990..=1994, window 1970..=1980 never overlaps it
        let result = investment_ratio(&investment, &gdp, 1990, 1970, 1980);
        assert!(matches!(
            result,
            Err(ReconstructionError::AnchorMissing {
                rule: "investment ratio",
                ..
            })
        ));
    }

    #[test]
    fn test_ratio_backfill_overwrites_before_threshold() {
        let mut investment = vec![None, Some(99.0), Some(12.0)];
        let gdp = vec![Some(100.0), Some(110.0), Some(120.0)];

        let written = ratio_backfill(&mut investment, &gdp, 2, 0.1);
        assert_eq!(written.len(), 2);
        assert!(approx(investment[0].unwrap(), 10.0));
        assert!(approx(investment[1].unwrap(), 11.0));
        assert_eq!(investment[2], Some(12.0));
    }

    #[test]
    fn test_geometric_growth_rate() {
        let values = vec![None, None, Some(4.0), Some(4.2), Some(4.41), None, Some(9.0)];

        let (rate, first) = geometric_growth_rate(&values, 1960, 3).unwrap();
        assert_eq!(first, 2);
        assert!(approx(rate, 0.05));
    }

    #[test]
    fn test_geometric_growth_rate_needs_two_points() {
        let values = vec![None, Some(4.0), None];
        assert!(matches!(
            geometric_growth_rate(&values, 1960, 5),
            Err(ReconstructionError::AnchorMissing { .. })
        ));
    }

    #[test]
    fn test_backward_geometric_fill_single_step() {
        let v = 4.0;
        let r = 0.05;
        let mut values = vec![None, Some(v), Some(v * (1.0 + r))];

        backward_geometric_fill(&mut values, r);
        assert!(approx(values[0].unwrap(), v / (1.0 + r)));
    }

    #[test]
    fn test_interpolate_linear() {
        let mut values = vec![None, Some(1.0), None, None, Some(4.0), None, None];
        let filled = interpolate_linear(&mut values);

        assert_eq!(filled, 4);
        assert_eq!(values[0], None);
        assert!(approx(values[2].unwrap(), 2.0));
        assert!(approx(values[3].unwrap(), 3.0));
        assert_eq!(values[5], Some(4.0));
        assert_eq!(values[6], Some(4.0));
    }

    #[test]
    fn test_interpolate_internal_leaves_edges_empty() {
        let mut values = vec![None, Some(1.0), None, Some(3.0), None, None];
        let filled = interpolate_internal(&mut values);

        assert_eq!(filled, 1);
        assert_eq!(values[0], None);
        assert!(approx(values[2].unwrap(), 2.0));
        assert_eq!(values[4], None);
        assert_eq!(values[5], None);
    }

    #[test]
    fn test_interpolate_empty_series() {
        let mut values: Vec<Option<f64>> = vec![None, None];
        assert_eq!(interpolate_linear(&mut values), 0);
        assert_eq!(interpolate_internal(&mut values), 0);
        assert_eq!(values, vec![None, None]);
    }
}
