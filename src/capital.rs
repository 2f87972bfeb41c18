// 🏭 Capital Stock - Perpetual inventory method
//
// K(0) = I(0) / (g + δ)        steady state with balanced growth g
// K(t) = I(t) + (1 - δ) K(t-1)
//
// The recursion is a strict left fold in increasing year order.

use crate::error::{ReconstructionError, ReconstructionResult};

/// Mean of the year-over-year percentage changes `I(t)/I(t-1) - 1`.
pub fn mean_growth_rate(investment: &[f64], first_year: i32) -> ReconstructionResult<f64> {
    if investment.len() < 2 {
        return Err(ReconstructionError::AnchorMissing {
            rule: "perpetual inventory seed",
            detail: format!(
                "need at least 2 years of investment to estimate growth, found {}",
                investment.len()
            ),
        });
    }

    let mut sum = 0.0;
    for (t, pair) in investment.windows(2).enumerate() {
        if pair[0] <= 0.0 {
            return Err(ReconstructionError::Domain {
                field: "capital_investment",
                year: first_year + t as i32,
                value: pair[0],
            });
        }
        sum += pair[1] / pair[0] - 1.0;
    }

    Ok(sum / (investment.len() - 1) as f64)
}

/// Steady-state capital implied by investment growing at `growth` with depreciation `delta`
pub fn steady_state_seed(
    first_investment: f64,
    growth: f64,
    delta: f64,
    first_year: i32,
) -> ReconstructionResult<f64> {
    let denominator = growth + delta;
    if denominator <= 0.0 {
        return Err(ReconstructionError::Domain {
            field: "investment growth + depreciation",
            year: first_year,
            value: denominator,
        });
    }

    Ok(first_investment / denominator)
}

/// Fold `K(t) = I(t) + (1 - δ) K(t-1)` starting from `seed` at t = 0.
pub fn accumulate(investment: &[f64], seed: f64, delta: f64) -> Vec<f64> {
    let mut stock = Vec::with_capacity(investment.len());

    if investment.is_empty() {
        return stock;
    }

    stock.push(seed);
    investment[1..].iter().fold(seed, |previous, &inv| {
        let current = inv + (1.0 - delta) * previous;
        stock.push(current);
        current
    });

    stock
}

/// Growth rate, seed and the full stock series in one pass
#[derive(Debug, Clone, PartialEq)]
pub struct CapitalStock {
    pub investment_growth: f64,
    pub seed: f64,
    pub stock: Vec<f64>,
}

pub fn perpetual_inventory(
    investment: &[f64],
    delta: f64,
    first_year: i32,
) -> ReconstructionResult<CapitalStock> {
    let investment_growth = mean_growth_rate(investment, first_year)?;
    let seed = steady_state_seed(investment[0], investment_growth, delta, first_year)?;

    log::debug!(
        "Perpetual inventory: g = {:.6}, δ = {}, K({}) = {:.4}",
        investment_growth,
        delta,
        first_year,
        seed
    );

    Ok(CapitalStock {
        investment_growth,
        seed,
        stock: accumulate(investment, seed, delta),
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_growth_rate() {
        let g = mean_growth_rate(&[100.0, 110.0, 121.0], 1960).unwrap();
        assert!((g - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_recursion_step() {
        let investment = [100.0, 110.0, 121.0];
        let capital = perpetual_inventory(&investment, 0.06, 1960).unwrap();

        let s0 = 100.0 / (capital.investment_growth + 0.06);
        assert!((capital.seed - s0).abs() < 1e-9);
        assert!((capital.stock[0] - 625.0).abs() < 1e-6);
        assert!((capital.stock[1] - (110.0 + 0.94 * s0)).abs() < 1e-9);
        assert!((capital.stock[2] - (121.0 + 0.94 * capital.stock[1])).abs() < 1e-9);
    }

    #[test]
    fn test_single_year_cannot_seed() {
        assert!(matches!(
            perpetual_inventory(&[100.0], 0.06, 1960),
            Err(ReconstructionError::AnchorMissing { .. })
        ));
    }

    #[test]
    fn test_collapsing_investment_rejects_seed() {
        // g = -0.5, g + δ < 0
        let result = perpetual_inventory(&[100.0, 50.0], 0.06, 1960);
        assert!(matches!(result, Err(ReconstructionError::Domain { .. })));
    }

    #[test]
    fn test_accumulate_is_deterministic() {
        let investment = [5.0, 6.0, 7.5, 7.0, 8.2];
        let a = accumulate(&investment, 40.0, 0.06);
        let b = accumulate(&investment, 40.0, 0.06);
        assert_eq!(a, b);
        assert_eq!(a.len(), investment.len());
    }
}
