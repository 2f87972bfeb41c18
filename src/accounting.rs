// 🧮 Growth Accounting - Solow model with human capital
//
// ln(Y/L) = ln(A) + α ln(K/L) + β ln(H)
//
// α and β come from OLS on the reconstructed table; year-over-year growth is
// then split into capital, human capital and residual (PTF) contributions.

use crate::error::OlsError;
use crate::ols::{fit, OlsFit};
use crate::panel::Provenance;
use crate::record::AnnualRecord;
use serde::{Deserialize, Serialize};

pub const CAPITAL_TERM: &str = "ln_capital_per_capita";
pub const SCHOOLING_TERM: &str = "ln_schooling";
pub const DEPENDENT: &str = "ln_gdp_per_capita";

/// Regress ln GDP per capita on ln capital per capita and ln schooling (with intercept)
pub fn estimate(records: &[AnnualRecord]) -> Result<OlsFit, OlsError> {
    let y: Vec<f64> = records.iter().map(|r| r.ln_gdp_per_capita).collect();
    let capital: Vec<f64> = records.iter().map(|r| r.ln_capital_per_capita).collect();
    let schooling: Vec<f64> = records.iter().map(|r| r.ln_schooling).collect();

    let result = fit(&y, &[(CAPITAL_TERM, capital), (SCHOOLING_TERM, schooling)], true)?;

    log::info!(
        "OLS on {} years: R² = {:.4}, α = {:.4}, β = {:.4}",
        result.nobs,
        result.r_squared,
        elasticity(&result, CAPITAL_TERM),
        elasticity(&result, SCHOOLING_TERM)
    );

    Ok(result)
}

fn elasticity(fit: &OlsFit, term: &str) -> f64 {
    fit.param(term).map(|c| c.coefficient).unwrap_or(f64::NAN)
}

/// Reconstructed fields + model output + growth decomposition for one year.
///
/// Growth columns are in percent and are empty for the first year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompositionRow {
    #[serde(rename = "Year")]
    pub year: i32,
    pub gdp_per_capita: f64,
    pub labor_force: f64,
    pub capital_investment: f64,
    pub schooling_years: f64,
    pub capital_stock: f64,
    pub capital_stock_per_capita: f64,
    pub ln_gdp_per_capita: f64,
    pub ln_capital_per_capita: f64,
    pub ln_schooling: f64,
    pub gdp_per_capita_source: Provenance,
    pub labor_force_source: Provenance,
    pub capital_investment_source: Provenance,
    pub schooling_years_source: Provenance,

    pub predicted: f64,
    pub residuals: f64,
    pub predicted_gdp_per_capita: f64,
    pub gdp_growth_rate: Option<f64>,
    pub predicted_growth_rate: Option<f64>,
    pub capital_contribution: Option<f64>,
    pub human_capital_contribution: Option<f64>,
    pub ptf_contribution: Option<f64>,
}

/// Averages of the contribution columns over every year that has them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionAverages {
    pub years: usize,
    pub gdp_growth: f64,
    pub capital: f64,
    pub human_capital: f64,
    pub ptf: f64,
}

/// Attach the fit and the growth decomposition to each record.
///
/// `fit` must come from [`estimate`] on the same records.
pub fn decompose(
    records: &[AnnualRecord],
    fit: &OlsFit,
) -> Result<Vec<DecompositionRow>, OlsError> {
    if fit.nobs != records.len() || fit.fitted.len() != records.len() {
        return Err(OlsError::DimensionMismatch {
            rows: fit.nobs,
            len: records.len(),
        });
    }

    let alpha = elasticity(fit, CAPITAL_TERM);
    let beta = elasticity(fit, SCHOOLING_TERM);

    let mut rows: Vec<DecompositionRow> = Vec::with_capacity(records.len());
    for (i, r) in records.iter().enumerate() {
        let predicted = fit.fitted[i];
        let predicted_gdp_per_capita = predicted.exp();

        let growth = i.checked_sub(1).map(|p| {
            let prev = &records[p];
            let prev_predicted_gdp = rows[p].predicted_gdp_per_capita;

            let capital = alpha * (r.ln_capital_per_capita - prev.ln_capital_per_capita);
            let human = beta * (r.ln_schooling - prev.ln_schooling);
            let ptf = (r.ln_gdp_per_capita - prev.ln_gdp_per_capita) - capital - human;

            (
                pct_change(prev.gdp_per_capita, r.gdp_per_capita),
                pct_change(prev_predicted_gdp, predicted_gdp_per_capita),
                capital * 100.0,
                human * 100.0,
                ptf * 100.0,
            )
        });

        rows.push(DecompositionRow {
            year: r.year,
            gdp_per_capita: r.gdp_per_capita,
            labor_force: r.labor_force,
            capital_investment: r.capital_investment,
            schooling_years: r.schooling_years,
            capital_stock: r.capital_stock,
            capital_stock_per_capita: r.capital_stock_per_capita,
            ln_gdp_per_capita: r.ln_gdp_per_capita,
            ln_capital_per_capita: r.ln_capital_per_capita,
            ln_schooling: r.ln_schooling,
            gdp_per_capita_source: r.gdp_per_capita_source,
            labor_force_source: r.labor_force_source,
            capital_investment_source: r.capital_investment_source,
            schooling_years_source: r.schooling_years_source,
            predicted,
            residuals: fit.residuals[i],
            predicted_gdp_per_capita,
            gdp_growth_rate: growth.map(|g| g.0),
            predicted_growth_rate: growth.map(|g| g.1),
            capital_contribution: growth.map(|g| g.2),
            human_capital_contribution: growth.map(|g| g.3),
            ptf_contribution: growth.map(|g| g.4),
        });
    }

    Ok(rows)
}

pub fn average_contributions(rows: &[DecompositionRow]) -> Option<ContributionAverages> {
    let with_growth: Vec<&DecompositionRow> =
        rows.iter().filter(|r| r.capital_contribution.is_some()).collect();
    if with_growth.is_empty() {
        return None;
    }

    let n = with_growth.len() as f64;
    let mean = |f: fn(&DecompositionRow) -> Option<f64>| {
        with_growth.iter().filter_map(|r| f(r)).sum::<f64>() / n
    };

    Some(ContributionAverages {
        years: with_growth.len(),
        gdp_growth: mean(|r| r.gdp_growth_rate),
        capital: mean(|r| r.capital_contribution),
        human_capital: mean(|r| r.human_capital_contribution),
        ptf: mean(|r| r.ptf_contribution),
    })
}

fn pct_change(previous: f64, current: f64) -> f64 {
    (current / previous - 1.0) * 100.0
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReconstructionConfig;
    use crate::reconstruct::reconstruct;
    use crate::sources::{EconomicObservation, SchoolingObservation};

    fn records() -> Vec<AnnualRecord> {
        let economic: Vec<EconomicObservation> = (1960..=2020)
            .map(|year| {
                let t = (year - 1960) as f64;
                let wobble = if year % 3 == 0 { 1.01 } else { 0.995 };
                let mut row = EconomicObservation::new("Belgium", year)
                    .with_gdp_per_capita(12000.0 * 1.025f64.powf(t) * wobble)
                    .with_labor_force(3.5 * 1.006f64.powf(t));
                if year >= 1970 {
                    row = row.with_capital_investment(20.0 * 1.03f64.powf(t) * (2.0 - wobble));
                }
                row
            })
            .collect();
        let schooling: Vec<SchoolingObservation> = (1990..=2020)
            .map(|year| {
                let bump = if year % 4 == 0 { 0.05 } else { 0.0 };
                SchoolingObservation::new("Belgium", year, 15.0 + 0.08 * (year - 1990) as f64 + bump)
            })
            .collect();

        reconstruct(&economic, &schooling, &ReconstructionConfig::default())
            .unwrap()
            .records
    }

    #[test]
    fn test_estimate_uses_all_years() {
        let records = records();
        let fit = estimate(&records).unwrap();

        assert_eq!(fit.nobs, records.len());
        assert_eq!(fit.coefficients.len(), 3);
        assert!(fit.param(CAPITAL_TERM).is_some());
        assert!(fit.param(SCHOOLING_TERM).is_some());
        assert!(fit.r_squared > 0.0 && fit.r_squared <= 1.0);
    }

    #[test]
    fn test_decomposition_identity() {
        let records = records();
        let fit = estimate(&records).unwrap();
        let rows = decompose(&records, &fit).unwrap();

        assert_eq!(rows.len(), records.len());
        assert_eq!(rows[0].capital_contribution, None);
        assert_eq!(rows[0].gdp_growth_rate, None);

        for pair in rows.windows(2) {
            let (prev, row) = (&pair[0], &pair[1]);
            let total = (row.ln_gdp_per_capita - prev.ln_gdp_per_capita) * 100.0;
            let parts = row.capital_contribution.unwrap()
                + row.human_capital_contribution.unwrap()
                + row.ptf_contribution.unwrap();
            assert!((total - parts).abs() < 1e-9);

            let alpha = fit.param(CAPITAL_TERM).unwrap().coefficient;
            let expected = alpha * (row.ln_capital_per_capita - prev.ln_capital_per_capita) * 100.0;
            assert!((row.capital_contribution.unwrap() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_predicted_and_residuals_line_up() {
        let records = records();
        let fit = estimate(&records).unwrap();
        let rows = decompose(&records, &fit).unwrap();

        for row in &rows {
            assert!((row.predicted + row.residuals - row.ln_gdp_per_capita).abs() < 1e-9);
            assert!((row.predicted_gdp_per_capita - row.predicted.exp()).abs() < 1e-9);
        }

        let growth = rows[1].gdp_growth_rate.unwrap();
        let expected = (rows[1].gdp_per_capita / rows[0].gdp_per_capita - 1.0) * 100.0;
        assert!((growth - expected).abs() < 1e-9);
    }

    #[test]
    fn test_average_contributions() {
        let records = records();
        let fit = estimate(&records).unwrap();
        let rows = decompose(&records, &fit).unwrap();

        let averages = average_contributions(&rows).unwrap();
        assert_eq!(averages.years, rows.len() - 1);
        assert!(average_contributions(&rows[..1]).is_none());
    }

    #[test]
    fn test_decompose_rejects_fit_from_other_records() {
        let records = records();
        let fit = estimate(&records[..20]).unwrap();

        assert_eq!(
            decompose(&records, &fit),
            Err(OlsError::DimensionMismatch {
                rows: 20,
                len: records.len()
            })
        );
        assert_eq!(decompose(&records[..20], &fit).unwrap().len(), 20);
    }
}
