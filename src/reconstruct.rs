// 📈 Series Reconstructor - Raw annual series → complete Annual Record table
//
// Pure function: explicit inputs + config in, new table out. No filesystem,
// no shared state. Steps run in a fixed order because later rules read the
// output of earlier ones (investment ratio needs GDP, PIM needs full investment).

use crate::backfill::{
    backward_geometric_fill, backward_linear_fill, geometric_growth_rate, interpolate_internal,
    interpolate_linear, investment_ratio, level_growth_rate, ratio_backfill,
};
use crate::capital::perpetual_inventory;
use crate::config::ReconstructionConfig;
use crate::error::{ReconstructionError, ReconstructionResult};
use crate::panel::{AnnualPanel, Provenance, Series};
use crate::record::AnnualRecord;
use crate::sources::{EconomicObservation, SchoolingObservation};
use serde::{Deserialize, Serialize};

/// Rates and counts behind one reconstruction run.
///
/// Each heuristic that actually filled something is listed in `assumptions`
/// so the output can be reported alongside the estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillSummary {
    pub country: String,
    pub first_year: i32,
    pub last_year: i32,
    pub schooling_level_growth: f64,
    pub investment_gdp_ratio: f64,
    pub labor_growth_rate: f64,
    pub investment_growth_rate: f64,
    pub initial_capital_stock: f64,
    pub depreciation_rate: f64,
    pub assumptions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    pub records: Vec<AnnualRecord>,
    pub summary: FillSummary,
}

pub fn reconstruct(
    economic: &[EconomicObservation],
    schooling: &[SchoolingObservation],
    config: &ReconstructionConfig,
) -> ReconstructionResult<Reconstruction> {
    config.validate()?;

    let mut panel = AnnualPanel::build(economic, schooling, &config.country)?;
    let first_year = panel.first_year;
    let mut assumptions = Vec::new();

    // 1. GDP per capita: only internal gaps, the timeline edges come from this source
    fill_with(&mut panel.gdp_per_capita, Provenance::Interpolated, interpolate_internal);

    // 2. Schooling: level trend between the anchors, walked backward, then interpolated
    let schooling_rate = level_growth_rate(
        &panel.schooling_years.values,
        first_year,
        config.schooling_anchor_start,
        config.schooling_anchor_end,
    )?;
    let filled = fill_with(&mut panel.schooling_years, Provenance::Extrapolated, |v| {
        backward_linear_fill(v, schooling_rate)
    });
    if filled > 0 {
        assumptions.push(note(
            "schooling_years",
            filled,
            format!(
                "assumes the {}-{} trend of {:+.4} years/year held before the first observation",
                config.schooling_anchor_start, config.schooling_anchor_end, schooling_rate
            ),
        ));
    }
    fill_with(&mut panel.schooling_years, Provenance::Interpolated, interpolate_linear);

    // 3. Investment: fixed share of GDP per capita before the threshold year
    let ratio = investment_ratio(
        &panel.capital_investment.values,
        &panel.gdp_per_capita.values,
        first_year,
        config.investment_reference_start,
        config.investment_reference_end,
    )?;
    let threshold = (config.investment_threshold_year - first_year).max(0) as usize;
    let written = ratio_backfill(
        &mut panel.capital_investment.values,
        &panel.gdp_per_capita.values,
        threshold,
        ratio,
    );
    for &i in &written {
        panel.capital_investment.sources[i] = Provenance::RatioImputed;
    }
    if !written.is_empty() {
        assumptions.push(note(
            "capital_investment",
            written.len(),
            format!(
                "set to GDP per capita x {:.6} (ratio over {}-{}) before {}",
                ratio,
                config.investment_reference_start,
                config.investment_reference_end,
                config.investment_threshold_year
            ),
        ));
    }

    // 4. Labor force: geometric growth of the earliest observations, walked backward
    let (labor_rate, _) = geometric_growth_rate(
        &panel.labor_force.values,
        first_year,
        config.labor_growth_observations,
    )?;
    let filled = fill_with(&mut panel.labor_force, Provenance::Extrapolated, |v| {
        backward_geometric_fill(v, labor_rate)
    });
    if filled > 0 {
        assumptions.push(note(
            "labor_force",
            filled,
            format!(
                "assumes {:.4}% annual growth from the first {} observations held earlier",
                labor_rate * 100.0,
                config.labor_growth_observations
            ),
        ));
    }

    fill_with(&mut panel.labor_force, Provenance::Interpolated, interpolate_linear);
    fill_with(&mut panel.capital_investment, Provenance::Interpolated, interpolate_linear);

    for text in &assumptions {
        log::warn!("Assumption: {}", text);
    }

    // Every base field must be complete before the stock recursion
    let gdp = complete(&panel, &panel.gdp_per_capita, "gdp_per_capita")?;
    let labor = complete(&panel, &panel.labor_force, "labor_force")?;
    let investment = complete(&panel, &panel.capital_investment, "capital_investment")?;
    let schooling_years = complete(&panel, &panel.schooling_years, "schooling_years")?;

    for (field, values) in [
        ("gdp_per_capita", &gdp),
        ("labor_force", &labor),
        ("capital_investment", &investment),
        ("schooling_years", &schooling_years),
    ] {
        for (i, &value) in values.iter().enumerate() {
            positive(field, panel.year_at(i), value)?;
        }
    }

    // 5. Capital stock
    let capital = perpetual_inventory(&investment, config.depreciation_rate, first_year)?;

    // 6. Derived per-capita stock and logs
    let mut records = Vec::with_capacity(panel.len());
    for i in 0..panel.len() {
        let year = panel.year_at(i);
        let stock = capital.stock[i];
        let per_capita = stock * 1e9 / (labor[i] * 1e6);

        records.push(AnnualRecord {
            year,
            gdp_per_capita: gdp[i],
            labor_force: labor[i],
            capital_investment: investment[i],
            schooling_years: schooling_years[i],
            capital_stock: positive("capital_stock", year, stock)?,
            capital_stock_per_capita: per_capita,
            ln_gdp_per_capita: gdp[i].ln(),
            ln_capital_per_capita: positive("capital_stock_per_capita", year, per_capita)?.ln(),
            ln_schooling: schooling_years[i].ln(),
            gdp_per_capita_source: panel.gdp_per_capita.sources[i],
            labor_force_source: panel.labor_force.sources[i],
            capital_investment_source: panel.capital_investment.sources[i],
            schooling_years_source: panel.schooling_years.sources[i],
        });
    }

    for (field, series) in [
        ("gdp_per_capita", &panel.gdp_per_capita),
        ("labor_force", &panel.labor_force),
        ("capital_investment", &panel.capital_investment),
        ("schooling_years", &panel.schooling_years),
    ] {
        log::info!(
            "{}: {} {}, {} {}, {} {}, {} {}",
            field,
            series.count(Provenance::Observed),
            Provenance::Observed.code(),
            series.count(Provenance::Extrapolated),
            Provenance::Extrapolated.code(),
            series.count(Provenance::RatioImputed),
            Provenance::RatioImputed.code(),
            series.count(Provenance::Interpolated),
            Provenance::Interpolated.code(),
        );
    }

    let summary = FillSummary {
        country: config.country.clone(),
        first_year,
        last_year: panel.last_year(),
        schooling_level_growth: schooling_rate,
        investment_gdp_ratio: ratio,
        labor_growth_rate: labor_rate,
        investment_growth_rate: capital.investment_growth,
        initial_capital_stock: capital.seed,
        depreciation_rate: config.depreciation_rate,
        assumptions,
    };

    Ok(Reconstruction { records, summary })
}

// ============================================================================
// HELPERS
// ============================================================================

/// Run a fill rule on one series and tag the slots it filled
fn fill_with<F>(series: &mut Series, provenance: Provenance, rule: F) -> usize
where
    F: FnOnce(&mut [Option<f64>]) -> usize,
{
    let before = series.values.clone();
    let filled = rule(&mut series.values);
    series.mark_filled(&before, provenance);
    filled
}

fn complete(
    panel: &AnnualPanel,
    series: &Series,
    field: &'static str,
) -> ReconstructionResult<Vec<f64>> {
    series
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.ok_or(ReconstructionError::MissingValue {
                field,
                year: panel.year_at(i),
            })
        })
        .collect()
}

/// Values entering a log must be > 0; reject rather than clamp
fn positive(field: &'static str, year: i32, value: f64) -> ReconstructionResult<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ReconstructionError::Domain { field, year, value })
    }
}

fn note(field: &str, count: usize, text: String) -> String {
    format!("{} ({} years): {}", field, count, text)
}

// ============================================================================
// TESTS
// ============================================================================
