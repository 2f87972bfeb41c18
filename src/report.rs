// 🗒️ Reports - Plain projections of the fit and the decomposition
// Nothing here feeds back into reconstruction or estimation.

use crate::accounting::{average_contributions, DecompositionRow, DEPENDENT};
use crate::ols::OlsFit;
use crate::reconstruct::FillSummary;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::{self, Write as _};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Output file locations inside one results directory
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPaths {
    pub summary: PathBuf,
    pub coefficients: PathBuf,
    pub metrics: PathBuf,
    pub full_results: PathBuf,
}

impl ReportPaths {
    pub fn in_dir(dir: &Path) -> Self {
        ReportPaths {
            summary: dir.join("solow_model_results.txt"),
            coefficients: dir.join("solow_model_coefficients.csv"),
            metrics: dir.join("solow_model_metrics.csv"),
            full_results: dir.join("solow_model_full_results.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub metric: String,
    pub value: f64,
}

pub fn metrics(fit: &OlsFit) -> Vec<MetricRow> {
    [
        ("R²", fit.r_squared),
        ("Adjusted R²", fit.adj_r_squared),
        ("F-statistic", fit.f_statistic),
        ("Prob (F-statistic)", fit.f_p_value),
        ("AIC", fit.aic),
        ("BIC", fit.bic),
        ("Observations", fit.nobs as f64),
    ]
    .into_iter()
    .map(|(metric, value)| MetricRow {
        metric: metric.to_string(),
        value,
    })
    .collect()
}

// ============================================================================
// SUMMARY TEXT
// ============================================================================

pub fn render_summary(
    fit: &OlsFit,
    fills: Option<&FillSummary>,
    generated_at: DateTime<Utc>,
) -> Result<String, fmt::Error> {
    let rule = "=".repeat(78);
    let thin = "-".repeat(78);
    let mut out = String::new();

    writeln!(out, "{:^78}", "OLS Regression Results")?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "{:<22}{:<18}{:<22}{:>16.4}", "Dep. Variable:", DEPENDENT, "R-squared:", fit.r_squared)?;
    writeln!(out, "{:<22}{:<18}{:<22}{:>16.4}", "Model:", "OLS", "Adj. R-squared:", fit.adj_r_squared)?;
    writeln!(out, "{:<22}{:<18}{:<22}{:>16.4}", "Method:", "Least Squares", "F-statistic:", fit.f_statistic)?;
    writeln!(
        out,
        "{:<22}{:<18}{:<22}{:>16.4e}",
        "Date:",
        generated_at.format("%a, %d %b %Y"),
        "Prob (F-statistic):",
        fit.f_p_value
    )?;
    writeln!(
        out,
        "{:<22}{:<18}{:<22}{:>16.4}",
        "Time:",
        generated_at.format("%H:%M:%S"),
        "Log-Likelihood:",
        fit.log_likelihood
    )?;
    writeln!(out, "{:<22}{:<18}{:<22}{:>16.4}", "No. Observations:", fit.nobs, "AIC:", fit.aic)?;
    writeln!(out, "{:<22}{:<18}{:<22}{:>16.4}", "Df Residuals:", fit.df_resid, "BIC:", fit.bic)?;
    writeln!(out, "{:<22}{:<18}", "Df Model:", fit.df_model)?;
    writeln!(out, "{}", rule)?;
    writeln!(
        out,
        "{:<24}{:>10}{:>10}{:>10}{:>8}{:>8}{:>8}",
        "", "coef", "std err", "t", "P>|t|", "[0.025", "0.975]"
    )?;
    writeln!(out, "{}", thin)?;
    for c in &fit.coefficients {
        writeln!(
            out,
            "{:<24}{:>10.4}{:>10.4}{:>10.3}{:>8.3}{:>8.3}{:>8.3}",
            c.term, c.coefficient, c.std_error, c.t_statistic, c.p_value, c.ci_lower, c.ci_upper
        )?;
    }
    writeln!(out, "{}", rule)?;
    writeln!(out, "{:<22}{:>16.3}", "Durbin-Watson:", fit.durbin_watson)?;
    writeln!(out, "{}", rule)?;

    if let Some(fills) = fills {
        writeln!(out)?;
        writeln!(
            out,
            "Data: {} {}-{}, depreciation {}, K({}) = {:.3}",
            fills.country,
            fills.first_year,
            fills.last_year,
            fills.depreciation_rate,
            fills.first_year,
            fills.initial_capital_stock
        )?;
        if fills.assumptions.is_empty() {
            writeln!(out, "No backfill assumptions were needed.")?;
        } else {
            writeln!(out, "Backfill assumptions:")?;
            for (i, text) in fills.assumptions.iter().enumerate() {
                writeln!(out, "[{}] {}", i + 1, text)?;
            }
        }
    }

    Ok(out)
}

// ============================================================================
// WRITERS
// ============================================================================

pub fn write_coefficients<W: std::io::Write>(writer: W, fit: &OlsFit) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for c in &fit.coefficients {
        wtr.serialize(c)
            .with_context(|| format!("Failed to write coefficient {}", c.term))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_metrics<W: std::io::Write>(writer: W, fit: &OlsFit) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in metrics(fit) {
        wtr.serialize(&row)
            .with_context(|| format!("Failed to write metric {}", row.metric))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_full_results<W: std::io::Write>(writer: W, rows: &[DecompositionRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)
            .with_context(|| format!("Failed to write decomposition for year {}", row.year))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write every report into `dir` (created if needed)
pub fn write_all(
    dir: &Path,
    fit: &OlsFit,
    rows: &[DecompositionRow],
    fills: Option<&FillSummary>,
) -> Result<ReportPaths> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create results directory {}", dir.display()))?;
    let paths = ReportPaths::in_dir(dir);

    let mut summary =
        render_summary(fit, fills, Utc::now()).context("Failed to format the summary")?;
    if let Some(avg) = average_contributions(rows) {
        writeln!(
            summary,
            "\nAverage annual growth over {} years: GDP per capita {:.3}%, capital {:.3} pp, human capital {:.3} pp, PTF {:.3} pp",
            avg.years, avg.gdp_growth, avg.capital, avg.human_capital, avg.ptf
        )?;
    }

    let mut file = fs::File::create(&paths.summary)
        .with_context(|| format!("Failed to create {}", paths.summary.display()))?;
    file.write_all(summary.as_bytes())?;

    write_coefficients(create(&paths.coefficients)?, fit)?;
    write_metrics(create(&paths.metrics)?, fit)?;
    write_full_results(create(&paths.full_results)?, rows)?;

    log::info!("Reports written to {}", dir.display());
    Ok(paths)
}

fn create(path: &Path) -> Result<fs::File> {
    fs::File::create(path).with_context(|| format!("Failed to create {}", path.display()))
}

// ============================================================================
// TESTS
// ============================================================================
