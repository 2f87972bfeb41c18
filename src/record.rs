// 📄 Annual Record - One fully populated row per calendar year
// This table is the reconstruction's output artifact and the reporter's only input.

use crate::panel::Provenance;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualRecord {
    // ========================================================================
    // OBSERVED-OR-FILLED INPUTS
    // ========================================================================
    #[serde(rename = "Year")]
    pub year: i32,

    /// Currency units (constant dollars)
    pub gdp_per_capita: f64,

    /// Millions of people
    pub labor_force: f64,

    /// Billions of currency units
    pub capital_investment: f64,

    pub schooling_years: f64,

    // ========================================================================
    // DERIVED STOCKS
    // ========================================================================
    /// Billions of currency units
    pub capital_stock: f64,

    /// capital_stock × 1e9 / (labor_force × 1e6)
    pub capital_stock_per_capita: f64,

    // ========================================================================
    // LOG REGRESSORS
    // ========================================================================
    pub ln_gdp_per_capita: f64,
    pub ln_capital_per_capita: f64,
    pub ln_schooling: f64,

    // ========================================================================
    // PROVENANCE
    // ========================================================================
    pub gdp_per_capita_source: Provenance,
    pub labor_force_source: Provenance,
    pub capital_investment_source: Provenance,
    pub schooling_years_source: Provenance,
}

// ============================================================================
// CSV I/O
// ============================================================================

pub fn write_records<W: Write>(writer: W, records: &[AnnualRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)
            .with_context(|| format!("Failed to serialize record for year {}", record.year))?;
    }
    wtr.flush().context("Failed to flush records")?;
    Ok(())
}

pub fn read_records<R: Read>(reader: R) -> Result<Vec<AnnualRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (line_num, result) in rdr.deserialize().enumerate() {
        let record: AnnualRecord = result
            .with_context(|| format!("Failed to parse annual record at line {}", line_num + 2))?;
        records.push(record);
    }

    Ok(records)
}

pub fn write_records_csv(path: &Path, records: &[AnnualRecord]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_records(file, records)?;
    log::info!("Wrote {} annual records to {}", records.len(), path.display());
    Ok(())
}

pub fn read_records_csv(path: &Path) -> Result<Vec<AnnualRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let records = read_records(file)?;
    validate_records(&records)
        .with_context(|| format!("Reconstructed table {} is not usable", path.display()))?;
    Ok(records)
}

// ============================================================================
// INVARIANTS
// ============================================================================

/// Contiguous ascending years, strictly positive base fields, finite logs.
pub fn validate_records(records: &[AnnualRecord]) -> Result<()> {
    if records.is_empty() {
        bail!("annual record table is empty");
    }

    for pair in records.windows(2) {
        if pair[1].year != pair[0].year + 1 {
            bail!(
                "years are not contiguous: {} is followed by {}",
                pair[0].year,
                pair[1].year
            );
        }
    }

    for r in records {
        let positive = [
            ("gdp_per_capita", r.gdp_per_capita),
            ("labor_force", r.labor_force),
            ("capital_investment", r.capital_investment),
            ("schooling_years", r.schooling_years),
            ("capital_stock", r.capital_stock),
            ("capital_stock_per_capita", r.capital_stock_per_capita),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                bail!("{} must be positive in {}, got {}", field, r.year, value);
            }
        }

        let logs = [
            ("ln_gdp_per_capita", r.ln_gdp_per_capita),
            ("ln_capital_per_capita", r.ln_capital_per_capita),
            ("ln_schooling", r.ln_schooling),
        ];
        for (field, value) in logs {
            if !value.is_finite() {
                bail!("{} is not finite in {}", field, r.year);
            }
        }
    }

    Ok(())
}

/// SHA-256 of the serialized table. Identical inputs give identical fingerprints.
pub fn fingerprint(records: &[AnnualRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, records)?;

    let mut hasher = Sha256::new();
    hasher.update(&buffer);
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// TESTS
// ============================================================================
