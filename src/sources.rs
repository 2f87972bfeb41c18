// 📂 Raw Sources - Economic and schooling indicator tables
// Read once at pipeline start, never mutated afterwards

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// One row of the economic indicators export.
///
/// Only the columns the pipeline needs are mapped; the export carries many
/// more (Code, ContinentCode, ...) which serde ignores. Empty cells become `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicObservation {
    #[serde(rename = "Country")]
    pub country: String,

    #[serde(rename = "Year")]
    pub year: i32,

    #[serde(rename = "GDP per capita constant dollars", default)]
    pub gdp_per_capita: Option<f64>,

    #[serde(rename = "Labor force million people", default)]
    pub labor_force: Option<f64>,

    #[serde(rename = "Capital investment billion USD", default)]
    pub capital_investment: Option<f64>,
}

impl EconomicObservation {
    pub fn new(country: &str, year: i32) -> Self {
        EconomicObservation {
            country: country.to_string(),
            year,
            gdp_per_capita: None,
            labor_force: None,
            capital_investment: None,
        }
    }

    pub fn with_gdp_per_capita(mut self, value: f64) -> Self {
        self.gdp_per_capita = Some(value);
        self
    }

    pub fn with_labor_force(mut self, value: f64) -> Self {
        self.labor_force = Some(value);
        self
    }

    pub fn with_capital_investment(mut self, value: f64) -> Self {
        self.capital_investment = Some(value);
        self
    }
}

/// One row of the expected-years-of-schooling export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolingObservation {
    #[serde(rename = "Entity")]
    pub entity: String,

    #[serde(rename = "Year")]
    pub year: i32,

    #[serde(rename = "Expected years of schooling", default)]
    pub schooling_years: Option<f64>,
}

impl SchoolingObservation {
    pub fn new(entity: &str, year: i32, schooling_years: f64) -> Self {
        SchoolingObservation {
            entity: entity.to_string(),
            year,
            schooling_years: Some(schooling_years),
        }
    }
}

// ============================================================================
// LOADERS
// ============================================================================

pub fn read_economic<R: Read>(reader: R) -> Result<Vec<EconomicObservation>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for (line_num, result) in rdr.deserialize().enumerate() {
        let row: EconomicObservation = result.with_context(|| {
            format!("Failed to parse economic row at line {}", line_num + 2)
        })?;
        rows.push(row);
    }

    Ok(rows)
}

pub fn read_schooling<R: Read>(reader: R) -> Result<Vec<SchoolingObservation>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for (line_num, result) in rdr.deserialize().enumerate() {
        let row: SchoolingObservation = result.with_context(|| {
            format!("Failed to parse schooling row at line {}", line_num + 2)
        })?;
        rows.push(row);
    }

    Ok(rows)
}

pub fn load_economic_csv(path: &Path) -> Result<Vec<EconomicObservation>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open economic series: {}", path.display()))?;
    let rows = read_economic(file)?;
    log::info!("Loaded {} economic rows from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn load_schooling_csv(path: &Path) -> Result<Vec<SchoolingObservation>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open schooling series: {}", path.display()))?;
    let rows = read_schooling(file)?;
    log::info!("Loaded {} schooling rows from {}", rows.len(), path.display());
    Ok(rows)
}

// ============================================================================
// COUNTRY FILTERS
// ============================================================================

pub fn economic_for<'a>(
    rows: &'a [EconomicObservation],
    country: &'a str,
) -> impl Iterator<Item = &'a EconomicObservation> + 'a {
    rows.iter().filter(move |r| r.country == country)
}

pub fn schooling_for<'a>(
    rows: &'a [SchoolingObservation],
    entity: &'a str,
) -> impl Iterator<Item = &'a SchoolingObservation> + 'a {
    rows.iter().filter(move |r| r.entity == entity)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ECON_CSV: &str = "\
Country,Code,ContinentCode,Year,GDP per capita constant dollars,Labor force million people,Capital investment billion USD
Belgium,BEL,EU,1990,30000.5,4.1,55.2
Belgium,BEL,EU,1991,30500,,
France,FRA,EU,1990,28000,24.0,210.0
";

    const EDU_CSV: &str = "\
Entity,Code,Year,Expected years of schooling
Belgium,BEL,1990,16.2
Belgium,BEL,1991,
";

    #[test]
    fn test_read_economic_ignores_extra_columns() {
        let rows = read_economic(ECON_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].country, "Belgium");
        assert_eq!(rows[0].year, 1990);
        assert_eq!(rows[0].gdp_per_capita, Some(30000.5));
        assert_eq!(rows[0].capital_investment, Some(55.2));
    }

    #[test]
    fn test_empty_cells_are_missing() {
        let rows = read_economic(ECON_CSV.as_bytes()).unwrap();
        assert_eq!(rows[1].gdp_per_capita, Some(30500.0));
        assert_eq!(rows[1].labor_force, None);
        assert_eq!(rows[1].capital_investment, None);

        let edu = read_schooling(EDU_CSV.as_bytes()).unwrap();
        assert_eq!(edu[0].schooling_years, Some(16.2));
        assert_eq!(edu[1].schooling_years, None);
    }

    #[test]
    fn test_country_filter() {
        let rows = read_economic(ECON_CSV.as_bytes()).unwrap();
        assert_eq!(economic_for(&rows, "Belgium").count(), 2);
        assert_eq!(economic_for(&rows, "France").count(), 1);
        assert_eq!(economic_for(&rows, "Spain").count(), 0);
    }

    #[test]
    fn test_malformed_year_is_an_error() {
        let bad = "Country,Year\nBelgium,nineteen\n";
        assert!(read_economic(bad.as_bytes()).is_err());
    }
}
