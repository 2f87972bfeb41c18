// 🗓️ Annual Panel - Contiguous year timeline with one slot per field
// Values are plain arrays indexed by offset from `first_year`; no per-row key lookups.

use crate::error::{ReconstructionError, ReconstructionResult};
use crate::sources::{economic_for, schooling_for, EconomicObservation, SchoolingObservation};
use serde::{Deserialize, Serialize};

/// Where a reconstructed value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Present in the raw source
    Observed,
    /// Walked backward from the earliest observation with an estimated growth rate
    Extrapolated,
    /// GDP per capita × fixed investment/GDP ratio
    RatioImputed,
    /// Linear interpolation (or carry-forward past the last observation)
    Interpolated,
    /// Nothing has filled this slot yet
    Missing,
}

impl Provenance {
    pub fn code(&self) -> &str {
        match self {
            Provenance::Observed => "observed",
            Provenance::Extrapolated => "extrapolated",
            Provenance::RatioImputed => "ratio_imputed",
            Provenance::Interpolated => "interpolated",
            Provenance::Missing => "missing",
        }
    }
}

/// A single field across the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub values: Vec<Option<f64>>,
    pub sources: Vec<Provenance>,
}

impl Series {
    pub fn empty(len: usize) -> Self {
        Series {
            values: vec![None; len],
            sources: vec![Provenance::Missing; len],
        }
    }

    pub fn observe(&mut self, idx: usize, value: Option<f64>) {
        if let Some(v) = value {
            self.values[idx] = Some(v);
            self.sources[idx] = Provenance::Observed;
        }
    }

    /// Mark every slot that was empty before and is filled now
    pub fn mark_filled(&mut self, before: &[Option<f64>], provenance: Provenance) {
        for (i, (old, new)) in before.iter().zip(self.values.iter()).enumerate() {
            if old.is_none() && new.is_some() {
                self.sources[i] = provenance;
            }
        }
    }

    pub fn first_present(&self) -> Option<usize> {
        self.values.iter().position(|v| v.is_some())
    }

    pub fn count(&self, provenance: Provenance) -> usize {
        self.sources.iter().filter(|p| **p == provenance).count()
    }
}

/// Raw series left-joined onto `[min(Year), max(Year)]` of the economic source
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualPanel {
    pub first_year: i32,
    pub gdp_per_capita: Series,
    pub labor_force: Series,
    pub capital_investment: Series,
    pub schooling_years: Series,
}

impl AnnualPanel {
    pub fn build(
        economic: &[EconomicObservation],
        schooling: &[SchoolingObservation],
        country: &str,
    ) -> ReconstructionResult<Self> {
        let econ: Vec<&EconomicObservation> = economic_for(economic, country).collect();

        let first_year = econ.iter().map(|r| r.year).min();
        let last_year = econ.iter().map(|r| r.year).max();
        let (first_year, last_year) = match (first_year, last_year) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(ReconstructionError::CountryNotFound {
                    country: country.to_string(),
                })
            }
        };

        let len = (last_year - first_year + 1) as usize;
        let mut panel = AnnualPanel {
            first_year,
            gdp_per_capita: Series::empty(len),
            labor_force: Series::empty(len),
            capital_investment: Series::empty(len),
            schooling_years: Series::empty(len),
        };

        let mut seen = vec![false; len];
        for row in econ {
            let idx = (row.year - first_year) as usize;
            if seen[idx] {
                return Err(ReconstructionError::DuplicateYear {
                    source_name: "economic",
                    year: row.year,
                });
            }
            seen[idx] = true;

            panel.gdp_per_capita.observe(idx, row.gdp_per_capita);
            panel.labor_force.observe(idx, row.labor_force);
            panel.capital_investment.observe(idx, row.capital_investment);
        }

        let mut seen = vec![false; len];
        let mut dropped = 0usize;
        for row in schooling_for(schooling, country) {
            let Some(idx) = panel.index_of(row.year) else {
                dropped += 1;
                continue;
            };
            if seen[idx] {
                return Err(ReconstructionError::DuplicateYear {
                    source_name: "schooling",
                    year: row.year,
                });
            }
            seen[idx] = true;
            panel.schooling_years.observe(idx, row.schooling_years);
        }

        if dropped > 0 {
            log::debug!(
                "Dropped {} schooling rows outside {}..={}",
                dropped,
                first_year,
                last_year
            );
        }

        log::info!(
            "Timeline for {}: {}..={} ({} years)",
            country,
            first_year,
            last_year,
            len
        );

        Ok(panel)
    }

    pub fn len(&self) -> usize {
        self.gdp_per_capita.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last_year(&self) -> i32 {
        self.first_year + self.len() as i32 - 1
    }

    pub fn year_at(&self, idx: usize) -> i32 {
        self.first_year + idx as i32
    }

    pub fn index_of(&self, year: i32) -> Option<usize> {
        if year < self.first_year || year > self.last_year() {
            None
        } else {
            Some((year - self.first_year) as usize)
        }
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.len()).map(move |i| self.year_at(i))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn econ(year: i32, gdp: f64) -> EconomicObservation {
        EconomicObservation::new("Belgium", year).with_gdp_per_capita(gdp)
    }

    #[test]
    fn test_timeline_fills_year_gaps() {
        let rows = vec![econ(1960, 10.0), econ(1963, 13.0), econ(1961, 11.0)];
        let panel = AnnualPanel::build(&rows, &[], "Belgium").unwrap();

        assert_eq!(panel.first_year, 1960);
        assert_eq!(panel.len(), 4);
        assert_eq!(panel.years().collect::<Vec<_>>(), vec![1960, 1961, 1962, 1963]);
        assert_eq!(panel.gdp_per_capita.values[1], Some(11.0));
        assert_eq!(panel.gdp_per_capita.values[2], None);
        assert_eq!(panel.gdp_per_capita.sources[2], Provenance::Missing);
    }

    #[test]
    fn test_unknown_country() {
        let rows = vec![econ(1960, 10.0)];
        let result = AnnualPanel::build(&rows, &[], "Narnia");
        assert_eq!(
            result,
            Err(ReconstructionError::CountryNotFound {
                country: "Narnia".to_string()
            })
        );
    }

    #[test]
    fn test_schooling_left_join() {
        let rows = vec![econ(1960, 10.0), econ(1961, 11.0), econ(1962, 12.0)];
        let edu = vec![
            SchoolingObservation::new("Belgium", 1961, 12.5),
            SchoolingObservation::new("Belgium", 1999, 16.0),
            SchoolingObservation::new("France", 1960, 11.0),
        ];
        let panel = AnnualPanel::build(&rows, &edu, "Belgium").unwrap();

        assert_eq!(panel.schooling_years.values, vec![None, Some(12.5), None]);
        assert_eq!(panel.schooling_years.first_present(), Some(1));
    }

    #[test]
    fn test_duplicate_year_rejected() {
        let rows = vec![econ(1960, 10.0), econ(1960, 10.5)];
        let result = AnnualPanel::build(&rows, &[], "Belgium");
        assert!(matches!(
            result,
            Err(ReconstructionError::DuplicateYear { year: 1960, .. })
        ));
    }

    #[test]
    fn test_index_of_bounds() {
        let rows = vec![econ(2000, 1.0), econ(2002, 1.0)];
        let panel = AnnualPanel::build(&rows, &[], "Belgium").unwrap();
        assert_eq!(panel.index_of(1999), None);
        assert_eq!(panel.index_of(2001), Some(1));
        assert_eq!(panel.index_of(2003), None);
        assert_eq!(panel.last_year(), 2002);
    }
}
