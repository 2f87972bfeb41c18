// Solow Growth Accounting - Core Library
// Exposes the reconstruction pipeline and the reporter for the CLI and tests

pub mod error;
pub mod config;
pub mod sources;
pub mod panel;          // Timeline construction
pub mod backfill;       // Fill rules over year-indexed arrays
pub mod capital;        // Perpetual inventory method
pub mod record;         // Output artifact
pub mod reconstruct;    // Series Reconstructor
pub mod ols;
pub mod accounting;     // Growth-Accounting Reporter
pub mod report;

// Re-export commonly used types
pub use error::{OlsError, ReconstructionError, ReconstructionResult};
pub use config::ReconstructionConfig;
pub use sources::{
    EconomicObservation, SchoolingObservation,
    load_economic_csv, load_schooling_csv, read_economic, read_schooling,
};
pub use panel::{AnnualPanel, Provenance, Series};
pub use record::{
    AnnualRecord,
    read_records_csv, write_records_csv, validate_records, fingerprint,
};
pub use reconstruct::{reconstruct, FillSummary, Reconstruction};
pub use ols::{Coefficient, OlsFit};
pub use accounting::{decompose, estimate, average_contributions, DecompositionRow, ContributionAverages};
pub use report::{write_all, ReportPaths};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
