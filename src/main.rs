use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use solow_accounting::{
    decompose, estimate, fingerprint, load_economic_csv, load_schooling_csv, read_records_csv,
    reconstruct, write_all, write_records_csv, FillSummary, ReconstructionConfig, VERSION,
};

const USAGE: &str = "\
Usage:
  solow-accounting reconstruct <economic.csv> <schooling.csv> <output.csv> [--config cfg.json] [--country NAME]
  solow-accounting estimate <reconstructed.csv> <results_dir>
  solow-accounting run <economic.csv> <schooling.csv> <results_dir> [--config cfg.json] [--country NAME]";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (positional, config) = split_options(&args)?;

    match positional.first().map(String::as_str) {
        Some("reconstruct") if positional.len() == 4 => {
            run_reconstruct(
                Path::new(&positional[1]),
                Path::new(&positional[2]),
                Path::new(&positional[3]),
                &config,
            )?;
        }
        Some("estimate") if positional.len() == 3 => {
            run_estimate(Path::new(&positional[1]), Path::new(&positional[2]), None)?;
        }
        Some("run") if positional.len() == 4 => {
            let results_dir = PathBuf::from(&positional[3]);
            fs::create_dir_all(&results_dir).with_context(|| {
                format!("Failed to create results directory {}", results_dir.display())
            })?;

            let processed = results_dir.join(format!(
                "{}_processed.csv",
                config.country.to_lowercase().replace(' ', "_")
            ));
            let fills = run_reconstruct(
                Path::new(&positional[1]),
                Path::new(&positional[2]),
                &processed,
                &config,
            )?;
            run_estimate(&processed, &results_dir, Some(&fills))?;
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Pull `--config` / `--country` out of the argument list
fn split_options(args: &[String]) -> Result<(Vec<String>, ReconstructionConfig)> {
    let mut positional = Vec::new();
    let mut config_path: Option<String> = None;
    let mut country: Option<String> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => match iter.next() {
                Some(value) => config_path = Some(value.clone()),
                None => bail!("--config needs a file path"),
            },
            "--country" => match iter.next() {
                Some(value) => country = Some(value.clone()),
                None => bail!("--country needs a name"),
            },
            _ => positional.push(arg.clone()),
        }
    }

    let mut config = match config_path {
        Some(path) => ReconstructionConfig::from_file(&path)?,
        None => ReconstructionConfig::default(),
    };
    if let Some(name) = country {
        config = config.with_country(&name);
    }

    Ok((positional, config))
}

fn run_reconstruct(
    economic_path: &Path,
    schooling_path: &Path,
    output_path: &Path,
    config: &ReconstructionConfig,
) -> Result<FillSummary> {
    println!("📈 Series Reconstruction (solow-accounting {})", VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load raw sources
    println!("\n📂 Loading raw series...");
    let economic = load_economic_csv(economic_path)?;
    let schooling = load_schooling_csv(schooling_path)?;
    println!(
        "✓ {} economic rows, {} schooling rows",
        economic.len(),
        schooling.len()
    );

    // 2. Rebuild the annual table
    println!("\n🔧 Reconstructing {}...", config.country);
    let result = reconstruct(&economic, &schooling, config)
        .with_context(|| format!("Reconstruction failed for {}", config.country))?;
    println!(
        "✓ {} years ({}-{})",
        result.records.len(),
        result.summary.first_year,
        result.summary.last_year
    );
    for text in &result.summary.assumptions {
        println!("  ⚠ {}", text);
    }

    // 3. Persist the output artifact
    println!("\n💾 Writing {}...", output_path.display());
    write_records_csv(output_path, &result.records)?;
    println!("✓ Fingerprint {}", fingerprint(&result.records)?);

    Ok(result.summary)
}

fn run_estimate(input: &Path, results_dir: &Path, fills: Option<&FillSummary>) -> Result<()> {
    println!("\n🧮 Solow model with human capital");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let records = read_records_csv(input)?;
    println!("✓ Loaded {} annual records", records.len());

    let fit = estimate(&records).context("OLS estimation failed")?;
    let rows = decompose(&records, &fit).context("Growth decomposition failed")?;

    for c in &fit.coefficients {
        println!(
            "  {:<24} {:>10.4}  (se {:.4}, p {:.3})",
            c.term, c.coefficient, c.std_error, c.p_value
        );
    }
    println!("  R² = {:.4}, adj. R² = {:.4}", fit.r_squared, fit.adj_r_squared);

    let paths = write_all(results_dir, &fit, &rows, fills)?;
    println!("\n✅ Results saved:");
    for path in [
        &paths.summary,
        &paths.coefficients,
        &paths.metrics,
        &paths.full_results,
    ] {
        println!("   {}", path.display());
    }

    Ok(())
}
