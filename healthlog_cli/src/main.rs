use clap::{Parser, Subcommand};
use healthlog_core::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "hlog")]
#[command(about = "Personal health record validation, CSV exchange and statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a record draft (JSON) before it is accepted
    Validate {
        /// Path to the draft JSON file
        file: PathBuf,
    },

    /// Export records (JSON array) to a dated file
    Export {
        /// Path to the records JSON file
        input: PathBuf,

        /// Output directory (defaults to the configured export directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Output format (csv, json)
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
    },

    /// Import a CSV file, re-validate each record and print it as JSON
    Import {
        /// Path to the CSV file
        file: PathBuf,
    },

    /// Print statistics for one field of a CSV file
    Stats {
        /// Path to the CSV file
        file: PathBuf,

        /// weight, height, steps, systolic, diastolic or bp
        #[arg(long, default_value = "weight")]
        field: String,
    },

    /// Compute BMI and its band
    Bmi {
        /// Weight in kg
        #[arg(long)]
        weight: f64,

        /// Height in cm
        #[arg(long)]
        height: f64,

        /// Label language (en, ko)
        #[arg(long, default_value = "en")]
        locale: Locale,
    },

    /// Band a single vital-sign reading
    Vital {
        /// pulse, systolic or diastolic
        #[arg(long)]
        kind: VitalKind,

        /// Reading in the kind's unit (bpm or mmHg)
        #[arg(long)]
        value: f64,
    },
}

fn main() -> ExitCode {
    // Initialize logging
    healthlog_core::logging::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Validate { file } => cmd_validate(&file, &config),
        Commands::Export {
            input,
            out_dir,
            format,
        } => {
            let out_dir = out_dir.unwrap_or_else(|| config.export.output_dir.clone());
            cmd_export(&input, &out_dir, format)
        }
        Commands::Import { file } => cmd_import(&file, &config),
        Commands::Stats { file, field } => cmd_stats(&file, &field),
        Commands::Bmi {
            weight,
            height,
            locale,
        } => cmd_bmi(weight, height, locale),
        Commands::Vital { kind, value } => cmd_vital(kind, value),
    }
}

fn read_records_csv(path: &Path) -> Result<Vec<HealthRecord>> {
    let text = std::fs::read_to_string(path)?;
    let records = import_csv(&text)?;
    tracing::info!("Read {} records from {:?}", records.len(), path);
    Ok(records)
}

fn cmd_validate(path: &Path, config: &Config) -> Result<()> {
    let contents = std::fs::read_to_string(path)?;
    let draft: RecordDraft = serde_json::from_str(&contents)?;

    let errors = validate_record(&draft, &config.validation);
    if errors.is_empty() {
        println!("✓ Record is valid");
        return Ok(());
    }

    println!("Record has {} problem(s):", errors.len());
    for (field, message) in errors.iter() {
        println!("  - {}: {}", field, message);
    }
    Err(Error::Validation(errors.to_string()))
}

fn cmd_export(input: &Path, out_dir: &Path, format: ExportFormat) -> Result<()> {
    let contents = std::fs::read_to_string(input)?;
    let records: Vec<HealthRecord> = serde_json::from_str(&contents)?;

    let today = chrono::Local::now().date_naive();
    let out_path = out_dir.join(export_file_name(today, format));

    std::fs::create_dir_all(out_dir)?;
    std::fs::write(&out_path, export(&records, format)?)?;

    println!("✓ Exported {} records", records.len());
    println!("  File: {}", out_path.display());
    Ok(())
}

fn cmd_import(path: &Path, config: &Config) -> Result<()> {
    let records = read_records_csv(path)?;

    let mut rejected = 0;
    for (index, record) in records.iter().enumerate() {
        let errors = validate_measurements(record, &config.validation);
        if !errors.is_empty() {
            rejected += 1;
            eprintln!("Record {} rejected: {}", index + 1, errors);
        }
    }
    if rejected > 0 {
        return Err(Error::Validation(format!(
            "{} of {} imported records failed validation",
            rejected,
            records.len()
        )));
    }

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn cmd_stats(path: &Path, field: &str) -> Result<()> {
    let records = read_records_csv(path)?;

    let json = match field.trim().to_lowercase().as_str() {
        "bp" | "blood_pressure" => serde_json::to_string_pretty(&aggregate_blood_pressure(&records))?,
        other => {
            let field: MetricField = other.parse()?;
            serde_json::to_string_pretty(&aggregate(&records, field))?
        }
    };

    println!("{}", json);
    Ok(())
}

fn cmd_bmi(weight: f64, height: f64, locale: Locale) -> Result<()> {
    let reading = classify_bmi(Some(weight), Some(height)).ok_or_else(|| {
        Error::Validation("weight and height must be positive numbers".into())
    })?;

    println!(
        "BMI: {:.1} ({}) {}",
        reading.bmi,
        reading.band.label(locale),
        reading.band.color()
    );
    Ok(())
}

fn cmd_vital(kind: VitalKind, value: f64) -> Result<()> {
    let status = classify_vital(kind, Some(value))
        .ok_or_else(|| Error::Validation(format!("{} reading must be a number", kind)))?;

    println!("{} {} {}: {}", kind, value, kind.unit(), status);
    Ok(())
}
