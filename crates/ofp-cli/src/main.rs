mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ofp",
    version,
    about = "Extraction and safety analysis tool for operational flight plan documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a flight plan document (PDF) into a structured record
    Extract {
        /// Path to the OFP PDF file
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the extracted record to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Ask the configured remote service to fill gaps in incomplete records
        #[arg(long)]
        augment: bool,
    },
    /// Run the safety threshold analysis on a PDF or a pre-extracted JSON record
    Analyze {
        /// Path to an OFP PDF or a JSON record
        input_file: PathBuf,

        /// Custom threshold file (JSON); documented defaults apply when absent
        #[arg(short, long, value_name = "FILE")]
        thresholds: Option<PathBuf>,

        /// Departure runway heading in degrees, needed for the crosswind rule
        #[arg(long, value_name = "DEG")]
        runway_heading: Option<f64>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Inspect and validate threshold configuration
    Thresholds {
        #[command(subcommand)]
        action: ThresholdsAction,
    },
}

#[derive(Subcommand)]
enum ThresholdsAction {
    /// Print the effective limits (defaults, overlaid with a file if given)
    Show {
        /// Optional threshold file to overlay
        file: Option<PathBuf>,
    },
    /// Check that a threshold file parses, reporting why when it does not
    Validate {
        /// Path to JSON threshold file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input_file,
            output,
            out,
            augment,
        } => commands::extract::run(input_file, &output, out, augment),
        Commands::Analyze {
            input_file,
            thresholds,
            runway_heading,
            output,
        } => commands::analyze::run(input_file, thresholds, runway_heading, &output),
        Commands::Thresholds { action } => match action {
            ThresholdsAction::Show { file } => commands::thresholds::show(file),
            ThresholdsAction::Validate { file } => commands::thresholds::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
