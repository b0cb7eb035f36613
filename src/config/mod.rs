use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_required_field, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "convert")]
#[command(about = "Take input file and serialise/deserialise to output file")]
#[command(
    long_about = "Convert the format of input file to output file.\n\n\
    The input and output formats are inferred from the file extensions: .py, .csv, .json\n\n\
    example: convert --in input.csv --out output.json"
)]
pub struct CliConfig {
    /// Input filename
    #[arg(long = "in", value_name = "PATH", required_unless_present = "list_formats")]
    pub input_path: Option<String>,

    /// Output filename
    #[arg(long = "out", value_name = "PATH", required_unless_present = "list_formats")]
    pub output_path: Option<String>,

    /// Print the supported file extensions and exit
    #[arg(long)]
    pub list_formats: bool,

    /// Convert without writing; print the converted text to stdout
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit log lines as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl CliConfig {
    pub fn input_path(&self) -> &str {
        self.input_path.as_deref().unwrap_or_default()
    }

    pub fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or_default()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.list_formats {
            return Ok(());
        }

        validate_path("--in", validate_required_field("--in", &self.input_path)?)?;
        validate_path("--out", validate_required_field("--out", &self.output_path)?)?;
        Ok(())
    }
}
