use clap::{CommandFactory, Parser};
use sighting_globe::domain::Period;

#[derive(Debug, Parser)]
#[command(
    name = "sighting-globe",
    version,
    about = "World map of geotagged sightings with a timeline"
)]
pub struct CliArgs {
    /// JSON file or http(s) URL to load; repeat for batched loading
    #[arg(long = "data", value_name = "PATH|URL")]
    pub data: Vec<String>,

    /// Print stats and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless stats as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Initial cursor year
    #[arg(long, value_name = "YEAR", allow_hyphen_values = true)]
    pub year: Option<i32>,

    /// Initial period (ancient, medieval, modern, contemporary)
    #[arg(long, value_name = "NAME", value_parser = parse_period)]
    pub period: Option<Period>,

    /// Initial playback speed (0.5 to 3.0)
    #[arg(long, value_name = "MULTIPLIER")]
    pub speed: Option<f64>,

    /// Headless only: run playback to the end and print every frame
    #[arg(long)]
    pub simulate: bool,

    /// Seed for the fallback sample data
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Documents fetched concurrently when loading several sources
    #[arg(long = "batch-size", value_name = "N")]
    pub batch_size: Option<usize>,
}

fn parse_period(value: &str) -> Result<Period, String> {
    Period::parse(value).ok_or_else(|| format!("unknown period '{value}'"))
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if !self.data.is_empty() {
            std::env::set_var("DATA_SOURCE", self.data.join(","));
        }
        if let Some(size) = self.batch_size {
            std::env::set_var("BATCH_SIZE", size.to_string());
        }
        if let Some(seed) = self.seed {
            std::env::set_var("SAMPLE_SEED", seed.to_string());
        }
        if self.debug {
            std::env::set_var("SIGHTING_LOG", "debug");
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}
