//! College basketball postseason prediction CLI
//!
//! A batch pipeline that predicts each team's tournament finish using
//! gradient-boosted decision trees.

use clap::{Parser, Subcommand};
use hoops::{Config, Result};

#[derive(Parser)]
#[command(name = "hoops")]
#[command(about = "College basketball postseason prediction", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the raw season dataset (skipped when already cached)
    Fetch,
    /// Derive model features from the raw dataset
    Engineer,
    /// Train the postseason classifier on every season but the target year
    Train {
        /// Override the target year from config
        #[arg(long)]
        year: Option<i32>,
    },
    /// Predict postseason finishes for the target year
    Predict {
        /// Override the target year from config
        #[arg(long)]
        year: Option<i32>,
    },
    /// Publish the latest predictions to the SQLite sink
    Publish,
    /// Run the full pipeline: fetch, engineer, train, predict, publish
    Run {
        /// Override the target year from config
        #[arg(long)]
        year: Option<i32>,
    },
    /// Show pipeline artifact and sink status
    Status,
    /// Initialize a new project with default config
    Init,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    // Run command
    let result = match cli.command {
        Commands::Fetch => commands::fetch(&config),
        Commands::Engineer => commands::engineer(&config),
        Commands::Train { year } => commands::train(&config, year),
        Commands::Predict { year } => commands::predict(&config, year),
        Commands::Publish => commands::publish(&config),
        Commands::Run { year } => commands::run(&config, year),
        Commands::Status => commands::status(&config),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use hoops::data::{split_by_year, store, DatasetFetcher};
    use hoops::features::engineer_features;
    use hoops::predict::Predictor;
    use hoops::publish::PredsSink;
    use hoops::training::Trainer;
    use hoops::HoopsError;
    use std::path::Path;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        // Create data directory
        std::fs::create_dir_all("data")?;
        std::fs::create_dir_all("model")?;
        println!("Created data/ and model/ directories");

        println!("\nNext steps:");
        println!("  1. Edit {} to customize settings", config_path);
        println!("  2. Run 'hoops fetch' to download the season dataset");
        println!("  3. Run 'hoops train' to train the classifier");
        println!("  4. Run 'hoops predict' to predict the target season");

        Ok(())
    }

    pub fn fetch(config: &Config) -> Result<()> {
        let fetcher = DatasetFetcher::new();
        let downloaded = fetcher.fetch(&config.data.dataset_url, &config.data.raw_data_path)?;

        if downloaded {
            println!("Downloaded dataset to {}", config.data.raw_data_path);
        } else {
            println!("Dataset already cached at {}", config.data.raw_data_path);
        }

        Ok(())
    }

    pub fn engineer(config: &Config) -> Result<()> {
        if !Path::new(&config.data.raw_data_path).exists() {
            return Err(HoopsError::Config(format!(
                "No raw dataset at {}. Run 'hoops fetch' first.",
                config.data.raw_data_path
            )));
        }

        let records = store::read_season_records(&config.data.raw_data_path)?;
        println!("Loaded {} team-seasons", records.len());

        let engineered = engineer_features(&records)?;
        store::write_engineered_records(&config.data.engineered_data_path, &engineered)?;
        println!(
            "Wrote {} engineered records to {}",
            engineered.len(),
            config.data.engineered_data_path
        );

        Ok(())
    }

    pub fn train(config: &Config, year: Option<i32>) -> Result<()> {
        if !Path::new(&config.data.engineered_data_path).exists() {
            return Err(HoopsError::Config(format!(
                "No engineered dataset at {}. Run 'hoops engineer' first.",
                config.data.engineered_data_path
            )));
        }

        let target_year = year.unwrap_or(config.pipeline.target_year);
        let records = store::read_engineered_records(&config.data.engineered_data_path)?;
        println!("Loaded {} engineered records", records.len());

        let split = split_by_year(records, target_year)?;
        println!(
            "  {} training records, {} held out for {}",
            split.train.len(),
            split.inference.len(),
            target_year
        );

        let trainer = Trainer::new(config.model.clone());
        let model = trainer.train(&split.train)?;
        model.save(&config.data.model_path)?;
        println!("Model saved to {}", config.data.model_path);

        Ok(())
    }

    pub fn predict(config: &Config, year: Option<i32>) -> Result<()> {
        if !Path::new(&config.data.engineered_data_path).exists() {
            return Err(HoopsError::Config(format!(
                "No engineered dataset at {}. Run 'hoops engineer' first.",
                config.data.engineered_data_path
            )));
        }

        let predictor = Predictor::load(&config.data.model_path)?;

        let target_year = year.unwrap_or(config.pipeline.target_year);
        let records = store::read_engineered_records(&config.data.engineered_data_path)?;
        let split = split_by_year(records, target_year)?;
        println!("Predicting {} teams for {}", split.inference.len(), target_year);

        let predictions = predictor.predict(&split.inference)?;
        store::write_predictions(&config.data.predictions_path, &predictions)?;
        println!(
            "Wrote {} predictions to {}",
            predictions.len(),
            config.data.predictions_path
        );

        Ok(())
    }

    pub fn publish(config: &Config) -> Result<()> {
        if !Path::new(&config.data.predictions_path).exists() {
            return Err(HoopsError::Config(format!(
                "No predictions at {}. Run 'hoops predict' first.",
                config.data.predictions_path
            )));
        }

        let predictions = store::read_predictions(&config.data.predictions_path)?;
        let mut sink = PredsSink::open(&config.data.sink_path)?;
        let count = sink.publish(&predictions)?;
        println!("Published {} predictions to {}", count, config.data.sink_path);

        Ok(())
    }

    pub fn run(config: &Config, year: Option<i32>) -> Result<()> {
        fetch(config)?;
        engineer(config)?;
        train(config, year)?;
        predict(config, year)?;
        publish(config)?;

        println!("\nPipeline complete.");
        Ok(())
    }

    pub fn status(config: &Config) -> Result<()> {
        let mark = |path: &str| {
            if Path::new(path).exists() {
                "present"
            } else {
                "missing"
            }
        };

        println!("Pipeline Status");
        println!("───────────────────────────────");
        println!(
            "  Raw dataset:  {} ({})",
            config.data.raw_data_path,
            mark(&config.data.raw_data_path)
        );
        println!(
            "  Engineered:   {} ({})",
            config.data.engineered_data_path,
            mark(&config.data.engineered_data_path)
        );
        println!(
            "  Model:        {} ({})",
            config.data.model_path,
            mark(&config.data.model_path)
        );
        println!(
            "  Predictions:  {} ({})",
            config.data.predictions_path,
            mark(&config.data.predictions_path)
        );

        let sink = PredsSink::open(&config.data.sink_path)?;
        println!(
            "  Published:    {} rows in {}",
            sink.count()?,
            config.data.sink_path
        );
        println!("  Target year:  {}", config.pipeline.target_year);

        Ok(())
    }
}
