//! Tennis odds prediction CLI
//!
//! Fill in the match form and get the predicted odds for both players.

use clap::{Parser, Subcommand};
use tennis::{Config, Result};

#[derive(Parser)]
#[command(name = "tennis")]
#[command(about = "Tennis match odds prediction from a pre-trained model", long_about = None)]
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
    /// Initialize a new project with default config
    Init,
    /// Show the input form with the allowed choices
    Form,
    /// Predict odds for one match
    Predict {
        /// JSON file with field values
        #[arg(long)]
        input: Option<String>,
        /// Set a field value, e.g. --set Surface=Clay (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Fill in the form on the terminal and predict until `q`
    Interactive,
    /// Show model and artifact information
    Info,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
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
        log::debug!("No config at {}, using defaults", cli.config);
        Config::default()
    };

    let result = match cli.command {
        Commands::Init => commands::init(&cli.config),
        Commands::Form => commands::form(&config),
        Commands::Predict { input, set, format } => commands::predict(&config, input, set, format),
        Commands::Interactive => commands::interactive(&config),
        Commands::Info => commands::info(&config),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", e.title(), e.user_message());
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use burn::backend::NdArray;
    use std::io::Write;
    use tennis::artifacts::{Artifacts, EncoderBundle};
    use tennis::form::{prompt_form, Form, FormValues};
    use tennis::predict::{format_prediction, format_prediction_csv, Predictor};

    type MyBackend = NdArray<f32>;

    fn load_predictor(config: &Config) -> Result<Predictor<MyBackend>> {
        Predictor::<MyBackend>::load(config, Default::default())
    }

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all("model")?;
        println!("Created model/ directory");

        println!("\nNext steps:");
        println!("  1. Place the trained artifacts in model/:");
        println!("       {}", config.model_file());
        println!("       {}", config.artifacts.scalers_path);
        println!("       {}", config.artifacts.encoders_path);
        println!("       {}", config.artifacts.features_path);
        println!("  2. Run 'tennis form' to see the input fields");
        println!("  3. Run 'tennis interactive' to make predictions");

        Ok(())
    }

    pub fn form(config: &Config) -> Result<()> {
        let encoders = EncoderBundle::load(&config.artifacts.encoders_path)?;
        print!("{}", Form::build(&encoders).render());
        Ok(())
    }

    pub fn predict(
        config: &Config,
        input: Option<String>,
        set: Vec<String>,
        format: OutputFormat,
    ) -> Result<()> {
        let predictor = load_predictor(config)?;

        let mut values = match input {
            Some(path) => {
                let content = std::fs::read_to_string(&path)?;
                let json: serde_json::Value = serde_json::from_str(&content)?;
                FormValues::from_json(&json)?
            }
            None => FormValues::new(),
        };
        for assignment in &set {
            values.set_assignment(assignment)?;
        }

        let prediction = predictor.predict(&values)?;

        match format {
            OutputFormat::Table => print!("{}", format_prediction(&prediction)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&prediction)?),
            OutputFormat::Csv => print!("{}", format_prediction_csv(&prediction)),
        }

        Ok(())
    }

    pub fn interactive(config: &Config) -> Result<()> {
        let predictor = load_predictor(config)?;
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();

        writeln!(output, "Tennis Match Prediction")?;
        writeln!(output, "Press enter to keep the previous answer, q to quit.")?;

        let mut values = FormValues::new();
        while let Some(entered) = prompt_form(predictor.form(), &values, &mut input, &mut output)? {
            match predictor.predict(&entered) {
                Ok(prediction) => writeln!(output, "\n{}", format_prediction(&prediction))?,
                Err(e) => {
                    log::debug!("Prediction failed: {}", e);
                    writeln!(output, "\n{}: {}\n", e.title(), e.user_message())?;
                }
            }
            values = entered;
        }

        Ok(())
    }

    pub fn info(config: &Config) -> Result<()> {
        let artifacts = Artifacts::load(&config.artifacts)?;
        let model_file = config.model_file();
        let hidden: Vec<String> = config.model.hidden_dims.iter().map(|d| d.to_string()).collect();

        println!("Model Information");
        println!("───────────────────────────────");
        println!("  Path:            {}", model_file);
        println!(
            "  Present:         {}",
            if std::path::Path::new(&model_file).exists() { "yes" } else { "no" }
        );
        println!(
            "  Layers:          {} → [{}] → {}",
            artifacts.features.input_dim(),
            hidden.join(", "),
            artifacts.features.output_dim()
        );
        println!("  Outputs:         {}", artifacts.features.output_features.join(", "));
        println!(
            "  Encoded fields:  {}",
            artifacts.encoders.fields().collect::<Vec<_>>().join(", ")
        );
        println!("  Input features:");
        for (i, name) in artifacts.features.input_features.iter().enumerate() {
            println!("    {:>3}. {}", i + 1, name);
        }

        Ok(())
    }
}
