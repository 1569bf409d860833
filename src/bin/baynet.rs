//! Baynet CLI - exact Bayesian network queries from the command line
//!
//! Usage:
//!   baynet diagnose --asia yes --xray abnormal          # Asia network diagnosis
//!   baynet query -n net.json -q Cancer -e Smoking=true  # Posterior from a network document
//!   baynet query -n net.json -q Cancer -o json          # Output results as JSON

use clap::{Parser, Subcommand};
use baynet::diagnostics::Diagnostics;
use baynet::engine::document::load_network_json;
use baynet::{BayesError, Distribution, Evidence, InferenceEngine};
use std::path::PathBuf;
use std::process;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "baynet")]
#[command(version)]
#[command(about = "Baynet - exact inference for discrete Bayesian networks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: summary or json
    #[arg(short, long, global = true, default_value = "summary", value_name = "FORMAT")]
    output: String,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Diagnose TB, lung cancer, or bronchitis with the Asia network
    Diagnose {
        /// Visit to Asia: Yes, No, or NA
        #[arg(long, default_value = "NA")]
        asia: String,

        /// Smoking: Yes, No, or NA
        #[arg(long, default_value = "NA")]
        smoking: String,

        /// X-ray result: Abnormal, Normal, or NA
        #[arg(long, default_value = "NA")]
        xray: String,

        /// Dyspnea: Present, Absent, or NA
        #[arg(long, default_value = "NA")]
        dyspnea: String,
    },

    /// Compute a posterior from a JSON network document
    Query {
        /// Path to the network document
        #[arg(short, long, value_name = "FILE")]
        network: PathBuf,

        /// Variable to query
        #[arg(short, long, value_name = "NAME")]
        query: String,

        /// Observation as NAME=VALUE (repeatable)
        #[arg(short, long, value_name = "NAME=VALUE")]
        evidence: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error installing logger: {}", e);
    }

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), BayesError> {
    match &cli.command {
        Commands::Diagnose { asia, smoking, xray, dyspnea } => {
            let diagnosis = Diagnostics::new()?.diagnose(asia, smoking, xray, dyspnea)?;
            match cli.output.as_str() {
                "json" => println!("{}", to_json(&diagnosis)?),
                _ => println!("{}", diagnosis),
            }
        }
        Commands::Query { network, query, evidence } => {
            let source = std::fs::read_to_string(network).map_err(|e| {
                BayesError::Config(format!("Error reading file '{}': {}", network.display(), e))
            })?;
            let model = load_network_json(&source)?;
            let evidence = Evidence::parse_pairs(evidence, &model)?;
            let posterior = InferenceEngine::new().ask(query, &evidence, &model)?;
            match cli.output.as_str() {
                "json" => println!("{}", to_json(&posterior)?),
                _ => print_summary(query, &posterior),
            }
        }
    }
    Ok(())
}

fn print_summary(query: &str, posterior: &Distribution) {
    println!("P({} | evidence):", query);
    for (value, p) in posterior.iter() {
        println!("  {:<12} {:.6}", value.to_string(), p);
    }
    if let Some((value, p)) = posterior.most_likely() {
        println!("Most likely: {} ({:.2}%)", value, p * 100.0);
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, BayesError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| BayesError::Internal(format!("Error serializing to JSON: {}", e)))
}
