//! LabelForge CLI - drives the label pipeline
//!
//! Commands: render (dry run), print, printers
//! Outputs JSON to stdout
//! Returns non-zero on pipeline failure

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use labelforge_core::{
    pipeline::{PipelineConfig, PrintPipeline, RunMode},
    printer::{DymoWebService, DEFAULT_HOST, DEFAULT_PORT},
};

#[derive(Parser)]
#[command(name = "labelforge-cli")]
#[command(about = "LabelForge CLI - Thermal Label Compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the label table
    #[arg(long, default_value = "input/labels.csv")]
    labels: PathBuf,

    /// Path to the image table
    #[arg(long, default_value = "input/images.csv")]
    images: PathBuf,

    /// Path to the label template
    #[arg(long, default_value = "template.dymo")]
    template: PathBuf,

    /// Label service host
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Label service port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every label to a PNG file (dry run)
    Render {
        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// Print every label on the first discovered printer
    Print,

    /// List discovered label printers
    Printers,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let service = match DymoWebService::new(&cli.host, cli.port) {
        Ok(s) => s,
        Err(e) => {
            eprintln!(r#"{{"error": "Failed to reach label service: {}"}}"#, e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("LabelForge v{}", labelforge_core::ENGINE_VERSION);

    let (mode, output_dir) = match &cli.command {
        Commands::Printers => {
            return match service.list_printers().await {
                Ok(printers) => {
                    println!("{}", serde_json::to_string_pretty(&printers).unwrap());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!(r#"{{"error": "{}"}}"#, e);
                    ExitCode::FAILURE
                }
            };
        }
        Commands::Render { output } => (RunMode::DryRun, output.clone()),
        Commands::Print => (RunMode::Print, PathBuf::from("output")),
    };

    let config = PipelineConfig {
        labels_csv: cli.labels,
        images_csv: cli.images,
        template: cli.template,
        output_dir,
        mode,
    };

    match PrintPipeline::new(service, config).run().await {
        Ok(summary) => {
            let output = serde_json::json!({
                "success": true,
                "run": summary,
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
            ExitCode::SUCCESS
        }
        Err(e) => {
            let output = serde_json::json!({
                "success": false,
                "error": e.to_string(),
            });
            println!("{}", serde_json::to_string(&output).unwrap());
            ExitCode::from(2)
        }
    }
}
