use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

use undertone_core::config::{load_config, EstimatorConfig};
use undertone_core::decoders::decode_image;
use undertone_core::dispatcher::PipelineDispatcher;
use undertone_core::estimator::estimate_filter;
use undertone_core::exporters::export_png;

#[derive(Parser)]
#[command(name = "undertone")]
#[command(version, about = "Automatic underwater image color correction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Correct an image and write the result as PNG
    Correct {
        /// Input file (PNG or JPEG)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (defaults to <stem>_corrected.png next to the input)
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Estimator config file (YAML)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Number of parallel threads
        #[arg(short = 'j', long, value_name = "N")]
        threads: Option<usize>,
    },

    /// Estimate a filter and print it without applying
    Analyze {
        /// Input file (PNG or JPEG)
        input: PathBuf,

        /// Estimator config file (YAML)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Correct {
            input,
            out,
            config,
            threads,
        } => run_correct(&input, out, config.as_deref(), threads),
        Commands::Analyze { input, config } => run_analyze(&input, config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_correct(
    input: &Path,
    out: Option<PathBuf>,
    config: Option<&Path>,
    threads: Option<usize>,
) -> Result<(), String> {
    if let Some(n) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
    }

    let config = load_estimator_config(config);
    let buffer = decode_image(input)?;
    println!(
        "Loaded {} ({}x{})",
        input.display(),
        buffer.width,
        buffer.height
    );

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to start async runtime: {}", e))?;
    let corrected = runtime.block_on(async {
        let mut dispatcher = PipelineDispatcher::new(config);
        dispatcher.run(buffer).await
    })?;

    let output_path = out.unwrap_or_else(|| default_output_path(input));
    export_png(&corrected, &output_path)?;
    println!("Wrote {}", output_path.display());

    Ok(())
}

fn run_analyze(input: &Path, config: Option<&Path>) -> Result<(), String> {
    let config = load_estimator_config(config);
    let buffer = decode_image(input)?;
    let filter = estimate_filter(&buffer, &config)?;

    let json = serde_json::to_string_pretty(&filter)
        .map_err(|e| format!("Failed to serialize filter: {}", e))?;
    println!("{}", json);

    Ok(())
}

fn load_estimator_config(path: Option<&Path>) -> EstimatorConfig {
    let handle = load_config(path);
    for warning in &handle.warnings {
        eprintln!("Warning: {}", warning);
    }
    if let Some(source) = &handle.source {
        log::info!("Loaded estimator config from {}", source.display());
    }
    handle.config
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    input.with_file_name(format!("{}_corrected.png", stem))
}
