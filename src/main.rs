use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use gungnir::backend::SketchKernel;
use gungnir::config::GenerationConfig;
use gungnir::journal::{JournalWriter, DEFAULT_ITERATIONS};
use gungnir::operations::GenerationLoop;
use gungnir::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

/// Randomized 2-D flow-domain geometry generator.
#[derive(Parser)]
#[command(name = "gungnir", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fill an output directory with labeled geometries
    Generate(GenerateArgs),
    /// Write a solver journal for meshes without results
    Journal(JournalArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of geometries the output directory should hold
    #[arg(short = 'n', long)]
    shapes: Option<usize>,

    #[arg(long)]
    min_tiles: Option<usize>,

    #[arg(long)]
    max_tiles: Option<usize>,

    /// Seed of the random source
    #[arg(long)]
    seed: Option<u64>,

    /// Invalid attempts tolerated per geometry
    #[arg(long)]
    max_attempts: Option<u32>,
}

impl GenerateArgs {
    fn into_config(self) -> Result<GenerationConfig> {
        let mut config = match &self.config {
            Some(path) => GenerationConfig::from_file(path)?,
            None => GenerationConfig::default(),
        };
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(shapes) = self.shapes {
            config.shapes = shapes;
        }
        if let Some(min) = self.min_tiles {
            config.min_tiles = min;
        }
        if let Some(max) = self.max_tiles {
            config.max_tiles = max;
        }
        if let Some(attempts) = self.max_attempts {
            config.max_attempts_per_shape = attempts;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

#[derive(Args)]
struct JournalArgs {
    /// Directory holding `.msh` files
    #[arg(long)]
    mesh_dir: PathBuf,

    /// Directory solver results are exported to
    #[arg(long)]
    results_dir: PathBuf,

    /// Base case read before the first mesh
    #[arg(long)]
    case: PathBuf,

    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: u32,

    #[arg(short, long, default_value = "journal.jou")]
    output: PathBuf,
}

fn generate(args: GenerateArgs) -> Result<()> {
    let config = args.into_config()?;
    let generator = GenerationLoop::from_config(&config)?;

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(seed, "seeded random source");
    println!("seed: {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let mut backend = SketchKernel::new(config.spline_segments);
    let report = generator.run(&mut backend, &mut rng)?;
    println!(
        "{} geometries in {} ({} new, {} rejected attempts)",
        report.total(),
        config.output_dir.display(),
        report.produced.len(),
        report.rejected
    );
    Ok(())
}

fn journal(args: JournalArgs) -> Result<()> {
    let count = JournalWriter::new(args.mesh_dir, args.results_dir, args.case)
        .with_iterations(args.iterations)
        .write(&args.output)?;
    println!("{count} meshes in {}", args.output.display());
    Ok(())
}

fn main() -> ExitCode {
    // Default: WARN for everything, INFO for gungnir.
    // Override with RUST_LOG env var (e.g. RUST_LOG=gungnir=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("gungnir=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Generate(args) => generate(args),
        Command::Journal(args) => journal(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
