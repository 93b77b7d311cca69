use clap::{Parser, Subcommand};
use rayon::prelude::*;
use simple_collage::imaging::codec;
use simple_collage::{CollageOptions, ResampleFilter, config, create_collage, output, plan_layout};
use std::path::{Path, PathBuf};

/// Flags shared by commands that lay out images.
#[derive(clap::Args, Clone)]
struct LayoutArgs {
    /// Image files or directories (directories contribute their images in name order)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Row height hint in pixels (clamped to 100-1024)
    #[arg(long)]
    row_height: Option<u32>,

    /// Never let a row be taller than the row height
    #[arg(long)]
    cap_row_height: bool,
}

#[derive(Parser)]
#[command(name = "simple-collage")]
#[command(about = "Row-packed image collages")]
#[command(long_about = "\
Row-packed image collages

Images are dealt into about sqrt(N) rows, balanced by width. Each row is
scaled to the height of its shortest image, rows are brought to one shared
width, and the rows are stacked into a single image.

Examples:

  simple-collage build shots/*.png -o collage.png
  simple-collage build shots/ -o collage.jpg --filter lanczos3
  simple-collage plan shots/ --json

Settings are read from config.toml in the --config directory; flags
override the file. Run 'simple-collage gen-config' to generate a documented
config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Log pipeline internals to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a collage and write it to an image file
    Build {
        #[command(flatten)]
        layout: LayoutArgs,

        /// Output image (format from extension)
        #[arg(long, short)]
        output: PathBuf,

        /// Resampling filter: nearest, triangle, catmull-rom, lanczos3
        #[arg(long)]
        filter: Option<ResampleFilter>,

        /// Also write the rendered layout as JSON
        #[arg(long)]
        layout_json: Option<PathBuf>,
    },
    /// Print the layout for a set of images without decoding pixels
    Plan {
        #[command(flatten)]
        layout: LayoutArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if cli.verbose {
        init_tracing();
    }

    match cli.command {
        Command::Build {
            layout,
            output: out_path,
            filter,
            layout_json,
        } => {
            let mut settings = load_with_overrides(&cli.config, &layout)?;
            if let Some(filter) = filter {
                settings.resampling.filter = filter;
            }
            init_thread_pool(&settings.processing);
            let options = CollageOptions::from_config(&settings);

            let inputs = codec::collect_inputs(&layout.inputs)?;
            println!("==> Loading {} images", inputs.len());
            let images = inputs
                .par_iter()
                .map(|path| codec::load_image(path))
                .collect::<Result<Vec<_>, _>>()?;

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = create_collage(&images, &options, Some(tx));
            printer
                .join()
                .map_err(|_| "event printer thread panicked")?;
            let collage = result?;

            codec::save_image(&collage.image, &out_path)?;
            if let Some(json_path) = layout_json {
                let json = serde_json::to_string_pretty(&collage.plan)?;
                std::fs::write(&json_path, json)?;
                println!("==> Layout: {}", json_path.display());
            }
            println!("==> Collage complete: {}", out_path.display());
        }
        Command::Plan { layout, json } => {
            let settings = load_with_overrides(&cli.config, &layout)?;
            init_thread_pool(&settings.processing);
            let options = CollageOptions::from_config(&settings);

            let inputs = codec::collect_inputs(&layout.inputs)?;
            let dims = inputs
                .par_iter()
                .map(|path| codec::identify(path))
                .collect::<Result<Vec<_>, _>>()?;
            let plan = plan_layout(&dims, options.row_height_cap())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                output::print_plan(&plan);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load `config.toml` and apply the layout flags on top of it.
fn load_with_overrides(
    dir: &Path,
    layout: &LayoutArgs,
) -> Result<config::CollageConfig, config::ConfigError> {
    let mut settings = config::load_config(dir)?;
    if let Some(height) = layout.row_height {
        settings.collage.target_row_height = height;
    }
    if layout.cap_row_height {
        settings.collage.cap_row_height = true;
    }
    settings.validate()?;
    Ok(settings)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();
}
