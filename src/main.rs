use clap::Parser;
use datemark::config::{self, ConfigError, Position, WatermarkConfig};
use datemark::pipeline;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "datemark")]
#[command(version)]
#[command(about = "Adds date watermarks to images based on their EXIF data")]
#[command(long_about = "\
Adds date watermarks to images based on their EXIF data.

The date is taken from the capture-time EXIF tags when present, falling back
to the file's modification date. Stamped copies are written to a sibling
<name>_watermark directory; originals are never modified.

Examples:
  datemark -i /path/to/images
  datemark -i /path/to/image.jpg -s 32 -c '#FF0000' -p TOP_LEFT
  datemark -i /path/to/images -s 28 -c FFFFFF -p BOTTOM_RIGHT -o 0.7")]
struct Cli {
    /// Input image file or directory path
    #[arg(short, long)]
    input: PathBuf,

    /// Font size for the watermark
    #[arg(short = 's', long, default_value = "24")]
    size: String,

    /// Watermark color in hex format, leading '#' optional
    #[arg(short, long, default_value = "#FFFFFF")]
    color: String,

    /// Watermark position: TOP_LEFT, TOP_RIGHT, BOTTOM_LEFT, BOTTOM_RIGHT, CENTER
    #[arg(short, long, default_value = "BOTTOM_RIGHT")]
    position: String,

    /// Watermark opacity (0.0-1.0)
    #[arg(short, long, default_value = "0.8")]
    opacity: String,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and exit 0; genuine argument
            // errors exit 1.
            let failed = e.use_stderr();
            let _ = e.print();
            return if failed {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: invalid configuration - {e}");
            return ExitCode::from(1);
        }
    };

    if !cli.input.exists() {
        eprintln!("Error: input path does not exist: {}", cli.input.display());
        return ExitCode::from(1);
    }

    match pipeline::run(&cli.input, config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Build the watermark config from CLI strings.
///
/// Unparsable values warn and keep the default (so a typo'd flag doesn't
/// abort a batch), but values that parse and are out of range are rejected
/// by the builder — that's a configuration error, not a typo.
fn build_config(cli: &Cli) -> Result<WatermarkConfig, ConfigError> {
    let mut builder = WatermarkConfig::builder();

    match cli.size.parse::<u32>() {
        Ok(size) => builder = builder.font_size(size),
        Err(_) => eprintln!("Warning: invalid font size '{}', using default", cli.size),
    }

    match config::parse_hex_color(&cli.color) {
        Ok(color) => builder = builder.color(color),
        Err(_) => eprintln!("Warning: invalid color format '{}', using default", cli.color),
    }

    match cli.position.parse::<Position>() {
        Ok(position) => builder = builder.position(position),
        Err(_) => eprintln!(
            "Warning: invalid position '{}', using default. \
             Valid positions: TOP_LEFT, TOP_RIGHT, BOTTOM_LEFT, BOTTOM_RIGHT, CENTER",
            cli.position
        ),
    }

    match cli.opacity.parse::<f32>() {
        Ok(opacity) => builder = builder.opacity(opacity),
        Err(_) => eprintln!("Warning: invalid opacity '{}', using default", cli.opacity),
    }

    builder.build()
}

/// Diagnostics go to stderr via tracing; user-facing progress stays on
/// stdout. Default level is `warn`, overridable with `RUST_LOG`.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
