//! Compress an image by reducing it to `num_clusters` colors.
//!
//! Usage:
//!   zenkmeans <input_image> <output_image> <num_clusters> <num_iterations>

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use env_logger::Env;

use zenkmeans::{CompressConfig, InitMethod};

#[derive(Parser)]
#[command(name = "zenkmeans")]
#[command(about = "Compress an image by k-means palette reduction")]
struct Args {
    /// Input image path
    input_image: PathBuf,

    /// Output image path; the format follows the extension
    output_image: PathBuf,

    /// Number of colors to keep
    #[arg(value_parser = parse_int, allow_hyphen_values = true)]
    num_clusters: i64,

    /// Number of training rounds
    #[arg(value_parser = parse_int, allow_hyphen_values = true)]
    num_iterations: i64,

    /// Seed for centroid initialization
    #[arg(long)]
    seed: Option<u64>,

    /// How initial centroids are chosen
    #[arg(long, value_enum, default_value_t = Init::Sample)]
    init: Init,
}

#[derive(Clone, Copy, ValueEnum)]
enum Init {
    /// Random colors, uniform per channel
    Uniform,
    /// Random pixels of the input image
    Sample,
}

impl From<Init> for InitMethod {
    fn from(init: Init) -> Self {
        match init {
            Init::Uniform => InitMethod::Uniform,
            Init::Sample => InitMethod::SampleData,
        }
    }
}

/// Integer parsing in the manner of C `atoi`: optional whitespace and sign,
/// then leading digits. Anything unparsable is 0, so that bad counts reach the
/// model and are rejected there.
fn parse_int(s: &str) -> Result<i64, std::convert::Infallible> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add((b - b'0') as i64);
    }
    Ok(if negative { -value } else { value })
}

/// Negative counts become 0.
fn to_count(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::init_from_env(Env::default().filter_or("RUST_LOG", "warn"));

    let mut config = CompressConfig::new()
        .clusters(to_count(args.num_clusters))
        .iterations(to_count(args.num_iterations))
        .init(args.init.into());
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }

    match zenkmeans::compress_image(&args.input_image, &args.output_image, &config) {
        Ok(_) => {
            println!(
                "Compressed image written to {}",
                args.output_image.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprint!("error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprint!(": {cause}");
                source = cause.source();
            }
            eprintln!();
            ExitCode::FAILURE
        }
    }
}
