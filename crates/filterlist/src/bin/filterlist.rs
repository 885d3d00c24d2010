use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use filterlist::compiler::checksum::{calculate_checksum, is_valid_checksum, parse_checksum};
use filterlist::config::{build_flags, parse_define};
use filterlist::{
    default_downloader, DownloadOptions, DownloadWithRawOptions, FilterListResult,
    HttpFetcherConfig,
};
use itertools::Itertools;
use tracing_subscriber::EnvFilter;

/// Filter list preprocessor
#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts {
    /// Log debug output
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    subcmd: SubCommand,
}

#[derive(Parser)]
enum SubCommand {
    Compile(Compile),
    Checksum(Checksum),
}

/// Download a list and resolve its conditions and includes
#[derive(Parser)]
struct Compile {
    /// URL or local path of the list
    source: String,

    /// Define a flag, as `name` or `name=false`. Overrides FILTERLIST_DEFINES.
    #[clap(short = 'D', long = "define", value_parser = parse_define)]
    defines: Vec<(String, bool)>,

    #[clap(long)]
    validate_checksum: bool,

    /// Reject lists without checksum. Implies --validate-checksum.
    #[clap(long)]
    strict_checksum: bool,

    #[clap(long)]
    allow_empty: bool,

    /// Write the unresolved downloaded text here
    #[clap(long)]
    raw_output: Option<PathBuf>,

    /// Request timeout in seconds
    #[clap(long, default_value_t = 30)]
    timeout: u64,
}

/// Verify the checksum header of a local list
#[derive(Parser)]
struct Checksum {
    file: PathBuf,

    /// Treat a missing checksum as invalid
    #[clap(long)]
    strict: bool,
}

async fn compile(args: Compile) -> FilterListResult<()> {
    let flags = build_flags(&args.defines)?;
    let downloader = default_downloader(HttpFetcherConfig {
        timeout: Duration::from_secs(args.timeout),
    });
    let validate_checksum = args.validate_checksum || args.strict_checksum;

    let filter = match &args.raw_output {
        Some(raw_output) => {
            let options = DownloadWithRawOptions::builder()
                .force(true)
                .flags(flags)
                .validate_checksum(validate_checksum)
                .validate_checksum_strict(args.strict_checksum)
                .allow_empty_response(args.allow_empty)
                .build()?;
            let result = downloader
                .download_with_raw(&args.source, &options)
                .await
                .with_context(|| format!("unable to compile {}", args.source))?;
            fs::write(raw_output, &result.raw_filter)
                .with_context(|| format!("unable to write {}", raw_output.display()))?;
            result.filter
        }
        None => {
            let options = DownloadOptions {
                validate_checksum,
                validate_checksum_strict: args.strict_checksum,
                allow_empty_response: args.allow_empty,
            };
            downloader
                .download(&args.source, Some(&flags), &options)
                .await
                .with_context(|| format!("unable to compile {}", args.source))?
        }
    };

    println!("{}", filter.iter().join("\n"));
    Ok(())
}

fn checksum(args: Checksum) -> FilterListResult<()> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("unable to read {}", args.file.display()))?;

    println!("{}", calculate_checksum(&content));
    match parse_checksum(&content) {
        Some(declared) => eprintln!("declared {declared}"),
        None => eprintln!("no checksum declared"),
    }

    if !is_valid_checksum(&content, args.strict) {
        bail!("invalid checksum in {}", args.file.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> FilterListResult<()> {
    let opts = Opts::parse();

    let filter = if opts.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match opts.subcmd {
        SubCommand::Compile(args) => compile(args).await,
        SubCommand::Checksum(args) => checksum(args),
    }
}
