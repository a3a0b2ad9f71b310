//! iOSProbe - Discover the iOS build toolchain on a macOS workstation.

mod render;

use clap::{Args, Parser, Subcommand, ValueEnum};
use iosprobe_collector::cache::process_cache;
use iosprobe_collector::{Collector, DetectOptions, ProbeConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "iosprobe")]
#[command(
    author,
    version,
    about = "Discover Xcode installations, signing identities and provisioning profiles"
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "json")]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

#[derive(Args)]
struct ProbeArgs {
    /// Ignore iOS SDK and simulator versions older than this
    #[arg(long)]
    min_sdk: Option<String>,

    /// Directory under which Developer, Applications and Volumes are searched
    #[arg(long, default_value = "/")]
    search_root: PathBuf,

    /// Provisioning profiles directory (defaults to ~/Library/MobileDevice/Provisioning Profiles)
    #[arg(long)]
    profiles_dir: Option<PathBuf>,

    /// Write the output to a file instead of stdout
    #[arg(long, short)]
    out: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe everything and print the full snapshot
    Detect(ProbeArgs),

    /// Print Xcode installations only
    Xcode(ProbeArgs),

    /// Print signing identities only
    Identities(ProbeArgs),

    /// Print provisioning profiles only
    Profiles(ProbeArgs),

    /// Print the keychain search list only
    Keychains(ProbeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let (section, args) = match cli.command {
        Commands::Detect(args) => (render::Section::All, args),
        Commands::Xcode(args) => (render::Section::Xcode, args),
        Commands::Identities(args) => (render::Section::Identities, args),
        Commands::Profiles(args) => (render::Section::Profiles, args),
        Commands::Keychains(args) => (render::Section::Keychains, args),
    };

    let config = ProbeConfig {
        search_root: args.search_root,
        profiles_dir: args.profiles_dir,
        ..ProbeConfig::with_options(DetectOptions {
            min_sdk: args.min_sdk,
        })
    };
    let platform = config.platform;
    let collector = Collector::new(config);

    let Some(snapshot) = process_cache().get_or_probe(&collector).await else {
        anyhow::bail!(
            "iOS toolchain discovery requires a macOS host (running on {})",
            platform
        );
    };

    let output = match cli.format {
        Format::Json => serde_json::to_string_pretty(&render::json_section(&snapshot, section)?)?,
        Format::Text => render::text_section(&snapshot, section),
    };

    match args.out {
        Some(path) => {
            std::fs::write(&path, output)?;
            info!("Snapshot written to {:?}", path);
        }
        None => println!("{}", output),
    }

    Ok(())
}
