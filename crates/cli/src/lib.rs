mod cat;
mod load;
mod locate;
pub mod sources;

use clap::{Parser, Subcommand};
use classvfs_core::ClasspathConfig;
use classvfs_core::logging::init_logging;
use std::path::PathBuf;
use tracing::debug;

pub use sources::SourceArgs;

#[derive(Parser, Debug)]
#[command(
    name = "classvfs",
    version,
    about = "Inspect a virtual classpath built from archives and directories",
    long_about = "classvfs stacks archives, archives with nested libs/ archives and plain \
                  classpath entries into one read-only namespace. Sources are searched in \
                  order: fat archives, archives, then classpath entries."
)]
pub struct Cli {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// JSON configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Also log to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the resource at a path; directories print their listing
    Cat {
        #[arg(value_name = "PATH")]
        path: String,
    },
    /// Print the manifest in canonical form
    Manifest,
    /// Load a unit through a class-file host and report it
    Load {
        /// Dotted unit name, e.g. com.example.Main
        #[arg(value_name = "UNIT")]
        name: String,
        /// Link the unit after defining it
        #[arg(long)]
        link: bool,
    },
    /// Print every locator for a resource name, parent ones first
    Locate {
        #[arg(value_name = "NAME")]
        name: String,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ClasspathConfig::load(path)?,
        None => ClasspathConfig::default(),
    };
    let _guard = init_logging("classvfs", &config.log_dir, &config.log_filter, cli.verbose);
    debug!("Configuration: {:?}", config);

    let provider = cli.sources.build(&config)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Cat { path } => cat::run(provider.as_ref(), &path, &mut out),
        Commands::Manifest => cat::manifest(provider.as_ref(), &mut out),
        Commands::Load { name, link } => load::run(provider, &config, &name, link, &mut out),
        Commands::Locate { name } => locate::run(provider, &config, &name, &mut out),
    }
}
