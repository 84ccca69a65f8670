//! slmask: parse, merge and preview SoftLayer object masks.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "slmask")]
#[command(about = "slmask - parse, merge and preview SoftLayer object masks")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG is honoured otherwise)
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a mask and print its canonical form
    #[command(visible_alias = "p")]
    Parse {
        /// Object mask (e.g. "mask[id,datacenter.name]")
        mask: String,

        /// Print the property tree instead of the mask string
        #[arg(short = 't', long = "tree")]
        tree: bool,
    },

    /// Merge several masks into one
    #[command(visible_alias = "m")]
    Merge {
        /// Object masks to merge, in order
        #[arg(required = true)]
        masks: Vec<String>,
    },

    /// Turn a JSON mask literal into mask syntax
    Flatten {
        /// JSON string, array or object (e.g. '{"mask": ["id", {"datacenter": "name"}]}')
        json: String,
    },

    /// Print the request a call would send, without sending it
    #[command(visible_alias = "r")]
    Request {
        /// Service name (e.g. Account or SoftLayer_Hardware_Server)
        service: String,

        /// Remote method (e.g. getObject)
        method: String,

        /// Object id to scope the call to
        #[arg(short = 'i', long = "id")]
        id: Option<String>,

        /// Object mask; repeat to merge several
        #[arg(short = 'm', long = "mask")]
        masks: Vec<String>,

        /// First result to return
        #[arg(long = "offset", default_value = "0")]
        offset: i64,

        /// Number of results to return
        #[arg(short = 'l', long = "limit")]
        limit: Option<i64>,

        /// Object filter as a JSON object
        #[arg(short = 'f', long = "filter")]
        filter: Option<String>,

        /// Method arguments as JSON values
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },

    /// Show the effective configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let result = match cli.command {
        Commands::Parse { mask, tree } => commands::parse(&mask, tree),
        Commands::Merge { masks } => commands::merge(&masks),
        Commands::Flatten { json } => commands::flatten(&json),
        Commands::Request { service, method, id, masks, offset, limit, filter, args } => {
            let options = commands::RequestOptions {
                id: id.as_deref(),
                masks: &masks,
                window: limit.map(|limit| (offset, limit)),
                filter: filter.as_deref(),
            };
            commands::request(&service, &method, &options, &args)
        }
        Commands::Config => commands::config(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
