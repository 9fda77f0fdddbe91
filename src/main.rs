use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "om")]
#[command(about = "Orgmine - mine organizational hierarchies from flat employee-manager records")]
#[command(version)]
struct Cli {
    /// Path to the orgmine directory (default: .orgmine in current dir)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Output as JSON for machine consumption
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new orgmine working directory
    Init,

    /// Ingest a CSV of person/manager records into the adjacency mapping
    Ingest {
        /// Path to the CSV file (must have a header row)
        file: PathBuf,

        /// Header name of the person id column (overrides config)
        #[arg(long)]
        id_column: Option<String>,

        /// Header name of the manager id column (overrides config)
        #[arg(long)]
        manager_column: Option<String>,
    },

    /// Gauge hierarchy richness: count nodes on paths longer than two hops
    Analyze,

    /// Check the adjacency mapping for consistency issues
    Check,

    /// Extract the spanning forest from the adjacency mapping
    Extract {
        /// Rebuild even if a forest has already been extracted
        #[arg(long)]
        force: bool,
    },

    /// Per-tree statistics (max depth, min depth, node count)
    Stats {
        /// Write the table as CSV to this path instead of printing it
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Apply a role book to one tree and store the labeled copy
    Label {
        /// Path to a role book TOML file
        #[arg(long)]
        roles: PathBuf,

        /// Name to store the labeled tree under (e.g. wide, deep, balance)
        #[arg(long = "as")]
        name: String,

        /// Forest index of the tree to label
        #[arg(long)]
        tree: usize,
    },

    /// Print one tree as an indented outline
    Show {
        /// Forest index of a raw tree
        #[arg(long)]
        tree: Option<usize>,

        /// Name of a labeled tree
        #[arg(long)]
        labeled: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let orgmine_dir = cli.dir.unwrap_or_else(|| PathBuf::from(".orgmine"));

    match cli.command {
        Commands::Init => commands::init::run(&orgmine_dir),
        Commands::Ingest {
            file,
            id_column,
            manager_column,
        } => commands::ingest::run(
            &orgmine_dir,
            &file,
            id_column.as_deref(),
            manager_column.as_deref(),
            cli.json,
        ),
        Commands::Analyze => commands::analyze::run(&orgmine_dir, cli.json),
        Commands::Check => commands::check::run(&orgmine_dir, cli.json),
        Commands::Extract { force } => commands::extract::run(&orgmine_dir, force, cli.json),
        Commands::Stats { out } => commands::stats::run(&orgmine_dir, out.as_deref(), cli.json),
        Commands::Label { roles, name, tree } => {
            commands::label::run(&orgmine_dir, &roles, &name, tree, cli.json)
        }
        Commands::Show { tree, labeled } => {
            commands::show::run(&orgmine_dir, tree, labeled.as_deref())
        }
    }
}
