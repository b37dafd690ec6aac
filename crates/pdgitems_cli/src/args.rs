use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pdgitems_core::group::GroupingStrategy;
use pdgitems_core::ResolvePolicy;

#[derive(Parser)]
#[command(name = "pdgitems")]
#[command(about = "Resolve, group and print PDG items")]
#[command(version)]
pub struct Cli {
    /// PDG SQLite database file
    #[arg(long, global = true, default_value = "pdg.sqlite")]
    pub db: PathBuf,

    /// TOML run configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Write rolling log files to this absolute directory instead of stderr
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Resolution policy, overrides the config file
    #[arg(long, global = true, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Grouping strategy, overrides the config file
    #[arg(long, global = true, value_enum)]
    pub grouping: Option<GroupingArg>,

    /// Edition used for categorization, overrides config and database
    #[arg(long, global = true)]
    pub edition: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PolicyArg {
    DownOnly,
    UpWhenEmpty,
    DownAndUp,
}

impl From<PolicyArg> for ResolvePolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::DownOnly => Self::DownOnly,
            PolicyArg::UpWhenEmpty => Self::UpWhenEmpty,
            PolicyArg::DownAndUp => Self::DownAndUp,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum GroupingArg {
    FirstMatch,
    UnionFind,
}

impl From<GroupingArg> for GroupingStrategy {
    fn from(value: GroupingArg) -> Self {
        match value {
            GroupingArg::FirstMatch => Self::FirstMatch,
            GroupingArg::UnionFind => Self::UnionFind,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write one HTML printout per category plus summary.json
    Printouts {
        /// Output directory; must be absent or empty
        #[arg(short, long, default_value = "printouts")]
        out_dir: PathBuf,
    },

    /// Resolve one item by exact name
    Resolve {
        /// Item name, e.g. "pi+-"
        name: String,
    },

    /// Show the particles of an identifier and the items referring to them
    Inspect {
        /// Identifier, e.g. S008
        pdgid: String,
    },

    /// Look up a particle by name or Monte Carlo id and print its best mass
    Particle {
        /// Particle name, e.g. "pi+"
        #[arg(long, conflicts_with = "mcid")]
        name: Option<String>,

        /// Monte Carlo id; the sign is ignored
        #[arg(long, allow_hyphen_values = true)]
        mcid: Option<i64>,

        /// Match the name case-sensitively
        #[arg(long, requires = "name")]
        case_sensitive: bool,
    },

    /// List identifiers of Monte Carlo particles without a usable mass
    AuditMasses {
        /// CSV output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
