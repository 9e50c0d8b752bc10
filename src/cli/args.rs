//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Publish JSON DID documents as DNS TXT records and resolve them back
#[derive(Parser, Debug)]
#[command(name = "did-dnssec")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Config file layered over the global one
    #[arg(short, long, global = true, env = "DID_DNSSEC_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode a JSON document as a zone of TXT records
    Create {
        /// Base domain the records are published under
        #[arg(short, long)]
        base: String,

        /// JSON document to encode
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        did: PathBuf,

        /// Zone file to write (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// TTL of the records (default: from settings)
        #[arg(long)]
        ttl: Option<u32>,
    },

    /// Resolve a DID into its JSON document
    Resolve {
        /// DID to resolve, e.g. did:dnssec:example.com
        did: String,

        /// JSON file to write (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Answer from a zone file instead of DNS
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        zone: Option<PathBuf>,

        /// Print the resolved tree to stderr
        #[arg(long)]
        tree: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Print a commented config template
    Template,
}
