//! CLI command definitions for the `shopbot` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod chat;
pub mod history;
pub mod link;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with the gift shop assistant.
#[derive(Parser)]
#[command(name = "shopbot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit log lines as JSON.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Data directory (defaults to $SHOPBOT_DATA_DIR, then ~/.shopbot).
    #[arg(long, global = true, env = "SHOPBOT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session.
    Chat {
        /// Skip sign-in and keep the conversation in session storage only.
        #[arg(long)]
        local: bool,
    },

    /// Send one query and print the normalized reply.
    Ask {
        /// Query text.
        text: String,
    },

    /// Print the stored conversation of the signed-in account.
    #[command(alias = "log")]
    History,

    /// Print an outbound contact link.
    Link {
        #[command(subcommand)]
        target: LinkTarget,
    },

    /// Forget the stored anonymous account.
    #[command(name = "sign-out")]
    SignOut,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum LinkTarget {
    /// Purchase link for a product.
    Product {
        /// Product name.
        name: String,
    },

    /// General contact link.
    Contact {
        /// Prefilled message (defaults to the standard inquiry text).
        text: Option<String>,
    },
}
