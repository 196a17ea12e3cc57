// src/cli.rs
// =============================================================================
// The command-line interface, defined with clap's derive API.
//
// Global options (API URL, request limit, verbosity) can also be set through
// environment variables, so a CI job or a shell profile can configure the
// tool once.
// =============================================================================

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::{DEFAULT_API_URL, DEFAULT_MAX_REQUESTS};

#[derive(Parser, Debug)]
#[command(
    name = "repo-explorer",
    version,
    about = "Explore public GitHub repositories from the terminal",
    long_about = "repo-explorer fetches a repository's metadata, its complete file tree and its readme \
                  from the GitHub API, and lets you preview or download individual files."
)]
pub struct Cli {
    /// Base URL of the GitHub REST API
    #[arg(long, global = true, env = "REPO_EXPLORER_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Maximum number of API requests in flight at once
    #[arg(long, global = true, env = "REPO_EXPLORER_MAX_REQUESTS", default_value_t = DEFAULT_MAX_REQUESTS)]
    pub max_requests: usize,

    /// More diagnostics on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the repository overview and its complete file tree
    ///
    /// Example: repo-explorer tree https://github.com/rust-lang/rust
    Tree {
        /// Repository URL or owner/name
        repo: String,

        /// Print the repository, tree and readme as JSON
        #[arg(long)]
        json: bool,

        /// Only display this many levels of the tree (0 prints just the counts)
        #[arg(long)]
        depth: Option<usize>,

        /// Also print the readme below the tree
        #[arg(long)]
        readme: bool,
    },

    /// Show repository metadata and a copyable summary
    Info {
        /// Repository URL or owner/name
        repo: String,

        /// Print the metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the repository's readme
    Readme {
        /// Repository URL or owner/name
        repo: String,
    },

    /// Print a file, or download it with --output
    ///
    /// Example: repo-explorer cat tokio-rs/tokio tokio/src/lib.rs
    Cat {
        /// Repository URL or owner/name
        repo: String,

        /// Path of the file inside the repository
        path: String,

        /// Write the file's bytes here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the github.com link for the repository or one of its files
    Browse {
        /// Repository URL or owner/name
        repo: String,

        /// Path of a file inside the repository
        path: Option<String>,
    },

    /// Interactive session: open repositories and preview files
    Shell {
        /// Repository to open right away
        repo: Option<String>,
    },
}
