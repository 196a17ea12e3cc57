// src/main.rs
// =============================================================================
// Entry point of the repo-explorer CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and build the GitHub gateway from the configuration
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = nothing to show, 2 = error)
// =============================================================================

mod cli;
mod config;
mod error;
mod explorer;
mod github;
mod logging;
mod render;
mod shell;
mod tree;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands};
use config::Config;
use error::ExploreError;
use explorer::{fetch_file_content, fetch_readme, load_repository};
use github::{parse_repo_identifier, ContentSource, GithubGateway};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Typed failures get the friendly message, anything else its chain
            match e.downcast_ref::<ExploreError>() {
                Some(explore_error) => {
                    tracing::debug!(status = ?explore_error.status(), error = %explore_error, "command failed");
                    eprintln!("Error: {}", explore_error.user_message());
                }
                None => eprintln!("Error: {:#}", e),
            }
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = Config::new(&cli.api_url, cli.max_requests)?;
    let gateway = Arc::new(GithubGateway::new(&config)?);

    match cli.command {
        Commands::Tree { repo, json, depth, readme } => handle_tree(&*gateway, &repo, json, depth, readme).await,
        Commands::Info { repo, json } => handle_info(&*gateway, &repo, json).await,
        Commands::Readme { repo } => handle_readme(&*gateway, &repo).await,
        Commands::Cat { repo, path, output } => handle_cat(&*gateway, &repo, &path, output).await,
        Commands::Browse { repo, path } => handle_browse(&*gateway, &repo, path.as_deref()).await,
        Commands::Shell { repo } => shell::run_shell(gateway, repo).await,
    }
}

// Handles the 'tree' subcommand
async fn handle_tree(
    source: &dyn ContentSource,
    input: &str,
    json: bool,
    depth: Option<usize>,
    show_readme: bool,
) -> Result<i32> {
    let repo = parse_repo_identifier(input)?;
    eprintln!("🔍 Analyzing repository {} ...", repo);

    let snapshot = load_repository(source, &repo).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(0);
    }

    println!("{}", render::overview(&snapshot.metadata));
    println!();
    print!("{}", render::structure(&snapshot, depth));

    if show_readme {
        match &snapshot.readme {
            Some(text) => {
                println!("\n📖 README\n");
                println!("{}", text);
            }
            None => println!("\n(no README found)"),
        }
    }

    Ok(0)
}

// Handles the 'info' subcommand
async fn handle_info(source: &dyn ContentSource, input: &str, json: bool) -> Result<i32> {
    let repo = parse_repo_identifier(input)?;
    let metadata = source.repository(&repo).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
    } else {
        println!("{}", render::overview(&metadata));
        println!();
        println!("{}", render::summary(&metadata));
    }
    Ok(0)
}

// Handles the 'readme' subcommand
async fn handle_readme(source: &dyn ContentSource, input: &str) -> Result<i32> {
    let repo = parse_repo_identifier(input)?;

    match fetch_readme(source, &repo).await? {
        Some(text) => {
            println!("{}", text);
            Ok(0)
        }
        None => {
            eprintln!("⚠️  {} has no README", repo);
            Ok(1)
        }
    }
}

// Handles the 'cat' subcommand: preview on stdout, or download to a file
async fn handle_cat(
    source: &dyn ContentSource,
    input: &str,
    path: &str,
    output: Option<std::path::PathBuf>,
) -> Result<i32> {
    let repo = parse_repo_identifier(input)?;
    let file = fetch_file_content(source, &repo, path).await?;

    match output {
        Some(target) => {
            tokio::fs::write(&target, &file.bytes)
                .await
                .with_context(|| format!("Could not write {}", target.display()))?;
            eprintln!("✅ Saved {} ({} bytes) to {}", file.path, file.bytes.len(), target.display());
        }
        None => {
            eprintln!("● {} [{}]", file.name, render::language_for(&file.name));
            print!("{}", file.text());
        }
    }
    Ok(0)
}

// Handles the 'browse' subcommand
async fn handle_browse(source: &dyn ContentSource, input: &str, path: Option<&str>) -> Result<i32> {
    let repo = parse_repo_identifier(input)?;
    // The default branch is only known from the metadata
    let metadata = source.repository(&repo).await?;

    match path {
        Some(path) => println!("{}", render::blob_url(&metadata, path)),
        None => println!("{}", metadata.html_url),
    }
    Ok(0)
}
