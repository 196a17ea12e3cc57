// src/shell.rs
// =============================================================================
// Interactive session.
//
// Lines are read from stdin while repository loads run as spawned tasks.
// Each load is tagged with a Generation from the Session; when a load
// finishes it is applied only if nothing newer was requested meanwhile, so
// typing a second repository while the first is still loading always ends
// with the second one on screen.
//
// Commands:
//   <repo> | open <repo>   start loading a repository
//   tree [depth]           show the current tree
//   info                   overview and summary
//   readme                 print the readme
//   cat <path>             preview a file
//   browse [path]          github.com link
//   help, quit
// =============================================================================

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::ExploreResult;
use crate::explorer::{fetch_file_content, load_repository, Generation, LoadOutcome, RepositorySnapshot, Session};
use crate::github::{parse_repo_identifier, ContentSource, RepoRef};
use crate::render;
use crate::tree::TreeNode;

#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    Open(String),
    Tree(Option<usize>),
    Info,
    Readme,
    Cat(String),
    Browse(Option<String>),
    Help,
    Quit,
    Unknown(String),
}

fn parse_shell_line(line: &str) -> Option<ShellCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let arg = (!rest.is_empty()).then(|| rest.to_string());

    let command = match (word, arg) {
        ("open", Some(repo)) => ShellCommand::Open(repo),
        ("tree", None) => ShellCommand::Tree(None),
        ("tree", Some(depth)) => match depth.parse() {
            Ok(depth) => ShellCommand::Tree(Some(depth)),
            Err(_) => ShellCommand::Unknown(line.to_string()),
        },
        ("info", None) => ShellCommand::Info,
        ("readme", None) => ShellCommand::Readme,
        ("cat", Some(path)) => ShellCommand::Cat(path),
        ("browse", path) => ShellCommand::Browse(path),
        ("help" | "?", None) => ShellCommand::Help,
        ("quit" | "exit" | "q", None) => ShellCommand::Quit,
        // A bare identifier opens that repository
        (_, None) if parse_repo_identifier(word).is_ok() => ShellCommand::Open(word.to_string()),
        _ => ShellCommand::Unknown(line.to_string()),
    };
    Some(command)
}

type LoadResult = (Generation, RepoRef, ExploreResult<RepositorySnapshot>);

pub async fn run_shell<S>(source: Arc<S>, initial: Option<String>) -> Result<i32>
where
    S: ContentSource + 'static,
{
    let mut session = Session::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<LoadResult>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("repo-explorer shell. Type a repository (owner/name or URL), or 'help'.");
    if let Some(input) = initial {
        start_load(&mut session, &source, &tx, &input);
    }
    prompt();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_shell_line(&line) {
                    None => {}
                    Some(ShellCommand::Quit) => break,
                    Some(command) => execute(command, &mut session, &source, &tx).await,
                }
                prompt();
            }
            Some((generation, repo, result)) = rx.recv() => {
                match session.complete(generation, result) {
                    LoadOutcome::Applied => {
                        if let Some(snapshot) = session.current() {
                            println!();
                            println!("{}", render::overview(&snapshot.metadata));
                            let (files, dirs) = snapshot.counts();
                            println!("  {} files in {} directories. Type 'tree' to see them.", files, dirs);
                        }
                    }
                    LoadOutcome::Failed(err) => eprintln!("\n❌ {}: {}", repo, err.user_message()),
                    LoadOutcome::Stale => debug!(%repo, "ignored result of superseded load"),
                }
                prompt();
            }
        }
    }

    Ok(0)
}

fn prompt() {
    print!("$ ");
    let _ = std::io::stdout().flush();
}

fn start_load<S>(session: &mut Session, source: &Arc<S>, tx: &mpsc::UnboundedSender<LoadResult>, input: &str)
where
    S: ContentSource + 'static,
{
    let repo = match parse_repo_identifier(input) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("❌ {}", err.user_message());
            return;
        }
    };

    let generation = session.begin();
    println!("◆ Analyzing {} ...", repo);

    let source = Arc::clone(source);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = load_repository(&*source, &repo).await;
        // The receiver only goes away when the shell exits
        let _ = tx.send((generation, repo, result));
    });
}

async fn execute<S>(command: ShellCommand, session: &mut Session, source: &Arc<S>, tx: &mpsc::UnboundedSender<LoadResult>)
where
    S: ContentSource + 'static,
{
    if let ShellCommand::Open(input) = &command {
        start_load(session, source, tx, input);
        return;
    }
    if let ShellCommand::Help = command {
        print_help();
        return;
    }
    if let ShellCommand::Unknown(line) = &command {
        eprintln!("Unknown command: {} (try 'help')", line);
        return;
    }

    let Some(snapshot) = session.current() else {
        eprintln!("No repository loaded yet.");
        return;
    };

    match command {
        ShellCommand::Tree(depth) => print!("{}", render::structure(snapshot, depth)),
        ShellCommand::Info => {
            println!("{}", render::overview(&snapshot.metadata));
            println!();
            println!("{}", render::summary(&snapshot.metadata));
        }
        ShellCommand::Readme => match &snapshot.readme {
            Some(text) => println!("{}", text),
            None => println!("(no README found)"),
        },
        ShellCommand::Cat(path) => match TreeNode::find(&snapshot.tree, &path) {
            Some(node) if !node.is_dir() => {
                match fetch_file_content(&**source, &snapshot.repo, &node.path).await {
                    Ok(file) => {
                        println!("● {} [{}]", file.name, render::language_for(&file.name));
                        println!("{}", file.text());
                    }
                    Err(err) => eprintln!("❌ Failed to load file: {}", err.user_message()),
                }
            }
            Some(_) => eprintln!("{} is a directory", path),
            None => eprintln!("{} is not in this repository", path),
        },
        ShellCommand::Browse(path) => match path {
            Some(path) => println!("{}", render::blob_url(&snapshot.metadata, &path)),
            None => println!("{}", snapshot.metadata.html_url),
        },
        ShellCommand::Open(_) | ShellCommand::Help | ShellCommand::Quit | ShellCommand::Unknown(_) => {}
    }
}

fn print_help() {
    println!("  <repo> | open <repo>   load a repository (owner/name or GitHub URL)");
    println!("  tree [depth]           show the file tree");
    println!("  info                   overview and copyable summary");
    println!("  readme                 print the README");
    println!("  cat <path>             preview a file");
    println!("  browse [path]          link to the repository or a file on github.com");
    println!("  quit                   leave the shell");
}
