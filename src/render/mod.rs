// src/render/mod.rs
// =============================================================================
// Terminal presentation of a loaded repository.
//
// Everything here is a pure function from data to text; main.rs decides
// where the text goes. Covers:
// - the repository overview and the plain-text summary
// - the indented tree listing
// - the language label shown above a file preview
// - web links to a file on github.com
// =============================================================================

use crate::explorer::RepositorySnapshot;
use crate::github::RepositoryMetadata;
use crate::tree::TreeNode;

// Renders the tree with box-drawing guides
//
// Parameters:
//   nodes: the top-level nodes (already sorted)
//   max_depth: how many levels to show (None = everything, 0 = nothing)
//
// Example output:
//   ├── src/
//   │   └── a.ts
//   └── README.md
pub fn render_tree(nodes: &[TreeNode], max_depth: Option<usize>) -> String {
    let mut out = String::new();
    if max_depth != Some(0) {
        render_level(nodes, "", 1, max_depth, &mut out);
    }
    out
}

/// The "Repository Structure" section: a header with the counts, then the tree
pub fn structure(snapshot: &RepositorySnapshot, max_depth: Option<usize>) -> String {
    let (files, dirs) = snapshot.counts();
    format!(
        "├── Repository Structure ({} files, {} directories)\n{}",
        files,
        dirs,
        render_tree(&snapshot.tree, max_depth)
    )
}

fn render_level(nodes: &[TreeNode], prefix: &str, depth: usize, max_depth: Option<usize>, out: &mut String) {
    for (idx, node) in nodes.iter().enumerate() {
        let last = idx + 1 == nodes.len();
        let (branch, indent) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };

        out.push_str(prefix);
        out.push_str(branch);
        out.push_str(&node.name);
        if node.is_dir() {
            out.push('/');
            if node.partial {
                out.push_str(" (could not be listed)");
            }
        }
        out.push('\n');

        let can_descend = max_depth.map_or(true, |max| depth < max);
        if node.is_dir() && can_descend {
            render_level(node.children(), &format!("{}{}", prefix, indent), depth + 1, max_depth, out);
        }
    }
}

/// Syntax label for a file name, from its extension
pub fn language_for(file_name: &str) -> &'static str {
    let ext = match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => return "text",
    };

    match ext.as_str() {
        "js" => "javascript",
        "jsx" => "jsx",
        "ts" => "typescript",
        "tsx" => "tsx",
        "py" => "python",
        "rs" => "rust",
        "go" => "go",
        "md" => "markdown",
        "json" => "json",
        "toml" => "toml",
        "html" => "html",
        "css" => "css",
        "yml" | "yaml" => "yaml",
        "sh" => "bash",
        _ => "text",
    }
}

/// Repository size, reported by the provider in KiB
pub fn format_size(kb: u64) -> String {
    if kb < 1024 {
        format!("{} KB", kb)
    } else {
        format!("{:.2} MB", kb as f64 / 1024.0)
    }
}

// "2024-06-15T08:30:00Z" -> "2024-06-15"
fn format_date(timestamp: Option<&str>) -> &str {
    match timestamp {
        Some(ts) => ts.split('T').next().unwrap_or(ts),
        None => "unknown",
    }
}

/// Link to a file on the web, on the default branch
pub fn blob_url(meta: &RepositoryMetadata, path: &str) -> String {
    format!("{}/blob/{}/{}", meta.html_url.trim_end_matches('/'), meta.default_branch, path.trim_start_matches('/'))
}

/// The header printed above a tree
pub fn overview(meta: &RepositoryMetadata) -> String {
    let mut lines = Vec::new();

    let fork = if meta.is_fork { " [fork]" } else { "" };
    lines.push(format!("● {}/{}{}", meta.owner, meta.name, fork));
    lines.push(format!("  {}", meta.description.as_deref().unwrap_or("No description provided")));
    if !meta.topics.is_empty() {
        lines.push(format!("  # {}", meta.topics.join("  # ")));
    }
    lines.push(format!(
        "  ★ {}  ⑂ {}  👁 {}  ⚠ {} open issues",
        meta.stars, meta.forks, meta.watchers, meta.open_issues
    ));
    lines.push(format!(
        "  {} · {} · {} · branch {}",
        meta.language.as_deref().unwrap_or("Unknown"),
        meta.license.as_deref().unwrap_or("No license"),
        format_size(meta.size),
        meta.default_branch
    ));
    lines.push(format!("  updated {}", format_date(meta.updated_at.as_deref())));

    lines.join("\n")
}

/// The plain-text summary meant for copying elsewhere
pub fn summary(meta: &RepositoryMetadata) -> String {
    let mut lines = vec![
        format!("Repository: {}/{}", meta.owner, meta.name),
        format!("Description: {}", meta.description.as_deref().unwrap_or("No description")),
        format!("Language: {}", meta.language.as_deref().unwrap_or("Not specified")),
        format!("Stars: {} | Forks: {} | Watchers: {}", meta.stars, meta.forks, meta.watchers),
        format!("Open Issues: {}", meta.open_issues),
        format!("License: {}", meta.license.as_deref().unwrap_or("No license")),
        format!("Created: {}", format_date(meta.created_at.as_deref())),
        format!("Last Updated: {}", format_date(meta.updated_at.as_deref())),
        format!("Default Branch: {}", meta.default_branch),
        format!("Size: {:.2} MB", meta.size as f64 / 1024.0),
    ];
    if !meta.topics.is_empty() {
        lines.push(format!("Topics: {}", meta.topics.join(", ")));
    }
    if let Some(homepage) = &meta.homepage {
        lines.push(format!("Homepage: {}", homepage));
    }
    lines.push(format!("URL: {}", meta.html_url));

    lines.join("\n")
}
