//! `slipway tree` command

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Result};

use crate::cli::TreeArgs;
use crate::commands::{load_manifest, validate_or_report};
use slipway::resolver::DepGraph;
use slipway::util::diagnostic::{emit, suggestions, Diagnostic};
use slipway::InternedString;

pub fn execute(manifest_path: Option<&Path>, color: bool, args: TreeArgs) -> Result<()> {
    let manifest = load_manifest(manifest_path)?;
    let resolution = validate_or_report(&manifest, color)?;
    let graph = resolution.graph()?;

    let roots: Vec<InternedString> = match args.target {
        Some(ref name) => match manifest.canonicalize(name) {
            Some(canonical) => vec![canonical],
            None => {
                let diag = Diagnostic::error(format!("no target named `{}`", name))
                    .with_suggestion(suggestions::TARGET_NOT_FOUND.to_string());
                emit(&diag, color);
                bail!("unknown target `{}`", name);
            }
        },
        None => {
            // Default roots: targets nothing depends on, in name order.
            let mut roots: Vec<InternedString> = resolution
                .build_order()?
                .iter()
                .copied()
                .filter(|&name| graph.dependents(name).is_empty())
                .collect();
            roots.sort();
            roots
        }
    };

    let max_depth = args.depth.unwrap_or(usize::MAX);
    let mut seen = HashSet::new();
    for root in roots {
        print_tree(graph, root, 0, max_depth, &mut seen);
    }

    Ok(())
}

fn print_tree(
    graph: &DepGraph,
    name: InternedString,
    depth: usize,
    max_depth: usize,
    seen: &mut HashSet<InternedString>,
) {
    if depth > max_depth {
        return;
    }

    let is_duplicate = !seen.insert(name);

    let prefix = if depth == 0 {
        String::new()
    } else {
        format!("{}├── ", "│   ".repeat(depth - 1))
    };

    let dup_marker = if is_duplicate { " (*)" } else { "" };

    println!("{}{}{}", prefix, name, dup_marker);

    // A subtree already printed in full is elided.
    if is_duplicate {
        return;
    }

    for dep in graph.deps(name) {
        print_tree(graph, dep, depth + 1, max_depth, seen);
    }
}
