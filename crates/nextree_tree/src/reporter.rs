use std::{
    io::{self, Write},
    path::Path,
};

use colored::{ColoredString, Colorize};
use log::debug;
use nextree_core::ComponentType;

use crate::{
    forest::RouteForest,
    tree::{NodeId, Tree},
};

fn type_label(component_type: Option<ComponentType>) -> ColoredString {
    match component_type {
        Some(ComponentType::Client) => "client".yellow(),
        Some(ComponentType::Server) => "server".green(),
        None => "?".dimmed(),
    }
}

fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).to_string_lossy().to_string()
}

pub fn print_routes<W: Write>(writer: &mut W, forest: &RouteForest) -> io::Result<()> {
    for route in forest.routes().iter() {
        let marker =
            if forest.failure(&route.path).is_some() { "✗".red() } else { "●".bright_blue() };
        writeln!(
            writer,
            "{} {}  {}",
            marker,
            route.path.bold(),
            route.entry.display().to_string().dimmed()
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn print_route_tree<W: Write>(
    writer: &mut W,
    route: &str,
    tree: &Tree,
    root: &Path,
) -> io::Result<()> {
    debug!("Printing tree for route '{}' ({} nodes)", route, tree.len());
    let head = tree.node(tree.root());
    writeln!(
        writer,
        "{} [{}] {}",
        route.bold(),
        type_label(head.component.component_type),
        display_path(root, &head.component.path).blue()
    )?;
    print_children(writer, tree, tree.root(), "", root)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes the subtree below `id` with box-drawing connectors, using an explicit
/// stack so deep import chains print without recursing.
fn print_children<W: Write>(
    writer: &mut W,
    tree: &Tree,
    id: NodeId,
    indent: &str,
    root: &Path,
) -> io::Result<()> {
    let mut stack: Vec<(NodeId, String, bool)> = Vec::new();
    push_children(&mut stack, tree, id, indent);

    while let Some((child_id, indent, is_last)) = stack.pop() {
        let prefix = if is_last { "└──" } else { "├──" };
        let child = tree.node(child_id);

        if child.cycle {
            writeln!(
                writer,
                "{}{} {} {}",
                indent,
                prefix.dimmed(),
                child.component.name,
                "(cycle)".dimmed()
            )?;
            continue;
        }

        writeln!(
            writer,
            "{}{} {} [{}] {}",
            indent,
            prefix.dimmed(),
            child.component.name,
            type_label(child.component.component_type),
            display_path(root, &child.component.path).dimmed()
        )?;

        let next_indent = format!("{}{}", indent, if is_last { "    " } else { "│   " });
        push_children(&mut stack, tree, child_id, &next_indent);
    }
    Ok(())
}

fn push_children(stack: &mut Vec<(NodeId, String, bool)>, tree: &Tree, id: NodeId, indent: &str) {
    let children = &tree.node(id).children;
    // Reversed so the first child is popped first
    for (idx, child_id) in children.iter().enumerate().rev() {
        stack.push((*child_id, indent.to_string(), idx == children.len() - 1));
    }
}

/// Prints every requested route, successful trees first, then failures.
pub fn print_forest<W: Write>(
    writer: &mut W,
    forest: &RouteForest,
    only_route: Option<&str>,
    root: &Path,
) -> io::Result<()> {
    for route in forest.routes().paths() {
        if only_route.is_some_and(|r| r != route) {
            continue;
        }
        if let Some(tree) = forest.tree(route) {
            print_route_tree(writer, route, tree, root)?;
        }
    }

    for (route, error) in forest.failures() {
        if only_route.is_some_and(|r| r != route) {
            continue;
        }
        writeln!(writer, "{} {} {}", "✗".red().bold(), route.bold(), error.red())?;
    }

    writer.flush()?;
    Ok(())
}
