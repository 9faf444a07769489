//! Directory tree rendering.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

use crate::domain::Node;
use crate::selection::SelectionStore;

const FOLDER_ICON: &str = "📁";
const FILE_ICON: &str = "📄";

static EXTENSION_ICONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("py", "🐍"),
        ("js", "☕"),
        ("json", "🔧"),
        ("md", "📘"),
        ("txt", "📝"),
        ("yml", "⚙️"),
        ("yaml", "⚙️"),
        ("html", "🌐"),
        ("css", "🎨"),
    ])
});

fn icon_for(node: &Node) -> &'static str {
    if node.is_dir() {
        return FOLDER_ICON;
    }
    let name = node.name();
    let upper = name.to_uppercase();
    if upper == ".GITIGNORE" {
        return "👁️";
    }
    if upper == "LICENSE" {
        return "⚖️";
    }
    if upper.starts_with("README") {
        return "📖";
    }
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(|e| EXTENSION_ICONS.get(e.to_lowercase().as_str()).copied())
        .unwrap_or(FILE_ICON)
}

/// Render the visible tree with check markers.
///
/// Collapsed directories hide their children unless `expand_all` is set.
pub fn render_tree(root: &Node, selection: &SelectionStore, expand_all: bool) -> String {
    let mut lines = vec![format!("{} {}/", icon_for(root), root.name())];
    walk_tree(root, "", selection, expand_all, &mut lines);
    lines.join("\n")
}

fn walk_tree(
    node: &Node,
    prefix: &str,
    selection: &SelectionStore,
    expand_all: bool,
    lines: &mut Vec<String>,
) {
    let total = node.children.len();
    for (idx, child) in node.children.iter().enumerate() {
        let is_last = idx == total - 1;
        let connector = if is_last { "└── " } else { "├── " };
        let icon = icon_for(child);

        if child.is_file() {
            let marker = if selection.is_checked(child.identity()) { "[x]" } else { "[ ]" };
            lines.push(format!("{}{}{} {} {}", prefix, connector, marker, icon, child.name()));
            continue;
        }

        let open = expand_all || child.expanded;
        let mut line = format!("{}{}{} {}/", prefix, connector, icon, child.name());
        if let Some(err) = &child.load_error {
            line.push_str(&format!(" ({})", err));
        } else if !open && !child.children.is_empty() {
            line.push_str(" …");
        }
        lines.push(line);

        if open {
            let extension = if is_last { "    " } else { "│   " };
            walk_tree(child, &format!("{}{}", prefix, extension), selection, expand_all, lines);
        }
    }
}

/// Status line for the current selection size.
pub fn status_line(selected: usize) -> String {
    format!("{} file{} selected", selected, if selected == 1 { "" } else { "s" })
}
