//! Documentation index generation
//!
//! Builds a fenced tree of the synced markdown files, titled from each file's
//! YAML frontmatter, and splices it into the `## Documentation Index` section
//! of an index document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Heading of the generated section
pub const INDEX_HEADING: &str = "## Documentation Index";

static FRONTMATTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|\z)").unwrap());

#[derive(Debug, Default, PartialEq, Eq)]
struct PageMeta {
    title: Option<String>,
    description: Option<String>,
}

fn frontmatter(content: &str) -> PageMeta {
    let Some(yaml) = FRONTMATTER.captures(content).and_then(|c| c.get(1)) else {
        return PageMeta::default();
    };
    let Ok(serde_yaml::Value::Mapping(map)) = serde_yaml::from_str::<serde_yaml::Value>(yaml.as_str())
    else {
        return PageMeta::default();
    };

    let field = |key: &str| {
        map.get(key).and_then(|v| match v {
            serde_yaml::Value::String(s) => Some(s.trim().to_string()),
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            serde_yaml::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    };
    PageMeta {
        title: field("title").filter(|t| !t.is_empty()),
        description: field("description").filter(|d| !d.is_empty()),
    }
}

/// Render the index tree for `files` (relative to `root`).
///
/// `link_prefix` is prepended to each relative file path to form the link
/// target, e.g. `./references/`. Files are grouped by directory and listed in
/// path order; directories without markdown files are not shown.
pub fn render_index_tree(root: &Path, files: &[PathBuf], link_prefix: &str) -> String {
    if files.is_empty() {
        return "*No markdown files found*\n".to_string();
    }

    let mut by_dir: BTreeMap<PathBuf, Vec<&PathBuf>> = BTreeMap::new();
    for file in files {
        let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
        by_dir.entry(dir).or_default().push(file);
    }

    let root_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string());

    let mut lines = vec!["```text".to_string(), format!("{root_name}/")];
    for (dir, mut entries) in by_dir {
        let depth = dir.components().count();
        if depth > 0 {
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            lines.push(format!("{}├── {}/", "  ".repeat(depth), name));
        }

        entries.sort();
        let indent = "  ".repeat(depth + 1);
        for file in entries {
            let meta = std::fs::read_to_string(root.join(file))
                .map(|content| frontmatter(&content))
                .unwrap_or_default();
            let title = meta.title.unwrap_or_else(|| {
                file.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });
            lines.push(format!(
                "{indent}├── [{title}]({link_prefix}{})",
                to_slash(file)
            ));
            if let Some(description) = meta.description {
                lines.push(format!("{indent}    {description}"));
            }
        }
    }
    lines.push("```".to_string());

    lines.join("\n") + "\n"
}

/// Replace the body of the index section in `content`, or append the section
/// when the document has none.
///
/// The section runs from the heading to the next level-two heading or the end
/// of the document.
pub fn replace_index_section(content: &str, tree: &str) -> String {
    let section = format!("{INDEX_HEADING}\n\n{tree}\n");

    match find_heading(content) {
        Some(start) => {
            let body_start = start + INDEX_HEADING.len();
            let end = content[body_start..]
                .find("\n## ")
                .map(|i| body_start + i + 1)
                .unwrap_or(content.len());
            format!("{}{}{}", &content[..start], section, &content[end..])
        }
        None => format!("{}\n\n{}", content.trim_end(), section),
    }
}

fn find_heading(content: &str) -> Option<usize> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if line.trim_end() == INDEX_HEADING {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

/// Link prefix from the directory of `index_file` to `references_dir`, both
/// relative to the same working directory.
pub(crate) fn link_prefix(index_file: &Path, references_dir: &Path) -> String {
    let depth = index_file
        .parent()
        .map(|p| {
            p.components()
                .filter(|c| matches!(c, std::path::Component::Normal(_)))
                .count()
        })
        .unwrap_or(0);
    let up = "../".repeat(depth);
    let refs = to_slash(references_dir);
    let refs = refs.trim_start_matches("./").trim_end_matches('/');
    if up.is_empty() {
        format!("./{refs}/")
    } else {
        format!("{up}{refs}/")
    }
}

fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
