//! Clean-up applied to fetched pages before they are compared and written

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

use super::manifest::{SyncSource, normalize};

/// Opening Hugo shortcode: `{{< name >}}` or `{{% name %}}`
static OPEN_SHORTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*(?:<\s*(?P<angle>\w+)\s*>|%\s*(?P<percent>\w+)\s*%)\}\}").unwrap()
});

/// Remove paired Hugo shortcode blocks, including their contents.
///
/// `{{< details >}}…{{< /details >}}` and `{{% alert %}}…{{% /alert %}}` are
/// dropped entirely. An opening tag with no matching close is kept verbatim.
pub fn strip_shortcodes(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(caps) = OPEN_SHORTCODE.captures(rest) {
        let Some(open) = caps.get(0) else { break };
        let close = match (caps.name("angle"), caps.name("percent")) {
            (Some(name), _) => closing_tag('<', '>', name.as_str()),
            (_, Some(name)) => closing_tag('%', '%', name.as_str()),
            _ => None,
        };

        let after_open = &rest[open.end()..];
        match close.and_then(|re| re.find(after_open)) {
            Some(end) => {
                out.push_str(&rest[..open.start()]);
                rest = &after_open[end.end()..];
            }
            None => {
                out.push_str(&rest[..open.end()]);
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Inline link or image: `[text](target)`
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").unwrap());

/// Remote pages of a manifest keyed by URL, pointing at their local paths
/// relative to the references directory.
#[derive(Debug, Clone, Default)]
pub struct LinkMap {
    pages: HashMap<String, PathBuf>,
}

impl LinkMap {
    /// Sources whose URL does not parse are left out.
    pub fn new(sources: &[SyncSource]) -> Self {
        let pages = sources
            .iter()
            .filter_map(|source| {
                let url = Url::parse(&source.url).ok()?;
                Some((page_key(&url), normalize(&source.path)))
            })
            .collect();
        Self { pages }
    }

    /// Local copy of `url`, ignoring its query and fragment.
    pub fn local_path(&self, url: &Url) -> Option<&Path> {
        self.pages.get(&page_key(url)).map(PathBuf::as_path)
    }
}

fn page_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.to_string()
}

/// Point relative links of a fetched page at something that resolves from
/// its local copy.
///
/// Targets are resolved against `page_url`. One that lands on another
/// synced page becomes a path relative to `page_path`; anything else
/// becomes an absolute URL. Anchors and targets that already carry a
/// scheme are kept, as is the whole page when `page_url` does not parse.
pub fn rewrite_links(content: &str, page_url: &str, page_path: &Path, map: &LinkMap) -> String {
    let Ok(base) = Url::parse(page_url) else {
        return content.to_string();
    };

    LINK.replace_all(content, |caps: &Captures| {
        match rewrite_target(&caps[2], &base, page_path, map) {
            Some(target) => format!("[{}]({target})", &caps[1]),
            None => caps[0].to_string(),
        }
    })
    .into_owned()
}

fn rewrite_target(target: &str, base: &Url, page_path: &Path, map: &LinkMap) -> Option<String> {
    if target.starts_with('#') || Url::parse(target).is_ok() {
        return None;
    }
    let resolved = base.join(target).ok()?;
    let Some(local) = map.local_path(&resolved) else {
        return Some(resolved.to_string());
    };

    let mut relative = relative_path(page_path, local);
    if let Some(fragment) = resolved.fragment() {
        relative.push('#');
        relative.push_str(fragment);
    }
    Some(relative)
}

/// `target` as seen from the directory holding `from`, `/`-separated and
/// always starting with `./` or `../`.
fn relative_path(from: &Path, target: &Path) -> String {
    let from = normalize(from);
    let target = normalize(target);
    let dir: Vec<Component> = from
        .parent()
        .map(|p| p.components().collect())
        .unwrap_or_default();
    let parts: Vec<Component> = target.components().collect();

    let common = dir.iter().zip(&parts).take_while(|(a, b)| a == b).count();
    let mut segments = vec!["..".to_string(); dir.len() - common];
    if segments.is_empty() {
        segments.push(".".to_string());
    }
    segments.extend(
        parts[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    segments.join("/")
}

fn closing_tag(left: char, right: char, name: &str) -> Option<Regex> {
    let pattern = format!(
        r"\{{\{{\s*{}\s*/\s*{}\s*{}\}}\}}",
        regex::escape(&left.to_string()),
        regex::escape(name),
        regex::escape(&right.to_string())
    );
    Regex::new(&pattern).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn removes_angle_block_entirely() {
        assert_eq!(strip_shortcodes("{{< details >}}\nContent\n{{< /details >}}"), "");
    }

    #[test]
    fn keeps_surrounding_text() {
        assert_eq!(
            strip_shortcodes("Text\n{{< history >}}\nVersion info\n{{< /history >}}\nMore text"),
            "Text\n\nMore text"
        );
    }

    #[test]
    fn removes_percent_block() {
        assert_eq!(
            strip_shortcodes("a {{% alert %}}careful{{% /alert %}} b"),
            "a  b"
        );
    }

    #[test]
    fn unmatched_open_tag_is_kept() {
        let input = "before {{< details >}} after";
        assert_eq!(strip_shortcodes(input), input);
    }

    #[test]
    fn mismatched_names_do_not_pair() {
        let input = "{{< details >}}x{{< /history >}}";
        assert_eq!(strip_shortcodes(input), input);
    }

    fn docs_map() -> LinkMap {
        LinkMap::new(&[
            SyncSource {
                path: PathBuf::from("ci/yaml.md"),
                url: "https://docs.test/doc/ci/yaml.md?ref_type=heads".to_string(),
            },
            SyncSource {
                path: PathBuf::from("ci/pipelines/index.md"),
                url: "https://docs.test/doc/ci/pipelines/index.md".to_string(),
            },
        ])
    }

    fn rewrite(content: &str) -> String {
        rewrite_links(
            content,
            "https://docs.test/doc/ci/pipelines/index.md",
            Path::new("ci/pipelines/index.md"),
            &docs_map(),
        )
    }

    #[test]
    fn link_to_synced_page_becomes_local_path() {
        assert_eq!(
            rewrite("See [keywords](../yaml.md#stages)."),
            "See [keywords](../yaml.md#stages)."
        );
        assert_eq!(
            rewrite_links(
                "[pipelines](pipelines/index.md)",
                "https://docs.test/doc/ci/yaml.md",
                Path::new("./ci/yaml.md"),
                &docs_map(),
            ),
            "[pipelines](./pipelines/index.md)"
        );
    }

    #[test]
    fn link_to_unsynced_page_becomes_absolute_url() {
        assert_eq!(
            rewrite("[resources](../../api/api_resources.md)"),
            "[resources](https://docs.test/doc/api/api_resources.md)"
        );
    }

    #[test]
    fn absolute_anchor_and_mailto_links_are_kept() {
        let input = "[a](https://gitlab.com/x) [b](#top) [c](mailto:dev@example.com) [d](http://x.test)";
        assert_eq!(rewrite(input), input);
    }

    #[test]
    fn unparseable_page_url_keeps_content() {
        let input = "[a](../x.md)";
        assert_eq!(
            rewrite_links(input, "not a url", Path::new("a.md"), &docs_map()),
            input
        );
    }

    #[test]
    fn relative_path_walks_up_to_common_dir() {
        assert_eq!(relative_path(Path::new("a/b/c.md"), Path::new("a/d.md")), "../d.md");
        assert_eq!(relative_path(Path::new("c.md"), Path::new("a/d.md")), "./a/d.md");
        assert_eq!(relative_path(Path::new("a/c.md"), Path::new("a/c.md")), "./c.md");
    }

    #[test]
    fn plain_markdown_is_untouched() {
        let input = "# Title\n\nSome `{{ template }}` text.\n";
        assert_eq!(strip_shortcodes(input), input);
    }
}
