//! Related-topics text parsing.
//!
//! The backend answers with free text in one of two shapes:
//!
//! * `\boxed{["https://a", "https://b"]}`: a JSON array of URLs wrapped in a
//!   LaTeX-style box. Each URL becomes a link labelled with itself.
//! * Markdown, one link per line: `[Label](https://a)`. Lines without a link
//!   are skipped.

use lazy_static::lazy_static;
use regex::Regex;

use crate::{Error, Result, TopicLink};

const BOXED_PREFIX: &str = "\\boxed{";
const BOXED_SUFFIX: &str = "}";

lazy_static! {
    static ref MARKDOWN_LINK: Regex =
        Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("markdown link pattern is valid");
}

/// Parses related-topics text into links.
///
/// `Ok(vec![])` means the text held no links. `Err` means a boxed JSON payload
/// was present but could not be decoded; in that case no link is returned at
/// all, even if most of the array was well formed.
pub fn parse(raw: &str) -> Result<Vec<TopicLink>> {
    let raw = raw.trim();
    match boxed_payload(raw) {
        Some(payload) => parse_boxed(payload),
        None => Ok(parse_markdown(raw)),
    }
}

/// Like [`parse`] but logs decode failures and returns an empty list.
pub fn parse_lossy(raw: &str) -> Vec<TopicLink> {
    parse(raw).unwrap_or_else(|e| {
        tracing::warn!("discarding related topics: {}", e);
        Vec::new()
    })
}

fn boxed_payload(raw: &str) -> Option<&str> {
    raw.strip_prefix(BOXED_PREFIX)?
        .strip_suffix(BOXED_SUFFIX)
        .map(str::trim)
}

fn parse_boxed(payload: &str) -> Result<Vec<TopicLink>> {
    let urls: Vec<String> = serde_json::from_str(payload)
        .map_err(|e| Error::Topics(format!("boxed payload is not a JSON array of URLs: {e}")))?;
    Ok(urls.into_iter().map(TopicLink::bare).collect())
}

fn parse_markdown(raw: &str) -> Vec<TopicLink> {
    raw.lines()
        .filter(|line| line.contains("]("))
        .filter_map(|line| {
            let caps = MARKDOWN_LINK.captures(line)?;
            Some(TopicLink::new(&caps[1], &caps[2]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxed_array_preserves_order() {
        let links = parse(r#"\boxed{["a","b"]}"#).unwrap();
        assert_eq!(links, vec![TopicLink::new("a", "a"), TopicLink::new("b", "b")]);
    }

    #[test]
    fn test_boxed_payload_is_trimmed() {
        let links = parse("\\boxed{  [\"https://x.org\"]\n}").unwrap();
        assert_eq!(links, vec![TopicLink::bare("https://x.org")]);
    }

    #[test]
    fn test_malformed_boxed_payload() {
        for raw in [
            r#"\boxed{["a", "b"}"#,
            r#"\boxed{not json}"#,
            r#"\boxed{{"a": 1}}"#,
            r#"\boxed{["a", 2]}"#,
            r#"\boxed{}"#,
        ] {
            assert!(matches!(parse(raw), Err(Error::Topics(_))), "{raw}");
            assert!(parse_lossy(raw).is_empty(), "{raw}");
        }
    }

    #[test]
    fn test_markdown_skips_lines_without_links() {
        let links = parse("[Foo](http://x)\nnot a link\n[Bar](http://y)").unwrap();
        assert_eq!(
            links,
            vec![TopicLink::new("Foo", "http://x"), TopicLink::new("Bar", "http://y")]
        );
    }

    #[test]
    fn test_markdown_takes_first_link_per_line() {
        let links = parse("1. [One](http://1) and [Two](http://2)\r\n- broken ](here").unwrap();
        assert_eq!(links, vec![TopicLink::new("One", "http://1")]);
    }

    #[test]
    fn test_empty_input_has_no_topics() {
        assert_eq!(parse("").unwrap(), vec![]);
        assert_eq!(parse("no links at all").unwrap(), vec![]);
    }
}
