//! Types for the mdocs-commonmark public API.
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

/// A heading in a compiled document, used for in-page navigation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnchorLink {
  /// Value of the heading's `id` attribute.
  pub id:    String,
  /// Visible heading text with inline tags stripped.
  pub text:  String,
  /// Heading level (1-6).
  pub level: u8,
}

/// Result of compiling one Markdown unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompiledDoc {
  /// Rendered HTML with heading ids injected.
  pub html: String,

  /// Headings in document order.
  pub anchor_links: Vec<AnchorLink>,
}

/// A file belonging to a [`MarkdownFileMetadata`] node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownFileRef {
  /// Bare file name, e.g. `Changelog.md`.
  pub file_name: String,

  /// Path relative to the content root.
  pub path: PathBuf,

  /// Title taken from the file's front matter, if any.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
}

/// A documentation entry: a directory of Markdown files rendered as one page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownFileMetadata {
  pub title: String,

  /// Position of the entry, used to namespace heading ids. Accepts both
  /// strings and integers when deserializing.
  #[serde(
    default,
    deserialize_with = "deserialize_ordinal",
    skip_serializing_if = "Option::is_none"
  )]
  pub ordinal: Option<String>,

  /// Directory of the entry, relative to the content root.
  #[serde(default)]
  pub path: PathBuf,

  #[serde(default)]
  pub children: Vec<MarkdownFileRef>,
}

/// One topic of one documentation version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VersionDoc {
  pub title:        String,
  pub version:      String,
  pub slug:         String,
  pub url:          String,
  pub html:         String,
  pub anchor_links: Vec<AnchorLink>,
}

fn deserialize_ordinal<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum RawOrdinal {
    Text(String),
    Number(u64),
  }

  Ok(Option::<RawOrdinal>::deserialize(deserializer)?.map(|raw| {
    match raw {
      RawOrdinal::Text(text) => text,
      RawOrdinal::Number(number) => number.to_string(),
    }
  }))
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_ordinal_accepts_numbers_and_strings() {
    let nodes: Vec<MarkdownFileMetadata> = serde_json::from_str(
      r#"[
        {"title": "Intro", "ordinal": 1, "path": "docs/1.0/Intro", "children": []},
        {"title": "12 Changelog", "ordinal": "12", "children": [
          {"fileName": "Changelog.md", "path": "docs/1.0/12 Changelog/Changelog.md"}
        ]},
        {"title": "Bare"}
      ]"#,
    )
    .unwrap();

    assert_eq!(nodes[0].ordinal.as_deref(), Some("1"));
    assert_eq!(nodes[1].ordinal.as_deref(), Some("12"));
    assert_eq!(nodes[1].children[0].file_name, "Changelog.md");
    assert_eq!(nodes[2].ordinal, None);
    assert!(nodes[2].children.is_empty());
  }

  #[test]
  fn test_compiled_doc_serializes_camel_case() {
    let doc = CompiledDoc {
      html:         "<h1 id=\"a\">A</h1>".to_string(),
      anchor_links: vec![AnchorLink {
        id:    "a".to_string(),
        text:  "A".to_string(),
        level: 1,
      }],
    };

    let json = serde_json::to_string(&doc).unwrap();
    assert!(json.contains("\"anchorLinks\""));
  }
}
