//! YAML front matter handling.
//!
//! Front matter is a YAML block between a leading `---` line and the next
//! `---` line. Its schema is never validated here; callers that care about
//! specific keys use [`FrontMatter::deserialize`].
use log::warn;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

/// A Markdown file split into metadata and body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
  /// Parsed YAML mapping. Empty when the file has no (valid) front matter.
  pub metadata: Mapping,

  /// Everything after the closing delimiter.
  pub body: String,
}

impl FrontMatter {
  /// Look up a string value in the metadata.
  #[must_use]
  pub fn get_str(&self, key: &str) -> Option<&str> {
    self.metadata.get(key).and_then(Value::as_str)
  }

  /// Look up a scalar value as text. Numbers and booleans are formatted,
  /// other values yield `None`.
  #[must_use]
  pub fn get_string(&self, key: &str) -> Option<String> {
    match self.metadata.get(key)? {
      Value::String(s) => Some(s.clone()),
      Value::Number(n) => Some(n.to_string()),
      Value::Bool(b) => Some(b.to_string()),
      _ => None,
    }
  }

  /// Deserialize the metadata into a typed struct.
  ///
  /// # Errors
  ///
  /// Returns an error if the mapping does not fit `T`.
  pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_yaml::Error> {
    serde_yaml::from_value(Value::Mapping(self.metadata.clone()))
  }
}

/// Split raw file text into front matter and body.
///
/// Text without front matter, or with an opening delimiter that is never
/// closed, comes back as an empty mapping and the unchanged text. Invalid
/// YAML is logged and treated as empty metadata; the block is still removed
/// from the body.
#[must_use]
pub fn split_front_matter(text: &str) -> FrontMatter {
  let Some((yaml, body)) = locate(text) else {
    return FrontMatter {
      metadata: Mapping::new(),
      body:     text.to_string(),
    };
  };

  FrontMatter {
    metadata: parse_metadata(yaml),
    body:     body.to_string(),
  }
}

/// Return the body of a Markdown file, skipping any front matter.
#[must_use]
pub fn strip_front_matter(text: &str) -> &str {
  locate(text).map_or(text, |(_, body)| body)
}

/// Find the YAML block and the body that follows it.
fn locate(text: &str) -> Option<(&str, &str)> {
  let text = text.strip_prefix('\u{feff}').unwrap_or(text);
  let mut lines = text.split_inclusive('\n');

  let opening = lines.next()?;
  if opening.trim_end() != "---" {
    return None;
  }

  let mut offset = opening.len();
  for line in lines {
    if line.trim_end() == "---" {
      return Some((&text[opening.len()..offset], &text[offset + line.len()..]));
    }
    offset += line.len();
  }

  None
}

fn parse_metadata(yaml: &str) -> Mapping {
  if yaml.trim().is_empty() {
    return Mapping::new();
  }

  match serde_yaml::from_str::<Value>(yaml) {
    Ok(Value::Mapping(mapping)) => mapping,
    Ok(Value::Null) => Mapping::new(),
    Ok(other) => {
      warn!("Front matter is not a mapping, ignoring it: {other:?}");
      Mapping::new()
    },
    Err(e) => {
      warn!("Failed to parse front matter YAML: {e}");
      Mapping::new()
    },
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use serde::Deserialize;

  use super::*;

  #[test]
  fn test_split_front_matter() {
    let text = "---\ntitle: Getting Started\nposition: 2\n---\n# Intro\n";
    let front = split_front_matter(text);

    assert_eq!(front.get_str("title"), Some("Getting Started"));
    assert_eq!(front.body, "# Intro\n");
  }

  #[test]
  fn test_no_front_matter_keeps_body() {
    let text = "# Intro\n\n---\n\nafter a rule";
    let front = split_front_matter(text);

    assert!(front.metadata.is_empty());
    assert_eq!(front.body, text);
    assert_eq!(strip_front_matter(text), text);
  }

  #[test]
  fn test_unclosed_front_matter_is_body() {
    let text = "---\ntitle: Oops\n# Heading\n";
    let front = split_front_matter(text);

    assert!(front.metadata.is_empty());
    assert_eq!(front.body, text);
  }

  #[test]
  fn test_empty_front_matter() {
    let front = split_front_matter("---\n---\nbody");
    assert!(front.metadata.is_empty());
    assert_eq!(front.body, "body");
  }

  #[test]
  fn test_invalid_yaml_is_dropped() {
    let front = split_front_matter("---\ntitle: [unclosed\n---\nbody\n");
    assert!(front.metadata.is_empty());
    assert_eq!(front.body, "body\n");
  }

  #[test]
  fn test_crlf_and_bom() {
    let text = "\u{feff}---\r\ntitle: Windows\r\n---\r\nbody\r\n";
    let front = split_front_matter(text);

    assert_eq!(front.get_str("title"), Some("Windows"));
    assert_eq!(front.body, "body\r\n");
  }

  #[test]
  fn test_deserialize_typed() {
    #[derive(Debug, Deserialize)]
    struct Meta {
      title:  String,
      #[serde(default)]
      author: Option<String>,
    }

    let front = split_front_matter("---\ntitle: Post\n---\ntext");
    let meta: Meta = front.deserialize().unwrap();

    assert_eq!(meta.title, "Post");
    assert_eq!(meta.author, None);
  }

  #[test]
  fn test_get_string_formats_scalars() {
    let front =
      split_front_matter("---
title: 2.5
draft: true
tags: [a]
name: x
---
");

    assert_eq!(front.get_string("draft").as_deref(), Some("true"));
    assert_eq!(front.get_string("name").as_deref(), Some("x"));
    assert!(front.get_string("title").is_some());
    assert_eq!(front.get_str("title"), None);
    assert_eq!(front.get_string("tags"), None);
    assert_eq!(front.get_string("missing"), None);
  }
}
