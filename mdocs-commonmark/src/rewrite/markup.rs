//! Inline HTML and heading syntax normalization.
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::blocks::map_prose;
use crate::utils::compile_regex;

static STYLE_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(
    r#"(?P<code>`+[^`\n]*`+)|\bstyle\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#,
  )
});

static HEADING_NO_SPACE_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_regex(r"(?m)^(?P<hashes> {0,3}#{1,6})(?P<rest>[^\s#])"));

/// Normalize a CSS declaration list: lower-case property names, trimmed
/// values, no empty declarations.
fn normalize_declarations(style: &str) -> String {
  style
    .split(';')
    .filter_map(|declaration| {
      let (property, value) = declaration.split_once(':')?;
      let property = property.trim().to_lowercase();
      let value = value.trim().replace('"', "'");
      (!property.is_empty() && !value.is_empty())
        .then(|| format!("{property}: {value}"))
    })
    .collect::<Vec<_>>()
    .join("; ")
}

/// Normalize `style` attributes of inline HTML to a double-quoted
/// `prop: value; prop: value` form.
#[must_use]
pub fn update_markdown_html_style_tags(markdown: &str) -> String {
  map_prose(markdown, |prose| {
    STYLE_ATTR_RE
      .replace_all(prose, |caps: &Captures| {
        if caps.name("code").is_some() {
          return caps[0].to_string();
        }

        let style = caps
          .name("dq")
          .or_else(|| caps.name("sq"))
          .map_or("", |m| m.as_str());

        format!("style=\"{}\"", normalize_declarations(style))
      })
      .into_owned()
  })
}

/// Insert the missing space in ATX headings written as `##Title`.
#[must_use]
pub fn process_headers(markdown: &str) -> String {
  map_prose(markdown, |prose| {
    HEADING_NO_SPACE_RE
      .replace_all(prose, "${hashes} ${rest}")
      .into_owned()
  })
}
