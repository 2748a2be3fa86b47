//! Fenced code block passes.
//!
//! Each pass replaces matching fences with a raw `<pre>` HTML block. The
//! renderer passes such blocks through untouched, and later passes skip them.
use html_escape::encode_text;

use super::blocks::{Fence, FenceKind, map_fences};
use crate::compile::DIAGRAM_MARKER;

const JAVASCRIPT_LANGUAGES: &[&str] = &["js", "javascript", "jsx", "mjs", "cjs"];

/// Keep only characters that are safe inside a class attribute.
fn sanitize_language(language: &str) -> String {
  language
    .chars()
    .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
    .collect::<String>()
    .to_ascii_lowercase()
}

fn render_pre(fence: &Fence<'_>, class: &str, language: Option<&str>) -> String {
  let code_class = language
    .map(sanitize_language)
    .filter(|language| !language.is_empty())
    .map(|language| format!(" class=\"language-{language}\""))
    .unwrap_or_default();

  format!(
    "{}<pre class=\"{class}\"><code{code_class}>{}</code></pre>{}",
    fence.indent,
    encode_text(fence.body),
    fence.line_ending()
  )
}

/// Render JavaScript fences (`js`, `javascript`, `jsx`, `mjs`, `cjs`) with a
/// single normalized language class.
#[must_use]
pub fn process_javascript_blocks(markdown: &str) -> String {
  map_fences(markdown, |fence| {
    if fence.kind == FenceKind::TripleQuote {
      return None;
    }

    let language = fence.language()?;
    JAVASCRIPT_LANGUAGES
      .iter()
      .any(|candidate| candidate.eq_ignore_ascii_case(language))
      .then(|| {
        render_pre(fence, "code-block code-block--javascript", Some("javascript"))
      })
  })
}

/// Render `"""`-delimited blocks.
#[must_use]
pub fn process_triple_quote_code_blocks(markdown: &str) -> String {
  map_fences(markdown, |fence| {
    (fence.kind == FenceKind::TripleQuote)
      .then(|| render_pre(fence, "code-block code-block--quote", fence.language()))
  })
}

/// Render the remaining backtick and tilde fences. `mermaid` fences become
/// diagram containers.
#[must_use]
pub fn process_code_blocks(markdown: &str) -> String {
  map_fences(markdown, |fence| {
    if fence.kind == FenceKind::TripleQuote {
      return None;
    }

    let language = fence.language();
    if language.is_some_and(|language| language.eq_ignore_ascii_case("mermaid")) {
      return Some(format!(
        "{}{DIAGRAM_MARKER}{}</pre>{}",
        fence.indent,
        encode_text(fence.body),
        fence.line_ending()
      ));
    }

    Some(render_pre(fence, "code-block", language))
  })
}
