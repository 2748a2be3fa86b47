//! Markdown to HTML conversion and heading anchor injection.
use std::{collections::HashSet, sync::LazyLock};

use comrak::{markdown_to_html, options::Options};
use html_escape::decode_html_entities;
use log::{debug, trace, warn};
use regex::{Captures, NoExpand, Regex};

use crate::{
  front_matter::strip_front_matter,
  types::{AnchorLink, CompiledDoc},
  utils::{anchor_id, clean_tags, compile_regex, slugify},
};

/// Opening tag of a diagram container. Its presence in compiled HTML is what
/// triggers the diagram bootstrap.
pub const DIAGRAM_MARKER: &str = "<pre class=\"mermaid\">";

/// Diagram runtime, pinned to one release.
pub const DEFAULT_DIAGRAM_SCRIPT_URL: &str =
  "https://cdn.jsdelivr.net/npm/mermaid@10.6.1/dist/mermaid.min.js";

const DIAGRAM_INIT: &str = "<script>mermaid.initialize({ startOnLoad: true, \
                            htmlLabels: true, theme: 'base' });</script>";

/// Fallback slug for headings without any sluggable text.
const EMPTY_HEADING_SLUG: &str = "section";

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(
    r"(?s)<h(?P<level>[1-6])(?P<attrs>\s[^>]*)?>(?P<inner>.*?)</h(?P<close>[1-6])>",
  )
});

static ID_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(r#"\bid\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#)
});

/// Options for [`MarkdownCompiler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
  /// Enable GitHub Flavored Markdown extensions.
  pub gfm: bool,

  /// Append the diagram bootstrap when diagram markup is present.
  pub diagrams: bool,

  /// Script loaded by the diagram bootstrap.
  pub diagram_script_url: String,
}

impl Default for CompileOptions {
  fn default() -> Self {
    Self {
      gfm:                cfg!(feature = "gfm"),
      diagrams:           true,
      diagram_script_url: DEFAULT_DIAGRAM_SCRIPT_URL.to_string(),
    }
  }
}

/// Renders Markdown to HTML and collects heading anchors.
#[derive(Debug, Clone, Default)]
pub struct MarkdownCompiler {
  options: CompileOptions,
}

impl MarkdownCompiler {
  #[must_use]
  pub const fn new(options: CompileOptions) -> Self {
    Self { options }
  }

  #[must_use]
  pub const fn options(&self) -> &CompileOptions {
    &self.options
  }

  /// Compile a Markdown document, appending the diagram bootstrap if needed.
  ///
  /// Front matter is stripped first. With an `ordinal`, every generated
  /// heading id is prefixed `{ordinal}-`.
  #[must_use]
  pub fn compile(&self, markdown: &str, ordinal: Option<&str>) -> CompiledDoc {
    let mut doc = self.compile_fragment(markdown, ordinal);
    self.append_diagram_bootstrap(&mut doc.html);
    doc
  }

  /// Compile a Markdown document without the diagram bootstrap, for HTML
  /// that is concatenated with other fragments before it is published.
  #[must_use]
  pub fn compile_fragment(
    &self,
    markdown: &str,
    ordinal: Option<&str>,
  ) -> CompiledDoc {
    let body = strip_front_matter(markdown);
    let html = self.convert_to_html(body);
    let (html, anchor_links) = insert_ids_to_headers(&html, ordinal);

    debug!("Compiled document with {} headings", anchor_links.len());
    CompiledDoc { html, anchor_links }
  }

  /// Append the diagram bootstrap if `html` contains [`DIAGRAM_MARKER`].
  ///
  /// Does nothing when diagrams are disabled or the bootstrap is already
  /// present. Returns whether the bootstrap was appended.
  pub fn append_diagram_bootstrap(&self, html: &mut String) -> bool {
    if !self.options.diagrams || !html.contains(DIAGRAM_MARKER) {
      return false;
    }

    let script = format!(
      "<script src=\"{}\"></script>",
      self.options.diagram_script_url
    );
    if html.contains(&script) {
      trace!("Diagram bootstrap already present");
      return false;
    }

    if !html.is_empty() && !html.ends_with('\n') {
      html.push('\n');
    }
    html.push_str(&script);
    html.push('\n');
    html.push_str(DIAGRAM_INIT);
    html.push('\n');
    true
  }

  /// Render Markdown to HTML with comrak.
  fn convert_to_html(&self, markdown: &str) -> String {
    let options = self.comrak_options();
    markdown_to_html(markdown, &options)
  }

  /// Build comrak options from the compile options.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    if self.options.gfm {
      options.extension.table = true;
      options.extension.footnotes = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
    }
    // Rewrite passes emit raw HTML for links and code blocks. Autolinking
    // would nest anchors inside those links, so it stays off.
    options.render.r#unsafe = true;
    options.extension.header_ids = None;
    options
  }
}

fn existing_id(attrs: &str) -> Option<&str> {
  let caps = ID_ATTR_RE.captures(attrs)?;
  caps
    .name("dq")
    .or_else(|| caps.name("sq"))
    .map(|m| m.as_str())
    .filter(|id| !id.is_empty())
}

fn heading_text(inner: &str) -> String {
  let text = clean_tags(inner);
  decode_html_entities(&text)
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
}

/// Return `base`, or the first `base-N` not yet in `used`, and reserve it.
fn unique_id(base: String, used: &mut HashSet<String>) -> String {
  if used.insert(base.clone()) {
    return base;
  }

  let mut counter = 1;
  loop {
    let candidate = format!("{base}-{counter}");
    if used.insert(candidate.clone()) {
      return candidate;
    }
    counter += 1;
  }
}

/// Give every `<h1>`..`<h6>` in `html` a unique `id` and collect the
/// headings as anchor links, in document order.
///
/// Explicit ids are kept as they are and reserved before any id is
/// generated; a repeated explicit id is disambiguated like a generated one.
/// Generated ids are the slug of the heading text, prefixed
/// with `ordinal` when given; duplicates get `-1`, `-2`, ... appended.
#[must_use]
pub fn insert_ids_to_headers(
  html: &str,
  ordinal: Option<&str>,
) -> (String, Vec<AnchorLink>) {
  let mut used: HashSet<String> = HEADING_RE
    .captures_iter(html)
    .filter_map(|caps| caps.name("attrs").and_then(|m| existing_id(m.as_str())))
    .map(str::to_string)
    .collect();
  let mut explicit_seen = HashSet::new();
  let mut anchor_links = Vec::new();

  let output = HEADING_RE.replace_all(html, |caps: &Captures| {
    let level = &caps["level"];
    if level != &caps["close"] {
      return caps[0].to_string();
    }

    let attrs = caps.name("attrs").map_or("", |m| m.as_str());
    let inner = &caps["inner"];
    let text = heading_text(inner);

    let (id, tag) = if let Some(id) = existing_id(attrs) {
      if explicit_seen.insert(id.to_string()) {
        (id.to_string(), caps[0].to_string())
      } else {
        let unique = unique_id(id.to_string(), &mut used);
        warn!("Duplicate heading id '{id}', renamed to '{unique}'");
        let attrs =
          ID_ATTR_RE.replace(attrs, NoExpand(&format!("id=\"{unique}\"")));
        let tag = format!("<h{level}{attrs}>{inner}</h{level}>");
        (unique, tag)
      }
    } else {
      let slug = slugify(&text);
      let slug = if slug.is_empty() {
        EMPTY_HEADING_SLUG.to_string()
      } else {
        slug
      };
      let id = unique_id(anchor_id(ordinal, &slug), &mut used);
      let tag = format!("<h{level} id=\"{id}\"{attrs}>{inner}</h{level}>");
      (id, tag)
    };

    anchor_links.push(AnchorLink {
      id,
      text,
      level: level.parse().unwrap_or(1),
    });
    tag
  });

  (output.into_owned(), anchor_links)
}
