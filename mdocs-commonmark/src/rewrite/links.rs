//! Link and image rewriting passes.
use std::sync::LazyLock;

use html_escape::encode_double_quoted_attribute;
use log::debug;
use regex::{Captures, Regex};

use super::blocks::{Block, map_prose, scan};
use crate::{
  types::MarkdownFileMetadata,
  utils::{anchor_id, compile_regex, is_external, slugify},
};

/// Inline code spans are matched first so that links inside them are kept.
/// Link text may hold an image, as in `[![badge](badge.svg)](https://ci)`,
/// but no other brackets. Targets may hold one level of balanced parentheses.
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(
    r#"(?P<code>`+[^`\n]*`+)|(?P<bang>!?)\[(?P<text>(?:!\[[^\[\]\n]*\]\((?:<[^>\n]*>|(?:[^()\s]|\([^()\s]*\))+)(?:\s+"[^"\n]*")?\s*\)|[^\[\]\n])*)\]\((?:<(?P<angle>[^>\n]*)>|(?P<bare>(?:[^()\s]|\([^()\s]*\))+))(?:\s+"(?P<title>[^"\n]*)")?\s*\)"#,
  )
});

static IMG_SRC_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(
    r#"(?P<pre><img\b[^>]*?\bsrc\s*=\s*)(?P<quote>["'])(?P<src>[^"']*)["']"#,
  )
});

static MIGRATION_GUIDE_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(
    r"(?i)(?:^|/)migration[ _-]?guides?/(?:[^/]+/)*(?P<file>[^/]+?)(?:\.md)?$",
  )
});

/// A Markdown link or image as written in the source.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkdownLink<'a> {
  pub is_image: bool,
  pub text:     &'a str,
  pub target:   &'a str,
  pub title:    Option<&'a str>,
}

impl<'a> MarkdownLink<'a> {
  /// Re-emit the link as Markdown with a new target.
  fn to_markdown(self, target: &str) -> String {
    let bang = if self.is_image { "!" } else { "" };
    let target = if target.contains(char::is_whitespace) {
      format!("<{target}>")
    } else {
      target.to_string()
    };
    let title = self
      .title
      .map(|title| format!(" \"{title}\""))
      .unwrap_or_default();

    format!("{bang}[{}]({target}{title})", self.text)
  }

  /// Split the target into path and fragment.
  fn path_and_fragment(self) -> (&'a str, Option<&'a str>) {
    match self.target.split_once('#') {
      Some((path, fragment)) => (path, Some(fragment)),
      None => (self.target, None),
    }
  }
}

type LinkRewrite<'f> = dyn FnMut(MarkdownLink<'_>) -> Option<String> + 'f;

/// Rewrite every link in a prose chunk for which `f` returns `Some`.
///
/// Images nested in link text are offered to `f` before the link itself.
fn rewrite_links(prose: &str, f: &mut LinkRewrite<'_>) -> String {
  LINK_RE
    .replace_all(prose, |caps: &Captures| {
      if caps.name("code").is_some() {
        return caps[0].to_string();
      }

      let Some(target) = caps.name("angle").or_else(|| caps.name("bare"))
      else {
        return caps[0].to_string();
      };

      let is_image = !caps["bang"].is_empty();
      let original_text = caps.name("text").map_or("", |m| m.as_str());
      let text = if !is_image && original_text.contains("![") {
        rewrite_links(original_text, &mut *f)
      } else {
        original_text.to_string()
      };

      let link = MarkdownLink {
        is_image,
        text: &text,
        target: target.as_str(),
        title: caps.name("title").map(|m| m.as_str()),
      };

      f(link).unwrap_or_else(|| {
        if text == original_text {
          return caps[0].to_string();
        }
        // `[` + text + tail, with the nested images rewritten.
        let tail = &caps[0][1 + original_text.len()..];
        format!("[{text}{tail}")
      })
    })
    .into_owned()
}

fn map_links<F>(markdown: &str, mut f: F) -> String
where
  F: FnMut(MarkdownLink<'_>) -> Option<String>,
{
  map_prose(markdown, |prose| rewrite_links(prose, &mut f))
}

fn decode_spaces(path: &str) -> String {
  path.replace("%20", " ")
}

/// Join a relative image target onto the images base path.
fn prefix_image_path(target: &str, base: &str) -> Option<String> {
  if target.is_empty()
    || target.starts_with('/')
    || target.starts_with('#')
    || is_external(target)
  {
    return None;
  }

  if !base.is_empty() && target.starts_with(&format!("{base}/")) {
    return None;
  }

  let mut relative = target;
  loop {
    if let Some(rest) = relative.strip_prefix("./") {
      relative = rest;
    } else if let Some(rest) = relative.strip_prefix("../") {
      relative = rest;
    } else {
      break;
    }
  }

  Some(format!("{base}/{relative}"))
}

/// Prefix relative image paths with `images_path`.
///
/// Handles both Markdown images and `<img src>` attributes. Leading `./` and
/// `../` segments are dropped, since all images live under one base.
#[must_use]
pub fn update_markdown_image_paths(markdown: &str, images_path: &str) -> String {
  if images_path.is_empty() {
    return markdown.to_string();
  }
  let base = images_path.trim_end_matches('/');

  map_prose(markdown, |prose| {
    let rewritten = rewrite_links(prose, &mut |link: MarkdownLink<'_>| {
      if !link.is_image {
        return None;
      }
      prefix_image_path(link.target, base).map(|target| link.to_markdown(&target))
    });

    IMG_SRC_RE
      .replace_all(&rewritten, |caps: &Captures| {
        let quote = &caps["quote"];
        prefix_image_path(&caps["src"], base).map_or_else(
          || caps[0].to_string(),
          |src| format!("{}{quote}{src}{quote}", &caps["pre"]),
        )
      })
      .into_owned()
  })
}

/// Rewrite links into a migration guide directory to the guide's own URLs.
///
/// `[upgrade](<../Migration Guide/From 1.x.md#config>)` becomes
/// `[upgrade](/migration-guide/from-1x#config)` with the default base.
#[must_use]
pub fn process_migration_guide_links(markdown: &str, base: &str) -> String {
  let base = base.trim_end_matches('/');

  map_links(markdown, |link| {
    if link.is_image || is_external(link.target) {
      return None;
    }

    let (path, fragment) = link.path_and_fragment();
    let path = decode_spaces(path);
    let caps = MIGRATION_GUIDE_RE.captures(&path)?;
    let slug = slugify(&caps["file"]);
    let fragment = fragment.map(|f| format!("#{f}")).unwrap_or_default();

    Some(link.to_markdown(&format!("{base}/{slug}{fragment}")))
  })
}

/// Resolve relative links to other Markdown files through the document
/// index.
///
/// The target's file name is looked up among the children of every index
/// node; a hit links to the node's page under `section`. Fragments are
/// rewritten to the ids the aggregator assigns, i.e. prefixed with the
/// node's ordinal. Links that cannot be resolved are left untouched.
#[must_use]
pub fn process_internal_md_links(
  markdown: &str,
  index: &[MarkdownFileMetadata],
  section: &str,
) -> String {
  let section = section.trim_matches('/');

  map_links(markdown, |link| {
    if link.is_image || link.target.starts_with('#') || is_external(link.target)
    {
      return None;
    }

    let (path, fragment) = link.path_and_fragment();
    let path = decode_spaces(path);
    if !path.to_ascii_lowercase().ends_with(".md") {
      return None;
    }

    let file_name = path.rsplit('/').next().unwrap_or(&path);
    let Some(node) = index
      .iter()
      .find(|node| node.children.iter().any(|child| child.file_name == file_name))
    else {
      debug!("Unresolved internal link: {}", link.target);
      return None;
    };

    let mut url = format!("/{section}/{}", slugify(&node.title));
    if let Some(fragment) = fragment.filter(|f| !f.is_empty()) {
      let ordinal = node.ordinal.as_deref().unwrap_or("1");
      url.push('#');
      let fragment = slugify(&decode_spaces(fragment));
      url.push_str(&anchor_id(Some(ordinal), &fragment));
    }

    Some(link.to_markdown(&url))
  })
}

/// Turn every remaining Markdown link into an `<a>` tag. Images are left for
/// the Markdown renderer.
#[must_use]
pub fn process_all_links(markdown: &str, external_new_tab: bool) -> String {
  map_links(markdown, |link| {
    if link.is_image {
      return None;
    }

    let href = encode_double_quoted_attribute(link.target).replace(' ', "%20");
    let mut anchor = format!("<a href=\"{href}\"");

    if let Some(title) = link.title {
      anchor.push_str(&format!(
        " title=\"{}\"",
        encode_double_quoted_attribute(title)
      ));
    }

    if external_new_tab
      && (link.target.starts_with("http://")
        || link.target.starts_with("https://")
        || link.target.starts_with("//"))
    {
      anchor.push_str(r#" target="_blank" rel="noopener noreferrer""#);
    }

    anchor.push('>');
    anchor.push_str(link.text);
    anchor.push_str("</a>");
    Some(anchor)
  })
}

fn collect_images_in(prose: &str, targets: &mut Vec<String>) {
  for caps in LINK_RE.captures_iter(prose) {
    if caps.name("code").is_some() {
      continue;
    }

    if caps["bang"].is_empty() {
      if let Some(text) = caps.name("text") {
        collect_images_in(text.as_str(), targets);
      }
    } else if let Some(target) = caps.name("angle").or_else(|| caps.name("bare"))
    {
      targets.push(target.as_str().to_string());
    }
  }
}

/// Collect Markdown image targets outside of code, in document order.
/// Images wrapped in links are included.
#[must_use]
pub fn collect_image_targets(markdown: &str) -> Vec<String> {
  let mut targets = Vec::new();

  for block in scan(markdown) {
    if let Block::Prose(prose) = block {
      collect_images_in(prose, &mut targets);
    }
  }

  targets
}
