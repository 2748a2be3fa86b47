//! Markdown rewriting passes.
//!
//! Every pass is a plain `&str -> String` function that tolerates malformed
//! input: no match is a no-op, unbalanced fences and unresolvable links are
//! passed through unchanged. [`Rewriter::rewrite`] runs them in this order:
//!
//! 1. [`update_markdown_image_paths`]
//! 2. [`update_markdown_html_style_tags`]
//! 3. [`process_headers`]
//! 4. [`process_migration_guide_links`]
//! 5. [`process_internal_md_links`] (only with [`InternalLinks`] configured)
//! 6. [`process_all_links`]
//! 7. [`process_javascript_blocks`]
//! 8. [`process_triple_quote_code_blocks`]
//! 9. [`process_code_blocks`]
//!
//! Migration guide links also end in `.md` and must be rewritten before
//! internal links. Each code block pass turns fences into `<pre>` blocks
//! that the following passes skip.
mod blocks;
mod code;
mod links;
mod markup;

use log::trace;

pub use self::{
  code::{
    process_code_blocks,
    process_javascript_blocks,
    process_triple_quote_code_blocks,
  },
  links::{
    collect_image_targets,
    process_all_links,
    process_internal_md_links,
    process_migration_guide_links,
    update_markdown_image_paths,
  },
  markup::{process_headers, update_markdown_html_style_tags},
};
use crate::types::MarkdownFileMetadata;

/// Default URL prefix for migration guide pages.
pub const DEFAULT_MIGRATION_GUIDE_BASE: &str = "/migration-guide";

/// Options shared by all rewrite passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
  /// Base path prepended to relative image targets. Empty disables the pass.
  pub images_path: String,

  /// URL prefix for rewritten migration guide links.
  pub migration_guide_base: String,

  /// Open `http(s)` links in a new tab.
  pub external_links_new_tab: bool,
}

impl Default for RewriteOptions {
  fn default() -> Self {
    Self {
      images_path:            String::new(),
      migration_guide_base:   DEFAULT_MIGRATION_GUIDE_BASE.to_string(),
      external_links_new_tab: true,
    }
  }
}

/// Internal cross-document link resolution.
///
/// Resolution needs both the document index and the identifier of the site
/// section the documents are served under; without both the pass is skipped.
#[derive(Debug, Clone, Copy)]
pub struct InternalLinks<'a> {
  pub index:   &'a [MarkdownFileMetadata],
  pub section: &'a str,
}

impl<'a> InternalLinks<'a> {
  #[must_use]
  pub const fn new(index: &'a [MarkdownFileMetadata], section: &'a str) -> Self {
    Self { index, section }
  }
}

/// Runs the full rewrite pipeline.
#[derive(Debug, Clone)]
pub struct Rewriter<'a> {
  options:        RewriteOptions,
  internal_links: Option<InternalLinks<'a>>,
}

impl<'a> Rewriter<'a> {
  #[must_use]
  pub const fn new(options: RewriteOptions) -> Self {
    Self {
      options,
      internal_links: None,
    }
  }

  /// Enable internal link resolution.
  #[must_use]
  pub const fn with_internal_links(mut self, links: InternalLinks<'a>) -> Self {
    self.internal_links = Some(links);
    self
  }

  /// Enable internal link resolution if `links` is `Some`.
  #[must_use]
  pub const fn with_optional_internal_links(
    mut self,
    links: Option<InternalLinks<'a>>,
  ) -> Self {
    self.internal_links = links;
    self
  }

  #[must_use]
  pub const fn options(&self) -> &RewriteOptions {
    &self.options
  }

  /// Run every pass over `markdown` in order.
  #[must_use]
  pub fn rewrite(&self, markdown: &str) -> String {
    let mut processed =
      update_markdown_image_paths(markdown, &self.options.images_path);
    processed = update_markdown_html_style_tags(&processed);
    processed = process_headers(&processed);
    processed = process_migration_guide_links(
      &processed,
      &self.options.migration_guide_base,
    );

    if let Some(links) = self.internal_links.filter(|l| !l.section.is_empty()) {
      processed = process_internal_md_links(&processed, links.index, links.section);
    } else {
      trace!("Internal link resolution not configured, skipping");
    }

    processed = process_all_links(&processed, self.options.external_links_new_tab);
    processed = process_javascript_blocks(&processed);
    processed = process_triple_quote_code_blocks(&processed);
    process_code_blocks(&processed)
  }
}
