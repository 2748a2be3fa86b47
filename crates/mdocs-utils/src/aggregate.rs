//! Multi-file aggregation.
//!
//! A documentation node is a directory whose Markdown files are published as
//! one page. The files are concatenated first and the rewrite passes and the
//! compiler run once over the result, so that links and anchors resolve
//! against the combined document.
use std::{
  fs,
  path::{Path, PathBuf},
  sync::LazyLock,
};

use log::{debug, trace};
use mdocs_commonmark::{
  CompiledDoc,
  InternalLinks,
  MarkdownCompiler,
  MarkdownFileMetadata,
  RewriteOptions,
  Rewriter,
  strip_front_matter,
  utils::never_matching_regex,
};
use regex::Regex;

use crate::error::{Error, Result};

/// File that keeps its own top-level heading inside a changelog node.
const CHANGELOG_FILE_NAME: &str = "Changelog.md";

/// Separator placed between concatenated files.
const FILE_SEPARATOR: &str = "\n\n";

static CHANGELOG_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[0-9]+ Changelog$").unwrap_or_else(|e| {
    log::error!("Failed to compile CHANGELOG_TITLE_RE regex: {e}");
    never_matching_regex()
  })
});

static LEVEL_ONE_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?m)^# ").unwrap_or_else(|e| {
    log::error!("Failed to compile LEVEL_ONE_HEADING_RE regex: {e}");
    never_matching_regex()
  })
});

/// Whether a file's level-1 headings must be demoted when it is
/// concatenated into its parent node.
///
/// Applies to the release entries of a changelog node (parent titled like
/// `12 Changelog`); the node's own `Changelog.md` keeps its title.
#[must_use]
pub fn is_replaceable_changelog_item(parent_title: &str, file_name: &str) -> bool {
  CHANGELOG_TITLE_RE.is_match(parent_title) && file_name != CHANGELOG_FILE_NAME
}

/// Turn every line starting with `# ` into `## `.
///
/// This is a plain text substitution: a `# ` line inside a fenced code block
/// is demoted too.
#[must_use]
pub fn demote_level_one_headings(markdown: &str) -> String {
  LEVEL_ONE_HEADING_RE.replace_all(markdown, "## ").into_owned()
}

/// Reads, concatenates and compiles Markdown files below a root directory.
#[derive(Debug, Clone)]
pub struct Aggregator {
  root:            PathBuf,
  rewrite_options: RewriteOptions,
  compiler:        MarkdownCompiler,
}

impl Aggregator {
  /// Create an aggregator. Relative paths in index nodes are resolved
  /// against `root`.
  #[must_use]
  pub fn new(
    root: impl Into<PathBuf>,
    rewrite_options: RewriteOptions,
    compiler: MarkdownCompiler,
  ) -> Self {
    Self {
      root: root.into(),
      rewrite_options,
      compiler,
    }
  }

  #[must_use]
  pub fn root(&self) -> &Path {
    &self.root
  }

  #[must_use]
  pub const fn compiler(&self) -> &MarkdownCompiler {
    &self.compiler
  }

  /// A rewriter with this aggregator's options and no internal links.
  #[must_use]
  pub fn rewriter(&self) -> Rewriter<'static> {
    Rewriter::new(self.rewrite_options.clone())
  }

  fn resolve(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.root.join(path)
    }
  }

  fn read_to_string(&self, path: &Path) -> Result<String> {
    let path = self.resolve(path);
    trace!("Reading {}", path.display());
    fs::read_to_string(&path).map_err(|e| Error::io(path, e))
  }

  /// Concatenate the bodies of all files of `node`, in index order.
  ///
  /// Front matter is stripped from each file, and changelog entries have
  /// their level-1 headings demoted.
  ///
  /// # Errors
  ///
  /// Returns [`Error::Io`] if a child file cannot be read.
  pub fn concat_markdown(&self, node: &MarkdownFileMetadata) -> Result<String> {
    let mut bodies = Vec::with_capacity(node.children.len());

    for child in &node.children {
      let content = self.read_to_string(&child.path)?;
      let body = strip_front_matter(&content);

      if is_replaceable_changelog_item(&node.title, &child.file_name) {
        trace!("Demoting headings of changelog entry {}", child.file_name);
        bodies.push(demote_level_one_headings(body));
      } else {
        bodies.push(body.to_string());
      }
    }

    Ok(bodies.join(FILE_SEPARATOR))
  }

  /// Compile all files of `node` into one document.
  ///
  /// Heading ids are prefixed with the node's ordinal, or `1` if it has none.
  ///
  /// # Errors
  ///
  /// Returns [`Error::Io`] if a child file cannot be read.
  pub fn aggregate(
    &self,
    node: &MarkdownFileMetadata,
    internal_links: Option<InternalLinks<'_>>,
  ) -> Result<CompiledDoc> {
    let markdown = self.concat_markdown(node)?;
    let rewritten = Rewriter::new(self.rewrite_options.clone())
      .with_optional_internal_links(internal_links)
      .rewrite(&markdown);

    let ordinal = node.ordinal.as_deref().unwrap_or("1");
    let doc = self.compiler.compile(&rewritten, Some(ordinal));

    debug!(
      "Aggregated '{}' from {} files, {} headings",
      node.title,
      node.children.len(),
      doc.anchor_links.len()
    );
    Ok(doc)
  }

  /// Read one file, strip its front matter and run the rewrite passes.
  ///
  /// # Errors
  ///
  /// Returns [`Error::Io`] if the file cannot be read.
  pub fn read_markdown_file(&self, path: &Path) -> Result<String> {
    let content = self.read_to_string(path)?;
    Ok(self.rewriter().rewrite(strip_front_matter(&content)))
  }

  /// Read, rewrite and compile one file.
  ///
  /// # Errors
  ///
  /// Returns [`Error::Io`] if the file cannot be read.
  pub fn compile_markdown_file(
    &self,
    path: &Path,
    ordinal: Option<&str>,
  ) -> Result<CompiledDoc> {
    let markdown = self.read_markdown_file(path)?;
    Ok(self.compiler.compile(&markdown, ordinal))
  }
}
