//! Versioned documentation trees.
//!
//! Content lives under `{docs_root}/{version}/{topic}/{file}.md`. Every
//! directory listing is sorted by file name so that output, and with it the
//! ordinal prefixes of heading ids, does not depend on the filesystem.
use std::{
  fs,
  path::{Path, PathBuf},
};

use log::{debug, info, trace, warn};
use mdocs_commonmark::{
  MarkdownFileMetadata,
  MarkdownFileRef,
  VersionDoc,
  split_front_matter,
  slugify,
};
use walkdir::WalkDir;

use crate::{
  aggregate::Aggregator,
  error::{Error, Result},
};

/// Name of the version index file inside a version directory.
pub const VERSION_INDEX_FILE: &str = "index.json";

/// Immediate entries of `dir`, sorted by name, hidden entries skipped.
fn list_dir(dir: &Path) -> Result<Vec<walkdir::DirEntry>> {
  let mut entries = Vec::new();

  for entry in WalkDir::new(dir)
    .min_depth(1)
    .max_depth(1)
    .sort_by_file_name()
    .follow_links(true)
  {
    let entry = entry.map_err(|source| {
      Error::Walk {
        path: dir.to_path_buf(),
        source,
      }
    })?;

    if entry.file_name().to_string_lossy().starts_with('.') {
      trace!("Skipping hidden entry {}", entry.path().display());
      continue;
    }
    entries.push(entry);
  }

  Ok(entries)
}

/// Subdirectories of `dir` as `(name, path)` pairs.
fn subdirectories(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
  Ok(
    list_dir(dir)?
      .into_iter()
      .filter(|entry| entry.file_type().is_dir())
      .map(|entry| {
        (
          entry.file_name().to_string_lossy().into_owned(),
          entry.into_path(),
        )
      })
      .collect(),
  )
}

/// Markdown files directly inside `dir`.
fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
  Ok(
    list_dir(dir)?
      .into_iter()
      .filter(|entry| entry.file_type().is_file())
      .map(walkdir::DirEntry::into_path)
      .filter(|path| {
        path
          .extension()
          .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
      })
      .collect(),
  )
}

fn version_dir(docs_root: &Path, version: &str) -> Option<PathBuf> {
  let dir = docs_root.join(version);
  if dir.is_dir() {
    Some(dir)
  } else {
    warn!(
      "Version '{version}' not found: {} is not a directory",
      dir.display()
    );
    None
  }
}

/// Leading digits of a directory name, e.g. `2` for `02 Getting Started`.
#[must_use]
pub fn leading_ordinal(name: &str) -> Option<String> {
  let digits: String = name.chars().take_while(char::is_ascii_digit).collect();
  digits.parse::<u64>().ok().map(|n| n.to_string())
}

/// Names of the version directories under `docs_root`, sorted. Files are
/// ignored; a missing root yields an empty list.
///
/// # Errors
///
/// Returns [`Error::Walk`] if the root exists but cannot be listed.
pub fn read_version_dirs(docs_root: &Path) -> Result<Vec<String>> {
  if !docs_root.is_dir() {
    warn!("Docs root {} does not exist", docs_root.display());
    return Ok(Vec::new());
  }

  Ok(
    subdirectories(docs_root)?
      .into_iter()
      .map(|(name, _)| name)
      .collect(),
  )
}

/// Load `{docs_root}/{version}/index.json`.
///
/// Returns `None` if the version directory does not exist.
///
/// # Errors
///
/// Returns [`Error::Io`] if the index file cannot be read and
/// [`Error::Index`] if it is not a valid index.
pub fn load_version_index(
  docs_root: &Path,
  version: &str,
) -> Result<Option<Vec<MarkdownFileMetadata>>> {
  let Some(dir) = version_dir(docs_root, version) else {
    return Ok(None);
  };

  let path = dir.join(VERSION_INDEX_FILE);
  let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
  let index = serde_json::from_str(&content)
    .map_err(|source| Error::Index { path, source })?;

  Ok(Some(index))
}

/// Build a version index from the directory layout.
///
/// Every topic directory becomes a node titled with the directory name, with
/// its leading digits as ordinal. Its Markdown files become the children,
/// titled from their front matter when present. Paths are relative to
/// `docs_root`.
///
/// Returns `None` if the version directory does not exist.
///
/// # Errors
///
/// Returns an error if a directory cannot be listed or a file cannot be read.
pub fn build_version_index(
  docs_root: &Path,
  version: &str,
) -> Result<Option<Vec<MarkdownFileMetadata>>> {
  let Some(dir) = version_dir(docs_root, version) else {
    return Ok(None);
  };

  let relative =
    |path: &Path| path.strip_prefix(docs_root).unwrap_or(path).to_path_buf();

  let mut index = Vec::new();
  for (name, topic_dir) in subdirectories(&dir)? {
    let mut children = Vec::new();

    for path in markdown_files(&topic_dir)? {
      let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
      let title = split_front_matter(&content)
        .get_str("title")
        .map(str::to_string);

      children.push(MarkdownFileRef {
        file_name: path
          .file_name()
          .map(|n| n.to_string_lossy().into_owned())
          .unwrap_or_default(),
        path: relative(&path),
        title,
      });
    }

    debug!("Indexed topic '{name}' with {} files", children.len());
    index.push(MarkdownFileMetadata {
      ordinal: leading_ordinal(&name),
      path: relative(&topic_dir),
      title: name,
      children,
    });
  }

  Ok(Some(index))
}

/// Write `index` as pretty JSON to `{docs_root}/{version}/index.json`.
///
/// # Errors
///
/// Returns an error if the index cannot be serialized or written.
pub fn write_version_index(
  docs_root: &Path,
  version: &str,
  index: &[MarkdownFileMetadata],
) -> Result<PathBuf> {
  let path = docs_root.join(version).join(VERSION_INDEX_FILE);
  let json = serde_json::to_string_pretty(index)?;
  fs::write(&path, json).map_err(|e| Error::io(&path, e))?;

  info!("Wrote version index {}", path.display());
  Ok(path)
}

/// Find the node whose title slugifies to `slug`.
#[must_use]
pub fn find_node_by_slug<'a>(
  index: &'a [MarkdownFileMetadata],
  slug: &str,
) -> Option<&'a MarkdownFileMetadata> {
  index.iter().find(|node| slugify(&node.title) == slug)
}

/// Compiles every topic of a version into a [`VersionDoc`].
///
/// Unlike [`Aggregator::aggregate`], the files of a topic are compiled one by
/// one and their HTML is concatenated. Each file's heading ids are prefixed
/// with its 1-based position in the topic.
#[derive(Debug, Clone, Copy)]
pub struct VersionIndexer<'a> {
  aggregator: &'a Aggregator,
  url_prefix: &'a str,
}

impl<'a> VersionIndexer<'a> {
  /// Create an indexer for the docs tree rooted at the aggregator's root.
  #[must_use]
  pub const fn new(aggregator: &'a Aggregator, url_prefix: &'a str) -> Self {
    Self {
      aggregator,
      url_prefix,
    }
  }

  /// Names of all versions in the docs tree.
  ///
  /// # Errors
  ///
  /// Returns [`Error::Walk`] if the root cannot be listed.
  pub fn versions(&self) -> Result<Vec<String>> {
    read_version_dirs(self.aggregator.root())
  }

  /// Compile every topic of `version`.
  ///
  /// Returns `None` if the version directory does not exist.
  ///
  /// # Errors
  ///
  /// Returns an error if a directory cannot be listed or a file cannot be
  /// read.
  pub fn index_version(&self, version: &str) -> Result<Option<Vec<VersionDoc>>> {
    let Some(dir) = version_dir(self.aggregator.root(), version) else {
      return Ok(None);
    };

    let mut docs = Vec::new();
    for (topic, topic_dir) in subdirectories(&dir)? {
      docs.push(self.compile_topic(version, &topic, &topic_dir)?);
    }

    info!("Indexed {} topics for version {version}", docs.len());
    Ok(Some(docs))
  }

  /// Compile the Markdown files directly inside `topic_dir`.
  ///
  /// # Errors
  ///
  /// Returns an error if the directory cannot be listed or a file cannot be
  /// read.
  pub fn compile_topic(
    &self,
    version: &str,
    topic: &str,
    topic_dir: &Path,
  ) -> Result<VersionDoc> {
    let compiler = self.aggregator.compiler();
    let mut html = String::new();
    let mut anchor_links = Vec::new();

    for (position, path) in markdown_files(topic_dir)?.iter().enumerate() {
      let markdown = self.aggregator.read_markdown_file(path)?;
      let ordinal = (position + 1).to_string();
      let doc = compiler.compile_fragment(&markdown, Some(&ordinal));

      html.push_str(&doc.html);
      anchor_links.extend(doc.anchor_links);
    }
    compiler.append_diagram_bootstrap(&mut html);

    let slug = slugify(topic);
    let url = format!(
      "{}/{version}/{slug}",
      self.url_prefix.trim_end_matches('/')
    );

    Ok(VersionDoc {
      title: topic.to_string(),
      version: version.to_string(),
      slug,
      url,
      html,
      anchor_links,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_leading_ordinal() {
    assert_eq!(leading_ordinal("02 Getting Started"), Some("2".to_string()));
    assert_eq!(leading_ordinal("12 Changelog"), Some("12".to_string()));
    assert_eq!(leading_ordinal("Getting Started"), None);
  }

  #[test]
  fn test_find_node_by_slug() {
    let index = vec![MarkdownFileMetadata {
      title:    "12 Changelog".to_string(),
      ordinal:  Some("12".to_string()),
      path:     PathBuf::new(),
      children: Vec::new(),
    }];

    assert!(find_node_by_slug(&index, "12-changelog").is_some());
    assert!(find_node_by_slug(&index, "changelog").is_none());
  }
}
