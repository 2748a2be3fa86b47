#![allow(
  clippy::expect_used,
  clippy::panic,
  clippy::unwrap_used,
  reason = "Fine in tests"
)]
mod common;

use std::path::{Path, PathBuf};

use mdocs_utils::{
  Error,
  VERSION_INDEX_FILE,
  VersionIndexer,
  build_version_index,
  find_node_by_slug,
  load_version_index,
  read_version_dirs,
  write_version_index,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use crate::common::{aggregator, write_file};

fn docs_tree(root: &Path) {
  write_file(root, "1.0/01 Intro/a.md", "---\ntitle: First\n---\n# Welcome\n");
  write_file(
    root,
    "1.0/01 Intro/b.md",
    "# Welcome\n\n```mermaid\ngraph TD\n```\n\n```mermaid\ngraph LR\n```\n",
  );
  write_file(root, "1.0/01 Intro/notes.txt", "not markdown");
  write_file(root, "1.0/02 API/Client.md", "# Client\n");
  write_file(root, "1.0/README.md", "# Stray file\n");
  write_file(root, "2.0/01 Intro/a.md", "# Welcome\n");
  write_file(root, "README.md", "# Root readme\n");
  write_file(root, ".hidden/a.md", "# Hidden\n");
}

#[test]
fn test_read_version_dirs_ignores_files() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  docs_tree(dir.path());

  assert_eq!(read_version_dirs(dir.path()).unwrap(), ["1.0", "2.0"]);
}

#[test]
fn test_read_version_dirs_missing_root() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let missing = dir.path().join("nope");

  assert!(read_version_dirs(&missing).unwrap().is_empty());
}

#[test]
fn test_index_version() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  docs_tree(dir.path());
  let aggregator = aggregator(dir.path());
  let indexer = VersionIndexer::new(&aggregator, "/docs/");

  let docs = indexer.index_version("1.0").unwrap().expect("version exists");

  let slugs: Vec<_> = docs.iter().map(|d| d.slug.as_str()).collect();
  assert_eq!(slugs, ["01-intro", "02-api"]);

  let intro = &docs[0];
  assert_eq!(intro.title, "01 Intro");
  assert_eq!(intro.version, "1.0");
  assert_eq!(intro.url, "/docs/1.0/01-intro");

  let ids: Vec<_> = intro.anchor_links.iter().map(|l| l.id.as_str()).collect();
  assert_eq!(ids, ["1-welcome", "2-welcome"]);

  assert_eq!(intro.html.matches("<script src=").count(), 1);
  assert!(!docs[1].html.contains("<script"));
}

#[test]
fn test_index_missing_version() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  docs_tree(dir.path());
  let aggregator = aggregator(dir.path());
  let indexer = VersionIndexer::new(&aggregator, "/docs");

  assert!(indexer.index_version("9.9").unwrap().is_none());
  assert!(indexer.index_version("README.md").unwrap().is_none());
  assert_eq!(indexer.versions().unwrap(), ["1.0", "2.0"]);
}

#[test]
fn test_build_write_and_load_version_index() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  docs_tree(dir.path());

  let index = build_version_index(dir.path(), "1.0")
    .unwrap()
    .expect("version exists");

  assert_eq!(index.len(), 2);
  let intro = &index[0];
  assert_eq!(intro.title, "01 Intro");
  assert_eq!(intro.ordinal.as_deref(), Some("1"));
  assert_eq!(intro.path, PathBuf::from("1.0/01 Intro"));

  let files: Vec<_> = intro.children.iter().map(|c| c.file_name.as_str()).collect();
  assert_eq!(files, ["a.md", "b.md"]);
  assert_eq!(intro.children[0].title.as_deref(), Some("First"));
  assert_eq!(intro.children[1].title, None);
  assert_eq!(intro.children[0].path, PathBuf::from("1.0/01 Intro/a.md"));

  let path = write_version_index(dir.path(), "1.0", &index).unwrap();
  assert!(path.ends_with(VERSION_INDEX_FILE));

  let loaded = load_version_index(dir.path(), "1.0")
    .unwrap()
    .expect("version exists");
  assert_eq!(loaded, index);

  let api = find_node_by_slug(&loaded, "02-api").expect("node exists");
  let doc = aggregator(dir.path()).aggregate(api, None).unwrap();
  assert_eq!(doc.anchor_links[0].id, "2-client");
}

#[test]
fn test_load_version_index_accepts_numeric_ordinals() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  write_file(
    dir.path(),
    "1.0/index.json",
    r#"[{"title": "API", "ordinal": 3, "children": [{"fileName": "Client.md", "path": "1.0/API/Client.md"}]}]"#,
  );

  let index = load_version_index(dir.path(), "1.0")
    .unwrap()
    .expect("version exists");

  assert_eq!(index[0].ordinal.as_deref(), Some("3"));
  assert_eq!(index[0].children[0].file_name, "Client.md");
}

#[test]
fn test_load_version_index_errors() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  write_file(dir.path(), "1.0/index.json", "{ not json");
  write_file(dir.path(), "2.0/01 Intro/a.md", "# A\n");

  assert!(load_version_index(dir.path(), "3.0").unwrap().is_none());

  match load_version_index(dir.path(), "1.0") {
    Err(Error::Index { path, .. }) => assert!(path.ends_with(VERSION_INDEX_FILE)),
    other => panic!("unexpected result: {other:?}"),
  }

  assert!(matches!(
    load_version_index(dir.path(), "2.0"),
    Err(Error::Io { .. })
  ));
}
