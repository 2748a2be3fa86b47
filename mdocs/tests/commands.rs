#![allow(clippy::expect_used, clippy::unwrap_used, reason = "Fine in tests")]
use std::{fs, path::Path};

use mdocs::commands;
use mdocs_commonmark::{CompiledDoc, VersionDoc};
use mdocs_config::Config;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write_file(root: &Path, relative: &str, content: &str) {
  let path = root.join(relative);
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, content).unwrap();
}

fn site(root: &Path) -> Config {
  write_file(
    root,
    "content/docs/2.0/01 Getting Started/Install.md",
    "# Install\n\nThen read the [client docs](../02%20API/Client.md#Connecting).\n",
  );
  write_file(
    root,
    "content/docs/2.0/02 API/Client.md",
    "# Client\n\n## Connecting\n\n```mermaid\ngraph TD\n```\n",
  );
  write_file(
    root,
    "content/docs/2.0/12 Changelog/Changelog.md",
    "# Changelog\n",
  );
  write_file(
    root,
    "content/docs/2.0/12 Changelog/2.0.1.md",
    "# 2.0.1\n\n- Fixes\n",
  );
  write_file(
    root,
    "content/blog/launch.md",
    "---\ntitle: Launch\ndate: 2024-05-01\n---\n# We launched\n",
  );

  let mut config = Config::default();
  config.content_dir = root.join("content");
  config.output_dir = root.join("build");
  config
}

#[test]
fn test_versions() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let config = site(dir.path());

  assert_eq!(commands::versions(&config).unwrap(), ["2.0"]);
}

#[test]
fn test_build_writes_topics() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let config = site(dir.path());

  commands::build(&config, "2.0").unwrap();

  let json = fs::read_to_string(dir.path().join("build/2.0.json")).unwrap();
  let docs: Vec<VersionDoc> = serde_json::from_str(&json).unwrap();
  let urls: Vec<_> = docs.iter().map(|d| d.url.as_str()).collect();
  assert_eq!(urls, [
    "/docs/2.0/01-getting-started",
    "/docs/2.0/02-api",
    "/docs/2.0/12-changelog"
  ]);

  let api = fs::read_to_string(dir.path().join("build/2.0/02-api.html")).unwrap();
  assert!(api.contains(r#"<h2 id="1-connecting">"#));
  assert_eq!(api.matches("<script src=").count(), 1);
}

#[test]
fn test_build_missing_version_fails() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let config = site(dir.path());

  assert!(commands::build(&config, "9.0").is_err());
}

#[test]
fn test_index_then_section() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let config = site(dir.path());

  assert!(commands::section(&config, "2.0", "01-getting-started").is_err());

  commands::index(&config, "2.0", true).unwrap();
  assert!(
    dir
      .path()
      .join("content/docs/2.0/index.json")
      .is_file()
  );

  commands::section(&config, "2.0", "01-getting-started").unwrap();
  let html = fs::read_to_string(
    dir.path().join("build/2.0/01-getting-started.html"),
  )
  .unwrap();
  assert!(
    html.contains(r#"<a href="/documentation/02-api#2-connecting">client docs</a>"#)
  );

  commands::section(&config, "2.0", "12-changelog").unwrap();
  let json =
    fs::read_to_string(dir.path().join("build/2.0/12-changelog.json")).unwrap();
  let doc: CompiledDoc = serde_json::from_str(&json).unwrap();
  let levels: Vec<_> = doc.anchor_links.iter().map(|l| l.level).collect();
  // `2.0.1.md` sorts before `Changelog.md` and has been demoted.
  assert_eq!(levels, [2, 1]);

  assert!(commands::section(&config, "2.0", "missing").is_err());
}

#[test]
fn test_compile_single_file() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let config = site(dir.path());
  let file = dir.path().join("content/docs/2.0/02 API/Client.md");

  commands::compile(&config, &file, None).unwrap();

  let html = fs::read_to_string(dir.path().join("build/Client.html")).unwrap();
  assert!(html.starts_with(r#"<h1 id="client">Client</h1>"#));
}

#[test]
fn test_posts() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let config = site(dir.path());

  commands::posts(&config).unwrap();

  let json = fs::read_to_string(dir.path().join("build/posts.json")).unwrap();
  let posts: serde_json::Value = serde_json::from_str(&json).unwrap();
  assert_eq!(posts[0]["slug"], "launch");
  assert_eq!(posts[0]["date"], "2024-05-01");
}

#[test]
fn test_init_refuses_to_overwrite() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let path = dir.path().join("conf/mdocs.toml");

  commands::init(&path, false).unwrap();
  assert!(commands::init(&path, false).is_err());
  commands::init(&path, true).unwrap();

  assert_eq!(Config::from_file(&path).unwrap(), Config::default());
}
