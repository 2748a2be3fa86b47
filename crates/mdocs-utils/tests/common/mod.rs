#![allow(dead_code, clippy::expect_used, reason = "Test helpers")]
use std::{fs, path::Path};

use mdocs_commonmark::{CompileOptions, MarkdownCompiler, RewriteOptions};
use mdocs_utils::Aggregator;

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).expect("Failed to create parent directory");
  }
  fs::write(&path, content).expect("Failed to write file");
}

/// Aggregator over `root` with default options.
pub fn aggregator(root: &Path) -> Aggregator {
  Aggregator::new(
    root,
    RewriteOptions::default(),
    MarkdownCompiler::new(CompileOptions::default()),
  )
}
