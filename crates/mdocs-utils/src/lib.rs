//! Filesystem side of mdocs: turning directories of Markdown into compiled
//! documents.
//!
//! - [`aggregate`] concatenates the files of one documentation node and
//!   compiles them as a single page
//! - [`index`] walks `{docs_root}/{version}/{topic}` trees and loads or builds
//!   version indexes
//! - [`blog`] loads blog posts
pub mod aggregate;
pub mod blog;
pub mod error;
pub mod index;

pub use aggregate::{Aggregator, is_replaceable_changelog_item};
pub use blog::{BlogPost, find_post, load_posts};
pub use error::{Error, Result};
pub use index::{
  VERSION_INDEX_FILE,
  VersionIndexer,
  build_version_index,
  find_node_by_slug,
  load_version_index,
  read_version_dirs,
  write_version_index,
};
