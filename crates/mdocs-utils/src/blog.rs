//! Blog posts.
//!
//! A post is a single Markdown file with optional front matter:
//!
//! ```yaml
//! title: Release 2.0
//! date: 2024-03-01
//! author: Jane Doe
//! image: /images/blog/release.png
//! ```
use std::{fs, path::Path};

use jiff::{Timestamp, civil, tz::TimeZone};
use log::{debug, info, warn};
use mdocs_commonmark::{
  AnchorLink,
  rewrite::collect_image_targets,
  slugify,
  split_front_matter,
};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::{
  aggregate::Aggregator,
  error::{Error, Result},
};

/// A compiled blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
  pub slug:  String,
  pub title: String,

  /// Publication date as `YYYY-MM-DD`.
  pub date: Option<String>,

  pub author: Option<String>,

  /// Cover image from the front matter.
  pub image: Option<String>,

  /// Image targets referenced in the body, after path rewriting.
  pub images_from_post: Vec<String>,

  pub html:         String,
  pub anchor_links: Vec<AnchorLink>,
}

/// Parse a front matter date, either a calendar date or an RFC 3339
/// timestamp, into `YYYY-MM-DD`. Timestamps are converted to UTC.
#[must_use]
pub fn parse_post_date(raw: &str) -> Option<String> {
  let raw = raw.trim();

  let date = raw
    .parse::<civil::Date>()
    .ok()
    .or_else(|| {
      raw
        .parse::<Timestamp>()
        .ok()
        .map(|ts| ts.to_zoned(TimeZone::UTC).date())
    })
    .or_else(|| raw.parse::<civil::DateTime>().ok().map(|dt| dt.date()));

  if date.is_none() {
    warn!("Ignoring unparseable post date '{raw}'");
  }
  date.map(|date| date.to_string())
}

fn load_post(path: &Path, aggregator: &Aggregator) -> Result<BlogPost> {
  let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
  let front_matter = split_front_matter(&content);

  let stem = path
    .file_stem()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_default();

  let markdown = aggregator.rewriter().rewrite(&front_matter.body);
  let images_from_post = collect_image_targets(&markdown);
  let doc = aggregator.compiler().compile(&markdown, None);

  debug!("Loaded post {}", path.display());
  Ok(BlogPost {
    slug: slugify(&stem),
    title: front_matter.get_string("title").unwrap_or(stem),
    date: front_matter
      .get_string("date")
      .as_deref()
      .and_then(parse_post_date),
    author: front_matter.get_string("author"),
    image: front_matter.get_string("image"),
    images_from_post,
    html: doc.html,
    anchor_links: doc.anchor_links,
  })
}

/// Load every `.md` file directly inside `dir`, newest first. Posts without
/// a date sort last. A missing directory yields no posts.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed or a post cannot be
/// read.
pub fn load_posts(dir: &Path, aggregator: &Aggregator) -> Result<Vec<BlogPost>> {
  if !dir.is_dir() {
    warn!("Blog directory {} does not exist", dir.display());
    return Ok(Vec::new());
  }

  let mut posts = Vec::new();
  for entry in WalkDir::new(dir)
    .min_depth(1)
    .max_depth(1)
    .sort_by_file_name()
  {
    let entry = entry.map_err(|source| {
      Error::Walk {
        path: dir.to_path_buf(),
        source,
      }
    })?;

    let path = entry.path();
    if !entry.file_type().is_file()
      || !path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
    {
      continue;
    }

    posts.push(load_post(path, aggregator)?);
  }

  // `YYYY-MM-DD` strings sort chronologically; `None` sorts before `Some`.
  posts.sort_by(|a, b| b.date.cmp(&a.date));

  info!("Loaded {} blog posts", posts.len());
  Ok(posts)
}

/// Look up a post by slug.
#[must_use]
pub fn find_post<'a>(posts: &'a [BlogPost], slug: &str) -> Option<&'a BlogPost> {
  posts.iter().find(|post| post.slug == slug)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_post_date() {
    assert_eq!(parse_post_date("2024-03-01"), Some("2024-03-01".to_string()));
    assert_eq!(
      parse_post_date("2024-03-01T23:30:00Z"),
      Some("2024-03-01".to_string())
    );
    assert_eq!(parse_post_date("March 1st"), None);
  }
}
