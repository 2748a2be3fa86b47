use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"<[^>]+>"));

/// Slugify a string for use in URLs and anchor ids.
///
/// Lower-cases the input, drops a trailing `.md`, strips everything that is
/// not alphanumeric, whitespace, `-` or `_`, turns whitespace into hyphens,
/// collapses repeated hyphens and trims hyphens from both ends.
///
/// ```
/// use mdocs_commonmark::slugify;
///
/// assert_eq!(slugify("Hello World!.md"), "hello-world");
/// assert_eq!(slugify("  12 Changelog "), "12-changelog");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
  let lowered = text.trim().to_lowercase();
  let stem = lowered.strip_suffix(".md").unwrap_or(&lowered);

  let mut slug = String::with_capacity(stem.len());
  for c in stem.chars() {
    if c.is_whitespace() || c == '-' {
      if !slug.ends_with('-') {
        slug.push('-');
      }
    } else if c.is_alphanumeric() || c == '_' {
      slug.push(c);
    }
  }

  slug.trim_matches('-').to_string()
}

/// Remove HTML tags from a string, e.g. badges inside a heading.
#[must_use]
pub fn clean_tags(html: &str) -> String {
  TAG_RE.replace_all(html, "").into_owned()
}

/// Build the id for a heading slug, namespaced by an optional ordinal.
///
/// Ordinals keep ids from different files apart once their HTML is
/// concatenated into one page.
#[must_use]
pub fn anchor_id(ordinal: Option<&str>, slug: &str) -> String {
  match ordinal.map(str::trim) {
    Some(prefix) if !prefix.is_empty() => format!("{prefix}-{slug}"),
    _ => slug.to_string(),
  }
}

/// Return true if the target carries a URL scheme (`https:`, `mailto:`,
/// `data:`) or is protocol-relative.
#[must_use]
pub fn is_external(target: &str) -> bool {
  if target.starts_with("//") {
    return true;
  }

  let Some((scheme, _)) = target.split_once(':') else {
    return false;
  };

  let mut chars = scheme.chars();
  chars.next().is_some_and(|c| c.is_ascii_alphabetic())
    && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

/// Compile a regex, logging and falling back to [`never_matching_regex`] on
/// failure so that a bad pattern degrades a rewrite pass instead of aborting.
pub(crate) fn compile_regex(pattern: &str) -> Regex {
  Regex::new(pattern).unwrap_or_else(|e| {
    log::error!(
      "Failed to compile regex {pattern:?}: {e}\n Falling back to never \
       matching regex."
    );
    never_matching_regex()
  })
}

/// Create a regex that never matches anything.
///
/// # Panics
///
/// Panics if the fallback pattern fails to compile, which it cannot.
#[must_use]
pub fn never_matching_regex() -> Regex {
  #[allow(
    clippy::expect_used,
    reason = "This pattern is guaranteed to be valid"
  )]
  Regex::new(r"[^\s\S]").expect("regex pattern [^\\s\\S] should always compile")
}
