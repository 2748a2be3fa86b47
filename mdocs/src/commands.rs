//! Command implementations.
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, OptionExt, Result, bail};
use log::{debug, info};
use mdocs_commonmark::{InternalLinks, MarkdownCompiler};
use mdocs_config::Config;
use mdocs_utils::{
  Aggregator,
  VersionIndexer,
  build_version_index,
  find_node_by_slug,
  load_posts,
  load_version_index,
  write_version_index,
};

use crate::output::{write_html, write_json};

/// Aggregator over `root` configured from `config`.
fn aggregator(config: &Config, root: PathBuf) -> Aggregator {
  Aggregator::new(
    root,
    config.rewrite_options(),
    MarkdownCompiler::new(config.compile_options()),
  )
}

/// Write the default configuration file.
///
/// # Errors
///
/// Returns an error if the file exists and `force` is not set, or if it
/// cannot be written.
pub fn init(output: &Path, force: bool) -> Result<()> {
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    std::fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
    info!("Created directory: {}", parent.display());
  }

  Config::generate_default_config(output).wrap_err_with(|| {
    format!("Failed to generate configuration file: {}", output.display())
  })?;

  info!(
    "Configuration file created successfully. Edit it to match your content \
     layout."
  );
  Ok(())
}

/// Log the version directories in the docs tree.
///
/// # Errors
///
/// Returns an error if the docs root cannot be listed.
pub fn versions(config: &Config) -> Result<Vec<String>> {
  let docs_root = config.docs_root();
  let versions = mdocs_utils::read_version_dirs(&docs_root)
    .wrap_err_with(|| format!("Failed to list {}", docs_root.display()))?;

  info!("Found {} versions in {}", versions.len(), docs_root.display());
  for version in &versions {
    info!("  {version}");
  }
  Ok(versions)
}

/// Build the index of `version`, and save it with `write`.
///
/// # Errors
///
/// Returns an error if the version does not exist or the tree cannot be read.
pub fn index(config: &Config, version: &str, write: bool) -> Result<()> {
  let docs_root = config.docs_root();
  let index = build_version_index(&docs_root, version)
    .wrap_err_with(|| format!("Failed to index version {version}"))?
    .ok_or_eyre(format!("Version '{version}' not found"))?;

  for node in &index {
    info!("{} ({} files)", node.title, node.children.len());
  }

  if write {
    write_version_index(&docs_root, version, &index)
      .wrap_err_with(|| format!("Failed to write index of version {version}"))?;
  }
  Ok(())
}

/// Compile every topic of `version` into `{output}/{version}.json` and one
/// HTML file per topic.
///
/// # Errors
///
/// Returns an error if the version does not exist or a file cannot be read
/// or written.
pub fn build(config: &Config, version: &str) -> Result<()> {
  let aggregator = aggregator(config, config.docs_root());
  let indexer = VersionIndexer::new(&aggregator, &config.url_prefix);

  let docs = indexer
    .index_version(version)
    .wrap_err_with(|| format!("Failed to build version {version}"))?
    .ok_or_eyre(format!("Version '{version}' not found"))?;

  for doc in &docs {
    let path = config
      .output_dir
      .join(version)
      .join(format!("{}.html", doc.slug));
    write_html(&path, &doc.html)?;
  }

  write_json(&config.output_dir.join(format!("{version}.json")), &docs)?;
  info!("Built {} topics for version {version}", docs.len());
  Ok(())
}

/// Aggregate the section `slug` of `version` from its `index.json`.
///
/// # Errors
///
/// Returns an error if the version, its index or the section is missing, or
/// a file cannot be read or written.
pub fn section(config: &Config, version: &str, slug: &str) -> Result<()> {
  let docs_root = config.docs_root();
  let index = load_version_index(&docs_root, version)
    .wrap_err_with(|| format!("Failed to load index of version {version}"))?
    .ok_or_eyre(format!("Version '{version}' not found"))?;

  let Some(node) = find_node_by_slug(&index, slug) else {
    bail!("Section '{slug}' not found in version {version}");
  };

  let internal_links = config
    .internal_links_section()
    .map(|section| InternalLinks::new(&index, section));
  debug!("Internal links enabled: {}", internal_links.is_some());

  let doc = aggregator(config, docs_root)
    .aggregate(node, internal_links)
    .wrap_err_with(|| format!("Failed to aggregate section '{}'", node.title))?;

  let base = config.output_dir.join(version);
  write_html(&base.join(format!("{slug}.html")), &doc.html)?;
  write_json(&base.join(format!("{slug}.json")), &doc)?;
  Ok(())
}

/// Compile a single Markdown file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the output written.
pub fn compile(config: &Config, file: &Path, output: Option<&Path>) -> Result<()> {
  let doc = aggregator(config, PathBuf::from("."))
    .compile_markdown_file(file, None)
    .wrap_err_with(|| format!("Failed to compile {}", file.display()))?;

  let output = output.map_or_else(
    || {
      let stem = file.file_stem().unwrap_or(file.as_os_str());
      config
        .output_dir
        .join(format!("{}.html", stem.to_string_lossy()))
    },
    Path::to_path_buf,
  );

  info!(
    "Compiled {} with {} headings",
    file.display(),
    doc.anchor_links.len()
  );
  write_html(&output, &doc.html)
}

/// Compile all blog posts into `{output}/posts.json`.
///
/// # Errors
///
/// Returns an error if a post cannot be read or the output written.
pub fn posts(config: &Config) -> Result<()> {
  let blog_root = config.blog_root();
  let posts = load_posts(&blog_root, &aggregator(config, blog_root.clone()))
    .wrap_err_with(|| {
      format!("Failed to load posts from {}", blog_root.display())
    })?;

  write_json(&config.output_dir.join("posts.json"), &posts)
}
