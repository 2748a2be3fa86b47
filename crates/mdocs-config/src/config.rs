use std::{
  fs,
  path::{Path, PathBuf},
};

use mdocs_commonmark::{
  CompileOptions,
  DEFAULT_DIAGRAM_SCRIPT_URL,
  RewriteOptions,
  rewrite::DEFAULT_MIGRATION_GUIDE_BASE,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for the mdocs content pipeline.
///
/// Loaded from one or more TOML files, with `--config KEY=VALUE` overrides
/// from the command line applied on top. Every field has a default, so an
/// empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Root directory of all Markdown content.
  pub content_dir: PathBuf,

  /// Documentation tree, relative to `content_dir`.
  pub docs_dir: PathBuf,

  /// Blog posts, relative to `content_dir`.
  pub blog_dir: PathBuf,

  /// Output directory for compiled HTML and JSON.
  pub output_dir: PathBuf,

  /// URL prefix of per-topic documentation pages.
  pub url_prefix: String,

  /// Whether to enable GitHub Flavored Markdown extensions.
  pub gfm: bool,

  pub rewrite:        RewriteConfig,
  pub internal_links: InternalLinksConfig,
  pub diagrams:       DiagramsConfig,
}

/// `[rewrite]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
  /// Base path for relative image references. Empty disables rewriting.
  pub images_path: String,

  /// URL prefix for links into a migration guide directory.
  pub migration_guide_base: String,

  /// Open `http(s)` links in a new tab.
  pub external_links_new_tab: bool,
}

/// `[internal_links]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InternalLinksConfig {
  pub enable: bool,

  /// Site section the documentation pages are served under.
  pub section: String,
}

/// `[diagrams]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramsConfig {
  pub enable:     bool,
  pub script_url: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      content_dir:    PathBuf::from("_content"),
      docs_dir:       PathBuf::from("docs"),
      blog_dir:       PathBuf::from("blog"),
      output_dir:     PathBuf::from("build"),
      url_prefix:     "/docs".to_string(),
      gfm:            true,
      rewrite:        RewriteConfig::default(),
      internal_links: InternalLinksConfig::default(),
      diagrams:       DiagramsConfig::default(),
    }
  }
}

impl Default for RewriteConfig {
  fn default() -> Self {
    Self {
      images_path:            "/images".to_string(),
      migration_guide_base:   DEFAULT_MIGRATION_GUIDE_BASE.to_string(),
      external_links_new_tab: true,
    }
  }
}

impl Default for InternalLinksConfig {
  fn default() -> Self {
    Self {
      enable:  true,
      section: "documentation".to_string(),
    }
  }
}

impl Default for DiagramsConfig {
  fn default() -> Self {
    Self {
      enable:     true,
      script_url: DEFAULT_DIAGRAM_SCRIPT_URL.to_string(),
    }
  }
}

/// Merge `other` into `base`. Nested tables are merged key by key, any other
/// value in `other` replaces the one in `base`.
fn merge_tables(base: &mut toml::Table, other: toml::Table) {
  for (key, value) in other {
    let toml::Value::Table(other_table) = value else {
      base.insert(key, value);
      continue;
    };

    if let Some(toml::Value::Table(base_table)) = base.get_mut(&key) {
      merge_tables(base_table, other_table);
    } else {
      base.insert(key, toml::Value::Table(other_table));
    }
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, or 1/0"
      )))
    },
  }
}

impl Config {
  /// Read a TOML configuration file into a table without applying defaults.
  fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    toml::from_str(&content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to parse TOML config from {}: {}",
        path.display(),
        e
      ))
    })
  }

  /// Load configuration from a single TOML file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    Self::from_files(&[path.as_ref().to_path_buf()])
  }

  /// Load and merge several TOML files, later files taking precedence.
  ///
  /// # Errors
  ///
  /// Returns an error if any file cannot be read or parsed, or if the merged
  /// table does not describe a valid configuration.
  pub fn from_files(paths: &[PathBuf]) -> Result<Self, ConfigError> {
    let mut merged = toml::Table::new();
    for path in paths {
      merge_tables(&mut merged, Self::read_table(path)?);
    }

    if paths.len() > 1 {
      log::info!("Loaded and merged {} config files", paths.len());
    }

    Ok(toml::Value::Table(merged).try_into()?)
  }

  /// Load configuration from explicit files, or a discovered one, then apply
  /// `KEY=VALUE` overrides.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded or an override is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if !config_files.is_empty() {
      Self::from_files(config_files)?
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config).map_err(|e| {
        ConfigError::Config(format!(
          "Failed to load discovered config from {}: {}",
          discovered_config.display(),
          e
        ))
      })?
    } else {
      log::debug!("No config file found, using defaults");
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    Ok(config)
  }

  /// Search for a config file in the working directory.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    Self::find_config_file_in(&current_dir)
  }

  /// Search for a config file in `dir`.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    ["mdocs.toml", ".mdocs.toml", ".config/mdocs.toml"]
      .iter()
      .map(|name| dir.join(name))
      .find(|path| path.is_file())
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// # Errors
  ///
  /// Returns an error if an override is not in KEY=VALUE format, the key is
  /// not recognized, or the value cannot be parsed.
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override. Nested keys use dots, e.g.
  /// `diagrams.enable`.
  ///
  /// # Errors
  ///
  /// Returns an error if the key is unknown or the value is invalid.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "content_dir" => self.content_dir = PathBuf::from(value),
      "docs_dir" => self.docs_dir = PathBuf::from(value),
      "blog_dir" => self.blog_dir = PathBuf::from(value),
      "output_dir" => self.output_dir = PathBuf::from(value),
      "url_prefix" => self.url_prefix = value.to_string(),
      "gfm" => self.gfm = parse_bool(key, value)?,
      "rewrite.images_path" => self.rewrite.images_path = value.to_string(),
      "rewrite.migration_guide_base" => {
        self.rewrite.migration_guide_base = value.to_string();
      },
      "rewrite.external_links_new_tab" => {
        self.rewrite.external_links_new_tab = parse_bool(key, value)?;
      },
      "internal_links.enable" => {
        self.internal_links.enable = parse_bool(key, value)?;
      },
      "internal_links.section" => {
        self.internal_links.section = value.to_string();
      },
      "diagrams.enable" => self.diagrams.enable = parse_bool(key, value)?,
      "diagrams.script_url" => self.diagrams.script_url = value.to_string(),
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'. See the default configuration \
           for supported keys."
        )));
      },
    }

    Ok(())
  }

  /// Root of the versioned documentation tree.
  #[must_use]
  pub fn docs_root(&self) -> PathBuf {
    self.content_dir.join(&self.docs_dir)
  }

  /// Directory holding blog posts.
  #[must_use]
  pub fn blog_root(&self) -> PathBuf {
    self.content_dir.join(&self.blog_dir)
  }

  /// Site section for internal link resolution, if enabled.
  #[must_use]
  pub fn internal_links_section(&self) -> Option<&str> {
    let section = self.internal_links.section.trim();
    (self.internal_links.enable && !section.is_empty()).then_some(section)
  }

  /// Options for the Markdown rewrite passes.
  #[must_use]
  pub fn rewrite_options(&self) -> RewriteOptions {
    RewriteOptions {
      images_path:            self.rewrite.images_path.clone(),
      migration_guide_base:   self.rewrite.migration_guide_base.clone(),
      external_links_new_tab: self.rewrite.external_links_new_tab,
    }
  }

  /// Options for the Markdown compiler.
  #[must_use]
  pub fn compile_options(&self) -> CompileOptions {
    CompileOptions {
      gfm:                self.gfm,
      diagrams:           self.diagrams.enable,
      diagram_script_url: self.diagrams.script_url.clone(),
    }
  }

  /// Write the default configuration file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be written.
  pub fn generate_default_config(path: &Path) -> Result<(), ConfigError> {
    fs::write(path, crate::templates::DEFAULT_TOML_TEMPLATE).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}
