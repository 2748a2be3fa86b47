use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for mdocs
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "mdocs: Markdown pipeline for versioned docs and blogs"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s). Multiple files are merged in order, with
  /// later files overriding earlier ones
  #[arg(
    short = 'c',
    long = "config-file",
    global = true,
    action = clap::ArgAction::Append
  )]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the mdocs CLI.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
  /// Initialize a new mdocs configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "mdocs.toml")]
    output: PathBuf,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// List the documentation versions found in the docs tree.
  Versions,

  /// Build the index of a version from its directory layout.
  Index {
    /// Version directory name, e.g. `2.0`.
    version: String,

    /// Save the index as `index.json` in the version directory.
    #[arg(short, long)]
    write: bool,
  },

  /// Compile every topic of a version to HTML and JSON.
  Build {
    /// Version directory name, e.g. `2.0`.
    version: String,
  },

  /// Compile one section of a version from its `index.json`, with internal
  /// links resolved.
  Section {
    /// Version directory name, e.g. `2.0`.
    version: String,

    /// Slug of the section title, e.g. `getting-started`.
    slug: String,
  },

  /// Compile a single Markdown file.
  Compile {
    /// Markdown file to compile.
    file: PathBuf,

    /// Output HTML file. Defaults to `{output_dir}/{file stem}.html`.
    #[arg(short, long)]
    output: Option<PathBuf>,
  },

  /// Compile all blog posts to a single JSON file.
  Posts,
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
