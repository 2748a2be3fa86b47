//! # mdocs-commonmark
//!
//! The Markdown half of mdocs: everything that happens to a document between
//! reading it from disk and handing HTML to a page template.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdocs_commonmark::{
//!   CompileOptions,
//!   MarkdownCompiler,
//!   RewriteOptions,
//!   Rewriter,
//! };
//!
//! let rewriter = Rewriter::new(RewriteOptions::default());
//! let compiler = MarkdownCompiler::new(CompileOptions::default());
//!
//! let markdown = rewriter.rewrite("# Hello World\n\nSee [the guide](https://example.com).");
//! let doc = compiler.compile(&markdown, None);
//!
//! assert!(doc.html.contains(r#"<h1 id="hello-world">"#));
//! assert_eq!(doc.anchor_links[0].text, "Hello World");
//! ```
//!
//! ## Pipeline
//!
//! - [`front_matter`] splits YAML metadata from the Markdown body
//! - [`rewrite`] runs the ordered text-rewriting passes (images, inline
//!   styles, headings, links, code blocks)
//! - [`compile`] renders with `comrak`, injects unique heading ids, collects
//!   anchor links and appends the diagram bootstrap when needed

pub mod compile;
pub mod front_matter;
pub mod rewrite;
mod types;
pub mod utils;

pub use crate::{
  compile::{
    CompileOptions,
    DEFAULT_DIAGRAM_SCRIPT_URL,
    DIAGRAM_MARKER,
    MarkdownCompiler,
    insert_ids_to_headers,
  },
  front_matter::{FrontMatter, split_front_matter, strip_front_matter},
  rewrite::{InternalLinks, RewriteOptions, Rewriter},
  types::{
    AnchorLink,
    CompiledDoc,
    MarkdownFileMetadata,
    MarkdownFileRef,
    VersionDoc,
  },
  utils::slugify,
};
