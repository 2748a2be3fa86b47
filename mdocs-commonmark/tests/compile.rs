#![allow(clippy::expect_used, clippy::panic, reason = "Fine in tests")]
use mdocs_commonmark::{
  CompileOptions,
  DIAGRAM_MARKER,
  MarkdownCompiler,
  RewriteOptions,
  Rewriter,
  slugify,
};
use pretty_assertions::assert_eq;

fn pipeline(markdown: &str) -> mdocs_commonmark::CompiledDoc {
  let rewriter = Rewriter::new(RewriteOptions::default());
  let compiler = MarkdownCompiler::new(CompileOptions::default());
  compiler.compile(&rewriter.rewrite(markdown), None)
}

#[test]
fn test_duplicate_headings_get_unique_ids() {
  let doc = pipeline("# Setup\n\n## Setup\n\n## Setup\n");

  let ids: Vec<_> = doc.anchor_links.iter().map(|l| l.id.as_str()).collect();
  assert_eq!(ids, ["setup", "setup-1", "setup-2"]);

  let levels: Vec<_> = doc.anchor_links.iter().map(|l| l.level).collect();
  assert_eq!(levels, [1, 2, 2]);

  assert!(doc.html.contains(r#"<h2 id="setup-2">Setup</h2>"#));
}

#[test]
fn test_slugify_file_name() {
  assert_eq!(slugify("Hello World!.md"), "hello-world");
}

#[test]
fn test_diagram_bootstrap_appended_once() {
  let doc = pipeline(
    "# Flow\n\n```mermaid\ngraph TD; A-->B\n```\n\n```mermaid\ngraph LR; B-->C\n```\n",
  );

  assert_eq!(doc.html.matches(DIAGRAM_MARKER).count(), 2);
  assert_eq!(doc.html.matches("<script src=").count(), 1);
  assert!(doc.html.contains("mermaid.initialize"));
}

#[test]
fn test_no_bootstrap_without_diagrams() {
  let doc = pipeline("# Flow\n\n```rust\nfn main() {}\n```\n");

  assert!(!doc.html.contains(DIAGRAM_MARKER));
  assert!(!doc.html.contains("<script"));
}

#[test]
fn test_zero_headings() {
  let doc = pipeline("Just a paragraph with [a link](/somewhere).\n");

  assert!(doc.anchor_links.is_empty());
  assert!(!doc.html.contains("id="));
}

#[test]
fn test_code_blocks_do_not_produce_headings() {
  let doc = pipeline("```js\n# not a heading\n```\n\n~~~\n## nor this\n~~~\n");

  assert!(doc.anchor_links.is_empty());
  assert!(doc.html.contains("# not a heading"));
  assert!(
    doc
      .html
      .contains(r#"<pre class="code-block code-block--javascript">"#)
  );
}

#[test]
fn test_rewritten_links_survive_rendering() {
  let doc = pipeline(
    "# Links\n\nRead [the docs](https://example.com/docs) or go [home](/).\n",
  );

  assert!(doc.html.contains(
    r#"<a href="https://example.com/docs" target="_blank" rel="noopener noreferrer">the docs</a>"#
  ));
  assert!(doc.html.contains(r#"<a href="/">home</a>"#));
}

#[test]
fn test_ordinal_prefixes_every_generated_id() {
  let compiler = MarkdownCompiler::default();
  let doc = compiler.compile("# 1.2.0\n\n## Fixes\n\n## Fixes\n", Some("4"));

  let ids: Vec<_> = doc.anchor_links.iter().map(|l| l.id.as_str()).collect();
  assert_eq!(ids, ["4-120", "4-fixes", "4-fixes-1"]);
}

#[test]
fn test_compiled_doc_json() {
  let doc = MarkdownCompiler::default().compile("## Title\n", None);
  let json = serde_json::to_value(&doc).expect("serializable");

  assert_eq!(json["anchorLinks"][0]["id"], "title");
  assert_eq!(json["anchorLinks"][0]["level"], 2);
}

#[test]
fn test_url_link_text_is_not_linked_twice() {
  let doc = pipeline("See [https://example.com](https://example.com).\n");

  assert_eq!(doc.html.matches("<a ").count(), 1);
  assert!(doc.html.contains(
    r#"<a href="https://example.com" target="_blank" rel="noopener noreferrer">https://example.com</a>"#
  ));
}

#[test]
fn test_linked_image_renders_inside_anchor() {
  let rewriter = Rewriter::new(RewriteOptions {
    images_path: "/img".to_string(),
    ..Default::default()
  });
  let compiler = MarkdownCompiler::new(CompileOptions::default());

  let doc = compiler.compile(
    &rewriter.rewrite("[![badge](badge.svg)](https://ci.example.com)\n"),
    None,
  );

  assert!(doc.html.contains(r#"<a href="https://ci.example.com""#));
  assert!(doc.html.contains(r#"<img src="/img/badge.svg" alt="badge" /></a>"#));
}
