/// Default configuration file written by `mdocs init`. Every value matches
/// [`crate::Config::default`].
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# mdocs configuration file

# Root of all Markdown content
content_dir = "_content"

# Documentation tree, relative to content_dir: {docs_dir}/{version}/{topic}/*.md
docs_dir = "docs"

# Blog posts, relative to content_dir
blog_dir = "blog"

# Where compiled HTML and JSON are written
output_dir = "build"

# URL prefix of per-topic pages: {url_prefix}/{version}/{topic}
url_prefix = "/docs"

# Enable GitHub Flavored Markdown (tables, strikethrough, task lists,
# footnotes)
gfm = true

[rewrite]
# Base path for relative image references. Leave empty to keep image paths
# as they are.
images_path = "/images"

# URL prefix for links into a migration guide directory
migration_guide_base = "/migration-guide"

# Open http(s) links in a new tab
external_links_new_tab = true

[internal_links]
# Resolve links between Markdown files through the version index
enable = true

# Site section the documentation pages are served under
section = "documentation"

[diagrams]
# Append the diagram bootstrap script to pages containing diagrams
enable = true

# Diagram runtime loaded by the bootstrap
script_url = "https://cdn.jsdelivr.net/npm/mermaid@10.6.1/dist/mermaid.min.js"
"#;
