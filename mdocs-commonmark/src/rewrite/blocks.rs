//! Line-level block scanner shared by the rewrite passes.
//!
//! Splits Markdown into prose, fenced code blocks and raw `<pre>` HTML blocks
//! so that passes which only make sense on prose never touch code. An opening
//! fence without a matching closer is treated as prose.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
  /// ```` ``` ````
  Backtick,
  /// `~~~`
  Tilde,
  /// `"""`
  TripleQuote,
}

#[derive(Debug, Clone, Copy)]
pub struct Fence<'a> {
  pub kind:   FenceKind,
  /// Whole block including both fence lines.
  pub raw:    &'a str,
  /// Leading spaces of the opening fence line.
  pub indent: &'a str,
  /// Info string after the opening fence, trimmed.
  pub info:   &'a str,
  /// Lines between the fences, line endings included.
  pub body:   &'a str,
}

impl<'a> Fence<'a> {
  /// First word of the info string.
  pub fn language(&self) -> Option<&'a str> {
    self.info.split_whitespace().next()
  }

  /// Line ending used by the closing fence line, if any.
  pub fn line_ending(&self) -> &'static str {
    if self.raw.ends_with("\r\n") {
      "\r\n"
    } else if self.raw.ends_with('\n') {
      "\n"
    } else {
      ""
    }
  }
}

#[derive(Debug, Clone, Copy)]
pub enum Block<'a> {
  Prose(&'a str),
  Fence(Fence<'a>),
  /// Raw `<pre>` HTML, e.g. the output of an earlier code block pass.
  Verbatim(&'a str),
}

struct Opener<'a> {
  kind:   FenceKind,
  len:    usize,
  indent: &'a str,
  info:   &'a str,
}

/// Scan Markdown into blocks. Concatenating the raw text of all blocks
/// reproduces the input exactly.
pub fn scan(markdown: &str) -> Vec<Block<'_>> {
  let mut lines = Vec::new();
  let mut offset = 0;
  for line in markdown.split_inclusive('\n') {
    lines.push((offset, line));
    offset += line.len();
  }

  let mut blocks = Vec::new();
  let mut prose_start = 0;
  let mut i = 0;

  while i < lines.len() {
    let (start, line) = lines[i];

    if let Some(opener) = fence_opener(line) {
      if let Some(j) = (i + 1..lines.len())
        .find(|&j| is_fence_closer(lines[j].1, &opener))
      {
        let (close_start, close_line) = lines[j];
        let end = close_start + close_line.len();
        let body_start = start + line.len();

        push_prose(&mut blocks, &markdown[prose_start..start]);
        blocks.push(Block::Fence(Fence {
          kind:   opener.kind,
          raw:    &markdown[start..end],
          indent: opener.indent,
          info:   opener.info,
          body:   &markdown[body_start..close_start],
        }));

        prose_start = end;
        i = j + 1;
        continue;
      }
    } else if is_pre_opener(line) {
      if let Some(j) = (i..lines.len()).find(|&j| lines[j].1.contains("</pre>"))
      {
        let end = lines[j].0 + lines[j].1.len();

        push_prose(&mut blocks, &markdown[prose_start..start]);
        blocks.push(Block::Verbatim(&markdown[start..end]));

        prose_start = end;
        i = j + 1;
        continue;
      }
    }

    i += 1;
  }

  push_prose(&mut blocks, &markdown[prose_start..]);
  blocks
}

/// Apply `f` to every prose block, copying code verbatim.
pub fn map_prose<F>(markdown: &str, mut f: F) -> String
where
  F: FnMut(&str) -> String,
{
  let mut output = String::with_capacity(markdown.len());
  for block in scan(markdown) {
    match block {
      Block::Prose(text) => output.push_str(&f(text)),
      Block::Fence(fence) => output.push_str(fence.raw),
      Block::Verbatim(raw) => output.push_str(raw),
    }
  }
  output
}

/// Replace fenced blocks for which `f` returns `Some`.
pub fn map_fences<F>(markdown: &str, mut f: F) -> String
where
  F: FnMut(&Fence<'_>) -> Option<String>,
{
  let mut output = String::with_capacity(markdown.len());
  for block in scan(markdown) {
    match block {
      Block::Prose(text) | Block::Verbatim(text) => output.push_str(text),
      Block::Fence(fence) => {
        match f(&fence) {
          Some(replacement) => output.push_str(&replacement),
          None => output.push_str(fence.raw),
        }
      },
    }
  }
  output
}

fn push_prose<'a>(blocks: &mut Vec<Block<'a>>, text: &'a str) {
  if !text.is_empty() {
    blocks.push(Block::Prose(text));
  }
}

fn split_indent(line: &str) -> Option<(&str, &str)> {
  let content = line.trim_end_matches(['\n', '\r']);
  let indent_len = content.len() - content.trim_start_matches(' ').len();
  (indent_len <= 3).then(|| content.split_at(indent_len))
}

fn fence_opener(line: &str) -> Option<Opener<'_>> {
  let (indent, rest) = split_indent(line)?;

  if let Some(info) = rest.strip_prefix("\"\"\"") {
    if info.starts_with('"') {
      return None;
    }
    return Some(Opener {
      kind: FenceKind::TripleQuote,
      len: 3,
      indent,
      info: info.trim(),
    });
  }

  let marker = rest.chars().next()?;
  let kind = match marker {
    '`' => FenceKind::Backtick,
    '~' => FenceKind::Tilde,
    _ => return None,
  };

  let len = rest.len() - rest.trim_start_matches(marker).len();
  if len < 3 {
    return None;
  }

  let info = rest[len..].trim();
  if kind == FenceKind::Backtick && info.contains('`') {
    return None;
  }

  Some(Opener {
    kind,
    len,
    indent,
    info,
  })
}

fn is_fence_closer(line: &str, opener: &Opener<'_>) -> bool {
  let Some((_, rest)) = split_indent(line) else {
    return false;
  };
  let rest = rest.trim_end();

  match opener.kind {
    FenceKind::TripleQuote => rest == "\"\"\"",
    FenceKind::Backtick => rest.len() >= opener.len && rest.chars().all(|c| c == '`'),
    FenceKind::Tilde => rest.len() >= opener.len && rest.chars().all(|c| c == '~'),
  }
}

fn is_pre_opener(line: &str) -> bool {
  split_indent(line).is_some_and(|(_, rest)| {
    rest
      .strip_prefix("<pre")
      .is_some_and(|tail| tail.is_empty() || tail.starts_with(['>', ' ', '\t']))
  })
}
