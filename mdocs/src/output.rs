//! Writing compiled artifacts.
use std::{fs, path::Path};

use color_eyre::eyre::{Context, Result};
use log::info;
use serde::Serialize;

fn ensure_parent(path: &Path) -> Result<()> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
  }
  Ok(())
}

/// Write an HTML fragment, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the file or its directory cannot be written.
pub fn write_html(path: &Path, html: &str) -> Result<()> {
  ensure_parent(path)?;
  fs::write(path, html)
    .wrap_err_with(|| format!("Failed to write HTML to {}", path.display()))?;
  info!("Wrote {}", path.display());
  Ok(())
}

/// Write `value` as pretty JSON, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if serialization fails or the file cannot be written.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
  ensure_parent(path)?;
  let json = serde_json::to_string_pretty(value)
    .wrap_err("Failed to serialize output to JSON")?;
  fs::write(path, json)
    .wrap_err_with(|| format!("Failed to write JSON to {}", path.display()))?;
  info!("Wrote {}", path.display());
  Ok(())
}
