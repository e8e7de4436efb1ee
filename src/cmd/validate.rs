//! Check a generated project on disk for `autocoder validate <dir>`.

use std::path::Path;

use anyhow::{Context, Result, bail};
use autocoder::validator;
use autocoder::ui::icons::{CHECK, CROSS};
use autocoder_common::FileMapping;
use walkdir::WalkDir;

/// Read every regular file under `dir` into a mapping keyed by
/// forward-slash relative path.
pub fn load_dir(dir: &Path) -> Result<FileMapping> {
    if !dir.is_dir() {
        bail!("Not a directory: {}", dir.display());
    }

    let mut files = FileMapping::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .with_context(|| format!("Unexpected path: {}", entry.path().display()))?;
        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let content = std::fs::read_to_string(entry.path())
            .with_context(|| format!("Failed to read {}", entry.path().display()))?;
        files.insert(key, content);
    }
    Ok(files)
}

pub fn cmd_validate(dir: &Path) -> Result<()> {
    let files = load_dir(dir)?;
    match validator::check(&files) {
        Ok(()) => {
            println!("{} {} files checked, project is valid", CHECK, files.len());
            Ok(())
        }
        Err(failure) => {
            println!("{} {}", CROSS, failure);
            bail!("Validation failed for {}", dir.display())
        }
    }
}
