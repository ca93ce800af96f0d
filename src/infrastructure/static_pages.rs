//! Filesystem side of static page generation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Placeholder replaced by the redirect target in page templates.
pub const TARGET_PLACEHOLDER: &str = "{% TARGET_URL %}";

/// Substitutes every placeholder occurrence with `target`.
pub fn render_page(template: &str, target: &str) -> String {
    template.replace(TARGET_PLACEHOLDER, target)
}

/// Directory for a short path, relative to the output root.
///
/// Leading and trailing slashes are ignored. Returns `None` if any segment
/// contains `..` or the path has no segments.
pub fn page_dir(short_path: &str) -> Option<PathBuf> {
    let trimmed = short_path.trim_matches('/');
    if trimmed.is_empty() {
        return None;
    }

    let mut dir = PathBuf::new();
    for segment in trimmed.split('/') {
        if segment.contains("..") {
            return None;
        }
        dir.push(segment);
    }
    Some(dir)
}

/// Writes `<root>/<dir>/index.html` and returns its path.
pub fn write_page(root: &Path, dir: &Path, contents: &str) -> io::Result<PathBuf> {
    let dir = root.join(dir);
    fs::create_dir_all(&dir)?;

    let file = dir.join("index.html");
    fs::write(&file, contents)?;
    Ok(file)
}

/// Removes everything inside `dir`, keeping the directory itself.
///
/// A missing directory is not an error.
pub fn clear_dir(dir: &Path) -> io::Result<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}
