//! Offline generator: definition file in, static redirect pages out.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::domain::definitions::{ParseWarning, parse_definitions};
use crate::domain::entities::JumpType;
use crate::domain::rewriter::rewrite;
use crate::infrastructure::static_pages::{clear_dir, page_dir, render_page, write_page};

/// Input and output locations for a generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub links: PathBuf,
    pub template: PathBuf,
    pub out: PathBuf,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// `index.html` files written, in short path order.
    pub written: Vec<PathBuf>,
    /// Short paths skipped because they would escape the output directory.
    pub skipped: Vec<String>,
    pub warnings: Vec<ParseWarning>,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("links file not found: {0}")]
    MissingLinks(PathBuf),

    #[error("template file not found: {0}")]
    MissingTemplate(PathBuf),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl GenerateError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            GenerateError::MissingLinks(_) => 2,
            GenerateError::MissingTemplate(_) => 3,
            GenerateError::Io { .. } => 1,
        }
    }

    fn io(context: impl Into<String>, source: io::Error) -> Self {
        GenerateError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Reads a file, mapping "not found" to the given error.
fn read_required(
    path: &Path,
    missing: impl FnOnce(PathBuf) -> GenerateError,
) -> Result<String, GenerateError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => missing(path.to_path_buf()),
        _ => GenerateError::io(format!("failed to read {}", path.display()), e),
    })
}

/// Runs the generator.
///
/// An empty definition set is not an error: nothing is written and the output
/// directory is left as it was. Otherwise the output directory is cleared and
/// repopulated with one `index.html` per short path.
///
/// # Errors
///
/// - [`GenerateError::MissingLinks`] if the links file does not exist
/// - [`GenerateError::MissingTemplate`] if the template does not exist
/// - [`GenerateError::Io`] for any other filesystem failure
pub fn generate(options: &GenerateOptions) -> Result<GenerateReport, GenerateError> {
    let text = read_required(&options.links, GenerateError::MissingLinks)?;
    let parsed = parse_definitions(&text);

    let mut report = GenerateReport {
        warnings: parsed.warnings,
        ..Default::default()
    };

    if parsed.mappings.is_empty() {
        warn!("No valid links found in {}", options.links.display());
        return Ok(report);
    }

    let template = read_required(&options.template, GenerateError::MissingTemplate)?;

    clear_dir(&options.out).map_err(|e| {
        GenerateError::io(format!("failed to clear {}", options.out.display()), e)
    })?;

    for (short_path, target) in &parsed.mappings {
        let Some(dir) = page_dir(short_path) else {
            warn!("Skipping unsafe short path '{}'", short_path);
            report.skipped.push(short_path.clone());
            continue;
        };

        let target = rewrite(target, JumpType::Simple, "", &[]);
        let file = write_page(&options.out, &dir, &render_page(&template, &target))
            .map_err(|e| GenerateError::io(format!("failed to write page for {short_path}"), e))?;

        debug!("Created redirect: {} -> {}", short_path, target);
        report.written.push(file);
    }

    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        "Generated redirect pages in {}",
        options.out.display()
    );

    Ok(report)
}
