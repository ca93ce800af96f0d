//! Static redirect page generator.
//!
//! Compiles a link definition file into `<out>/<path>/index.html` pages,
//! substituting `{% TARGET_URL %}` in the template with each target.
//!
//! # Usage
//!
//! ```bash
//! golinks-generate --links links.txt --template template.html --out out
//! ```
//!
//! # Exit Status
//!
//! - `0` - success (including an empty definition file)
//! - `1` - I/O failure
//! - `2` - links file not found
//! - `3` - template file not found

use golinks::application::generator::{GenerateOptions, generate};
use golinks::init_tracing;

use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;

/// Generate static redirect pages from a link definition file.
#[derive(Parser)]
#[command(name = "golinks-generate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Link definition file
    #[arg(short, long, default_value = "links.txt")]
    links: PathBuf,

    /// HTML template containing {% TARGET_URL %}
    #[arg(short, long, default_value = "template.html")]
    template: PathBuf,

    /// Output directory (cleared before writing)
    #[arg(short, long, default_value = "out")]
    out: PathBuf,

    /// Log format: text or json
    #[arg(long, env = "LOG_FORMAT", default_value = "text")]
    log_format: String,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_format, "info");

    let options = GenerateOptions {
        links: cli.links,
        template: cli.template,
        out: cli.out,
    };

    match generate(&options) {
        Ok(report) => {
            println!(
                "{} {} pages written to {}",
                "✅".green(),
                report.written.len().to_string().bright_white().bold(),
                options.out.display().to_string().cyan()
            );
            if !report.warnings.is_empty() {
                println!(
                    "{} {} definition entries ignored",
                    "⚠️ ".yellow(),
                    report.warnings.len().to_string().yellow()
                );
            }
            for path in &report.skipped {
                println!("{} skipped unsafe path {}", "⚠️ ".yellow(), path.yellow());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", "❌ Error:".red().bold(), e);
            ExitCode::from(e.exit_code())
        }
    }
}
