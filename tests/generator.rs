use golinks::application::generator::{GenerateError, GenerateOptions, generate};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TEMPLATE: &str = "<meta http-equiv=\"refresh\" content=\"0; url={% TARGET_URL %}\">";

fn options(dir: &Path) -> GenerateOptions {
    GenerateOptions {
        links: dir.join("links.txt"),
        template: dir.join("template.html"),
        out: dir.join("out"),
    }
}

#[test]
fn test_generates_one_page_per_path() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let opts = options(dir);
    fs::write(
        &opts.links,
        "; team links\n/docs\n\t:= https://docs.example\n\n/team/mail\n\t:= mailto:team@example.com\n",
    )
    .unwrap();
    fs::write(&opts.template, TEMPLATE).unwrap();

    let report = generate(&opts).unwrap();

    assert_eq!(report.written.len(), 2);
    assert!(report.warnings.is_empty());

    let docs = fs::read_to_string(opts.out.join("docs").join("index.html")).unwrap();
    assert_eq!(
        docs,
        "<meta http-equiv=\"refresh\" content=\"0; url=https://docs.example\">"
    );

    let mail = fs::read_to_string(opts.out.join("team").join("mail").join("index.html")).unwrap();
    assert!(mail.contains("mailto:team@example.com"));
}

#[test]
fn test_output_directory_is_cleared() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let opts = options(dir);
    fs::create_dir_all(opts.out.join("stale")).unwrap();
    fs::write(opts.out.join("stale").join("index.html"), "old").unwrap();
    fs::write(&opts.links, "/fresh\n\t:= https://fresh.example\n").unwrap();
    fs::write(&opts.template, TEMPLATE).unwrap();

    generate(&opts).unwrap();

    assert!(!opts.out.join("stale").exists());
    assert!(opts.out.join("fresh").join("index.html").exists());
}

#[test]
fn test_parent_segments_are_skipped() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let opts = options(dir);
    fs::write(
        &opts.links,
        "/../escape\n\t:= https://evil.example\n/ok\n\t:= https://ok.example\n",
    )
    .unwrap();
    fs::write(&opts.template, TEMPLATE).unwrap();

    let report = generate(&opts).unwrap();

    assert_eq!(report.written.len(), 1);
    assert_eq!(report.skipped, vec!["/../escape".to_string()]);
    assert!(!dir.join("escape").exists());
}

#[test]
fn test_missing_links_file_exit_status() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let opts = options(dir);
    fs::write(&opts.template, TEMPLATE).unwrap();

    let err = generate(&opts).unwrap_err();

    assert!(matches!(err, GenerateError::MissingLinks(_)));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_missing_template_exit_status_keeps_previous_output() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let opts = options(dir);
    fs::write(&opts.links, "/a\n\t:= https://a.example\n").unwrap();
    fs::create_dir_all(opts.out.join("previous")).unwrap();

    let err = generate(&opts).unwrap_err();

    assert!(matches!(err, GenerateError::MissingTemplate(_)));
    assert_eq!(err.exit_code(), 3);
    assert!(opts.out.join("previous").exists());
}

#[test]
fn test_empty_definitions_leave_output_untouched() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let opts = options(dir);
    fs::write(&opts.links, "; nothing here\n/\n\t:= https://root.example\n").unwrap();
    fs::create_dir_all(opts.out.join("keep")).unwrap();

    let report = generate(&opts).unwrap();

    assert!(report.written.is_empty());
    assert!(!report.warnings.is_empty());
    assert!(opts.out.join("keep").exists());
}
