use std::fs;
use std::path::{Path, PathBuf};

use mathpad::parsing;
use mathpad::segmenting;

fn notebooks(dir: &Path) -> Vec<PathBuf> {
    let entries = fs::read_dir(dir).expect("Failed to read directory");

    let mut files: Vec<PathBuf> = entries
        .map(|entry| {
            entry
                .expect("Failed to read directory entry")
                .path()
        })
        .filter(|path| {
            path.extension()
                .and_then(|s| s.to_str())
                == Some("mp")
        })
        .collect();

    assert!(!files.is_empty(), "No .mp files found in {:?}", dir);
    files.sort();
    files
}

#[test]
fn samples_have_no_errors() {
    for file in notebooks(Path::new("tests/samples/")) {
        let content = parsing::load(&file).expect("Failed to load sample");
        let spans = segmenting::segment(&content);

        assert!(!spans.is_empty(), "{:?} produced no regions", file);

        for span in &spans {
            assert!(
                span.error
                    .is_none(),
                "{:?} has an error in {:?}: {:?}",
                file,
                span.source,
                span.error
            );
        }
    }
}

#[test]
fn broken_have_one_error() {
    for file in notebooks(Path::new("tests/broken/")) {
        let content = parsing::load(&file).expect("Failed to load sample");
        let spans = segmenting::segment(&content);

        let errors = spans
            .iter()
            .filter(|span| span.is_error())
            .count();

        assert_eq!(errors, 1, "{:?} should have exactly one error region", file);
    }
}

#[test]
fn multiline_regions_kept_whole() {
    let content =
        parsing::load(Path::new("tests/samples/definitions.mp")).expect("Failed to load sample");
    let spans = segmenting::segment(&content);

    let total = spans
        .iter()
        .find(|span| {
            span.source
                .starts_with("total")
        })
        .expect("Expected a region for total");

    assert_eq!(total.source, "total = (a +\n  b +\n  c)");
    assert_eq!(total.height(), 3);
}

#[test]
fn unclosed_call_isolated() {
    let content =
        parsing::load(Path::new("tests/broken/unclosed.mp")).expect("Failed to load sample");
    let spans = segmenting::segment(&content);

    let sources: Vec<&str> = spans
        .iter()
        .map(|span| span.source)
        .collect();

    assert_eq!(
        sources,
        vec!["round(e, 3)", "atan2(3, -3 / pi", "a = 2", "b = 3", "c = 4"]
    );
    assert!(spans[1].is_error());
}
