use std::fs;
use std::path::{Path, PathBuf};

use mathpad::parsing;
use mathpad::segmenting;

fn notebooks(dir: &Path) -> Vec<PathBuf> {
    assert!(dir.exists(), "{:?} directory missing", dir);

    let entries = fs::read_dir(dir).expect("Failed to read directory");

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.expect("Failed to read directory entry");
        let path = entry.path();

        if path
            .extension()
            .and_then(|s| s.to_str())
            == Some("mp")
        {
            files.push(path);
        }
    }

    assert!(!files.is_empty(), "No .mp files found in {:?}", dir);
    files.sort();
    files
}

// Each region found by the segmenter is, by construction, text the parser
// accepts; parse it again here to look at what came out.
#[test]
fn ensure_sample_regions_parse() {
    let mut failures = Vec::new();

    for file in notebooks(Path::new("tests/samples/")) {
        let content = parsing::load(&file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

        for span in segmenting::segment(&content) {
            match parsing::parse(span.source) {
                Ok(_) => {}
                Err(e) => {
                    println!("Region {:?} of {:?} failed to parse: {:?}", span.source, file, e);
                    failures.push(file.clone());
                }
            }
        }
    }

    if !failures.is_empty() {
        panic!(
            "Sample regions should parse successfully, but {} failed",
            failures.len()
        );
    }
}

#[test]
fn ensure_broken_fail() {
    let mut unexpected_successes = Vec::new();

    for file in notebooks(Path::new("tests/broken/")) {
        let content = parsing::load(&file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

        if parsing::parse(&content).is_ok() {
            println!("File {:?} unexpectedly parsed successfully", file);
            unexpected_successes.push(file);
        }
    }

    if !unexpected_successes.is_empty() {
        panic!(
            "Broken files should not parse successfully, but {} files passed",
            unexpected_successes.len()
        );
    }
}

#[test]
fn statement_counts() {
    let content = parsing::load(Path::new("tests/samples/conversions.mp"))
        .expect("Failed to load sample");

    let statements = parsing::parse(&content).expect("Failed to parse sample");

    // two statements share a line, separated by ';'
    assert_eq!(statements.len(), 8);
}
