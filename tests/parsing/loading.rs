use std::path::Path;

use mathpad::parsing;

#[test]
fn missing_file() {
    let filename = Path::new("tests/samples/nonexistent.mp");

    let error = parsing::load(filename).unwrap_err();
    assert_eq!(error.problem, "File not found");
    assert_eq!(error.filename, filename);
    assert_eq!(error.to_string(), "File not found");
}

#[test]
fn directory_instead_of_file() {
    let filename = Path::new("tests/samples/");

    let error = parsing::load(filename).unwrap_err();
    assert_eq!(error.problem, "Failed reading");
    assert!(!error
        .details
        .is_empty());
}

#[test]
fn existing_file() {
    let content = parsing::load(Path::new("tests/samples/definitions.mp"))
        .expect("Failed to load sample");

    assert!(content.starts_with("a = 2\n"));
}
