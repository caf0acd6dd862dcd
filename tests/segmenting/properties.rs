use std::cell::Cell;

use mathpad::language::Span;
use mathpad::segmenting::Segmenter;

const ALPHABET: [&str; 7] = ["1", "(", ")", "", "  ", "(1)", ")("];

const MAXIMUM_LINES: usize = 4;

// Stands in for a grammar: text is an expression when its parentheses
// balance. On failure, the offset at which the text went wrong.
fn balanced(text: &str) -> Result<(), usize> {
    let mut depth: i64 = 0;

    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return Err(i);
        }
    }

    if depth == 0 {
        Ok(())
    } else {
        Err(text.len())
    }
}

/// Every buffer of one to MAXIMUM_LINES lines drawn from the alphabet.
fn buffers() -> Vec<String> {
    let mut result = Vec::new();
    let mut current: Vec<Vec<&str>> = vec![vec![]];

    for _ in 0..MAXIMUM_LINES {
        let mut next = Vec::new();
        for lines in &current {
            for piece in ALPHABET {
                let mut longer = lines.clone();
                longer.push(piece);
                result.push(longer.join("\n"));
                next.push(longer);
            }
        }
        current = next;
    }

    result
}

fn line_starts(content: &str) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(
        content
            .match_indices('\n')
            .map(|(i, _)| i + 1),
    );
    starts
}

fn check_invariants(content: &str, spans: &[Span<'_, usize>]) {
    let starts = line_starts(content);

    for span in spans {
        assert_eq!(&content[span.from..span.to], span.source, "in {:?}", content);
        assert_eq!(span.from, starts[span.first], "in {:?}", content);
        assert!(span.first <= span.last, "in {:?}", content);
        assert!(
            !span
                .source
                .trim()
                .is_empty(),
            "blank span in {:?}",
            content
        );

        match span.error {
            None => assert_eq!(balanced(span.source), Ok(()), "in {:?}", content),
            Some(error) => {
                // the error is the one found looking from this region's
                // first line to the end of the buffer
                assert_eq!(balanced(&content[span.from..]), Err(error), "in {:?}", content);
            }
        }
    }

    for pair in spans.windows(2) {
        assert!(pair[0].to < pair[1].from, "overlap in {:?}", content);
        assert!(pair[0].last < pair[1].first, "overlap in {:?}", content);
    }

    let errors = spans
        .iter()
        .filter(|span| span.is_error())
        .count();
    assert!(errors <= 1, "{} errors in {:?}", errors, content);

    // every line with content belongs to exactly one span
    for (i, line) in content
        .split('\n')
        .enumerate()
    {
        let owners = spans
            .iter()
            .filter(|span| span.contains_line(i))
            .count();

        if line
            .trim()
            .is_empty()
        {
            assert!(owners <= 1, "line {} in {:?}", i, content);
        } else {
            assert_eq!(owners, 1, "line {} in {:?}", i, content);
        }
    }
}

#[test]
fn exhaustive_small_buffers() {
    let segmenter = Segmenter::new(balanced);

    let all = buffers();
    assert_eq!(all.len(), 7 + 49 + 343 + 2401);

    for content in &all {
        let spans = segmenter.segment(content);
        check_invariants(content, &spans);
    }
}

#[test]
fn lines_individually_valid() {
    let segmenter = Segmenter::new(balanced);

    for content in buffers() {
        let valid = content
            .split('\n')
            .all(|line| balanced(line).is_ok());
        if !valid {
            continue;
        }

        let lines = content
            .split('\n')
            .filter(|line| {
                !line
                    .trim()
                    .is_empty()
            })
            .count();

        let spans = segmenter.segment(&content);
        assert_eq!(spans.len(), lines, "in {:?}", content);
        assert!(spans
            .iter()
            .all(|span| span.height() == 1));
    }
}

#[test]
fn attempts_at_most_one_per_line_each_way() {
    for content in buffers() {
        let calls = Cell::new(0);
        let segmenter = Segmenter::new(|text: &str| {
            calls.set(calls.get() + 1);
            balanced(text)
        });

        segmenter.segment(&content);

        let lines = content
            .split('\n')
            .count();
        assert!(calls.get() <= 2 * lines, "{} calls for {:?}", calls.get(), content);
    }
}

#[test]
fn deterministic() {
    let segmenter = Segmenter::new(balanced);

    for content in buffers() {
        assert_eq!(segmenter.segment(&content), segmenter.segment(&content));
    }
}
