//! Regions of a notebook as found by the segmenter

/// One contiguous region of a notebook: either text that parsed as a complete
/// expression, or the remainder that could not be attributed to any parsable
/// neighbour.
///
/// `from` and `to` are byte offsets into the original buffer (`to` is
/// exclusive) for every kind of span, so `&text[from..to]` is always equal to
/// `source`. The line indices `first` and `last` are zero-origin and both
/// inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<'i, E> {
    pub from: usize,
    pub to: usize,
    pub first: usize,
    pub last: usize,
    pub source: &'i str,
    pub error: Option<E>,
}

impl<'i, E> Span<'i, E> {
    pub fn is_error(&self) -> bool {
        self.error
            .is_some()
    }

    pub fn contains_line(&self, line: usize) -> bool {
        self.first <= line && line <= self.last
    }

    /// The number of lines this span covers.
    pub fn height(&self) -> usize {
        self.last - self.first + 1
    }
}

/// Find the span covering the given line, if any. Blank lines dropped by the
/// segmenter between spans belong to none.
pub fn locate<'a, 'i, E>(spans: &'a [Span<'i, E>], line: usize) -> Option<&'a Span<'i, E>> {
    spans
        .iter()
        .find(|span| span.contains_line(line))
}

#[cfg(test)]
mod check {
    use super::*;

    fn sample(first: usize, last: usize) -> Span<'static, ()> {
        Span {
            from: first * 10,
            to: last * 10 + 5,
            first,
            last,
            source: "",
            error: None,
        }
    }

    #[test]
    fn line_membership() {
        let span = sample(2, 4);

        assert!(!span.contains_line(1));
        assert!(span.contains_line(2));
        assert!(span.contains_line(4));
        assert!(!span.contains_line(5));
        assert_eq!(span.height(), 3);
    }

    #[test]
    fn locating_spans() {
        let spans = vec![sample(0, 0), sample(2, 3)];

        assert_eq!(locate(&spans, 0), Some(&spans[0]));
        assert_eq!(locate(&spans, 1), None);
        assert_eq!(locate(&spans, 3), Some(&spans[1]));
        assert_eq!(locate(&spans, 7), None);
    }
}
