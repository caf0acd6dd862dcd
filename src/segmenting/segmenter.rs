use tracing::{debug, trace};

use super::Oracle;
use crate::language::Span;

/// Byte offsets of the start and end of every line in a buffer, excluding
/// the '\n' separators. An empty buffer has one empty line.
#[derive(Debug)]
struct Lines<'i> {
    content: &'i str,
    bounds: Vec<(usize, usize)>,
}

impl<'i> Lines<'i> {
    fn new(content: &'i str) -> Lines<'i> {
        let mut bounds = Vec::new();
        let mut start = 0;

        for line in content.split('\n') {
            let end = start + line.len();
            bounds.push((start, end));
            start = end + 1;
        }

        Lines { content, bounds }
    }

    fn count(&self) -> usize {
        self.bounds
            .len()
    }

    /// The text of lines first through last inclusive, separators and all.
    fn window(&self, first: usize, last: usize) -> &'i str {
        let (from, _) = self.bounds[first];
        let (_, to) = self.bounds[last];

        &self.content[from..to]
    }

    fn span<E>(&self, first: usize, last: usize, error: Option<E>) -> Span<'i, E> {
        let (from, _) = self.bounds[first];
        let (_, to) = self.bounds[last];

        Span {
            from,
            to,
            first,
            last,
            source: &self.content[from..to],
            error,
        }
    }
}

fn is_blank(text: &str) -> bool {
    text.trim()
        .is_empty()
}

/// Drives an oracle over windows of lines to find where one expression ends
/// and the next begins.
#[derive(Debug, Clone)]
pub struct Segmenter<O> {
    oracle: O,
}

impl<O> Segmenter<O>
where
    O: Oracle,
{
    pub fn new(oracle: O) -> Segmenter<O> {
        Segmenter { oracle }
    }

    /// Partition the content into spans, sorted by position.
    ///
    /// A forward scan grows a window of lines from the top until it parses,
    /// claims it, and starts again after it. Where the forward scan gets
    /// stuck, a backward scan does the same from the bottom up, never
    /// reaching back past the line the forward scan stopped at. Whatever lies
    /// between the two becomes a single span carrying the error from the
    /// forward scan's last attempt.
    ///
    /// Blank regions are never returned as spans. At most one span has an
    /// error. The oracle is called at most once per line in each direction,
    /// though each call may be given a window of many lines.
    pub fn segment<'i>(&self, content: &'i str) -> Vec<Span<'i, O::Error>> {
        let lines = Lines::new(content);
        let count = lines.count();

        let mut spans = Vec::new();
        let mut attempts = 0;

        // forward, from the first line not yet claimed
        let mut start = 0;
        let mut tail_error = None;

        for i in 0..count {
            let window = lines.window(start, i);
            attempts += 1;

            match self
                .oracle
                .parse(window)
            {
                Ok(()) => {
                    trace!(first = start, last = i, "forward window parsed");
                    if !is_blank(window) {
                        spans.push(lines.span(start, i, None));
                    }
                    start = i + 1;
                    tail_error = None;
                }
                Err(error) => {
                    tail_error = Some(error);
                }
            }
        }

        let tail = start;

        // backward, from the last line not yet claimed; `end` is exclusive
        let mut end = count;
        let mut stuck = false;

        for j in (tail + 1..count).rev() {
            let window = lines.window(j, end - 1);
            attempts += 1;

            match self
                .oracle
                .parse(window)
            {
                Ok(()) => {
                    trace!(first = j, last = end - 1, "backward window parsed");
                    if !is_blank(window) {
                        spans.push(lines.span(j, end - 1, None));
                    }
                    end = j;
                    stuck = false;
                }
                Err(_) => {
                    stuck = true;
                }
            }
        }

        let head = end;

        if stuck {
            trace!(line = head, "backward scan stopped on an error, which is discarded");
        }

        // remainder, at least one line wide unless the forward scan claimed
        // everything
        let stop = head
            .max(tail + 1)
            .min(count);

        if tail < stop {
            let window = lines.window(tail, stop - 1);

            if !is_blank(window) {
                if let Some(error) = tail_error {
                    debug!(first = tail, last = stop - 1, "unparsable remainder");
                    spans.push(lines.span(tail, stop - 1, Some(error)));
                }
            }
        }

        spans.sort_by_key(|span| span.from);

        debug!(
            "Segmented {} line{} into {} span{} using {} attempts",
            count,
            if count == 1 { "" } else { "s" },
            spans.len(),
            if spans.len() == 1 { "" } else { "s" },
            attempts
        );

        spans
    }
}
