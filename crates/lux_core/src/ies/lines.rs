//! Line normalization and the shared read cursor.
//!
//! Every reader walks the same [`LineCursor`]. Header lines are consumed
//! whole; the angle and candela sections are consumed token by token, and a
//! partially read line keeps its unread tokens for the next section.

use std::str::SplitWhitespace;

/// A trimmed, non-empty source line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    /// 1-based line number in the original text
    pub number: usize,

    /// Line content without surrounding whitespace
    pub text: &'a str,
}

/// A whitespace-delimited token and the line it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub line: usize,
    pub text: &'a str,
}

/// Split text into trimmed, non-empty lines (`\n` and `\r\n` endings).
///
/// A leading byte-order mark is dropped.
pub(crate) fn normalize_lines(content: &str) -> Vec<Line<'_>> {
    content
        .strip_prefix('\u{feff}')
        .unwrap_or(content)
        .lines()
        .enumerate()
        .map(|(i, s)| Line {
            number: i + 1,
            text: s.trim(),
        })
        .filter(|line| !line.text.is_empty())
        .collect()
}

/// Forward-only cursor over normalized lines.
pub(crate) struct LineCursor<'a> {
    lines: Vec<Line<'a>>,
    position: usize,
    /// Unread tokens of the line currently being tokenized.
    pending: Option<(usize, SplitWhitespace<'a>)>,
}

impl<'a> LineCursor<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            lines: normalize_lines(content),
            position: 0,
            pending: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of the last line in the document (0 when empty).
    pub fn last_line_number(&self) -> usize {
        self.lines.last().map_or(0, |line| line.number)
    }

    /// Look at the next whole line without consuming it.
    pub fn peek_line(&self) -> Option<Line<'a>> {
        debug_assert!(self.pending.is_none(), "line read inside a token section");
        self.lines.get(self.position).copied()
    }

    /// Consume the next whole line.
    pub fn next_line(&mut self) -> Option<Line<'a>> {
        let line = self.peek_line()?;
        self.position += 1;
        Some(line)
    }

    /// Skip up to `count` whole lines, returning how many were skipped.
    pub fn skip_lines(&mut self, count: usize) -> usize {
        let skipped = count.min(self.lines.len() - self.position);
        self.position += skipped;
        skipped
    }

    /// Consume the next token, continuing across line boundaries.
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        loop {
            if let Some((line, tokens)) = self.pending.as_mut() {
                if let Some(text) = tokens.next() {
                    return Some(Token { line: *line, text });
                }
                self.pending = None;
            }

            let line = self.lines.get(self.position)?;
            self.position += 1;
            self.pending = Some((line.number, line.text.split_whitespace()));
        }
    }

    /// Count the tokens not yet consumed.
    pub fn remaining_tokens(&self) -> usize {
        let pending = self
            .pending
            .as_ref()
            .map_or(0, |(_, tokens)| tokens.clone().count());

        pending
            + self.lines[self.position..]
                .iter()
                .map(|line| line.text.split_whitespace().count())
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_drops_blank_lines_and_trims() {
        let lines = normalize_lines("  first \r\n\r\n\t\nsecond\n   \nthird  ");
        let texts: Vec<_> = lines.iter().map(|l| l.text).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);

        // Numbers refer to the original text
        let numbers: Vec<_> = lines.iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 4, 6]);
    }

    #[test]
    fn test_normalize_strips_byte_order_mark() {
        let lines = normalize_lines("\u{feff}IESNA:LM-63-2002\r\nTILT=NONE");
        assert_eq!(lines[0].text, "IESNA:LM-63-2002");
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[1].number, 2);

        let lines = normalize_lines("\u{feff}\n\nfirst");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].number, 3);
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize_lines("").is_empty());
        assert!(normalize_lines(" \n\r\n \t ").is_empty());
        assert!(LineCursor::new("\n\n").is_empty());
    }

    #[test]
    fn test_tokens_span_lines() {
        let mut cursor = LineCursor::new("1 2\n3\n\n4 5 6");
        let tokens: Vec<_> = std::iter::from_fn(|| cursor.next_token())
            .map(|t| (t.line, t.text))
            .collect();
        assert_eq!(
            tokens,
            vec![(1, "1"), (1, "2"), (2, "3"), (4, "4"), (4, "5"), (4, "6")]
        );
        assert_eq!(cursor.next_token(), None);
    }

    #[test]
    fn test_partial_line_keeps_remaining_tokens() {
        let mut cursor = LineCursor::new("0 90 0 45\n10 20");
        assert_eq!(cursor.next_token().map(|t| t.text), Some("0"));
        assert_eq!(cursor.next_token().map(|t| t.text), Some("90"));

        // Two tokens left on line 1, two on line 2
        assert_eq!(cursor.remaining_tokens(), 4);
        assert_eq!(cursor.next_token().map(|t| t.text), Some("0"));
        assert_eq!(cursor.remaining_tokens(), 3);
    }

    #[test]
    fn test_line_reads_and_skip() {
        let mut cursor = LineCursor::new("a\nb\nc\nd");
        assert_eq!(cursor.next_line().map(|l| l.text), Some("a"));
        assert_eq!(cursor.peek_line().map(|l| l.text), Some("b"));
        assert_eq!(cursor.skip_lines(2), 2);
        assert_eq!(cursor.next_line().map(|l| l.text), Some("d"));
        assert_eq!(cursor.skip_lines(4), 0);
        assert_eq!(cursor.next_line(), None);
        assert_eq!(cursor.last_line_number(), 4);
    }
}
