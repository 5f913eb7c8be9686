use tracing::trace;

use super::error::ErrorKind;
use super::input::{Input, Token, Unit};
use super::split::{split, split_once};

/// One tokenized input chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Pieces of one text chunk, split on `separator`.
    Text {
        /// The split pieces, never empty.
        pieces: Vec<String>,
        /// Separator the chunk was split on.
        separator: String,
    },
    /// A single opaque unit.
    Unit(Unit),
}

impl Segment {
    fn len(&self) -> usize {
        match self {
            Segment::Text { pieces, .. } => pieces.len(),
            Segment::Unit(_) => 1,
        }
    }
}

/// A two-level position over tokenized input with single-step push-back.
///
/// The position is `(segment, sub)`. While `segment` is in range, `sub`
/// indexes a piece of that segment; the cursor rolls over to the next
/// segment as soon as the last piece is consumed.
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    segments: Vec<Segment>,
    segment: usize,
    sub: usize,
}

impl Cursor {
    /// Tokenize `input`.
    ///
    /// Text is trimmed of leading whitespace and split on `separator`. Units
    /// whose kind is in `filter_out` fail with
    /// [`ErrorKind::UnrecognisedUnit`] when `raise` is set and are dropped
    /// otherwise. An empty result fails with [`ErrorKind::EmptyInput`].
    pub fn tokenize(
        input: Input,
        separator: &str,
        filter_out: &[String],
        raise: bool,
    ) -> Result<Self, ErrorKind> {
        let mut segments = Vec::new();
        let push_text = |segments: &mut Vec<Segment>, text: &str| {
            let pieces = split(text.trim_start(), separator);
            if !pieces.is_empty() {
                segments.push(Segment::Text {
                    pieces,
                    separator: separator.to_owned(),
                });
            }
        };

        match input {
            Input::Text(text) => push_text(&mut segments, &text),
            Input::Chain(tokens) => {
                for token in tokens {
                    match token {
                        Token::Text(text) => push_text(&mut segments, &text),
                        Token::Unit(unit) if filter_out.contains(&unit.kind) => {
                            if raise {
                                return Err(ErrorKind::UnrecognisedUnit {
                                    unit_type: unit.kind,
                                });
                            }
                            trace!(kind = %unit.kind, "dropping filtered unit");
                        }
                        Token::Unit(unit) => segments.push(Segment::Unit(unit)),
                    }
                }
            }
        }

        if segments.is_empty() {
            return Err(ErrorKind::EmptyInput);
        }
        Ok(Self::from_segments(segments))
    }

    /// Build a cursor over pre-tokenized segments. Empty text segments are
    /// discarded.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let segments = segments
            .into_iter()
            .filter(|s| s.len() > 0)
            .collect();
        Self {
            segments,
            segment: 0,
            sub: 0,
        }
    }

    /// The current `(segment, sub)` position.
    pub fn position(&self) -> (usize, usize) {
        (self.segment, self.sub)
    }

    /// Whether every token has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.segment >= self.segments.len()
    }

    /// Consume the next token, reading text with `separator`.
    ///
    /// When `separator` differs from the one the current chunk was split on,
    /// the current piece is split once more: its head is returned and the
    /// rest stays in place as the next piece. Returns `None` at the end.
    pub fn fetch(&mut self, separator: &str) -> Option<Token> {
        let token = match self.segments.get_mut(self.segment)? {
            Segment::Unit(unit) => Token::Unit(unit.clone()),
            Segment::Text {
                pieces,
                separator: own,
            } => {
                if own.as_str() != separator {
                    if let Some((head, rest)) = resplit(&pieces[self.sub], separator) {
                        trace!(%head, %rest, "re-split piece");
                        pieces[self.sub] = head;
                        if !rest.is_empty() {
                            pieces.insert(self.sub + 1, rest);
                        }
                    }
                }
                Token::Text(pieces[self.sub].clone())
            }
        };
        self.advance();
        trace!(%token, position = ?self.position(), "fetch");
        Some(token)
    }

    /// Look at the next token without consuming it.
    pub fn peek(&self, separator: &str) -> Option<Token> {
        match self.segments.get(self.segment)? {
            Segment::Unit(unit) => Some(Token::Unit(unit.clone())),
            Segment::Text {
                pieces,
                separator: own,
            } => {
                let piece = &pieces[self.sub];
                if own.as_str() != separator {
                    if let Some((head, _)) = resplit(piece, separator) {
                        return Some(Token::Text(head));
                    }
                }
                Some(Token::Text(piece.clone()))
            }
        }
    }

    fn advance(&mut self) {
        self.sub += 1;
        if self.sub >= self.segments[self.segment].len() {
            self.segment += 1;
            self.sub = 0;
        }
    }

    /// Undo one [`fetch`](Self::fetch) that returned `token`.
    ///
    /// Callers must not push back more tokens than they fetched.
    pub fn push_back(&mut self, token: &Token) {
        match token {
            Token::Text(_) if self.sub > 0 => self.sub -= 1,
            Token::Text(_) => {
                self.segment = self.segment.saturating_sub(1);
                self.sub = self
                    .segments
                    .get(self.segment)
                    .map_or(0, |s| s.len().saturating_sub(1));
            }
            Token::Unit(_) => {
                self.segment = self.segment.saturating_sub(1);
                self.sub = 0;
            }
        }
        trace!(%token, position = ?self.position(), "push back");
    }

    /// Count the tokens left, as if each text piece were read with
    /// `separator`. Does not move the cursor.
    pub fn remaining(&self, separator: &str) -> usize {
        self.segments
            .iter()
            .enumerate()
            .skip(self.segment)
            .map(|(index, segment)| match segment {
                Segment::Unit(_) => 1,
                Segment::Text {
                    pieces,
                    separator: own,
                } => {
                    let start = if index == self.segment { self.sub } else { 0 };
                    pieces[start..]
                        .iter()
                        .map(|piece| {
                            if own.as_str() == separator {
                                1
                            } else {
                                split(piece, separator).len().max(1)
                            }
                        })
                        .sum()
                }
            })
            .sum()
    }

    /// Take everything not yet consumed and move to the end.
    ///
    /// The rest of each text segment is joined back into one token on the
    /// first character of its separator; units are returned as they are.
    pub fn drain(&mut self) -> Vec<Token> {
        let mut rest = Vec::new();
        for (index, segment) in self.segments.iter().enumerate().skip(self.segment) {
            match segment {
                Segment::Unit(unit) => rest.push(Token::Unit(unit.clone())),
                Segment::Text { pieces, separator } => {
                    let start = if index == self.segment { self.sub } else { 0 };
                    let glue: String = separator.chars().take(1).collect();
                    rest.push(Token::Text(pieces[start..].join(&glue)));
                }
            }
        }
        self.segment = self.segments.len();
        self.sub = 0;
        rest
    }
}

/// Split `piece` under a foreign `separator`. `None` when the piece has no
/// separator character or nothing but separators.
fn resplit(piece: &str, separator: &str) -> Option<(String, String)> {
    if !piece.contains(|c: char| separator.contains(c)) {
        return None;
    }
    let (head, rest) = split_once(piece, separator);
    (!head.is_empty()).then_some((head, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cursor {
        Cursor::tokenize(Input::from(s), " ", &[], true).unwrap()
    }

    #[test]
    fn fetch_until_exhausted() {
        let mut c = text("a b c");
        assert_eq!(c.fetch(" "), Some(Token::from("a")));
        assert_eq!(c.fetch(" "), Some(Token::from("b")));
        assert_eq!(c.fetch(" "), Some(Token::from("c")));
        assert!(c.is_exhausted());
        assert_eq!(c.fetch(" "), None);
    }

    #[test]
    fn push_back_across_segments() {
        let chain = vec![
            Token::from("a b"),
            Token::Unit(Unit::new("image")),
            Token::from("c"),
        ];
        let mut c = Cursor::tokenize(Input::Chain(chain), " ", &[], true).unwrap();
        let fetched: Vec<Token> = std::iter::from_fn(|| c.fetch(" ")).collect();
        assert_eq!(fetched.len(), 4);
        for token in fetched.iter().rev() {
            c.push_back(token);
        }
        assert_eq!(c.position(), (0, 0));
        assert_eq!(c.remaining(" "), 4);
    }

    #[test]
    fn resplit_keeps_rest_in_place() {
        let mut c = text("--level=3 tail");
        assert_eq!(c.fetch("="), Some(Token::from("--level")));
        assert_eq!(c.fetch("="), Some(Token::from("3")));
        assert_eq!(c.fetch(" "), Some(Token::from("tail")));

        let mut c = text("--level=3 tail");
        let head = c.fetch("=").unwrap();
        c.push_back(&head);
        assert_eq!(c.fetch(" "), Some(Token::from("--level")));
        assert_eq!(c.fetch(" "), Some(Token::from("3")));
    }

    #[test]
    fn resplit_skips_separator_runs() {
        let mut c = text("--kv=a==b=");
        assert_eq!(c.remaining("="), 3);
        let fetched: Vec<Token> = std::iter::from_fn(|| c.fetch("=")).collect();
        assert_eq!(
            fetched,
            vec![Token::from("--kv"), Token::from("a"), Token::from("b")]
        );
    }

    #[test]
    fn peek_does_not_move() {
        let c = text("--level=3");
        assert_eq!(c.peek("="), Some(Token::from("--level")));
        assert_eq!(c.peek(" "), Some(Token::from("--level=3")));
        assert_eq!(c.position(), (0, 0));
    }

    #[test]
    fn remaining_counts_with_requested_separator() {
        let mut c = text("x a=b c");
        c.fetch(" ");
        assert_eq!(c.remaining(" "), 2);
        assert_eq!(c.remaining("="), 3);
    }

    #[test]
    fn drain_joins_rest_of_segment() {
        let chain = vec![Token::from("a b c"), Token::Unit(Unit::new("at"))];
        let mut c = Cursor::tokenize(Input::Chain(chain), " ", &[], true).unwrap();
        c.fetch(" ");
        assert_eq!(
            c.drain(),
            vec![Token::from("b c"), Token::Unit(Unit::new("at"))]
        );
        assert!(c.is_exhausted());
        assert!(c.drain().is_empty());
    }

    #[test]
    fn whitespace_only_input_is_empty() {
        let err = Cursor::tokenize(Input::from("   "), " ", &[], true).unwrap_err();
        assert_eq!(err, ErrorKind::EmptyInput);
    }

    #[test]
    fn filtered_units() {
        let chain = vec![Token::from("go"), Token::Unit(Unit::new("voice"))];
        let filter = vec!["voice".to_string()];
        let err = Cursor::tokenize(Input::Chain(chain.clone()), " ", &filter, true).unwrap_err();
        assert_eq!(
            err,
            ErrorKind::UnrecognisedUnit {
                unit_type: "voice".into()
            }
        );
        let mut c = Cursor::tokenize(Input::Chain(chain), " ", &filter, false).unwrap();
        assert_eq!(c.remaining(" "), 1);
        assert_eq!(c.drain(), vec![Token::from("go")]);
    }
}
