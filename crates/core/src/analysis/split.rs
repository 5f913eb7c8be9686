//! Quote-aware splitting of input text.
//!
//! Any character of the separator string splits. A piece that *starts* with
//! `"` or `'` runs to the matching quote, separators included, and the quotes
//! are removed. An unclosed quote is kept as a literal character.

const QUOTES: [char; 2] = ['"', '\''];

/// Split `text` on any character of `separators`, dropping empty pieces.
pub fn split(text: &str, separators: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut buf = String::new();
    let mut quote: Option<char> = None;
    let mut fresh = true;

    for c in text.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => buf.push(c),
            None if separators.contains(c) => {
                flush(&mut pieces, &mut buf, None);
                fresh = true;
                continue;
            }
            None if fresh && QUOTES.contains(&c) => quote = Some(c),
            None => buf.push(c),
        }
        fresh = false;
    }
    flush(&mut pieces, &mut buf, quote);
    pieces
}

fn flush(pieces: &mut Vec<String>, buf: &mut String, open_quote: Option<char>) {
    if let Some(q) = open_quote {
        buf.insert(0, q);
    }
    if !buf.is_empty() {
        pieces.push(std::mem::take(buf));
    }
}

/// Split `text` at its first unquoted separator character.
///
/// Leading separators and the separator run after the head are skipped. The
/// head has its quotes removed; the rest is otherwise returned verbatim. When
/// no separator occurs the rest is empty.
pub fn split_once(text: &str, separators: &str) -> (String, String) {
    let text = text.trim_start_matches(|c: char| separators.contains(c));
    let mut head = String::new();
    let mut quote: Option<char> = None;
    let mut fresh = true;

    for (i, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => head.push(c),
            None if separators.contains(c) => {
                let rest = text[i..].trim_start_matches(|c: char| separators.contains(c));
                return (head, rest.to_owned());
            }
            None if fresh && QUOTES.contains(&c) => quote = Some(c),
            None => head.push(c),
        }
        fresh = false;
    }
    if let Some(q) = quote {
        head.insert(0, q);
    }
    (head, String::new())
}
