//! Two-field CSV parsing for card files.
//!
//! Card files are forgiving, user-supplied CSV: each line is expected to hold
//! a question and an answer. Parsing never fails — lines that do not yield
//! two non-empty fields are dropped silently.

use crate::models::Card;

/// Parse raw file text into cards.
///
/// Lines are split on `\n` (a trailing `\r` is tolerated). Blank and
/// whitespace-only lines are skipped. A field is either a double-quoted run,
/// where `""` is a literal quote and commas are literal, or an unquoted run
/// ending at the first comma. Only the first two fields of a line are used;
/// anything after the second field is ignored, so `a,b,c` yields
/// question `a`, answer `b`. Fields are trimmed after unquoting, and a line
/// yields a card only if both fields are non-empty.
pub fn parse_cards(text: &str) -> Vec<Card> {
    let mut cards = Vec::new();

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }

        let Some((question, answer)) = split_two_fields(line) else {
            continue;
        };
        if question.is_empty() || answer.is_empty() {
            continue;
        }
        cards.push(Card::new(question, answer));
    }

    cards
}

/// Extract the first two fields of a line, trimmed and unescaped.
/// Returns `None` when the line has no second field at all.
fn split_two_fields(line: &str) -> Option<(String, String)> {
    let (first, rest) = take_field(line);
    let rest = rest.strip_prefix(',')?;
    let (second, _) = take_field(rest);
    Some((first.trim().to_string(), second.trim().to_string()))
}

/// Consume one field from the start of `s`.
///
/// Returns the unescaped field value and the remainder of the line, which
/// still starts with the terminating comma if there was one. An unterminated
/// quoted field runs to the end of the line.
fn take_field(s: &str) -> (String, &str) {
    let Some(inner) = s.strip_prefix('"') else {
        return match s.find(',') {
            Some(i) => (s[..i].to_string(), &s[i..]),
            None => (s.to_string(), ""),
        };
    };

    let mut value = String::new();
    let mut chars = inner.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '"' {
            value.push(c);
            continue;
        }
        if matches!(chars.peek(), Some((_, '"'))) {
            chars.next();
            value.push('"');
        } else {
            return (value, &inner[i + 1..]);
        }
    }
    (value, "")
}
