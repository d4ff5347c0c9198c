//! Electric delimiter pairing.
//!
//! Pure scans over the buffer text that decide how typed delimiters behave:
//! whether a closer should skip over an existing one, where the matching
//! closer of an open bracket sits, and whether a backward delete should
//! collapse an empty pair. Brackets are matched by depth counting, quotes by
//! parity (an odd number of quotes before an offset means "inside a quote").

/// True for characters that open a pair. Quotes open and close themselves.
pub fn is_opening_delimiter(c: char) -> bool {
    matches!(c, '(' | '[' | '{' | '"' | '\'')
}

/// True for characters that close a pair.
pub fn is_closing_delimiter(c: char) -> bool {
    matches!(c, ')' | ']' | '}' | '"' | '\'')
}

/// The closing counterpart of an opener (or the quote itself).
pub fn matching_char(c: char) -> Option<char> {
    match c {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => None,
    }
}

/// True when `open`/`close` form one of the recognized pairs.
pub fn is_matching_pair(open: char, close: char) -> bool {
    matching_char(open) == Some(close)
}

/// Count of `quote` occurrences in `buffer[..upto]` is odd, i.e. the offset
/// sits inside an open quoted span.
pub fn quote_parity_odd(buffer: &str, upto: usize, quote: char) -> bool {
    buffer[..upto].chars().filter(|&c| c == quote).count() % 2 == 1
}

/// Find the closing delimiter that `closer` typed at `point` should jump to.
///
/// For quotes: if the parity before `point` is odd, the next occurrence at or
/// after `point` closes the span. For brackets: the depth accumulated before
/// `point` is walked back down scanning forward; the position where it
/// returns to zero is the closer for this nesting level.
///
/// TODO: with freshly nested pairs like `((|))`, typing `)` jumps past the
/// outer closer instead of the inner one. The forward-only scan cannot tell
/// the levels apart once both closers are already present.
pub fn find_next_closing_delimiter(buffer: &str, point: usize, closer: char) -> Option<usize> {
    let opening = match closer {
        ')' => '(',
        ']' => '[',
        '}' => '{',
        '"' | '\'' => closer,
        _ => return None,
    };

    let bytes = buffer.as_bytes();

    if closer == '"' || closer == '\'' {
        if !quote_parity_odd(buffer, point, closer) {
            return None;
        }
        return bytes[point..]
            .iter()
            .position(|&b| b == closer as u8)
            .map(|i| point + i);
    }

    let mut depth: i32 = 0;
    for &b in &bytes[..point] {
        if b == opening as u8 {
            depth += 1;
        } else if b == closer as u8 {
            depth -= 1;
        }
    }

    if depth <= 0 {
        return None;
    }

    for (i, &b) in bytes[point..].iter().enumerate() {
        if b == opening as u8 {
            depth += 1;
        } else if b == closer as u8 {
            depth -= 1;
            if depth == 0 {
                return Some(point + i);
            }
        }
    }
    None
}
