//! Decoding of character, string and text block contents.

use crate::char_codes::{is_line_terminator, is_octal_digit, is_white_space_single_line};

/// Result of decoding one escape sequence.
pub(crate) enum Escape {
    Char(char),
    /// `\<line terminator>` inside a text block: the line break is dropped.
    LineContinuation,
}

/// Decodes the escape whose backslash is at `chars[at]`. Returns the decoded
/// value and the index one past the escape; on an invalid escape returns the
/// index to resume at.
pub(crate) fn decode_escape(chars: &[char], at: usize, in_text_block: bool) -> Result<(Escape, usize), usize> {
    let Some(&ch) = chars.get(at + 1) else {
        return Err(at + 1);
    };
    let simple = match ch {
        'b' => Some('\u{0008}'),
        't' => Some('\t'),
        'n' => Some('\n'),
        'f' => Some('\u{000C}'),
        'r' => Some('\r'),
        's' => Some(' '),
        '"' => Some('"'),
        '\'' => Some('\''),
        '\\' => Some('\\'),
        _ => None,
    };
    if let Some(c) = simple {
        return Ok((Escape::Char(c), at + 2));
    }
    if is_octal_digit(ch) {
        // \[0-3]?[0-7]?[0-7]
        let max_len = if ch <= '3' { 3 } else { 2 };
        let mut i = at + 1;
        let mut value = 0u32;
        while i < at + 1 + max_len && chars.get(i).is_some_and(|c| is_octal_digit(*c)) {
            value = value * 8 + chars[i].to_digit(8).unwrap_or(0);
            i += 1;
        }
        return Ok((Escape::Char(char::from_u32(value).unwrap_or('\0')), i));
    }
    if in_text_block && is_line_terminator(ch) {
        let mut next = at + 2;
        if ch == '\r' && chars.get(next) == Some(&'\n') {
            next += 1;
        }
        return Ok((Escape::LineContinuation, next));
    }
    Err(at + 2)
}

/// Splits text block content into `[start, end)` line ranges, keeping the
/// last (closing) line even when it is empty.
fn split_lines(content: &[char]) -> Vec<(usize, usize)> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < content.len() {
        if is_line_terminator(content[i]) {
            lines.push((start, i));
            if content[i] == '\r' && content.get(i + 1) == Some(&'\n') {
                i += 1;
            }
            start = i + 1;
        }
        i += 1;
    }
    lines.push((start, content.len()));
    lines
}

fn is_blank(line: &[char]) -> bool {
    line.iter().all(|c| is_white_space_single_line(*c))
}

fn indentation(line: &[char]) -> usize {
    line.iter()
        .take_while(|c| is_white_space_single_line(**c))
        .count()
}

/// Applies the text block rules: strip incidental indentation and trailing
/// spaces, normalise line terminators to `\n`, then interpret escapes.
/// `content` starts after the opening line terminator and stops before the
/// closing delimiter. Invalid escapes are returned as indices into `content`.
pub(crate) fn cook_text_block(content: &[char]) -> (String, Vec<usize>) {
    let lines = split_lines(content);
    let last = lines.len() - 1;
    let min_indent = lines
        .iter()
        .enumerate()
        .filter(|(i, (s, e))| *i == last || !is_blank(&content[*s..*e]))
        .map(|(_, (s, e))| indentation(&content[*s..*e]))
        .min()
        .unwrap_or(0);

    // Escapes are interpreted after stripping, so remember where each kept
    // character came from to report invalid escapes in place.
    let mut stripped: Vec<(char, usize)> = Vec::with_capacity(content.len());
    for (i, &(start, end)) in lines.iter().enumerate() {
        let line = &content[start..end];
        if !is_blank(line) {
            let body_start = start + min_indent.min(line.len());
            let trailing = line
                .iter()
                .rev()
                .take_while(|c| is_white_space_single_line(**c))
                .count();
            for at in body_start..end - trailing {
                stripped.push((content[at], at));
            }
        }
        if i != last {
            stripped.push(('\n', end));
        }
    }

    let chars: Vec<char> = stripped.iter().map(|(c, _)| *c).collect();
    let mut out = String::with_capacity(chars.len());
    let mut invalid = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '\\' {
            match decode_escape(&chars, i, true) {
                Ok((Escape::Char(c), next)) => {
                    out.push(c);
                    i = next;
                }
                Ok((Escape::LineContinuation, next)) => i = next,
                Err(next) => {
                    invalid.push(stripped[i].1);
                    i = next.min(chars.len());
                }
            }
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    (out, invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cook(text: &str) -> String {
        cook_text_block(&text.chars().collect::<Vec<_>>()).0
    }

    #[test]
    fn test_strips_incidental_indentation() {
        assert_eq!(cook("    hello\n      world\n    "), "hello\n  world\n");
    }

    #[test]
    fn test_closing_delimiter_on_content_line() {
        assert_eq!(cook("  a\n  b"), "a\nb");
    }

    #[test]
    fn test_closing_line_shifts_indentation() {
        assert_eq!(cook("    a\n  "), "  a\n");
    }

    #[test]
    fn test_escapes_and_continuation() {
        assert_eq!(cook("  a\\\n  b\\s\n  "), "ab \n");
        assert_eq!(cook("  \\\"\"\"\n  "), "\"\"\"\n");
    }

    #[test]
    fn test_trailing_spaces_removed_and_blank_lines_kept() {
        assert_eq!(cook("  a   \n\n  b\n  "), "a\n\nb\n");
    }

    #[test]
    fn test_octal_escape() {
        let chars: Vec<char> = "\\101\\0\\477".chars().collect();
        let Ok((Escape::Char(c), next)) = decode_escape(&chars, 0, false) else {
            panic!("expected a char");
        };
        assert_eq!((c, next), ('A', 4));
        let Ok((Escape::Char(c), next)) = decode_escape(&chars, 4, false) else {
            panic!("expected a char");
        };
        assert_eq!((c, next), ('\0', 6));
        // `\477` is `\47` followed by `7`.
        let Ok((Escape::Char(c), next)) = decode_escape(&chars, 6, false) else {
            panic!("expected a char");
        };
        assert_eq!((c, next), ('\'', 9));
    }
}
