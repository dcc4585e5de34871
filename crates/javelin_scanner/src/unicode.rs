//! Unicode escape translation.
//!
//! Java translates `\uXXXX` escapes before tokenizing, so `Abc` is the
//! identifier `Abc`. The scanner works on the translated characters and maps
//! every position back to the original buffer through `offsets`.

use crate::char_codes::is_hex_digit;

/// Translated source plus the original offset of every translated char.
pub(crate) struct Translated {
    pub chars: Vec<char>,
    /// `offsets[i]` is the original offset of `chars[i]`; one extra entry
    /// holds the original length.
    pub offsets: Vec<u32>,
    /// Original ranges of malformed escapes.
    pub errors: Vec<(u32, u32)>,
}

/// Whether `text` contains anything that could be a unicode escape.
pub(crate) fn has_unicode_escape(text: &str) -> bool {
    memchr::memmem::find(text.as_bytes(), b"\\u").is_some()
}

/// Decodes the escape starting at `source[at]` (which is a backslash).
/// Returns the value and the index one past the escape, or the index where
/// decoding failed.
fn decode_escape(source: &[char], at: usize) -> Result<(u32, usize), usize> {
    let mut i = at + 1;
    while source.get(i) == Some(&'u') {
        i += 1;
    }
    let digits = source.get(i..i + 4).ok_or(source.len())?;
    if !digits.iter().all(|c| is_hex_digit(*c)) {
        return Err(i);
    }
    let value = digits
        .iter()
        .fold(0u32, |acc, c| acc * 16 + c.to_digit(16).unwrap_or(0));
    Ok((value, i + 4))
}

pub(crate) fn translate(source: &[char]) -> Translated {
    let mut chars = Vec::with_capacity(source.len());
    let mut offsets = Vec::with_capacity(source.len() + 1);
    let mut errors = Vec::new();
    // Raw backslashes immediately before `i`. A `\` is only eligible to start
    // an escape when preceded by an even number of them.
    let mut backslashes = 0usize;
    let mut i = 0;

    while i < source.len() {
        let ch = source[i];
        let eligible = ch == '\\' && backslashes % 2 == 0 && source.get(i + 1) == Some(&'u');
        if !eligible {
            backslashes = if ch == '\\' { backslashes + 1 } else { 0 };
            chars.push(ch);
            offsets.push(i as u32);
            i += 1;
            continue;
        }

        match decode_escape(source, i) {
            Ok((high, next)) if (0xD800..0xDC00).contains(&high) => {
                // A high surrogate pairs with an immediately following low
                // surrogate escape.
                let low = (source.get(next) == Some(&'\\'))
                    .then(|| decode_escape(source, next).ok())
                    .flatten()
                    .filter(|(low, _)| (0xDC00..0xE000).contains(low));
                match low {
                    Some((low, after)) => {
                        let value = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                        chars.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
                        offsets.push(i as u32);
                        i = after;
                    }
                    None => {
                        errors.push((i as u32, next as u32));
                        chars.push('\u{FFFD}');
                        offsets.push(i as u32);
                        i = next;
                    }
                }
            }
            Ok((value, next)) => match char::from_u32(value) {
                Some(c) => {
                    chars.push(c);
                    offsets.push(i as u32);
                    i = next;
                }
                None => {
                    errors.push((i as u32, next as u32));
                    chars.push('\u{FFFD}');
                    offsets.push(i as u32);
                    i = next;
                }
            },
            Err(stop) => {
                errors.push((i as u32, stop.min(source.len()) as u32));
                chars.push('\\');
                offsets.push(i as u32);
                i += 1;
            }
        }
        backslashes = 0;
    }
    offsets.push(source.len() as u32);

    Translated {
        chars,
        offsets,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> Translated {
        translate(&text.chars().collect::<Vec<_>>())
    }

    #[test]
    fn test_translates_escape_and_maps_offsets() {
        let t = run("a\\u0042c");
        assert_eq!(t.chars.iter().collect::<String>(), "aBc");
        assert_eq!(t.offsets, vec![0, 1, 7, 8]);
        assert!(t.errors.is_empty());
    }

    #[test]
    fn test_multiple_u_and_escaped_backslash() {
        let t = run("\\uuu0041");
        assert_eq!(t.chars, vec!['A']);
        // `\\u0041` is a backslash escape followed by text, not a unicode escape.
        let t = run("\\\\u0041");
        assert_eq!(t.chars.iter().collect::<String>(), "\\\\u0041");
    }

    #[test]
    fn test_surrogate_pair() {
        let t = run("\\uD83D\\uDE00");
        assert_eq!(t.chars, vec!['\u{1F600}']);
        assert_eq!(t.offsets, vec![0, 12]);
    }

    #[test]
    fn test_malformed_escape_is_reported() {
        let t = run("x\\u00zz");
        assert_eq!(t.errors, vec![(1, 3)]);
        assert_eq!(t.chars.iter().collect::<String>(), "x\\u00zz");
    }

    #[test]
    fn test_detection() {
        assert!(has_unicode_escape("int \\u0061;"));
        assert!(!has_unicode_escape("int a; // \\n"));
    }
}
