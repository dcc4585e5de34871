//! Character classes of the Java lexical grammar.

/// `\n` or `\r`. Java recognises no other line terminators.
#[inline]
pub fn is_line_terminator(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

/// Space, tab and form feed. A byte order mark is tolerated as well.
#[inline]
pub fn is_white_space_single_line(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\u{000C}' | '\u{FEFF}')
}

#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

#[inline]
pub fn is_octal_digit(ch: char) -> bool {
    matches!(ch, '0'..='7')
}

#[inline]
pub fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

#[inline]
pub fn is_binary_digit(ch: char) -> bool {
    ch == '0' || ch == '1'
}

/// Java letters: XID start characters plus `$` and `_`.
#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    ch == '$' || ch == '_' || unicode_xid::UnicodeXID::is_xid_start(ch)
}

#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    ch == '$' || unicode_xid::UnicodeXID::is_xid_continue(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_java_letters() {
        assert!(is_identifier_start('$'));
        assert!(is_identifier_start('_'));
        assert!(is_identifier_start('é'));
        assert!(!is_identifier_start('1'));
        assert!(is_identifier_part('1'));
        assert!(!is_identifier_part('-'));
    }

    #[test]
    fn test_whitespace_excludes_line_terminators() {
        assert!(is_white_space_single_line('\u{000C}'));
        assert!(!is_white_space_single_line('\n'));
        assert!(is_line_terminator('\r'));
        assert!(!is_line_terminator('\u{2028}'));
    }
}
