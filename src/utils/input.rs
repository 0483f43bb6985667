//! Input sanitization for the terminal input buffer.

/// Sanitize pasted or typed text before it enters the input buffer.
///
/// Converts tabs to 4 spaces and carriage returns to newlines, and drops
/// every other control character. Keeps the TUI from being corrupted by
/// terminal escape bytes smuggled in via paste.
pub fn sanitize_text_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\t' => sanitized.push_str("    "),
            '\r' => sanitized.push('\n'),
            '\n' => sanitized.push(c),
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(sanitize_text_input("EC2 の状態"), "EC2 の状態");
    }

    #[test]
    fn tabs_become_spaces_and_crs_become_newlines() {
        assert_eq!(sanitize_text_input("a\tb"), "a    b");
        assert_eq!(sanitize_text_input("a\r\nb"), "a\n\nb");
    }

    #[test]
    fn newlines_survive_but_other_control_chars_do_not() {
        assert_eq!(sanitize_text_input("one\ntwo"), "one\ntwo");
        assert_eq!(sanitize_text_input("be\x07ep\x1b[2J"), "beep[2J");
    }
}
