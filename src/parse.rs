//! Text-source parsing: one question per line.

/// Split a block of text into questions: split on line breaks, trim
/// whitespace, drop empty lines, preserve order. Duplicates are kept.
pub fn clean_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_drops_blank_lines() {
        let lines = clean_lines("  first \n\n   \nsecond\n\t\nthird  ");
        assert_eq!(lines, vec!["first", "second", "third"]);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let lines = clean_lines("one\r\ntwo\r\n\r\nthree\r\n");
        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn preserves_order_and_duplicates() {
        let lines = clean_lines("b\na\nb\n");
        assert_eq!(lines, vec!["b", "a", "b"]);
    }

    #[test]
    fn empty_and_whitespace_only_input_yield_nothing() {
        assert!(clean_lines("").is_empty());
        assert!(clean_lines(" \n \r\n\t\n").is_empty());
    }
}
