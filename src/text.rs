//! Small text utilities shared across the request façade.

/// Trims whitespace from both ends of `s`, walking in from each end
/// independently.
pub fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_leading_and_trailing_whitespace() {
        assert_eq!(trim("  Pushkin Street  "), "Pushkin Street");
    }

    #[test]
    fn leaves_interior_whitespace_untouched() {
        assert_eq!(trim(" Marble   Arch "), "Marble   Arch");
    }

    #[test]
    fn empty_and_all_whitespace_input_trims_to_empty() {
        assert_eq!(trim(""), "");
        assert_eq!(trim("   "), "");
    }
}
