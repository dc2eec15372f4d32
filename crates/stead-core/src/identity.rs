//! Case-insensitive identity comparison.
//!
//! Player names arrive from the host in whatever case the player typed
//! at login, and historical data may contain mixed-case duplicates.
//! Ownership, mate, and admin lookups therefore always compare folded
//! names; the original casing is preserved for display.

/// Fold a name to its canonical comparison form.
///
/// Trims surrounding whitespace and lowercases. The folded form is for
/// comparison and set membership only, never for display.
pub fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Whether two names denote the same identity.
pub fn same(a: &str, b: &str) -> bool {
    fold(a) == fold(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_trims_and_lowercases() {
        assert_eq!(fold("  Alice "), "alice");
        assert_eq!(fold("BOB"), "bob");
    }

    #[test]
    fn same_ignores_case_and_whitespace() {
        assert!(same("Alice", "alice"));
        assert!(same(" Carol", "CAROL "));
        assert!(!same("Alice", "Alicia"));
    }
}
