//! Validation at the editing boundary.
//!
//! Text typed by the user is checked here before it reaches an engine.

use crate::error::EditError;

/// Parse an edge weight typed by the user.
///
/// Surrounding whitespace is ignored; a leading `-` is allowed. Anything that
/// does not fit an `i32` is rejected.
pub fn parse_weight(s: &str) -> Result<i32, EditError> {
    let t = s.trim();
    t.parse::<i32>()
        .map_err(|_| EditError::InvalidWeight(t.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_signed_integers() {
        assert_eq!(parse_weight("42"), Ok(42));
        assert_eq!(parse_weight(" -7 "), Ok(-7));
        assert_eq!(parse_weight("+3"), Ok(3));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "  ", "1.5", "abc", "4x", "99999999999", "--1"] {
            assert!(
                matches!(parse_weight(bad), Err(EditError::InvalidWeight(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
