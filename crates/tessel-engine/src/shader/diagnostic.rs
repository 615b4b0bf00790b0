use std::fmt;

/// Upper bound, in bytes, of any compile or link log.
pub const MAX_DIAGNOSTIC_LEN: usize = 1024;

/// Human-readable compiler/linker log, bounded to [`MAX_DIAGNOSTIC_LEN`] bytes.
///
/// Longer logs are cut at the last UTF-8 character boundary at or below the
/// limit, so the text stays valid and `len() <= MAX_DIAGNOSTIC_LEN` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    text: String,
    truncated: bool,
}

impl Diagnostic {
    pub fn new(text: impl Into<String>) -> Self {
        let mut text = text.into();
        let truncated = text.len() > MAX_DIAGNOSTIC_LEN;

        if truncated {
            let mut cut = MAX_DIAGNOSTIC_LEN;
            while !text.is_char_boundary(cut) {
                cut -= 1;
            }
            text.truncate(cut);
        }

        Self { text, truncated }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True when the original log exceeded the bound and was cut.
    #[inline]
    pub fn was_truncated(&self) -> bool {
        self.truncated
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_log_is_kept_verbatim() {
        let d = Diagnostic::new("error: expected `;`");
        assert_eq!(d.as_str(), "error: expected `;`");
        assert!(!d.was_truncated());
    }

    #[test]
    fn exact_limit_is_not_truncated() {
        let d = Diagnostic::new("x".repeat(MAX_DIAGNOSTIC_LEN));
        assert_eq!(d.len(), MAX_DIAGNOSTIC_LEN);
        assert!(!d.was_truncated());
    }

    #[test]
    fn long_log_is_cut_to_limit() {
        let d = Diagnostic::new("y".repeat(MAX_DIAGNOSTIC_LEN * 3));
        assert_eq!(d.len(), MAX_DIAGNOSTIC_LEN);
        assert!(d.was_truncated());
    }

    #[test]
    fn cut_respects_char_boundaries() {
        // 'é' is two bytes; 1023 ASCII bytes put its first byte at index 1023.
        let mut s = "a".repeat(MAX_DIAGNOSTIC_LEN - 1);
        s.push('é');
        s.push_str("tail");

        let d = Diagnostic::new(s);
        assert_eq!(d.len(), MAX_DIAGNOSTIC_LEN - 1);
        assert!(d.as_str().chars().all(|c| c == 'a'));
        assert!(d.was_truncated());
    }
}
