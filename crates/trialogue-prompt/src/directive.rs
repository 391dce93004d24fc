//! System directive loading.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

/// Built-in directive used when no directive file is present.
pub const DEFAULT_DIRECTIVE: &str = "Participate in a talk show between a moderator and two \
guests. Stay in character, be concise, and respond directly to what was said before you.";

/// Loads the system directive from `path`, falling back to the built-in
/// default. A missing or unreadable file is a recoverable condition, not an
/// error.
pub fn load_directive(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(text) => {
            let text = text.trim_end().to_string();
            debug!(path = %path.display(), len = text.len(), "loaded system directive");
            text
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "system directive not readable, using built-in default"
            );
            DEFAULT_DIRECTIVE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Debate politely.").unwrap();
        let directive = load_directive(file.path());
        assert_eq!(directive, "Debate politely.");
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let directive = load_directive(&dir.path().join("nope.txt"));
        assert_eq!(directive, DEFAULT_DIRECTIVE);
    }
}
