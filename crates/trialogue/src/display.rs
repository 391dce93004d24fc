//! Terminal rendering of streamed turns.

use std::io::{self, Write};
use std::sync::Mutex;

use trialogue_engine::DisplaySurface;
use trialogue_models::Speaker;

/// Prints progressive turn text to stdout.
///
/// Each update carries the full accumulated text; the display tracks how
/// much it already printed and emits only the new suffix, so a streamed
/// turn renders as one continuously growing line.
pub struct TerminalDisplay {
    cursor: Mutex<Cursor>,
}

#[derive(Default)]
struct Cursor {
    speaker: Option<Speaker>,
    printed: usize,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self {
            cursor: Mutex::new(Cursor::default()),
        }
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySurface for TerminalDisplay {
    fn on_update(&self, speaker: Speaker, text: &str, is_final: bool) {
        let mut cursor = self.cursor.lock().unwrap();
        let chars = text.chars().count();

        // A new speaker, or text that shrank (a failure notice replacing a
        // partial stream), starts a fresh labeled line.
        if cursor.speaker != Some(speaker) || chars < cursor.printed {
            if cursor.speaker.is_some() {
                println!();
            }
            print!("{}: ", speaker.label());
            cursor.speaker = Some(speaker);
            cursor.printed = 0;
        }

        let suffix: String = text.chars().skip(cursor.printed).collect();
        print!("{suffix}");
        cursor.printed = chars;

        if is_final {
            println!();
            cursor.speaker = None;
            cursor.printed = 0;
        }
        let _ = io::stdout().flush();
    }
}
