//! Speech feedback boundary.
//!
//! The dispatch path only needs one method and a readiness flag. The
//! concrete implementation shells out to a platform TTS command; a new
//! utterance kills whatever is still playing (flush, not enqueue), and a
//! failed spawn mutes speech for the rest of the session.

use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

pub trait SpeechFeedback: Send + Sync {
    /// False once the backing engine is unavailable; `speak` is then a
    /// silent no-op.
    fn is_ready(&self) -> bool;

    /// Fire-and-forget: interrupts any utterance in progress.
    fn speak(&self, text: &str);
}

/// Speech disabled by configuration.
pub struct NullSpeech;

impl SpeechFeedback for NullSpeech {
    fn is_ready(&self) -> bool {
        false
    }

    fn speak(&self, _text: &str) {}
}

/// Speaks by spawning a TTS command (`say` on macOS, `espeak` elsewhere).
pub struct CommandSpeech {
    command: String,
    ready: AtomicBool,
    playing: Mutex<Option<Child>>,
}

impl CommandSpeech {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ready: AtomicBool::new(true),
            playing: Mutex::new(None),
        }
    }

    /// Platform default TTS command.
    pub fn default_command() -> &'static str {
        if cfg!(target_os = "macos") { "say" } else { "espeak" }
    }
}

impl SpeechFeedback for CommandSpeech {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn speak(&self, text: &str) {
        if !self.is_ready() || text.is_empty() {
            return;
        }

        let mut playing = match self.playing.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Flush semantics: a new utterance interrupts the previous one.
        if let Some(mut child) = playing.take() {
            let _ = child.kill();
            let _ = child.wait();
        }

        match Command::new(&self.command)
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => {
                debug!(command = %self.command, chars = text.len(), "speaking reply");
                *playing = Some(child);
            }
            Err(e) => {
                warn!(command = %self.command, error = %e, "speech engine unavailable, muting");
                self.ready.store(false, Ordering::SeqCst);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_speech_is_never_ready() {
        let speech = NullSpeech;
        assert!(!speech.is_ready());
        speech.speak("ignored");
    }

    #[test]
    fn missing_command_mutes_silently() {
        let speech = CommandSpeech::new("pocketmorse-no-such-tts-command");
        assert!(speech.is_ready());
        speech.speak("hello");
        assert!(!speech.is_ready());
        // Still a no-op, still no panic.
        speech.speak("hello again");
    }

    #[test]
    fn empty_text_does_not_spawn() {
        let speech = CommandSpeech::new("pocketmorse-no-such-tts-command");
        speech.speak("");
        assert!(speech.is_ready());
    }
}
