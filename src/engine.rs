//! The Morse decoding engine and control interpreter.
//!
//! Owns every piece of mutable input-path state and processes one key event
//! at a time, never blocking: each call returns a handled verdict
//! immediately, and a commit comes back as a value for the host to dispatch.
//!
//! Releasing the input key evaluates, in priority order: backspace (empty
//! accumulator, non-empty sentence, long press), clear-all (`.`, long
//! press), commit (`..`, long press), otherwise decode a letter (short
//! press, unknown sequences become a space). The accumulator is cleared and
//! the sentence text refreshed after every input-key release, whatever
//! branch fired.

use tracing::{debug, info};

use crate::keys::{KeyAction, KeyEvent, KeyMap, LogicalKey, Press, PressClassifier};
use crate::morse::{self, Sequence, Symbol};
use crate::sentence::SentenceBuffer;

/// Control sequences reuse letter codes (E, I); the press duration of the
/// input key on release picks the meaning, not the sequence content.
const CLEAR_ALL: Sequence = Sequence::from_code(".");
const COMMIT: Sequence = Sequence::from_code("..");

/// What the host must do after one event.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Whether the event was consumed (suppress the platform default).
    pub handled: bool,
    /// A committed sentence, snapshotted before the buffer was cleared.
    pub commit: Option<String>,
}

impl Outcome {
    fn ignored() -> Self {
        Self::default()
    }

    fn handled() -> Self {
        Self {
            handled: true,
            commit: None,
        }
    }
}

/// Service lifecycle hooks, implemented by the engine and driven by a thin
/// host adapter that owns the actual event source.
pub trait ServiceHooks {
    fn on_start(&mut self);
    fn on_key_event(&mut self, event: KeyEvent) -> Outcome;
    fn on_stop(&mut self);
}

/// All mutable input-path state in one owned struct.
pub struct MorseEngine {
    keymap: KeyMap,
    classifier: PressClassifier,
    accumulator: Sequence,
    sentence: SentenceBuffer,
}

impl MorseEngine {
    pub fn new(keymap: KeyMap, long_press_ms: u64) -> Self {
        Self {
            keymap,
            classifier: PressClassifier::new(long_press_ms),
            accumulator: Sequence::new(),
            sentence: SentenceBuffer::new(),
        }
    }

    /// The materialized sentence as of the last input-key release.
    pub fn sentence(&self) -> &str {
        self.sentence.text()
    }

    pub fn accumulator(&self) -> Sequence {
        self.accumulator
    }

    fn on_control_up(&mut self, press: Press) {
        let symbol = match press {
            Press::Long => Symbol::Dash,
            Press::Short => Symbol::Dot,
        };
        self.accumulator.push(symbol);
        debug!(?symbol, accumulator = ?self.accumulator, "symbol accumulated");
    }

    fn on_input_up(&mut self, press: Press) -> Option<String> {
        let mut commit = None;

        match press {
            Press::Long => {
                if self.accumulator.is_empty() && !self.sentence.is_empty() {
                    self.sentence.backspace();
                    debug!("backspace");
                } else if self.accumulator == CLEAR_ALL {
                    self.sentence.clear();
                    self.accumulator.clear();
                    debug!("clear-all");
                } else if self.accumulator == COMMIT {
                    self.sentence.refresh();
                    let text = self.sentence.text().to_owned();
                    info!(sentence = %text, "sentence committed");
                    self.sentence.clear();
                    commit = Some(text);
                }
                // Any other accumulator content: no operation.
            }
            Press::Short => match morse::decode(self.accumulator) {
                Some(letter) => self.sentence.push(letter),
                // Unknown sequences resolve to a space, never an error.
                None => self.sentence.push(' '),
            },
        }

        self.accumulator.clear();
        self.sentence.refresh();
        debug!(sentence = %self.sentence.text(), "buffer updated");
        commit
    }
}

impl ServiceHooks for MorseEngine {
    fn on_start(&mut self) {
        info!("input engine started");
    }

    fn on_key_event(&mut self, event: KeyEvent) -> Outcome {
        let Some(key) = self.keymap.resolve(event.code) else {
            return Outcome::ignored();
        };

        match event.action {
            KeyAction::Down => {
                self.classifier.key_down(key, event.timestamp_ms);
                Outcome::handled()
            }
            KeyAction::Up => {
                let press = self.classifier.key_up(key, event.timestamp_ms);
                match key {
                    LogicalKey::Control => {
                        self.on_control_up(press);
                        Outcome::handled()
                    }
                    LogicalKey::Input => Outcome {
                        handled: true,
                        commit: self.on_input_up(press),
                    },
                }
            }
        }
    }

    fn on_stop(&mut self) {
        info!("input engine stopped");
    }
}
