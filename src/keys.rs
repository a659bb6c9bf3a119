//! Raw key events and press-duration classification.
//!
//! Two logical keys drive everything: the control key accumulates symbols
//! and the input key decodes or runs edit commands. The classifier keeps one
//! pending press-down timestamp per key and turns each release into a
//! `Short` or `Long` press.

use tracing::debug;

/// Raw platform key identity. The default map uses Android keycode
/// numbering for the volume rocker.
pub type KeyCode = u32;

/// Android `KEYCODE_VOLUME_UP`: the commit/decode key.
pub const KEY_VOLUME_UP: KeyCode = 24;
/// Android `KEYCODE_VOLUME_DOWN`: the symbol key.
pub const KEY_VOLUME_DOWN: KeyCode = 25;

/// The two keys the engine consumes. Everything else stays with the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicalKey {
    /// Accumulates one symbol per press: short release is a dot, long a dash.
    Control,
    /// Decodes the accumulator (short release) or runs an edit command
    /// (long release).
    Input,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

/// A raw key event with a monotonic millisecond timestamp.
#[derive(Clone, Copy, Debug)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub action: KeyAction,
    pub timestamp_ms: u64,
}

/// Maps raw key codes to the two logical keys.
#[derive(Clone, Copy, Debug)]
pub struct KeyMap {
    pub control: KeyCode,
    pub input: KeyCode,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            control: KEY_VOLUME_DOWN,
            input: KEY_VOLUME_UP,
        }
    }
}

impl KeyMap {
    pub fn resolve(&self, code: KeyCode) -> Option<LogicalKey> {
        if code == self.control {
            Some(LogicalKey::Control)
        } else if code == self.input {
            Some(LogicalKey::Input)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Press {
    Short,
    Long,
}

/// Turns press/release timestamp pairs into `Short`/`Long` classifications.
///
/// A press held to the threshold or past it is `Long` (inclusive). A new
/// press-down overwrites any prior unconsumed timestamp for the same key,
/// and the timestamp is consumed on release. A release with no recorded
/// press-down classifies `Long`.
#[derive(Debug)]
pub struct PressClassifier {
    threshold_ms: u64,
    down: [Option<u64>; 2],
}

impl PressClassifier {
    pub fn new(threshold_ms: u64) -> Self {
        Self {
            threshold_ms,
            down: [None; 2],
        }
    }

    pub fn key_down(&mut self, key: LogicalKey, now_ms: u64) {
        self.down[slot(key)] = Some(now_ms);
    }

    pub fn key_up(&mut self, key: LogicalKey, now_ms: u64) -> Press {
        let press = match self.down[slot(key)].take() {
            Some(pressed_ms) if now_ms.saturating_sub(pressed_ms) < self.threshold_ms => {
                Press::Short
            }
            _ => Press::Long,
        };
        debug!(?key, ?press, "press classified");
        press
    }
}

fn slot(key: LogicalKey) -> usize {
    match key {
        LogicalKey::Control => 0,
        LogicalKey::Input => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_below_threshold() {
        let mut classifier = PressClassifier::new(180);
        classifier.key_down(LogicalKey::Input, 1000);
        assert_eq!(classifier.key_up(LogicalKey::Input, 1179), Press::Short);
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut classifier = PressClassifier::new(180);
        classifier.key_down(LogicalKey::Input, 1000);
        assert_eq!(classifier.key_up(LogicalKey::Input, 1180), Press::Long);
    }

    #[test]
    fn repeated_down_overwrites() {
        let mut classifier = PressClassifier::new(180);
        classifier.key_down(LogicalKey::Control, 0);
        classifier.key_down(LogicalKey::Control, 900);
        assert_eq!(classifier.key_up(LogicalKey::Control, 950), Press::Short);
    }

    #[test]
    fn release_without_down_is_long() {
        let mut classifier = PressClassifier::new(180);
        assert_eq!(classifier.key_up(LogicalKey::Input, 500), Press::Long);
    }

    #[test]
    fn timestamp_consumed_on_release() {
        let mut classifier = PressClassifier::new(180);
        classifier.key_down(LogicalKey::Input, 0);
        assert_eq!(classifier.key_up(LogicalKey::Input, 50), Press::Short);
        // The second release has nothing to measure against.
        assert_eq!(classifier.key_up(LogicalKey::Input, 60), Press::Long);
    }

    #[test]
    fn keys_do_not_interfere() {
        let mut classifier = PressClassifier::new(180);
        classifier.key_down(LogicalKey::Control, 0);
        classifier.key_down(LogicalKey::Input, 100);
        assert_eq!(classifier.key_up(LogicalKey::Control, 300), Press::Long);
        assert_eq!(classifier.key_up(LogicalKey::Input, 150), Press::Short);
    }

    #[test]
    fn default_keymap_is_volume_rocker() {
        let map = KeyMap::default();
        assert_eq!(map.resolve(KEY_VOLUME_DOWN), Some(LogicalKey::Control));
        assert_eq!(map.resolve(KEY_VOLUME_UP), Some(LogicalKey::Input));
        assert_eq!(map.resolve(4), None);
    }
}
