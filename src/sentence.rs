//! The sentence under construction.

/// Ordered characters with a cached materialized string.
///
/// Mutations touch only the character list; the engine calls
/// [`refresh`](SentenceBuffer::refresh) after every input-key release so the
/// cached text tracks the list.
#[derive(Debug, Default)]
pub struct SentenceBuffer {
    chars: Vec<char>,
    text: String,
}

impl SentenceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, c: char) {
        self.chars.push(c);
    }

    /// Remove the last character, if any.
    pub fn backspace(&mut self) -> Option<char> {
        self.chars.pop()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Rebuild the cached string from the character list.
    pub fn refresh(&mut self) {
        self.text = self.chars.iter().collect();
    }

    /// The materialized text as of the last [`refresh`](Self::refresh).
    pub fn text(&self) -> &str {
        &self.text
    }
}
