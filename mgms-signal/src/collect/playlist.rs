//! Playlist cursor
//!
//! An ordered, restartable sequence of audio segment URLs. Each attempt
//! makes a single pass; a retry rewinds the cursor to the beginning.

/// Cursor over an ordered list of audio segments.
#[derive(Debug, Clone)]
pub struct Playlist {
    segments: Vec<String>,
    index: usize,
}

impl Playlist {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments, index: 0 }
    }

    /// Advance the cursor and return the next segment, or `None` when the
    /// playlist is exhausted.
    pub fn next(&mut self) -> Option<&str> {
        let segment = self.segments.get(self.index)?;
        self.index += 1;
        Some(segment.as_str())
    }

    /// Reset the cursor to the first segment.
    pub fn rewind(&mut self) {
        self.index = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(segments: &[&str]) -> Playlist {
        Playlist::new(segments.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_iterates_in_order_then_exhausts() {
        let mut list = playlist(&["a.wav", "b.wav"]);
        assert_eq!(list.next(), Some("a.wav"));
        assert_eq!(list.next(), Some("b.wav"));
        assert_eq!(list.next(), None);
        assert_eq!(list.next(), None);
    }

    #[test]
    fn test_rewind_restarts_from_beginning() {
        let mut list = playlist(&["a.wav", "b.wav"]);
        list.next();
        list.next();
        list.rewind();
        assert_eq!(list.next(), Some("a.wav"));
    }

    #[test]
    fn test_empty_playlist() {
        let mut list = playlist(&[]);
        assert!(list.is_empty());
        assert_eq!(list.next(), None);
    }
}
