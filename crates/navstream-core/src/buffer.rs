//! Growable scan buffer owned by the engine.
//!
//! Explicit owned buffer with append/compaction and no aliasing of caller
//! memory: every append copies, every cut slices into a fresh `Vec`.

/// Owned, growable byte buffer with prefix compaction.
#[derive(Debug, Default)]
pub struct ScanBuffer {
    data: Vec<u8>,
}

impl ScanBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `bytes` onto the end of the buffer.
    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Drop the first `n` bytes, keeping the unconsumed suffix.
    pub fn consume_prefix(&mut self, n: usize) {
        let n = n.min(self.data.len());
        self.data.drain(..n);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Discard everything unconditionally.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Take the whole contents, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::ScanBuffer;

    #[test]
    fn append_then_consume_prefix_keeps_suffix() {
        let mut buf = ScanBuffer::new();
        buf.append(b"abcdef");
        buf.consume_prefix(4);
        assert_eq!(buf.as_slice(), b"ef");
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn consume_past_end_empties_buffer() {
        let mut buf = ScanBuffer::new();
        buf.append(b"ab");
        buf.consume_prefix(10);
        assert!(buf.is_empty());
    }

    #[test]
    fn take_leaves_buffer_empty() {
        let mut buf = ScanBuffer::new();
        buf.append(b"xyz");
        assert_eq!(buf.take(), b"xyz".to_vec());
        assert!(buf.is_empty());
    }
}
