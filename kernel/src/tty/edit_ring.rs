//! Console input ring
//!
//! A fixed 128-byte circular buffer addressed by three free-running counters:
//!
//! - `r`: next byte a reader will take
//! - `w`: end of the last committed line
//! - `e`: current edit position
//!
//! The counters only ever grow (with `u32` wraparound) and are reduced modulo
//! the capacity to address storage. They are compared as counters, never as
//! indices, so `r == w` means "nothing committed to read", `e == w` means "the
//! current line is empty" and `e - r == INPUT_BUF` means "full".

use crate::config::INPUT_BUF;

const CAP: u32 = INPUT_BUF as u32;

pub struct EditRing {
    buf: [u8; INPUT_BUF],
    r: u32,
    w: u32,
    e: u32,
}

impl EditRing {
    pub const fn new() -> Self {
        Self {
            buf: [0; INPUT_BUF],
            r: 0,
            w: 0,
            e: 0,
        }
    }

    /// Ring positioned at an arbitrary counter value, for wraparound tests.
    #[cfg(test)]
    pub(crate) const fn starting_at(start: u32) -> Self {
        Self {
            buf: [0; INPUT_BUF],
            r: start,
            w: start,
            e: start,
        }
    }

    #[inline]
    fn slot(counter: u32) -> usize {
        (counter % CAP) as usize
    }

    /// True when no further byte can be appended without overwriting unread data.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.e.wrapping_sub(self.r) >= CAP
    }

    /// True when a committed, unread byte is available.
    #[inline]
    pub fn has_committed(&self) -> bool {
        self.r != self.w
    }

    /// Length of the line being edited (between `w` and `e`).
    #[inline]
    pub fn edit_len(&self) -> usize {
        self.e.wrapping_sub(self.w) as usize
    }

    /// Append a byte at the edit cursor. Returns false, leaving the ring
    /// untouched, when the ring is full.
    pub fn push(&mut self, c: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.buf[Self::slot(self.e)] = c;
        self.e = self.e.wrapping_add(1);
        true
    }

    /// Remove the last uncommitted byte. Returns false on an empty line.
    pub fn pop(&mut self) -> bool {
        if self.e == self.w {
            return false;
        }
        self.e = self.e.wrapping_sub(1);
        true
    }

    /// Seal everything up to the edit cursor as a committed line.
    pub fn commit(&mut self) {
        self.w = self.e;
    }

    /// Copy the uncommitted line into `dst`, returning the number of bytes
    /// copied.
    pub fn copy_line(&self, dst: &mut [u8]) -> usize {
        let len = self.edit_len().min(dst.len());
        for (i, slot) in dst.iter_mut().take(len).enumerate() {
            *slot = self.buf[Self::slot(self.w.wrapping_add(i as u32))];
        }
        len
    }

    /// Take the next committed byte, advancing the read cursor.
    pub fn take(&mut self) -> Option<u8> {
        if !self.has_committed() {
            return None;
        }
        let c = self.buf[Self::slot(self.r)];
        self.r = self.r.wrapping_add(1);
        Some(c)
    }

    /// Step the read cursor back over the byte just taken.
    pub fn untake(&mut self) {
        self.r = self.r.wrapping_sub(1);
    }

    pub fn read_pos(&self) -> u32 {
        self.r
    }

    pub fn committed_pos(&self) -> u32 {
        self.w
    }

    pub fn edit_pos(&self) -> u32 {
        self.e
    }
}

impl Default for EditRing {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ring() {
        let ring = EditRing::new();
        assert!(!ring.has_committed());
        assert!(!ring.is_full());
        assert_eq!(ring.edit_len(), 0);
    }

    #[test]
    fn test_uncommitted_bytes_are_not_readable() {
        let mut ring = EditRing::new();
        ring.push(b'a');
        assert_eq!(ring.take(), None);
        ring.commit();
        assert_eq!(ring.take(), Some(b'a'));
        assert_eq!(ring.take(), None);
    }

    #[test]
    fn test_full_rejects_push() {
        let mut ring = EditRing::new();
        for i in 0..INPUT_BUF {
            assert!(ring.push(i as u8));
        }
        assert!(ring.is_full());
        assert!(!ring.push(b'x'));
        assert_eq!(ring.edit_pos(), INPUT_BUF as u32);
    }

    #[test]
    fn test_pop_stops_at_commit_boundary() {
        let mut ring = EditRing::new();
        ring.push(b'a');
        ring.commit();
        ring.push(b'b');
        assert!(ring.pop());
        assert!(!ring.pop());
        assert_eq!(ring.edit_pos(), ring.committed_pos());
    }

    #[test]
    fn test_wraparound_counters() {
        let mut ring = EditRing::starting_at(u32::MAX - 2);
        for c in b"hello" {
            assert!(ring.push(*c));
        }
        assert_eq!(ring.edit_len(), 5);
        ring.commit();

        let mut out = [0u8; 5];
        for slot in out.iter_mut() {
            *slot = ring.take().unwrap();
        }
        assert_eq!(&out, b"hello");
        assert_eq!(ring.read_pos(), 2);
    }

    #[test]
    fn test_full_across_wraparound() {
        let mut ring = EditRing::starting_at(u32::MAX - 10);
        for _ in 0..INPUT_BUF {
            assert!(ring.push(b'z'));
        }
        assert!(ring.is_full());
        assert!(!ring.push(b'z'));
        assert_eq!(ring.edit_pos().wrapping_sub(ring.read_pos()), INPUT_BUF as u32);
    }

    #[test]
    fn test_copy_line() {
        let mut ring = EditRing::new();
        for c in b"one\n" {
            ring.push(*c);
        }
        ring.commit();
        for c in b"two" {
            ring.push(*c);
        }
        let mut line = [0u8; INPUT_BUF];
        let n = ring.copy_line(&mut line);
        assert_eq!(&line[..n], b"two");
    }

    #[test]
    fn test_untake() {
        let mut ring = EditRing::new();
        ring.push(b'q');
        ring.commit();
        assert_eq!(ring.take(), Some(b'q'));
        ring.untake();
        assert_eq!(ring.take(), Some(b'q'));
    }
}
