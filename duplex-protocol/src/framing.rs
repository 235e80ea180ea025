//! Message framing filter for the SPI receive stream.

/// Maximum number of bytes moved per channel operation or SPI transaction
pub const CHUNK_SIZE: usize = 128;

/// Byte clocked out on SPI when nothing is pending
pub const IDLE_FILLER: u8 = 0x00;

/// Byte marking the end of a message
pub const TERMINATOR: u8 = 0x00;

/// Fill `buf` with idle filler
pub fn fill_idle(buf: &mut [u8]) {
    buf.fill(IDLE_FILLER);
}

/// Reconstructs messages out of a continuous SPI receive stream
///
/// The only state is whether a message is in progress, so a message may
/// span any number of transactions.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageFramer {
    inside_message: bool,
}

impl MessageFramer {
    /// Create a framer positioned between messages
    pub const fn new() -> Self {
        Self {
            inside_message: false,
        }
    }

    /// True while a message has started but its terminator has not arrived
    pub fn inside_message(&self) -> bool {
        self.inside_message
    }

    /// Feed one received byte
    ///
    /// Returns the byte to forward, or `None` for idle filler.
    pub fn feed(&mut self, byte: u8) -> Option<u8> {
        if byte != TERMINATOR {
            self.inside_message = true;
            Some(byte)
        } else if self.inside_message {
            self.inside_message = false;
            Some(TERMINATOR)
        } else {
            None
        }
    }

    /// Feed a received chunk, writing forwarded bytes to `out`
    ///
    /// Returns the number of bytes written. Output never exceeds the input
    /// length; if `out` is shorter than that, forwarded bytes past its end
    /// are discarded.
    pub fn feed_slice(&mut self, input: &[u8], out: &mut [u8]) -> usize {
        let mut written = 0;
        for &byte in input {
            if let Some(forward) = self.feed(byte) {
                if let Some(slot) = out.get_mut(written) {
                    *slot = forward;
                    written += 1;
                }
            }
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::vec::Vec;

    fn run_chunks(framer: &mut MessageFramer, chunks: &[&[u8]]) -> Vec<u8> {
        let mut forwarded = Vec::new();
        let mut out = [0u8; CHUNK_SIZE];
        for chunk in chunks {
            let n = framer.feed_slice(chunk, &mut out);
            forwarded.extend_from_slice(&out[..n]);
        }
        forwarded
    }

    #[test]
    fn test_idle_stream_forwards_nothing() {
        let mut framer = MessageFramer::new();
        let idle = [IDLE_FILLER; CHUNK_SIZE];
        assert!(run_chunks(&mut framer, &[&idle, &idle]).is_empty());
        assert!(!framer.inside_message());
    }

    #[test]
    fn test_hello_between_idle_runs() {
        let mut framer = MessageFramer::new();
        let mut chunk = [0u8; CHUNK_SIZE];
        chunk[40..46].copy_from_slice(b"HELLO\0");

        let forwarded = run_chunks(&mut framer, &[&[0u8; CHUNK_SIZE], &chunk, &[0u8; 7]]);
        assert_eq!(forwarded, [72, 69, 76, 76, 79, 0]);
        assert!(!framer.inside_message());
    }

    #[test]
    fn test_message_spanning_chunk_boundary() {
        let mut stream = [0u8; 2 * CHUNK_SIZE];
        for byte in &mut stream[..130] {
            *byte = 0x5A;
        }
        // stream[130] is the terminator, the rest is idle
        let (first, second) = stream.split_at(CHUNK_SIZE);

        let mut framer = MessageFramer::new();
        let forwarded = run_chunks(&mut framer, &[first]);
        assert_eq!(forwarded.len(), CHUNK_SIZE);
        assert!(framer.inside_message());

        let rest = run_chunks(&mut framer, &[second]);
        assert_eq!(rest, [0x5A, 0x5A, TERMINATOR]);
        assert!(!framer.inside_message());
    }

    #[test]
    fn test_single_terminator_after_message() {
        let mut framer = MessageFramer::new();
        assert_eq!(framer.feed(b'A'), Some(b'A'));
        assert_eq!(framer.feed(0), Some(TERMINATOR));
        assert_eq!(framer.feed(0), None);
        assert_eq!(framer.feed(0), None);
    }

    #[test]
    fn test_feed_slice_truncates_to_output() {
        let mut framer = MessageFramer::new();
        let mut out = [0u8; 2];
        assert_eq!(framer.feed_slice(b"abc\0", &mut out), 2);
        assert_eq!(&out, b"ab");
        assert!(!framer.inside_message());
    }

    #[test]
    fn test_fill_idle() {
        let mut buf = [0xFFu8; 16];
        fill_idle(&mut buf);
        assert!(buf.iter().all(|&b| b == IDLE_FILLER));
    }

    proptest! {
        #[test]
        fn prop_message_survives_any_split(
            message in proptest::collection::vec(1u8..=255, 1..400),
            lead in 0usize..300,
            trail in 0usize..300,
            split in 1usize..=CHUNK_SIZE,
        ) {
            let mut stream = Vec::new();
            stream.resize(lead, IDLE_FILLER);
            stream.extend_from_slice(&message);
            stream.push(TERMINATOR);
            stream.resize(stream.len() + trail, IDLE_FILLER);

            let mut framer = MessageFramer::new();
            let chunks: Vec<&[u8]> = stream.chunks(split).collect();
            let forwarded = run_chunks(&mut framer, &chunks);

            let mut expected = message.clone();
            expected.push(TERMINATOR);
            prop_assert_eq!(forwarded, expected);
            prop_assert!(!framer.inside_message());
        }

        #[test]
        fn prop_output_never_has_idle_filler(stream in proptest::collection::vec(any::<u8>(), 0..600)) {
            let mut framer = MessageFramer::new();
            let chunks: Vec<&[u8]> = stream.chunks(CHUNK_SIZE).collect();
            let forwarded = run_chunks(&mut framer, &chunks);

            prop_assert_ne!(forwarded.first(), Some(&TERMINATOR));
            prop_assert!(forwarded.windows(2).all(|w| w[0] != 0 || w[1] != 0));
            let payload = stream.iter().filter(|&&b| b != 0).count();
            prop_assert_eq!(forwarded.iter().filter(|&&b| b != 0).count(), payload);
        }
    }
}
