/// Incremental UTF-8 decoder. Raw byte chunks can be cut anywhere, including
/// in the middle of a multi-byte sequence; the decoder buffers the incomplete
/// tail between [`feed`] calls so the parser only ever sees whole characters.
///
/// Invalid sequences decode to U+FFFD instead of failing, like a lossy
/// conversion would.
///
/// [`feed`]: Utf8Decoder::feed
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: [u8; 4],
    pending_len: usize,
}

#[inline]
fn sequence_len(first: u8) -> usize {
    if first < 0x80 {
        1
    } else if first & 0xE0 == 0xC0 {
        2
    } else if first & 0xF0 == 0xE0 {
        3
    } else {
        4
    }
}

#[inline]
fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

impl Utf8Decoder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if bytes of an unfinished multi-byte character are buffered.
    #[inline]
    pub fn has_pending(&self) -> bool {
        self.pending_len > 0
    }

    /// Decodes `bytes` and appends the decoded text to `out`. A trailing
    /// incomplete sequence is kept back until the next call.
    pub fn feed(&mut self, mut bytes: &[u8], out: &mut String) {
        if self.pending_len > 0 {
            let want = sequence_len(self.pending[0]);

            while self.pending_len < want && !bytes.is_empty() {
                let byte = bytes[0];
                if !is_continuation(byte) {
                    out.push(char::REPLACEMENT_CHARACTER);
                    self.pending_len = 0;
                    break;
                }
                self.pending[self.pending_len] = byte;
                self.pending_len += 1;
                bytes = &bytes[1..];
            }

            if self.pending_len == want {
                match std::str::from_utf8(&self.pending[..want]) {
                    Ok(text) => out.push_str(text),
                    Err(_) => out.push(char::REPLACEMENT_CHARACTER),
                }
                self.pending_len = 0;
            } else if self.pending_len > 0 {
                // chunk exhausted, sequence still incomplete
                return;
            }
        }

        loop {
            match std::str::from_utf8(bytes) {
                Ok(text) => {
                    out.push_str(text);
                    return;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    out.push_str(unsafe { std::str::from_utf8_unchecked(&bytes[..valid]) });

                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            bytes = &bytes[valid + len..];
                        }
                        None => {
                            let tail = &bytes[valid..];
                            self.pending[..tail.len()].copy_from_slice(tail);
                            self.pending_len = tail.len();
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Flushes the decoder at end of stream. A buffered incomplete sequence
    /// becomes a single U+FFFD.
    pub fn finish(&mut self, out: &mut String) {
        if self.pending_len > 0 {
            out.push(char::REPLACEMENT_CHARACTER);
            self.pending_len = 0;
        }
    }
}
