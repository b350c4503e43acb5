// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Incremental lossy UTF-8 decoding for the reader tasks.
//!
//! Pty reads slice the child's output at arbitrary byte boundaries, so a
//! multi-byte code point can straddle two reads. [`Utf8StreamDecoder`]
//! carries the incomplete tail across calls; genuinely invalid bytes become
//! U+FFFD.

#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    carry: Vec<u8>,
}

impl Utf8StreamDecoder {
    #[must_use]
    pub fn new() -> Self { Utf8StreamDecoder::default() }

    /// Decode `input`, prepending any carried bytes from the previous call.
    pub fn decode(&mut self, input: &[u8]) -> String {
        let owned;
        let data: &[u8] = if self.carry.is_empty() {
            input
        } else {
            let mut joined = std::mem::take(&mut self.carry);
            joined.extend_from_slice(input);
            owned = joined;
            &owned
        };

        let mut out = String::with_capacity(data.len());
        let mut rest = data;
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(error) => {
                    let (valid, tail) = rest.split_at(error.valid_up_to());
                    if let Ok(valid) = std::str::from_utf8(valid) {
                        out.push_str(valid);
                    }
                    match error.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &tail[bad..];
                        }
                        None => {
                            // Incomplete sequence at the end: keep it for
                            // the next read.
                            self.carry = tail.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush a dangling incomplete sequence as U+FFFD (stream ended
    /// mid-code-point).
    pub fn finish(&mut self) -> String {
        if self.carry.is_empty() {
            String::new()
        } else {
            self.carry.clear();
            char::REPLACEMENT_CHARACTER.to_string()
        }
    }
}
