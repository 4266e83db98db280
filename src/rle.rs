//! Binary-safe run-length coding with an escape sentinel.
//!
//! - Run of `MIN_RUN..=255` identical bytes: `[ESCAPE][count][byte]`
//! - Literal `ESCAPE` byte: `[ESCAPE][0x00]`
//! - Any other byte: passed through unchanged

use tracing::debug;

use crate::error::{Corruption, Decoded};

/// Sentinel that introduces a run record or an escaped literal
pub const ESCAPE: u8 = 0xFF;

/// Shortest run encoded as a run record
pub const MIN_RUN: usize = 4;

/// Longest run one record can hold (the count is one byte)
pub const MAX_RUN: usize = 255;

/// Length of the run of identical bytes starting at `pos`, capped at [`MAX_RUN`]
fn run_length(data: &[u8], pos: usize) -> usize {
    let byte = data[pos];
    data[pos..].iter().take(MAX_RUN).take_while(|&&b| b == byte).count()
}

pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / 8);
    let mut pos = 0;
    let mut runs = 0usize;

    while pos < data.len() {
        let byte = data[pos];
        let run = run_length(data, pos);

        if run >= MIN_RUN {
            out.extend_from_slice(&[ESCAPE, run as u8, byte]);
            runs += 1;
            pos += run;
        } else {
            if byte == ESCAPE {
                out.extend_from_slice(&[ESCAPE, 0x00]);
            } else {
                out.push(byte);
            }
            pos += 1;
        }
    }

    debug!(input_bytes = data.len(), output_bytes = out.len(), runs, "RLE encoded");
    out
}

/// Expand an escaped stream, stopping at a dangling escape sequence
pub fn decode(data: &[u8]) -> Decoded {
    let mut out = Vec::with_capacity(data.len() * 2);
    let mut pos = 0;

    while pos < data.len() {
        // Everything up to the next escape is literal
        let literal_end = memchr::memchr(ESCAPE, &data[pos..]).map_or(data.len(), |i| pos + i);
        out.extend_from_slice(&data[pos..literal_end]);
        pos = literal_end;
        if pos == data.len() {
            break;
        }

        let Some(&count) = data.get(pos + 1) else {
            return Decoded::partial(out, Corruption::DanglingEscape { offset: pos });
        };
        if count == 0 {
            out.push(ESCAPE);
            pos += 2;
            continue;
        }
        let Some(&value) = data.get(pos + 2) else {
            return Decoded::partial(out, Corruption::MissingRunValue { offset: pos });
        };
        out.resize(out.len() + count as usize, value);
        pos += 3;
    }

    Decoded::complete(out)
}
