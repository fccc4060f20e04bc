//! LZ77 (BIOS type 0x10).
//
//  Blocks come in groups of eight behind one flag byte, MSB first.
//  Flag 0 = literal byte, flag 1 = back reference:
//
//      byte 0: (len - 3) << 4 | (disp - 1) >> 8
//      byte 1: (disp - 1) & 0xff
//
//  Displacements start at 2 so the VRAM-safe BIOS routine, which writes
//  halfwords, never reads a byte it has not stored yet.

use std::io;

use super::{header, pad4};

pub const TYPE: u8 = 0x10;

const MIN_LEN: usize = 3;
const MAX_LEN: usize = 18;
const MIN_DISP: usize = 2;
const MAX_DISP: usize = 4096;

pub fn compress(input: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = header(TYPE, input.len())?;
    let mut pos = 0;

    while pos < input.len() {
        let flag_at = out.len();
        out.push(0);

        for bit in 0..8 {
            if pos >= input.len() {
                break;
            }
            match longest_match(input, pos) {
                Some((len, disp)) => {
                    out[flag_at] |= 0x80 >> bit;
                    out.push((((len - MIN_LEN) << 4) | ((disp - 1) >> 8)) as u8);
                    out.push(((disp - 1) & 0xff) as u8);
                    pos += len;
                }
                None => {
                    out.push(input[pos]);
                    pos += 1;
                }
            }
        }
    }

    pad4(&mut out);
    Ok(out)
}

/// Longest earlier occurrence of the bytes at `pos`, as `(len, disp)`.
fn longest_match(input: &[u8], pos: usize) -> Option<(usize, usize)> {
    let max_len = MAX_LEN.min(input.len() - pos);
    if max_len < MIN_LEN {
        return None;
    }

    let mut best = (0, 0);
    for disp in MIN_DISP..=MAX_DISP.min(pos) {
        let start = pos - disp;
        let len = (0..max_len)
            .take_while(|&i| input[start + i] == input[pos + i])
            .count();
        if len > best.0 {
            best = (len, disp);
            if len == max_len {
                break;
            }
        }
    }

    (best.0 >= MIN_LEN).then_some(best)
}

#[cfg(test)]
pub(crate) fn decompress(data: &[u8]) -> Vec<u8> {
    assert_eq!(data[0], TYPE);
    let size = u32::from_le_bytes([data[1], data[2], data[3], 0]) as usize;
    let mut out = Vec::with_capacity(size);
    let mut i = 4;

    while out.len() < size {
        let flags = data[i];
        i += 1;
        for bit in 0..8 {
            if out.len() >= size {
                break;
            }
            if flags & (0x80 >> bit) != 0 {
                let len = (data[i] >> 4) as usize + MIN_LEN;
                let disp = (((data[i] & 0x0f) as usize) << 8 | data[i + 1] as usize) + 1;
                i += 2;
                for _ in 0..len {
                    out.push(out[out.len() - disp]);
                }
            } else {
                out.push(data[i]);
                i += 1;
            }
        }
    }
    out
}
