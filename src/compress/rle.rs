//! Run-length encoding (BIOS type 0x30).
//
//  flag & 0x80 set:   run of (flag & 0x7f) + 3 copies of the next byte
//  flag & 0x80 clear: (flag & 0x7f) + 1 literal bytes follow

use std::io;

use super::{header, pad4};

pub const TYPE: u8 = 0x30;

const MIN_RUN: usize = 3;
const MAX_RUN: usize = 0x7f + MIN_RUN;
const MAX_LITERALS: usize = 0x80;

pub fn compress(input: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = header(TYPE, input.len())?;
    let mut literals = Vec::<u8>::with_capacity(MAX_LITERALS);
    let mut i = 0;

    while i < input.len() {
        let run = run_length(&input[i..]);
        if run >= MIN_RUN {
            flush_literals(&mut out, &mut literals);
            out.push(0x80 | (run - MIN_RUN) as u8);
            out.push(input[i]);
            i += run;
        } else {
            literals.push(input[i]);
            i += 1;
            if literals.len() == MAX_LITERALS {
                flush_literals(&mut out, &mut literals);
            }
        }
    }
    flush_literals(&mut out, &mut literals);

    pad4(&mut out);
    Ok(out)
}

fn run_length(data: &[u8]) -> usize {
    data.iter()
        .take(MAX_RUN)
        .take_while(|&&b| b == data[0])
        .count()
}

fn flush_literals(out: &mut Vec<u8>, literals: &mut Vec<u8>) {
    if literals.is_empty() {
        return;
    }
    out.push((literals.len() - 1) as u8);
    out.append(literals);
}

#[cfg(test)]
pub(crate) fn decompress(data: &[u8]) -> Vec<u8> {
    assert_eq!(data[0], TYPE);
    let size = u32::from_le_bytes([data[1], data[2], data[3], 0]) as usize;
    let mut out = Vec::with_capacity(size);
    let mut i = 4;

    while out.len() < size {
        let flag = data[i];
        i += 1;
        if flag & 0x80 != 0 {
            let n = (flag & 0x7f) as usize + MIN_RUN;
            out.extend(std::iter::repeat_n(data[i], n));
            i += 1;
        } else {
            let n = flag as usize + 1;
            out.extend_from_slice(&data[i..i + n]);
            i += n;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_runs_stay_literal() {
        let out = compress(&[1, 1, 2, 3]).unwrap();
        assert_eq!(out, vec![TYPE, 4, 0, 0, 3, 1, 1, 2, 3, 0, 0, 0]);
    }

    #[test]
    fn runs_and_literals_mix() {
        let input = [9, 9, 9, 9, 9, 1, 2];
        let out = compress(&input).unwrap();
        assert_eq!(&out[4..9], &[0x80 | 2, 9, 1, 1, 2]);
        assert_eq!(decompress(&out), input);
    }

    #[test]
    fn long_runs_split_at_130() {
        let input = [0u8; 300];
        let out = compress(&input).unwrap();
        assert_eq!(&out[4..10], &[0xff, 0, 0xff, 0, 0x80 | 37, 0]);
        assert_eq!(decompress(&out), input);
    }

    #[test]
    fn long_literal_stretch_splits_at_128() {
        let input: Vec<u8> = (0..=255).collect();
        let out = compress(&input).unwrap();
        assert_eq!(out[4], 0x7f);
        assert_eq!(out[4 + 129], 0x7f);
        assert_eq!(decompress(&out), input);
    }
}
