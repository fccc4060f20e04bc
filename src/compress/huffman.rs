//! Huffman coding (BIOS type 0x24 for 4-bit symbols, 0x28 for 8-bit).
//
//  After the header comes the node table. Its first byte is the table size
//  in halfwords minus one; the root node follows. Node bytes:
//
//      bits 0-5  offset; children live at (addr & !1) + offset * 2 + 2
//      bit 6     child 1 is a data byte
//      bit 7     child 0 is a data byte
//
//  Then the bitstream, in little-endian u32 words read from bit 31 down.
//  In 4-bit mode the low nibble of each byte is coded first.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::io;

use super::{header, pad4};

const MAX_OFFSET: usize = 0x3f;

#[derive(Debug, Clone, Copy)]
enum Node {
    Leaf(u8),
    Pair(usize, usize),
}

pub fn compress(input: &[u8], bits: u8) -> io::Result<Vec<u8>> {
    let symbols = split_symbols(input, bits)?;
    let mut out = header(0x20 | bits, input.len())?;

    let (nodes, root) = build_tree(&symbols, 1usize << bits);
    out.extend(layout_table(&nodes, root)?);

    let codes = assign_codes(&nodes, root, 1usize << bits);
    let mut word: u32 = 0;
    let mut filled = 0;
    for &sym in &symbols {
        for &bit in &codes[sym as usize] {
            word = (word << 1) | bit as u32;
            filled += 1;
            if filled == 32 {
                out.extend_from_slice(&word.to_le_bytes());
                word = 0;
                filled = 0;
            }
        }
    }
    if filled > 0 {
        word <<= 32 - filled;
        out.extend_from_slice(&word.to_le_bytes());
    }

    Ok(out)
}

fn split_symbols(input: &[u8], bits: u8) -> io::Result<Vec<u8>> {
    match bits {
        8 => Ok(input.to_vec()),
        4 => Ok(input.iter().flat_map(|b| [b & 0x0f, b >> 4]).collect()),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unsupported huffman symbol size {bits}"),
        )),
    }
}

/// Classic bottom-up construction. Ties break on node id so output is
/// deterministic. The tree always has at least two leaves.
fn build_tree(symbols: &[u8], alphabet: usize) -> (Vec<Node>, usize) {
    let mut freq = vec![0u32; alphabet];
    for &s in symbols {
        freq[s as usize] += 1;
    }
    // Pad with unused symbols so the root is a pair.
    let mut used = freq.iter().filter(|&&f| f > 0).count();
    for f in freq.iter_mut() {
        if used >= 2 {
            break;
        }
        if *f == 0 {
            *f = 1;
            used += 1;
        }
    }

    let mut nodes = Vec::new();
    let mut heap = BinaryHeap::new();
    for (sym, &f) in freq.iter().enumerate() {
        if f > 0 {
            heap.push(Reverse((f as u64, nodes.len())));
            nodes.push(Node::Leaf(sym as u8));
        }
    }

    while heap.len() > 1 {
        let (Some(Reverse((wa, a))), Some(Reverse((wb, b)))) = (heap.pop(), heap.pop()) else {
            break;
        };
        heap.push(Reverse((wa + wb, nodes.len())));
        nodes.push(Node::Pair(a, b));
    }

    let root = nodes.len() - 1;
    (nodes, root)
}

/// Node table, including the leading size byte.
///
/// Child pairs are handed out one halfword at a time. The most recently
/// placed node is expanded first, which keeps the pending list about as
/// long as the tree is deep. When a pending node would otherwise miss its
/// 63-halfword window, the oldest one is expanded instead.
fn layout_table(nodes: &[Node], root: usize) -> io::Result<Vec<u8>> {
    let mut table = vec![0u8, 0u8];
    // (byte address of the node, node id); oldest first.
    let mut pending = VecDeque::from([(1usize, root)]);

    while !pending.is_empty() {
        let next = table.len() / 2;
        let urgent = pending
            .iter()
            .enumerate()
            .take(pending.len() - 1)
            .any(|(i, &(slot, _))| slot / 2 + MAX_OFFSET + 1 <= next + i);
        let Some((slot, id)) = (if urgent {
            pending.pop_front()
        } else {
            pending.pop_back()
        }) else {
            break;
        };
        let Node::Pair(left, right) = nodes[id] else {
            continue;
        };

        let offset = next - slot / 2 - 1;
        if offset > MAX_OFFSET {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "huffman tree too deep for the BIOS node table",
            ));
        }

        let mut byte = offset as u8;
        for (flag, child) in [(0x80u8, left), (0x40u8, right)] {
            match nodes[child] {
                Node::Leaf(sym) => {
                    byte |= flag;
                    table.push(sym);
                }
                Node::Pair(..) => {
                    pending.push_back((table.len(), child));
                    table.push(0);
                }
            }
        }
        table[slot] = byte;
    }

    pad4(&mut table);
    table[0] = (table.len() / 2 - 1) as u8;
    Ok(table)
}

fn assign_codes(nodes: &[Node], root: usize, alphabet: usize) -> Vec<Vec<bool>> {
    let mut codes = vec![Vec::new(); alphabet];
    let mut stack = vec![(root, Vec::new())];

    while let Some((id, code)) = stack.pop() {
        match nodes[id] {
            Node::Leaf(sym) => codes[sym as usize] = code,
            Node::Pair(left, right) => {
                let mut zero = code.clone();
                zero.push(false);
                let mut one = code;
                one.push(true);
                stack.push((left, zero));
                stack.push((right, one));
            }
        }
    }
    codes
}

#[cfg(test)]
pub(crate) fn decompress(data: &[u8]) -> Vec<u8> {
    let bits = data[0] & 0x0f;
    let size = u32::from_le_bytes([data[1], data[2], data[3], 0]) as usize;
    let needed = if bits == 4 { size * 2 } else { size };
    let stream = 4 + (data[4] as usize + 1) * 2;

    let mut symbols = Vec::with_capacity(needed);
    let mut node = 5;
    let mut word_at = stream;
    'words: while symbols.len() < needed {
        let word = u32::from_le_bytes([
            data[word_at],
            data[word_at + 1],
            data[word_at + 2],
            data[word_at + 3],
        ]);
        word_at += 4;
        for shift in (0..32).rev() {
            let bit = ((word >> shift) & 1) as usize;
            let value = data[node];
            let next = (node & !1) + (value & 0x3f) as usize * 2 + 2 + bit;
            let leaf = value & (0x80 >> bit) != 0;
            if leaf {
                symbols.push(data[next]);
                node = 5;
                if symbols.len() == needed {
                    break 'words;
                }
            } else {
                node = next;
            }
        }
    }

    if bits == 4 {
        symbols.chunks(2).map(|p| p[0] | (p[1] << 4)).collect()
    } else {
        symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_alignment() {
        let out = compress(b"aab", 8).unwrap();
        assert_eq!(&out[..4], &[0x28, 3, 0, 0]);
        let stream = 4 + (out[4] as usize + 1) * 2;
        assert_eq!(stream % 4, 0);
        assert_eq!(out.len() % 4, 0);
        assert_eq!(decompress(&out), b"aab");
    }

    #[test]
    fn single_symbol_input_still_has_a_pair_root() {
        let input = [5u8; 33];
        for bits in [4, 8] {
            let out = compress(&input, bits).unwrap();
            assert_eq!(out[0], 0x20 | bits);
            assert_eq!(decompress(&out), input);
        }
    }

    #[test]
    fn empty_input() {
        let out = compress(&[], 8).unwrap();
        assert_eq!(&out[..4], &[0x28, 0, 0, 0]);
        assert_eq!(decompress(&out), Vec::<u8>::new());
    }

    #[test]
    fn nibble_mode_round_trip() {
        let input: Vec<u8> = (0..200u32).map(|i| (i * 37 % 251) as u8).collect();
        let out = compress(&input, 4).unwrap();
        assert_eq!(out[0], 0x24);
        assert_eq!(decompress(&out), input);
    }

    #[test]
    fn typical_tile_map_round_trip() {
        let mut input = Vec::new();
        for i in 0..1024u16 {
            let entry: u16 = match i % 9 {
                0 => 3,
                1 | 2 => 0x0400 | 7,
                _ => 16,
            };
            input.extend_from_slice(&entry.to_le_bytes());
        }
        let out = compress(&input, 8).unwrap();
        assert!(out.len() < input.len());
        assert_eq!(decompress(&out), input);
    }

    #[test]
    fn every_byte_value_round_trips() {
        let input: Vec<u8> = (0..1024u32).map(|i| (i % 256) as u8).collect();
        let out = compress(&input, 8).unwrap();
        assert_eq!(out[4], 0xff);
        assert_eq!(decompress(&out), input);

        // Skewed frequencies give a deep, lopsided tree.
        let mut skewed = Vec::new();
        for sym in 0..=255u8 {
            skewed.extend(std::iter::repeat_n(sym, 1 + (sym as usize % 17) * (sym as usize % 5)));
        }
        let out = compress(&skewed, 8).unwrap();
        assert_eq!(decompress(&out), skewed);
    }

    #[test]
    fn wide_text_layer_round_trips() {
        let mut input = Vec::new();
        for i in 0..1024u16 {
            input.extend_from_slice(&(i % 300).to_le_bytes());
        }
        for bits in [4, 8] {
            let out = compress(&input, bits).unwrap();
            assert_eq!(decompress(&out), input);
        }
    }

    #[test]
    fn unsupported_symbol_size() {
        assert!(compress(b"x", 2).is_err());
    }
}
