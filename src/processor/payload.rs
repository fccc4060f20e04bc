//! Turns a layer's declared `data` into a flat, row-major list of raw GIDs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::read::{GzDecoder, ZlibDecoder};
use std::io::Read;

use crate::error::DecodeError;
use crate::model::{Compression, Encoding, LayerData, Payload};

/// Decode `data` into exactly `cells` raw GIDs.
pub fn decode_payload(data: &LayerData, cells: usize) -> Result<Vec<u32>, DecodeError> {
    match &data.payload {
        Payload::Elements(ids) => decode_inline(ids, cells),
        Payload::Text(text) => match data.encoding {
            Encoding::Base64 => decode_base64(text, data.compression, cells),
            // Inline ids that reached us as text are a plain id list, same as csv.
            Encoding::Csv | Encoding::Inline => decode_csv(text, cells),
        },
    }
}

fn check_len(expected: usize, actual: usize) -> Result<(), DecodeError> {
    if expected != actual {
        return Err(DecodeError::InvalidLength { expected, actual });
    }
    Ok(())
}

fn decode_inline(ids: &[u32], cells: usize) -> Result<Vec<u32>, DecodeError> {
    check_len(cells, ids.len())?;
    Ok(ids.to_vec())
}

fn decode_csv(text: &str, cells: usize) -> Result<Vec<u32>, DecodeError> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();

    let ids = cleaned
        .split(',')
        .map(|tok| {
            tok.parse::<u32>()
                .map_err(|_| DecodeError::MalformedInteger(tok.to_string()))
        })
        .collect::<Result<Vec<u32>, _>>()?;

    check_len(cells, ids.len())?;
    Ok(ids)
}

fn decode_base64(
    text: &str,
    compression: Compression,
    cells: usize,
) -> Result<Vec<u32>, DecodeError> {
    let raw = STANDARD.decode(text.trim())?;

    let bytes = match compression {
        Compression::None => raw,
        Compression::Gzip => read_all(GzDecoder::new(raw.as_slice()))?,
        Compression::Zlib => read_all(ZlibDecoder::new(raw.as_slice()))?,
    };
    tracing::trace!(?compression, len = bytes.len(), "decoded base64 payload");

    let expected = cells.checked_mul(4).ok_or(DecodeError::InvalidLength {
        expected: cells,
        actual: bytes.len() / 4,
    })?;
    check_len(expected, bytes.len())?;

    Ok(bytes
        .chunks_exact(4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

fn read_all<R: Read>(mut r: R) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::new();
    r.read_to_end(&mut out)?;
    Ok(out)
}
