//! The file format (version 1):
//!
//! ```text
//! magic:        4 bytes  = "KVDB"
//! version:      2 bytes  big-endian u16 = 1
//! flags:        2 bytes  bit 0 = compressed
//! payload_len:  8 bytes  big-endian u64
//! payload:      payload_len bytes
//! ```
//!
//! `payload` is `body` passed through the configured [`Compression`]
//! adapter. `body` is:
//!
//! ```text
//! entry_count:  8 bytes big-endian u64
//! repeat entry_count times:
//!     key_len:    4 bytes big-endian u32
//!     key:        key_len bytes
//!     value_len:  4 bytes big-endian u32
//!     value:      value_len bytes
//! ```
//!
//! Entries are written in forward comparator order. On load, they are
//! re-inserted in that order into an [`OrderedMap`] under the *current*
//! comparator — if it disagrees with the file's original ordering, the map
//! still reaches a correct steady state (inserts reorder as needed), just
//! not the efficient one a matching comparator would give.

use ordkv_core::{Compression, Error, Result, SharedComparator};
use ordkv_storage::OrderedMap;

const MAGIC: &[u8; 4] = b"KVDB";
const FORMAT_VERSION: u16 = 1;
const HEADER_LEN: usize = 4 + 2 + 2 + 8;
const FLAG_COMPRESSED: u16 = 0x1;

/// Serialize `map` into a complete file image: header + compressed payload.
pub fn encode_file(map: &OrderedMap, compression: &dyn Compression) -> Vec<u8> {
    let body = encode_body(map);
    let payload = compression.compress(&body);

    let flags = if compression.is_identity() {
        0
    } else {
        FLAG_COMPRESSED
    };

    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_be_bytes());
    buf.extend_from_slice(&flags.to_be_bytes());
    buf.extend_from_slice(&(payload.len() as u64).to_be_bytes());
    buf.extend_from_slice(&payload);
    buf
}

/// Parse a complete file image back into an [`OrderedMap`] ordered by
/// `comparator`.
///
/// Fails with [`Error::Format`] if the magic, version, flags, or length
/// fields are inconsistent (including a flags/adapter mismatch), and with
/// [`Error::Decompression`] if `compression` rejects the payload.
pub fn decode_file(
    bytes: &[u8],
    comparator: SharedComparator,
    compression: &dyn Compression,
) -> Result<OrderedMap> {
    if bytes.len() < HEADER_LEN {
        return Err(Error::Format(format!(
            "file too short for header: {} bytes, need at least {HEADER_LEN}",
            bytes.len()
        )));
    }

    let magic = &bytes[0..4];
    if magic != MAGIC {
        return Err(Error::Format(format!("bad magic bytes: {magic:?}")));
    }

    let version = u16::from_be_bytes(bytes[4..6].try_into().unwrap());
    if version != FORMAT_VERSION {
        return Err(Error::Format(format!(
            "unsupported format version {version}, expected {FORMAT_VERSION}"
        )));
    }

    let flags = u16::from_be_bytes(bytes[6..8].try_into().unwrap());
    let file_is_compressed = flags & FLAG_COMPRESSED != 0;
    if file_is_compressed == compression.is_identity() {
        return Err(Error::Format(format!(
            "compression adapter mismatch: file flags indicate compressed={file_is_compressed}, \
             but the configured adapter reports identity={}",
            compression.is_identity()
        )));
    }

    let payload_len = u64::from_be_bytes(bytes[8..16].try_into().unwrap()) as usize;
    let payload = &bytes[HEADER_LEN..];
    if payload.len() != payload_len {
        return Err(Error::Format(format!(
            "payload length mismatch: header says {payload_len}, found {}",
            payload.len()
        )));
    }

    let body = if file_is_compressed {
        compression
            .decompress(payload)
            .map_err(|e| Error::Decompression(e.0))?
    } else {
        payload.to_vec()
    };

    decode_body(&body, comparator)
}

fn encode_body(map: &OrderedMap) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&(map.len() as u64).to_be_bytes());
    for (key, value) in map.iter_forward() {
        body.extend_from_slice(&(key.len() as u32).to_be_bytes());
        body.extend_from_slice(key);
        body.extend_from_slice(&(value.len() as u32).to_be_bytes());
        body.extend_from_slice(value);
    }
    body
}

fn decode_body(body: &[u8], comparator: SharedComparator) -> Result<OrderedMap> {
    if body.len() < 8 {
        return Err(Error::Format("body too short for entry count".into()));
    }
    let entry_count = u64::from_be_bytes(body[0..8].try_into().unwrap());

    let mut map = OrderedMap::new(comparator);
    let mut offset = 8usize;
    for i in 0..entry_count {
        let key_len = read_u32(body, offset, "key length", i)? as usize;
        offset += 4;
        let key = read_slice(body, offset, key_len, "key", i)?.to_vec();
        offset += key_len;

        let value_len = read_u32(body, offset, "value length", i)? as usize;
        offset += 4;
        let value = read_slice(body, offset, value_len, "value", i)?.to_vec();
        offset += value_len;

        map.insert(key, value);
    }
    Ok(map)
}

fn read_u32(body: &[u8], offset: usize, what: &str, entry: u64) -> Result<u32> {
    let slice = read_slice(body, offset, 4, what, entry)?;
    Ok(u32::from_be_bytes(slice.try_into().unwrap()))
}

fn read_slice<'a>(body: &'a [u8], offset: usize, len: usize, what: &str, entry: u64) -> Result<&'a [u8]> {
    body.get(offset..offset + len).ok_or_else(|| {
        Error::Format(format!(
            "truncated {what} for entry {entry} at offset {offset}"
        ))
    })
}
