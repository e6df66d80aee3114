//! Compression adapter.
//!
//! All bytes written by the persistence codec pass through a
//! [`Compression`] implementation. This is the same seam the storage codec
//! plays in other Strata-lineage crates, narrowed to a single
//! compress/decompress pair since the store has no encryption-at-rest
//! requirement.

/// Symmetric transform applied to the serialized store body before it is
/// written to disk.
///
/// Implementations must satisfy `decompress(compress(b)) == b` for all `b`.
pub trait Compression: Send + Sync + std::fmt::Debug {
    /// Compress `data`, returning the bytes written to the payload section.
    fn compress(&self, data: &[u8]) -> Vec<u8>;

    /// Reverse `compress`. Returns `Err` if `data` is not a well-formed
    /// payload for this codec.
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, DecompressError>;

    /// True for [`NoopCompression`]. The persistence codec records this in
    /// the file's `flags` field (bit 0) so a reopen can detect a
    /// compression-adapter mismatch instead of feeding raw bytes into a
    /// real decompressor.
    fn is_identity(&self) -> bool {
        false
    }
}

/// Raised when a compressed payload cannot be decoded.
#[derive(Debug, Clone, thiserror::Error)]
#[error("decompression failed: {0}")]
pub struct DecompressError(pub String);

/// The default compression adapter: LZ4 block format via `lz4_flex`, with
/// the uncompressed length prepended so the block decoder knows how much
/// output to allocate.
#[derive(Debug, Default, Clone, Copy)]
pub struct Lz4Compression;

impl Compression for Lz4Compression {
    fn compress(&self, data: &[u8]) -> Vec<u8> {
        lz4_flex::block::compress_prepend_size(data)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, DecompressError> {
        lz4_flex::block::decompress_size_prepended(data)
            .map_err(|e| DecompressError(e.to_string()))
    }
}

/// A no-op codec: `compress`/`decompress` pass bytes through unchanged.
/// Useful for tests and for callers who would rather trade file size for
/// skipping the compression step entirely.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCompression;

impl Compression for NoopCompression {
    fn compress(&self, data: &[u8]) -> Vec<u8> {
        data.to_vec()
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, DecompressError> {
        Ok(data.to_vec())
    }

    fn is_identity(&self) -> bool {
        true
    }
}
