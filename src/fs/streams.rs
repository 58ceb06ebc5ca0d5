//! Byte streams
//!
//! Chunked readers and writers used by the stream operations: a
//! read -> transform -> write [`Pipeline`], a lazy UTF-8 [`TextChunks`]
//! reader and a rolling SHA-256 [`digest`]. Nothing here ever holds a whole
//! file in memory.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use flate2::write::{GzEncoder, MultiGzDecoder};
use flate2::Compression;
use sha2::{Digest, Sha256};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::types::FsError;

/// Size of a single read from a source stream.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Largest slice handed to a [`Transform`] in one `push`. deflate expands at
/// most about 1032:1, so one decoded slice stays in the low megabytes.
pub const TRANSFORM_SLICE: usize = 4 * 1024;

// ============================================================================
// Transforms
// ============================================================================

/// Middle stage of a [`Pipeline`].
///
/// `push` may buffer internally and return fewer bytes than it was given;
/// whatever is still buffered comes out of `finish`.
pub trait Transform: Send {
    fn push(&mut self, chunk: &[u8]) -> io::Result<Vec<u8>>;
    fn finish(self: Box<Self>) -> io::Result<Vec<u8>>;
}

/// Copies bytes through unchanged.
pub struct Passthrough;

impl Transform for Passthrough {
    fn push(&mut self, chunk: &[u8]) -> io::Result<Vec<u8>> {
        Ok(chunk.to_vec())
    }

    fn finish(self: Box<Self>) -> io::Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

/// gzip compression.
pub struct GzipEncode {
    encoder: GzEncoder<Vec<u8>>,
}

impl GzipEncode {
    pub fn new() -> Self {
        Self { encoder: GzEncoder::new(Vec::new(), Compression::default()) }
    }
}

impl Default for GzipEncode {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for GzipEncode {
    fn push(&mut self, chunk: &[u8]) -> io::Result<Vec<u8>> {
        self.encoder.write_all(chunk)?;
        Ok(std::mem::take(self.encoder.get_mut()))
    }

    fn finish(self: Box<Self>) -> io::Result<Vec<u8>> {
        self.encoder.finish()
    }
}

/// gzip decompression. Concatenated members are decoded back to back.
/// Fails on corrupt or truncated input.
pub struct GzipDecode {
    decoder: MultiGzDecoder<Vec<u8>>,
}

impl GzipDecode {
    pub fn new() -> Self {
        Self { decoder: MultiGzDecoder::new(Vec::new()) }
    }
}

impl Default for GzipDecode {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for GzipDecode {
    fn push(&mut self, chunk: &[u8]) -> io::Result<Vec<u8>> {
        self.decoder.write_all(chunk)?;
        Ok(std::mem::take(self.decoder.get_mut()))
    }

    fn finish(self: Box<Self>) -> io::Result<Vec<u8>> {
        self.decoder.finish()
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// An open file bound to the path it was opened from.
pub struct StreamEnd {
    file: File,
    path: PathBuf,
}

impl StreamEnd {
    /// Open an existing file for reading.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, FsError> {
        let path = path.into();
        let file = File::open(&path).await.map_err(|e| FsError::io("open", &path, e))?;
        Ok(Self { file, path })
    }

    /// Create a file that must not exist yet.
    pub async fn create_new(path: impl Into<PathBuf>) -> Result<Self, FsError> {
        let path = path.into();
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                if e.kind() == io::ErrorKind::AlreadyExists {
                    FsError::AlreadyExists { path: path.clone() }
                } else {
                    FsError::io("create", &path, e)
                }
            })?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Byte counts of a finished pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    pub bytes_read: u64,
    pub bytes_written: u64,
}

/// read stream -> transform -> write stream.
///
/// The pipeline owns all three stages, so when any of them fails the others
/// are closed with it. The sink is a file the pipeline's caller just created;
/// on failure it is removed again so no truncated output is left behind.
pub struct Pipeline {
    operation: &'static str,
    source: StreamEnd,
    transform: Box<dyn Transform>,
    sink: StreamEnd,
}

impl Pipeline {
    pub fn new(
        operation: &'static str,
        source: StreamEnd,
        transform: impl Transform + 'static,
        sink: StreamEnd,
    ) -> Self {
        Self {
            operation,
            source,
            transform: Box::new(transform),
            sink,
        }
    }

    pub async fn run(self) -> Result<PipelineStats, FsError> {
        let operation = self.operation;
        let sink_path = self.sink.path.clone();

        match self.pump().await {
            Ok(stats) => {
                tracing::debug!(
                    operation,
                    bytes_read = stats.bytes_read,
                    bytes_written = stats.bytes_written,
                    sink = %sink_path.display(),
                    "pipeline finished"
                );
                Ok(stats)
            }
            Err(err) => {
                if let Err(cleanup) = tokio::fs::remove_file(&sink_path).await {
                    tracing::warn!(sink = %sink_path.display(), error = %cleanup, "could not remove partial output");
                }
                Err(err)
            }
        }
    }

    async fn pump(self) -> Result<PipelineStats, FsError> {
        let Pipeline { operation, mut source, mut transform, mut sink } = self;
        let mut stats = PipelineStats::default();
        let mut buf = vec![0u8; CHUNK_SIZE];

        loop {
            let n = source
                .file
                .read(&mut buf)
                .await
                .map_err(|e| FsError::io("read", &source.path, e))?;
            if n == 0 {
                break;
            }
            stats.bytes_read += n as u64;

            for slice in buf[..n].chunks(TRANSFORM_SLICE) {
                let out = transform
                    .push(slice)
                    .map_err(|e| FsError::io(operation, &source.path, e))?;
                write_out(&mut sink, &out).await?;
                stats.bytes_written += out.len() as u64;
            }
        }

        let tail = transform
            .finish()
            .map_err(|e| FsError::io(operation, &source.path, e))?;
        write_out(&mut sink, &tail).await?;
        stats.bytes_written += tail.len() as u64;

        sink.file
            .flush()
            .await
            .map_err(|e| FsError::io("write", &sink.path, e))?;
        Ok(stats)
    }
}

async fn write_out(sink: &mut StreamEnd, bytes: &[u8]) -> Result<(), FsError> {
    if bytes.is_empty() {
        return Ok(());
    }
    sink.file
        .write_all(bytes)
        .await
        .map_err(|e| FsError::io("write", &sink.path, e))
}

// ============================================================================
// Text chunks
// ============================================================================

/// Lazy, single-pass sequence of decoded text chunks read from a file.
///
/// Multi-byte characters split across two reads are held back and emitted
/// whole with the next chunk. Invalid UTF-8 is replaced with U+FFFD.
pub struct TextChunks {
    file: File,
    path: PathBuf,
    buf: Vec<u8>,
    pending: Vec<u8>,
    finished: bool,
}

impl TextChunks {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, FsError> {
        Self::open_with_chunk_size(path, CHUNK_SIZE).await
    }

    pub async fn open_with_chunk_size(path: impl Into<PathBuf>, chunk_size: usize) -> Result<Self, FsError> {
        let StreamEnd { file, path } = StreamEnd::open(path).await?;
        Ok(Self {
            file,
            path,
            buf: vec![0u8; chunk_size.max(1)],
            pending: Vec::new(),
            finished: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next decoded chunk, or `None` once the file is exhausted.
    pub async fn next_chunk(&mut self) -> Option<Result<String, FsError>> {
        loop {
            if self.finished {
                return None;
            }

            let n = match self.file.read(&mut self.buf).await {
                Ok(n) => n,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(FsError::io("read", &self.path, e)));
                }
            };

            if n == 0 {
                self.finished = true;
                if self.pending.is_empty() {
                    return None;
                }
                let text = String::from_utf8_lossy(&self.pending).into_owned();
                self.pending.clear();
                return Some(Ok(text));
            }

            self.pending.extend_from_slice(&self.buf[..n]);
            let cut = utf8_boundary(&self.pending);
            if cut == 0 {
                continue;
            }
            let rest = self.pending.split_off(cut);
            let text = String::from_utf8_lossy(&self.pending).into_owned();
            self.pending = rest;
            return Some(Ok(text));
        }
    }
}

/// Length of the prefix of `bytes` that does not end in a truncated UTF-8
/// sequence.
fn utf8_boundary(bytes: &[u8]) -> usize {
    let len = bytes.len();
    for back in 1..=len.min(3) {
        let b = bytes[len - back];
        if b & 0xC0 == 0x80 {
            continue;
        }
        let width = match b {
            0xF0..=0xFF => 4,
            0xE0..=0xEF => 3,
            0xC0..=0xDF => 2,
            _ => 1,
        };
        return if width > back { len - back } else { len };
    }
    len
}

// ============================================================================
// Digest
// ============================================================================

/// SHA-256 of a file's contents as lowercase hex, read chunk by chunk.
pub async fn digest(path: &Path) -> Result<String, FsError> {
    let StreamEnd { mut file, path } = StreamEnd::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf).await.map_err(|e| FsError::io("read", &path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    async fn collect(mut chunks: TextChunks) -> (Vec<String>, String) {
        let mut parts = Vec::new();
        while let Some(chunk) = chunks.next_chunk().await {
            parts.push(chunk.unwrap());
        }
        let joined = parts.concat();
        (parts, joined)
    }

    #[test]
    fn test_utf8_boundary() {
        assert_eq!(utf8_boundary(b""), 0);
        assert_eq!(utf8_boundary(b"abc"), 3);
        let e_acute = "é".as_bytes();
        assert_eq!(utf8_boundary(&[b'a', e_acute[0]]), 1);
        assert_eq!(utf8_boundary(&[b'a', e_acute[0], e_acute[1]]), 3);
        let smile = "🙂".as_bytes();
        assert_eq!(utf8_boundary(&smile[..3]), 0);
        assert_eq!(utf8_boundary(smile), 4);
    }

    #[tokio::test]
    async fn test_text_chunks_keep_characters_whole() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("text.txt");
        let text = "héllo wörld 🙂\nsecond line\n";
        std::fs::write(&path, text).unwrap();

        let chunks = TextChunks::open_with_chunk_size(&path, 1).await.unwrap();
        let (parts, joined) = collect(chunks).await;
        assert_eq!(joined, text);
        assert!(parts.iter().all(|p| !p.contains('\u{FFFD}')));
        assert!(parts.len() > 1);
    }

    #[tokio::test]
    async fn test_text_chunks_empty_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.txt");
        std::fs::write(&path, b"").unwrap();

        let mut chunks = TextChunks::open(&path).await.unwrap();
        assert!(chunks.next_chunk().await.is_none());
        assert!(chunks.next_chunk().await.is_none());
    }

    #[tokio::test]
    async fn test_text_chunks_invalid_bytes_replaced() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bin.dat");
        std::fs::write(&path, [b'o', b'k', 0xFF, b'!']).unwrap();

        let chunks = TextChunks::open(&path).await.unwrap();
        let (_, joined) = collect(chunks).await;
        assert_eq!(joined, "ok\u{FFFD}!");
    }

    #[tokio::test]
    async fn test_passthrough_pipeline_copies_bytes() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.bin");
        let dst = tmp.path().join("dst.bin");
        let data: Vec<u8> = (0..(CHUNK_SIZE * 2 + 17)).map(|i| (i % 251) as u8).collect();
        std::fs::write(&src, &data).unwrap();

        let pipeline = Pipeline::new(
            "copy",
            StreamEnd::open(&src).await.unwrap(),
            Passthrough,
            StreamEnd::create_new(&dst).await.unwrap(),
        );
        let stats = pipeline.run().await.unwrap();
        assert_eq!(stats.bytes_read, data.len() as u64);
        assert_eq!(stats.bytes_written, data.len() as u64);
        assert_eq!(std::fs::read(&dst).unwrap(), data);
    }

    #[tokio::test]
    async fn test_gzip_pipelines_round_trip() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.txt");
        let packed = tmp.path().join("src.txt.gz");
        let unpacked = tmp.path().join("out.txt");
        let data = "the quick brown fox\n".repeat(5000);
        std::fs::write(&src, &data).unwrap();

        Pipeline::new(
            "compress",
            StreamEnd::open(&src).await.unwrap(),
            GzipEncode::new(),
            StreamEnd::create_new(&packed).await.unwrap(),
        )
        .run()
        .await
        .unwrap();
        assert!(std::fs::metadata(&packed).unwrap().len() < data.len() as u64);

        Pipeline::new(
            "decompress",
            StreamEnd::open(&packed).await.unwrap(),
            GzipDecode::new(),
            StreamEnd::create_new(&unpacked).await.unwrap(),
        )
        .run()
        .await
        .unwrap();
        assert_eq!(std::fs::read_to_string(&unpacked).unwrap(), data);
    }

    #[test]
    fn test_gzip_decode_output_bounded_per_slice() {
        let zeros = vec![0u8; 16 * 1024 * 1024];
        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&zeros).unwrap();
        let packed = encoder.finish().unwrap();

        let mut decoder = GzipDecode::new();
        let mut total = 0usize;
        for slice in packed.chunks(TRANSFORM_SLICE) {
            let out = decoder.push(slice).unwrap();
            assert!(out.len() <= TRANSFORM_SLICE * 1100);
            total += out.len();
        }
        total += Box::new(decoder).finish().unwrap().len();
        assert_eq!(total, zeros.len());
    }

    #[tokio::test]
    async fn test_gzip_decode_concatenated_members() {
        let tmp = TempDir::new().unwrap();
        let packed = tmp.path().join("two.gz");
        let unpacked = tmp.path().join("two");

        let mut bytes = Vec::new();
        for part in ["first member\n", "second member\n"] {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(part.as_bytes()).unwrap();
            bytes.extend(encoder.finish().unwrap());
        }
        std::fs::write(&packed, &bytes).unwrap();

        Pipeline::new(
            "decompress",
            StreamEnd::open(&packed).await.unwrap(),
            GzipDecode::new(),
            StreamEnd::create_new(&unpacked).await.unwrap(),
        )
        .run()
        .await
        .unwrap();
        assert_eq!(std::fs::read_to_string(&unpacked).unwrap(), "first member\nsecond member\n");
    }

    #[tokio::test]
    async fn test_failed_pipeline_removes_sink() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("garbage.gz");
        let dst = tmp.path().join("garbage");
        std::fs::write(&src, b"this is not gzip data at all").unwrap();

        let err = Pipeline::new(
            "decompress",
            StreamEnd::open(&src).await.unwrap(),
            GzipDecode::new(),
            StreamEnd::create_new(&dst).await.unwrap(),
        )
        .run()
        .await
        .unwrap_err();

        assert!(matches!(err, FsError::Io { operation: "decompress", .. }));
        assert!(!dst.exists());
    }

    #[tokio::test]
    async fn test_create_new_refuses_existing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("taken.txt");
        std::fs::write(&path, b"keep me").unwrap();

        let err = StreamEnd::create_new(&path).await.err().unwrap();
        assert!(matches!(err, FsError::AlreadyExists { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), b"keep me");
    }

    #[tokio::test]
    async fn test_digest_known_values() {
        let tmp = TempDir::new().unwrap();
        let empty = tmp.path().join("empty");
        let abc = tmp.path().join("abc");
        std::fs::write(&empty, b"").unwrap();
        std::fs::write(&abc, b"abc").unwrap();

        assert_eq!(digest(&empty).await.unwrap(), EMPTY_SHA256);
        assert_eq!(
            digest(&abc).await.unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
