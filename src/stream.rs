//! Serialized stream writing with backpressure.
//!
//! Many asset tasks run concurrently, but the run produces exactly two
//! linear output files: the export index and the metadata catalog. The
//! [`StreamWriter`] turns concurrent write calls back into one deterministic
//! byte stream: writes are applied to the sink in the order the calls were
//! admitted (a fair async mutex queues callers FIFO), and each chunk is
//! written whole, never interleaved with another caller's bytes.
//!
//! Backpressure: the sink is buffered at `chunk_size` granularity. When a
//! write overflows the buffer, the current call suspends until the buffered
//! bytes drain to the file before it resolves and the next queued write
//! proceeds, bounding memory growth when production outpaces the sink.
//!
//! `close` drains everything and finalizes the sink exactly once; closing
//! twice is a no-op, and writing after close fails with `StreamClosed`.

use crate::error::FileProcessingError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;

enum Sink {
    Open(BufWriter<File>),
    Closed,
}

/// Serializes concurrent writes into one append-only output file.
pub struct StreamWriter {
    path: PathBuf,
    // Fair (FIFO) mutex: lock acquisition order is write application order.
    sink: Mutex<Sink>,
}

impl StreamWriter {
    /// Create (truncate) the output file at `path`.
    pub async fn create(
        path: impl Into<PathBuf>,
        chunk_size: usize,
    ) -> Result<Self, FileProcessingError> {
        let path = path.into();
        let file = File::create(&path)
            .await
            .map_err(|source| FileProcessingError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            sink: Mutex::new(Sink::Open(BufWriter::with_capacity(chunk_size, file))),
            path,
        })
    }

    /// Append one chunk. The chunk reaches the file contiguously, after all
    /// previously admitted writes and before all later ones.
    pub async fn write(&self, chunk: &[u8]) -> Result<(), FileProcessingError> {
        let mut sink = self.sink.lock().await;
        match &mut *sink {
            // write_all drains the buffer to the file when it overflows,
            // suspending this call (and everyone queued behind it) until
            // the sink catches up.
            Sink::Open(writer) => {
                writer
                    .write_all(chunk)
                    .await
                    .map_err(|source| FileProcessingError::Write {
                        path: self.path.clone(),
                        source,
                    })
            }
            Sink::Closed => Err(FileProcessingError::StreamClosed(self.path.clone())),
        }
    }

    /// Wait for all admitted writes, drain the buffer, and finalize the
    /// file. A second close is a no-op.
    pub async fn close(&self) -> Result<(), FileProcessingError> {
        let mut sink = self.sink.lock().await;
        match std::mem::replace(&mut *sink, Sink::Closed) {
            Sink::Open(mut writer) => {
                let write_err = |source| FileProcessingError::Write {
                    path: self.path.clone(),
                    source,
                };
                writer.flush().await.map_err(write_err)?;
                writer.shutdown().await.map_err(write_err)?;
                tracing::debug!(path = %self.path.display(), "stream closed");
                Ok(())
            }
            Sink::Closed => Ok(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Stream specialization for the export index: appends generated export
/// statements verbatim.
pub struct IndexWriter {
    stream: StreamWriter,
}

impl IndexWriter {
    pub async fn create(
        path: impl Into<PathBuf>,
        chunk_size: usize,
    ) -> Result<Self, FileProcessingError> {
        Ok(Self {
            stream: StreamWriter::create(path, chunk_size).await?,
        })
    }

    pub async fn write_export(&self, statement: &str) -> Result<(), FileProcessingError> {
        self.stream.write(statement.as_bytes()).await
    }

    pub async fn close(&self) -> Result<(), FileProcessingError> {
        self.stream.close().await
    }
}

/// Stream specialization for the metadata catalog: newline-delimited JSON
/// records, tracking whether the first record has been written so
/// separators are managed without holding the full list in memory.
pub struct MetadataWriter {
    stream: StreamWriter,
    first_entry: Mutex<bool>,
}

impl MetadataWriter {
    pub async fn create(
        path: impl Into<PathBuf>,
        chunk_size: usize,
    ) -> Result<Self, FileProcessingError> {
        Ok(Self {
            stream: StreamWriter::create(path, chunk_size).await?,
            first_entry: Mutex::new(true),
        })
    }

    pub async fn write_record<T: Serialize>(&self, record: &T) -> Result<(), FileProcessingError> {
        let json = serde_json::to_string(record).map_err(|source| FileProcessingError::Write {
            path: self.stream.path().to_path_buf(),
            source: std::io::Error::other(source),
        })?;

        // The flag is updated under the same lock ordering as the write so
        // exactly one record goes out without a leading separator.
        let mut first_entry = self.first_entry.lock().await;
        let prefix = if *first_entry { "  " } else { "\n  " };
        self.stream.write(format!("{prefix}{json}").as_bytes()).await?;
        *first_entry = false;
        Ok(())
    }

    pub async fn close(&self) -> Result<(), FileProcessingError> {
        self.stream.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn writes_apply_in_call_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.txt");
        let writer = StreamWriter::create(&path, 8).await.unwrap();

        let (a, b, c) = tokio::join!(
            writer.write(b"first-"),
            writer.write(b"second-"),
            writer.write(b"third"),
        );
        a.unwrap();
        b.unwrap();
        c.unwrap();
        writer.close().await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first-second-third");
    }

    #[tokio::test]
    async fn concurrent_chunks_never_interleave() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.txt");
        // Tiny buffer so chunks overflow it and exercise the drain path.
        let writer = Arc::new(StreamWriter::create(&path, 4).await.unwrap());

        let handles: Vec<_> = "ABCDEFGH"
            .chars()
            .map(|letter| {
                let writer = Arc::clone(&writer);
                tokio::spawn(async move {
                    let chunk: String = std::iter::repeat_n(letter, 64).collect();
                    writer.write(chunk.as_bytes()).await.unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }
        writer.close().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.len(), 8 * 64);
        for block in content.as_bytes().chunks(64) {
            assert!(block.iter().all(|&b| b == block[0]), "chunk was interleaved");
        }
    }

    #[tokio::test]
    async fn write_after_close_fails() {
        let tmp = TempDir::new().unwrap();
        let writer = StreamWriter::create(tmp.path().join("out.txt"), 64)
            .await
            .unwrap();
        writer.close().await.unwrap();

        let err = writer.write(b"late").await.unwrap_err();
        assert!(matches!(err, FileProcessingError::StreamClosed(_)));
    }

    #[tokio::test]
    async fn double_close_is_noop() {
        let tmp = TempDir::new().unwrap();
        let writer = StreamWriter::create(tmp.path().join("out.txt"), 64)
            .await
            .unwrap();
        writer.write(b"data").await.unwrap();
        writer.close().await.unwrap();
        writer.close().await.unwrap();
    }

    #[tokio::test]
    async fn metadata_records_are_newline_delimited() {
        #[derive(Serialize)]
        struct Record {
            name: &'static str,
        }

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("metadata.ndjson");
        let writer = MetadataWriter::create(&path, 64).await.unwrap();

        writer.write_record(&Record { name: "arrow" }).await.unwrap();
        writer.write_record(&Record { name: "logo" }).await.unwrap();
        writer.close().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "  {\"name\":\"arrow\"}\n  {\"name\":\"logo\"}");
    }

    #[tokio::test]
    async fn index_appends_statements_verbatim() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.ts");
        let writer = IndexWriter::create(&path, 64).await.unwrap();

        writer
            .write_export("export { a } from \"./b/a\";\n")
            .await
            .unwrap();
        writer
            .write_export("export { c } from \"./d/c\";\n")
            .await
            .unwrap();
        writer.close().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "export { a } from \"./b/a\";\nexport { c } from \"./d/c\";\n"
        );
    }
}
