//! Batch generation driver.
//!
//! Orchestrates a full run: discover the source tree, reset the output
//! root, then push every asset through the per-file pipeline under the
//! concurrency bound while the export index and metadata catalog streams
//! accumulate one entry per completed asset.
//!
//! Failure policy is fail-fast with settled in-flight work: the first
//! per-file error aborts the batch (no new tasks are admitted and the
//! error propagates), but tasks already executing run to completion and
//! both output streams are still closed so partial output on disk is
//! well-formed. Artifact contents are deterministic per asset; the ORDER
//! of index and catalog entries follows completion order and is not.

use crate::config::{ConfigError, GenerationConfig};
use crate::error::FileProcessingError;
use crate::limiter::ConcurrencyLimiter;
use crate::naming::{ColorVariant, ModeVariant};
use crate::paths::AssetPaths;
use crate::stream::{IndexWriter, MetadataWriter};
use crate::svg::{OptimizerConfig, SvgProcessor};
use crate::transform::{create_component, create_export};
use serde::Serialize;
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use tokio::sync::Mutex;
use walkdir::WalkDir;

/// A batch-level failure. Per-file causes are wrapped, not retried.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    File(#[from] FileProcessingError),
    #[error("failed to scan source tree: {0}")]
    Scan(#[from] walkdir::Error),
    #[error("failed to reset output directory {path}")]
    OutputReset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("asset task panicked: {0}")]
    TaskPanic(#[from] tokio::task::JoinError),
}

/// One discovered source file, before path planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    pub file_name: String,
    pub parent_dir: PathBuf,
}

/// What a completed run produced, for reporting.
#[derive(Debug)]
pub struct GenerateSummary {
    pub assets: usize,
    pub output_root: PathBuf,
    pub index_path: PathBuf,
    pub metadata_path: PathBuf,
}

/// One catalog record, serialized as a line of the metadata stream.
#[derive(Debug, Serialize)]
pub struct Metadata {
    pub name: String,
    pub color: ColorVariant,
    pub mode: ModeVariant,
    pub category: String,
    pub brand: String,
    pub title: String,
    /// Component module path relative to the output root, `/`-separated.
    pub path: String,
}

impl Metadata {
    pub fn for_asset(paths: &AssetPaths) -> Self {
        Self {
            name: paths.name.clone(),
            color: paths.color,
            mode: paths.mode,
            category: paths.category.clone(),
            brand: paths.brand.clone(),
            title: paths.title.clone(),
            path: format!("{}/{}.ts", rel_string(&paths.output_rel_dir), paths.name),
        }
    }
}

/// Join path components with `/` regardless of platform, for catalog and
/// index entries.
fn rel_string(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Deduplicates directory creation across concurrent asset tasks.
///
/// Many assets share a brand directory; only the first task to reach it
/// issues the mkdir. The lock is held across the filesystem call so no
/// other task repeats it.
pub struct DirCache {
    created: Mutex<HashSet<PathBuf>>,
}

impl DirCache {
    pub fn new() -> Self {
        Self {
            created: Mutex::new(HashSet::new()),
        }
    }

    /// Ensure the asset's output directory exists. Returns whether this
    /// call actually created it.
    pub async fn ensure(&self, paths: &AssetPaths) -> Result<bool, FileProcessingError> {
        let mut created = self.created.lock().await;
        if created.contains(&paths.output_rel_dir) {
            return Ok(false);
        }
        tokio::fs::create_dir_all(&paths.output_dir)
            .await
            .map_err(|source| FileProcessingError::Write {
                path: paths.output_dir.clone(),
                source,
            })?;
        created.insert(paths.output_rel_dir.clone());
        Ok(true)
    }
}

impl Default for DirCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts completed assets and logs progress every hundred files plus a
/// final line at completion.
pub struct ProgressTracker {
    total: usize,
    processed: AtomicUsize,
}

impl ProgressTracker {
    /// `None` when there is nothing to track.
    pub fn new(total: usize) -> Option<Self> {
        (total > 0).then_some(Self {
            total,
            processed: AtomicUsize::new(0),
        })
    }

    pub fn update(&self) {
        let processed = self.processed.fetch_add(1, Ordering::SeqCst) + 1;
        if processed % 100 == 0 || processed == self.total {
            tracing::info!(
                processed,
                total = self.total,
                percent = processed * 100 / self.total,
                remaining = self.total - processed,
                "generation progress"
            );
        }
    }

    /// `(processed, total)` snapshot.
    pub fn stats(&self) -> (usize, usize) {
        (self.processed.load(Ordering::SeqCst), self.total)
    }
}

/// Per-file pipeline shared by all asset tasks.
///
/// Holds the initialized processor, both output streams, the directory
/// cache, and the progress tracker. One instance per run, shared behind
/// an `Arc`.
pub struct FileGenerator {
    processor: SvgProcessor,
    index: IndexWriter,
    metadata: MetadataWriter,
    dirs: DirCache,
    progress: Option<ProgressTracker>,
}

impl FileGenerator {
    pub fn new(
        processor: SvgProcessor,
        index: IndexWriter,
        metadata: MetadataWriter,
        total: usize,
    ) -> Self {
        Self {
            processor,
            index,
            metadata,
            dirs: DirCache::new(),
            progress: ProgressTracker::new(total),
        }
    }

    /// Run the full per-file sequence for one planned asset: ensure the
    /// output directory, process the source, write both artifacts, then
    /// append the index export and the catalog record.
    pub async fn process_asset_file(&self, paths: &AssetPaths) -> Result<(), FileProcessingError> {
        self.dirs.ensure(paths).await?;

        let tree = self.processor.process_file(&paths.input_path).await?;

        let component = create_component(&paths.title, &tree);
        let data =
            serde_json::to_string_pretty(&tree).map_err(|source| FileProcessingError::Write {
                path: paths.data_path.clone(),
                source: std::io::Error::other(source),
            })?;

        tokio::try_join!(
            write_artifact(&paths.component_path, &component),
            write_artifact(&paths.data_path, &data),
        )?;

        let export = create_export(&paths.title, &rel_string(&paths.output_rel_dir), &paths.name);
        self.index.write_export(&export).await?;
        self.metadata.write_record(&Metadata::for_asset(paths)).await?;

        if let Some(progress) = &self.progress {
            progress.update();
        }
        Ok(())
    }

    /// Close both output streams. Always attempts both; the first failure
    /// is reported.
    pub async fn finalize(&self) -> Result<(), FileProcessingError> {
        let (index, metadata) = tokio::join!(self.index.close(), self.metadata.close());
        index?;
        metadata?;
        tracing::debug!("output streams finalized");
        Ok(())
    }
}

async fn write_artifact(path: &Path, contents: &str) -> Result<(), FileProcessingError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| FileProcessingError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Walk the source tree and collect every SVG file, sorted by name within
/// each directory. Hidden files and non-SVG files are skipped.
pub fn discover_assets(source_root: &Path) -> Result<Vec<AssetEntry>, GenerateError> {
    let mut assets = Vec::new();
    for entry in WalkDir::new(source_root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().to_string();
        if file_name.starts_with('.') {
            continue;
        }
        let is_svg = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
        if !is_svg {
            continue;
        }
        let parent_dir = entry
            .path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| source_root.to_path_buf());
        assets.push(AssetEntry {
            file_name,
            parent_dir,
        });
    }
    Ok(assets)
}

/// Run a full generation batch.
///
/// Validates the configuration, discovers all assets, resets the output
/// root, then processes every asset under the concurrency bound. On the
/// first per-file failure the batch aborts: queued work is dropped,
/// in-flight tasks settle, and both streams are closed before the error
/// propagates.
pub async fn generate(config: &GenerationConfig) -> Result<GenerateSummary, GenerateError> {
    config.validate()?;
    let limit = NonZeroUsize::new(config.max_concurrency).ok_or_else(|| {
        ConfigError::Validation("max_concurrency must be greater than 0".into())
    })?;

    let entries = discover_assets(&config.source_dir)?;
    let total = entries.len();
    tracing::info!(
        assets = total,
        source = %config.source_dir.display(),
        "starting generation"
    );

    reset_output_root(&config.output_dir).await?;

    let mut processor = SvgProcessor::new();
    processor.initialize(OptimizerConfig::default())?;

    let index_path = config.output_dir.join("index.ts");
    let metadata_path = config.output_dir.join("metadata.ndjson");
    let index = IndexWriter::create(&index_path, config.chunk_size).await?;
    let metadata = MetadataWriter::create(&metadata_path, config.chunk_size).await?;

    let generator = Arc::new(FileGenerator::new(processor, index, metadata, total));
    let limiter = Arc::new(ConcurrencyLimiter::new(limit));

    let handles: Vec<_> = entries
        .into_iter()
        .map(|entry| {
            let generator = Arc::clone(&generator);
            let limiter = Arc::clone(&limiter);
            let source_root = config.source_dir.clone();
            let output_root = config.output_dir.clone();
            tokio::spawn(async move {
                limiter
                    .run(async {
                        let paths = AssetPaths::plan(
                            &source_root,
                            &output_root,
                            &entry.parent_dir,
                            &entry.file_name,
                        )?;
                        generator.process_asset_file(&paths).await
                    })
                    .await
            })
        })
        .collect();

    // Fail-fast: the first error stops the wait. Dropping the remaining
    // join handles detaches those tasks; on_idle below waits for every
    // in-flight task to settle before the streams are closed.
    let batch = futures::future::try_join_all(handles.into_iter().map(|handle| async move {
        match handle.await {
            Ok(result) => result.map_err(GenerateError::File),
            Err(join_err) => Err(GenerateError::TaskPanic(join_err)),
        }
    }))
    .await;

    limiter.on_idle().await;

    match batch {
        Ok(_) => {
            generator.finalize().await.map_err(GenerateError::File)?;
            tracing::info!(assets = total, output = %config.output_dir.display(), "generation complete");
            Ok(GenerateSummary {
                assets: total,
                output_root: config.output_dir.clone(),
                index_path,
                metadata_path,
            })
        }
        Err(err) => {
            // Close the streams so partial output is well-formed, but the
            // batch error is what propagates.
            if let Err(close_err) = generator.finalize().await {
                tracing::warn!(error = %close_err, "failed to finalize streams after aborted run");
            }
            Err(err)
        }
    }
}

async fn reset_output_root(output_root: &Path) -> Result<(), GenerateError> {
    let reset_err = |source| GenerateError::OutputReset {
        path: output_root.to_path_buf(),
        source,
    };
    match tokio::fs::remove_dir_all(output_root).await {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(reset_err(err)),
    }
    tokio::fs::create_dir_all(output_root).await.map_err(reset_err)
}
