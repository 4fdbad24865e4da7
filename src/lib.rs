//! # Iconsmith
//!
//! An asset pipeline for icon libraries. Your filesystem is the data source:
//! brand directories hold raw SVG files whose names encode identity
//! (`category[-mono][-dark|-light].svg`), and a single `generate` run turns
//! the whole tree into typed component modules, structural data files, an
//! export index, and a metadata catalog.
//!
//! # Architecture: One Concurrent Batch, Two Output Shapes
//!
//! A run has a short sequential prelude (discover sources, reset the output
//! root, initialize the optimizer) and then fans out: every asset flows
//! through the same per-file pipeline, many at a time.
//!
//! ```text
//! assets/<brand>/<name>.svg
//!     → optimize (usvg round-trip)
//!     → parse (quick-xml → ElementNode tree)
//!     → emit .assets/<brand>/<name>.ts      (component module)
//!            .assets/<brand>/<name>.json    (structural tree)
//!     → append .assets/index.ts             (one export per asset)
//!              .assets/metadata.ndjson      (one catalog record per asset)
//! ```
//!
//! Per-asset artifacts are independent files, so they parallelize freely.
//! The index and catalog are shared linear streams, so all tasks funnel
//! their appends through serialized writers. Two mechanisms keep the fan-out
//! honest:
//!
//! - **Bounded concurrency**: at most `max_concurrency` assets are processed
//!   at once ([`limiter::ConcurrencyLimiter`]); the rest queue in FIFO order.
//! - **Stream serialization with backpressure**: shared streams apply whole
//!   chunks in admission order and suspend writers while the sink drains
//!   ([`stream::StreamWriter`]).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`generate`] | Batch driver — discovery, output reset, fan-out, fail-fast abort, finalize |
//! | [`svg`] | Per-file SVG processing: read, usvg optimization, structural parsing |
//! | [`tree`] | [`tree::ElementNode`] — the parsed structural tree plus CSS class-rule parsing |
//! | [`transform`] | ElementNode tree → component module text and index export statements |
//! | [`naming`] | Filename grammar parser, pluralization, and the case/normalization helpers |
//! | [`paths`] | Per-asset path planning and the pre-write path safety check |
//! | [`limiter`] | Bounded-concurrency task execution with idle notification |
//! | [`stream`] | Serialized stream writers for the export index and metadata catalog |
//! | [`config`] | `iconsmith.toml` loading and pre-flight validation |
//! | [`error`] | [`error::FileProcessingError`] — the shared per-file failure type |
//! | [`output`] | CLI output formatting — information-first inventory and summaries |
//!
//! # Design Decisions
//!
//! ## Optimization Is a Library Round-Trip
//!
//! The optimizer is [`usvg`]: parse the source into its simplified tree and
//! re-serialize. That one round-trip strips comments, metadata, and editor
//! cruft, normalizes attribute representation, bounds numeric precision, and
//! prefixes element ids with the filename stem so generated icons can be
//! inlined side by side without id collisions. There is no hand-rolled
//! markup rewriting to maintain.
//!
//! ## Fail-Fast Batches, Settled Streams
//!
//! Icon sets are curated inputs; a malformed filename or unparsable SVG is a
//! data-quality defect, not an operational hiccup. The first per-file error
//! aborts the batch and no error is ever retried. In-flight tasks still run
//! to completion and both streams are closed before the error propagates, so
//! partial output on disk is always well-formed.
//!
//! ## Deterministic Artifacts, Unordered Catalog
//!
//! Attribute and declaration maps are ordered (`BTreeMap`), so a given
//! source file always yields byte-identical component and data artifacts.
//! Index and catalog entry ORDER follows task completion and is not
//! deterministic; consumers treat both as unordered sets keyed by name.
//!
//! ## The Output Root Is Disposable
//!
//! `generate` deletes and recreates the output root on every run. Generated
//! artifacts are never hand-edited, and a full rebuild of even large icon
//! sets is cheap, so there is no staleness tracking to get wrong. The path
//! safety check ([`paths::validate_path`]) guards every directory the run
//! creates under that root.

pub mod config;
pub mod error;
pub mod generate;
pub mod limiter;
pub mod naming;
pub mod output;
pub mod paths;
pub mod stream;
pub mod svg;
pub mod transform;
pub mod tree;
