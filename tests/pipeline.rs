//! End-to-end pipeline tests: real SVG sources on disk, a full `generate`
//! run, and assertions on every artifact the run produces.

use iconsmith::config::GenerationConfig;
use iconsmith::error::FileProcessingError;
use iconsmith::generate::{GenerateError, generate};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24"><path d="M0 0h24v24H0z" fill="#f00"/></svg>"##;

fn write_asset(source: &Path, brand: &str, file: &str) {
    let dir = source.join(brand);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), SVG).unwrap();
}

fn config(tmp: &TempDir) -> GenerationConfig {
    GenerationConfig {
        source_dir: tmp.path().join("assets"),
        output_dir: tmp.path().join(".assets"),
        max_concurrency: 2,
        chunk_size: 4096,
    }
}

fn catalog_records(metadata_path: &Path) -> Vec<serde_json::Value> {
    fs::read_to_string(metadata_path)
        .unwrap()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn full_run_generates_all_artifacts() {
    let tmp = TempDir::new().unwrap();
    let config = config(&tmp);
    write_asset(&config.source_dir, "gitlab", "logo.svg");
    write_asset(&config.source_dir, "vercel", "icon-mono.svg");

    let summary = generate(&config).await.unwrap();
    assert_eq!(summary.assets, 2);

    // Per-asset artifacts mirror the brand directories.
    for artifact in [
        "gitlab/logo.ts",
        "gitlab/logo.json",
        "vercel/icon-mono.ts",
        "vercel/icon-mono.json",
    ] {
        assert!(
            config.output_dir.join(artifact).is_file(),
            "missing artifact: {artifact}"
        );
    }

    // Component modules are TSX with the props spread on the root element.
    let component = fs::read_to_string(config.output_dir.join("vercel/icon-mono.ts")).unwrap();
    assert!(component.contains("import type { SVGProps } from \"react\";"));
    assert!(component.contains("export const vercelIconMono"));
    assert!(component.contains("<svg {...props}"));
    assert!(component.contains("export default vercelIconMono;"));

    // Data artifacts are the parsed structural tree.
    let data: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(config.output_dir.join("gitlab/logo.json")).unwrap())
            .unwrap();
    assert_eq!(data["type"], "Element");
    assert_eq!(data["name"], "svg");

    // The index holds exactly one export per asset; order is unspecified.
    let index = fs::read_to_string(&summary.index_path).unwrap();
    let exports: Vec<&str> = index.lines().filter(|l| !l.is_empty()).collect();
    assert_eq!(exports.len(), 2);
    assert!(index.contains("export { gitlabLogo } from \"./gitlab/logo\";"));
    assert!(index.contains("export { vercelIconMono } from \"./vercel/icon-mono\";"));

    // The catalog holds one record per asset with the parsed identity.
    let mut records = catalog_records(&summary.metadata_path);
    assert_eq!(records.len(), 2);
    records.sort_by_key(|r| r["name"].as_str().unwrap().to_string());

    assert_eq!(records[0]["name"], "icon-mono");
    assert_eq!(records[0]["brand"], "vercel");
    assert_eq!(records[0]["category"], "icons");
    assert_eq!(records[0]["color"], "mono");
    assert_eq!(records[0]["mode"], "default");
    assert_eq!(records[0]["title"], "vercel icon mono");
    assert_eq!(records[0]["path"], "vercel/icon-mono.ts");

    assert_eq!(records[1]["name"], "logo");
    assert_eq!(records[1]["brand"], "gitlab");
    assert_eq!(records[1]["category"], "logos");
    assert_eq!(records[1]["color"], "default");
    assert_eq!(records[1]["path"], "gitlab/logo.ts");
}

#[tokio::test]
async fn malformed_filename_aborts_run_but_streams_are_closed() {
    let tmp = TempDir::new().unwrap();
    let config = config(&tmp);
    write_asset(&config.source_dir, "gitlab", "arrow.svg");
    write_asset(&config.source_dir, "gitlab", "arrow-tiny.svg");

    let err = generate(&config).await.unwrap_err();
    assert!(matches!(
        err,
        GenerateError::File(FileProcessingError::MalformedFilename(_))
    ));

    // The aborted run still finalizes both streams, so partial output on
    // disk is readable and well-formed.
    let index = fs::read_to_string(config.output_dir.join("index.ts")).unwrap();
    for line in index.lines().filter(|l| !l.is_empty()) {
        assert!(line.starts_with("export { "), "malformed index line: {line}");
    }
    for record in catalog_records(&config.output_dir.join("metadata.ndjson")) {
        assert_eq!(record["brand"], "gitlab");
    }
}

#[tokio::test]
async fn unparsable_svg_aborts_run() {
    let tmp = TempDir::new().unwrap();
    let config = config(&tmp);
    let dir = config.source_dir.join("gitlab");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("logo.svg"), "this is not svg").unwrap();

    let err = generate(&config).await.unwrap_err();
    assert!(matches!(
        err,
        GenerateError::File(FileProcessingError::Optimize { .. })
    ));
}

#[tokio::test]
async fn rerun_replaces_stale_output() {
    let tmp = TempDir::new().unwrap();
    let config = config(&tmp);
    write_asset(&config.source_dir, "gitlab", "logo.svg");

    let stale_dir = config.output_dir.join("removed-brand");
    fs::create_dir_all(&stale_dir).unwrap();
    fs::write(stale_dir.join("old.ts"), "stale").unwrap();

    generate(&config).await.unwrap();

    assert!(!stale_dir.exists());
    assert!(config.output_dir.join("gitlab/logo.ts").is_file());
}

#[tokio::test]
async fn empty_source_tree_produces_empty_streams() {
    let tmp = TempDir::new().unwrap();
    let config = config(&tmp);
    fs::create_dir_all(&config.source_dir).unwrap();

    let summary = generate(&config).await.unwrap();
    assert_eq!(summary.assets, 0);
    assert_eq!(fs::read_to_string(&summary.index_path).unwrap(), "");
    assert_eq!(fs::read_to_string(&summary.metadata_path).unwrap(), "");
}

#[tokio::test]
async fn many_assets_under_tight_concurrency() {
    let tmp = TempDir::new().unwrap();
    let mut config = config(&tmp);
    config.max_concurrency = 3;

    let names = ["arrow", "logo", "icon", "badge", "chart", "globe"];
    for brand in ["alpha", "beta"] {
        for name in names {
            write_asset(&config.source_dir, brand, &format!("{name}.svg"));
        }
    }

    let summary = generate(&config).await.unwrap();
    assert_eq!(summary.assets, 12);

    let index = fs::read_to_string(&summary.index_path).unwrap();
    assert_eq!(index.lines().filter(|l| !l.is_empty()).count(), 12);
    assert_eq!(catalog_records(&summary.metadata_path).len(), 12);
}
