//! Integration tests for the file converter.
//!
//! Every test works inside its own `tempfile` directory; nothing is written
//! to the source tree.

use md2pdf::{
    convert, convert_sync, ConversionConfig, ConversionProgressCallback, Md2PdfError,
};
use lopdf::{Document, Object, ObjectId};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

const SAMPLE: &str = "# Test Title\n\nThis is a test.\n\n## Section\n\n- one\n- two\n";

fn write_md(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn assert_is_pdf(path: &Path) {
    let bytes = std::fs::read(path).unwrap_or_else(|e| panic!("{}: {e}", path.display()));
    assert!(!bytes.is_empty(), "{} is empty", path.display());
    assert!(bytes.starts_with(b"%PDF"), "{} is not a PDF", path.display());
}

// ── Converter contract ───────────────────────────────────────────────────────

#[test]
fn test_default_output_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_md(dir.path(), "test.md", SAMPLE);

    let out = convert_sync(&input, None, &ConversionConfig::default()).unwrap();

    assert_eq!(out.output_path, dir.path().join("test.pdf"));
    assert_is_pdf(&out.output_path);
    assert!(input.exists(), "input must not be removed");
}

#[test]
fn test_explicit_output_path_is_returned_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_md(dir.path(), "test.md", SAMPLE);
    let target = dir.path().join("custom_output.pdf");

    let out = convert_sync(&input, Some(&target), &ConversionConfig::default()).unwrap();

    assert_eq!(out.output_path, target);
    assert_is_pdf(&target);
}

#[test]
fn test_nonexistent_input_fails_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nonexistent.md");

    let err = convert_sync(&input, None, &ConversionConfig::default()).unwrap_err();

    assert!(matches!(err, Md2PdfError::FileNotFound { .. }), "got {err:?}");
    assert!(err.to_string().contains("Input file not found"));
    assert!(!dir.path().join("nonexistent.pdf").exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_existing_output_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_md(dir.path(), "doc.md", SAMPLE);
    let target = dir.path().join("doc.pdf");
    std::fs::write(&target, b"stale").unwrap();

    convert_sync(&input, None, &ConversionConfig::default()).unwrap();

    assert_is_pdf(&target);
}

#[test]
fn test_missing_output_directory_is_not_created() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_md(dir.path(), "doc.md", SAMPLE);
    let target = dir.path().join("missing/doc.pdf");

    let err = convert_sync(&input, Some(&target), &ConversionConfig::default()).unwrap_err();

    assert!(matches!(err, Md2PdfError::OutputWriteFailed { .. }), "got {err:?}");
    assert!(!dir.path().join("missing").exists());
}

#[test]
fn test_invalid_utf8_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("binary.md");
    std::fs::write(&input, [0x23u8, 0x20, 0xff, 0xfe, 0x0a]).unwrap();

    let err = convert_sync(&input, None, &ConversionConfig::default()).unwrap_err();

    assert!(matches!(err, Md2PdfError::InvalidEncoding { offset: 2, .. }), "got {err:?}");
    assert!(!dir.path().join("binary.pdf").exists());
}

#[test]
fn test_empty_file_converts() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_md(dir.path(), "empty.md", "");

    let out = convert_sync(&input, None, &ConversionConfig::default()).unwrap();

    assert_is_pdf(&out.output_path);
    assert_eq!(out.stats.page_count, 1);
}

#[test]
fn test_longer_documents_have_more_pages() {
    let dir = tempfile::tempdir().unwrap();
    let paragraph = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(12);
    let long: String = (1..=30)
        .map(|i| format!("## Part {i}\n\n{paragraph}\n\n"))
        .collect();
    let short = write_md(dir.path(), "short.md", SAMPLE);
    let long = write_md(dir.path(), "long.md", &long);

    let config = ConversionConfig::default();
    let short_out = convert_sync(&short, None, &config).unwrap();
    let long_out = convert_sync(&long, None, &config).unwrap();

    assert!(long_out.stats.page_count > short_out.stats.page_count);
    assert_eq!(long_out.stats.outline_entries, 30);
}

#[test]
fn test_toc_level_controls_outline() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_md(dir.path(), "toc.md", "# A\n\n## B\n\n### C\n\n#### D\n");

    let shallow = ConversionConfig::builder().toc_level(1).build().unwrap();
    let deep = ConversionConfig::builder().toc_level(4).build().unwrap();

    assert_eq!(convert_sync(&input, None, &shallow).unwrap().stats.outline_entries, 1);
    assert_eq!(convert_sync(&input, None, &deep).unwrap().stats.outline_entries, 4);
}

#[test]
fn test_unicode_content_converts() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_md(
        dir.path(),
        "unicode.md",
        "# Café “quotes” — dashes\n\n日本語 and emoji 🎉\n\n```\n\tindented\n```\n",
    );

    let out = convert_sync(&input, None, &ConversionConfig::default()).unwrap();

    assert_is_pdf(&out.output_path);
}

/// Number of bookmark items in the PDF at `path`, counting nested ones.
fn outline_items(path: &Path) -> usize {
    fn count(doc: &Document, mut item: Option<ObjectId>) -> usize {
        let mut n = 0;
        while let Some(id) = item {
            let dict = doc.get_dictionary(id).unwrap();
            n += 1 + count(doc, dict.get(b"First").and_then(Object::as_reference).ok());
            item = dict.get(b"Next").and_then(Object::as_reference).ok();
        }
        n
    }

    let doc = Document::load(path).unwrap();
    let first = doc
        .catalog()
        .and_then(|c| c.get(b"Outlines"))
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_dictionary(id))
        .and_then(|d| d.get(b"First"))
        .and_then(Object::as_reference)
        .ok();
    count(&doc, first)
}

#[test]
fn test_written_outline_matches_stats() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_md(dir.path(), "toc.md", "# One\n\n## Two\n\n## Three\n\n# Four\n");

    let out = convert_sync(&input, None, &ConversionConfig::default()).unwrap();

    assert_eq!(out.stats.page_count, 1);
    assert_eq!(out.stats.outline_entries, 4);
    assert_eq!(outline_items(&out.output_path), 4);
}

// ── Async entry point ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_async_convert_matches_sync_contract() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_md(dir.path(), "async.md", SAMPLE);

    let out = convert(&input, None, &ConversionConfig::default()).await.unwrap();

    assert_eq!(out.output_path, dir.path().join("async.pdf"));
    assert_is_pdf(&out.output_path);
}

#[tokio::test]
async fn test_concurrent_conversions_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConversionConfig::default();
    let inputs: Vec<PathBuf> = (0..4)
        .map(|i| write_md(dir.path(), &format!("doc{i}.md"), &format!("# Doc {i}\n")))
        .collect();

    let results =
        futures::future::join_all(inputs.iter().map(|p| convert(p, None, &config))).await;

    for (input, result) in inputs.iter().zip(results) {
        let out = result.unwrap();
        assert_eq!(out.output_path, input.with_extension("pdf"));
        assert_is_pdf(&out.output_path);
    }
}

// ── Progress callback ────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingCallback {
    events: Mutex<Vec<String>>,
}

impl ConversionProgressCallback for RecordingCallback {
    fn on_conversion_start(&self, _input: &Path, _input_bytes: usize) {
        self.events.lock().unwrap().push("start".into());
    }

    fn on_render_complete(&self, _page_count: usize, _pdf_bytes: usize) {
        self.events.lock().unwrap().push("rendered".into());
    }

    fn on_conversion_complete(&self, _output: &Path, _page_count: usize) {
        self.events.lock().unwrap().push("complete".into());
    }

    fn on_conversion_error(&self, _input: &Path, _error: &str) {
        self.events.lock().unwrap().push("error".into());
    }
}

#[test]
fn test_callback_sees_stages_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_md(dir.path(), "cb.md", SAMPLE);
    let recorder = Arc::new(RecordingCallback::default());
    let config = ConversionConfig::builder()
        .progress_callback(recorder.clone())
        .build()
        .unwrap();

    convert_sync(&input, None, &config).unwrap();

    assert_eq!(
        *recorder.events.lock().unwrap(),
        vec!["start", "rendered", "complete"]
    );
}

#[test]
fn test_callback_sees_errors() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Arc::new(RecordingCallback::default());
    let config = ConversionConfig::builder()
        .progress_callback(recorder.clone())
        .build()
        .unwrap();

    convert_sync(dir.path().join("missing.md"), None, &config).unwrap_err();

    assert_eq!(*recorder.events.lock().unwrap(), vec!["error"]);
}

#[test]
fn test_noop_callback_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<md2pdf::NoopProgressCallback>();
    assert_send_sync::<ConversionConfig>();
}
