//! Encoding-fallback text reads.
//!
//! Each configured encoding label is tried strictly, in order. If none decodes
//! cleanly, the first label decodes again with replacement characters — a file
//! read never fails the run on encoding grounds alone.

use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use tracing::warn;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Reads a file and decodes it with the configured fallback chain.
/// I/O errors still propagate; decoding itself degrades gracefully.
pub fn read_text_with_fallback(path: &Path, encodings: &[String]) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(decode_with_fallback(&bytes, encodings, path))
}

fn decode_with_fallback(bytes: &[u8], encodings: &[String], path: &Path) -> String {
    for label in encodings {
        if let Some(text) = try_decode_strict(bytes, label) {
            return text;
        }
    }

    warn!(
        "Failed to decode {} with configured encodings; using replacement characters.",
        path.display()
    );
    let first = encodings.first().map(String::as_str).unwrap_or("utf-8");
    let encoding = resolve_label(first).unwrap_or(UTF_8);
    encoding.decode(bytes).0.into_owned()
}

/// Strict decode for one encoding label. `utf-8-sig` is UTF-8 with a required
/// BOM strip, mirroring the label set the original tool accepted.
fn try_decode_strict(bytes: &[u8], label: &str) -> Option<String> {
    if label.eq_ignore_ascii_case("utf-8-sig") {
        let stripped = bytes.strip_prefix(&UTF8_BOM)?;
        return UTF_8
            .decode_without_bom_handling_and_without_replacement(stripped)
            .map(|cow| cow.into_owned());
    }

    let encoding = resolve_label(label)?;
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|cow| cow.into_owned())
}

fn resolve_label(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn fake_path() -> PathBuf {
        PathBuf::from("fixture.js")
    }

    #[test]
    fn test_plain_utf8_decodes_with_first_label() {
        let text = decode_with_fallback("let x = 1;".as_bytes(), &labels(&["utf-8"]), &fake_path());
        assert_eq!(text, "let x = 1;");
    }

    #[test]
    fn test_bom_file_falls_through_to_utf8_sig() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("const a = 2;".as_bytes());
        // Plain strict utf-8 would keep the BOM as a leading char; utf-8-sig strips it.
        let text = decode_with_fallback(&bytes, &labels(&["utf-8-sig"]), &fake_path());
        assert_eq!(text, "const a = 2;");
    }

    #[test]
    fn test_gbk_fallback_after_utf8_failure() {
        // "中文" encoded as GBK — invalid as UTF-8.
        let gbk_bytes: Vec<u8> = vec![0xD6, 0xD0, 0xCE, 0xC4];
        let text = decode_with_fallback(&gbk_bytes, &labels(&["utf-8", "gbk"]), &fake_path());
        assert_eq!(text, "中文");
    }

    #[test]
    fn test_total_failure_uses_lossy_first_encoding() {
        // Truncated UTF-8 multi-byte sequence; only utf-8 configured.
        let bytes: Vec<u8> = vec![b'a', 0xE4, 0xB8];
        let text = decode_with_fallback(&bytes, &labels(&["utf-8"]), &fake_path());
        assert!(text.starts_with('a'));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_unknown_label_is_skipped() {
        let text = decode_with_fallback(
            "ok".as_bytes(),
            &labels(&["no-such-encoding", "utf-8"]),
            &fake_path(),
        );
        assert_eq!(text, "ok");
    }
}
