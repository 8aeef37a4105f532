//! Extraction of embedded PDF attachments.
//!
//! E-invoices may carry supporting documents inline as base64-encoded
//! `EmbeddedDocumentBinaryObject` elements. This module runs its own
//! pass over the raw XML — it shares no state with the invoice model —
//! decodes each payload and writes it next to the summary PDF.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::DruckError;

/// Decode every embedded binary object and write it as
/// `<base_name>_Anhang<N>.pdf` into `output_dir`.
///
/// Elements are matched by local tag name in document order. `N` is the
/// 1-based enumeration position among all matched elements — elements
/// with empty text and elements whose payload fails to decode are
/// skipped but still consume a number, so the filenames of the
/// remaining attachments stay stable. Decode failures are logged and
/// recovered; a file write failure is fatal.
///
/// Returns the paths written, possibly empty.
pub fn extract_attachments(
    xml: &str,
    output_dir: &Path,
    base_name: &str,
) -> Result<Vec<PathBuf>, DruckError> {
    let mut written = Vec::new();

    for (idx, encoded) in collect_binary_objects(xml)?.iter().enumerate() {
        let n = idx + 1;
        if encoded.is_empty() {
            continue;
        }
        // Embedded payloads are usually line-wrapped; the decoder is strict.
        let compact: String = encoded.split_whitespace().collect();
        let bytes = match BASE64.decode(compact.as_bytes()) {
            Ok(b) => b,
            Err(e) => {
                log::error!("Fehler beim Dekodieren von Anhang #{n}: {e}");
                continue;
            }
        };
        let path = output_dir.join(format!("{base_name}_Anhang{n}.pdf"));
        fs::write(&path, &bytes)?;
        log::info!("Anhang #{n} gespeichert als: {}", path.display());
        written.push(path);
    }

    if written.is_empty() {
        log::info!("Kein PDF-Anhang gefunden.");
    }
    Ok(written)
}

/// Collect the text content of every `EmbeddedDocumentBinaryObject` in
/// document order. Elements without text contribute an empty string so
/// enumeration positions stay aligned with the document.
fn collect_binary_objects(xml: &str) -> Result<Vec<String>, DruckError> {
    const TAG: &[u8] = b"EmbeddedDocumentBinaryObject";

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut objects = Vec::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().local_name().as_ref() == TAG => {
                current = Some(String::new());
            }
            Ok(Event::Empty(ref e)) if e.name().local_name().as_ref() == TAG => {
                objects.push(String::new());
            }
            Ok(Event::Text(ref e)) => {
                if let Some(buf) = current.as_mut() {
                    buf.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Ok(Event::End(ref e)) if e.name().local_name().as_ref() == TAG => {
                if let Some(buf) = current.take() {
                    objects.push(buf);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DruckError::Xml(e.to_string())),
            _ => {}
        }
    }

    Ok(objects)
}
