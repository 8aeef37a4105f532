//! Attachment extraction: numbering stability, decode-failure recovery,
//! and empty-element handling.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rechnungsdruck::attachments::extract_attachments;
use tempfile::TempDir;

fn embedded(payload: &str) -> String {
    format!(
        "<cac:Attachment><cbc:EmbeddedDocumentBinaryObject mimeCode=\"application/pdf\">{}</cbc:EmbeddedDocumentBinaryObject></cac:Attachment>",
        payload
    )
}

fn invoice_with(objects: &[String]) -> String {
    format!(
        "<ubl:Invoice xmlns:ubl=\"urn:x\" xmlns:cac=\"urn:y\" xmlns:cbc=\"urn:z\">{}</ubl:Invoice>",
        objects.concat()
    )
}

#[test]
fn writes_numbered_files_in_document_order() {
    let dir = TempDir::new().unwrap();
    let xml = invoice_with(&[
        embedded(&BASE64.encode(b"%PDF-1.4 eins")),
        embedded(&BASE64.encode(b"%PDF-1.4 zwei")),
    ]);

    let written = extract_attachments(&xml, dir.path(), "RE-1").unwrap();

    assert_eq!(written.len(), 2);
    assert_eq!(written[0], dir.path().join("RE-1_Anhang1.pdf"));
    assert_eq!(written[1], dir.path().join("RE-1_Anhang2.pdf"));
    assert_eq!(
        std::fs::read(&written[0]).unwrap(),
        b"%PDF-1.4 eins".to_vec()
    );
}

#[test]
fn line_wrapped_base64_still_decodes() {
    let dir = TempDir::new().unwrap();
    let mut wrapped = BASE64.encode(b"%PDF-1.4 umbrochen");
    wrapped.insert(8, '\n');
    let xml = invoice_with(&[embedded(&wrapped)]);

    let written = extract_attachments(&xml, dir.path(), "RE-2").unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(
        std::fs::read(&written[0]).unwrap(),
        b"%PDF-1.4 umbrochen".to_vec()
    );
}

#[test]
fn invalid_base64_is_skipped_and_leaves_a_numbering_gap() {
    let dir = TempDir::new().unwrap();
    let xml = invoice_with(&[
        embedded(&BASE64.encode(b"eins")),
        embedded("$$$ not base64 $$$"),
        embedded(&BASE64.encode(b"drei")),
    ]);

    let written = extract_attachments(&xml, dir.path(), "RE-3").unwrap();

    // The broken element still consumes its sequence number.
    assert_eq!(written.len(), 2);
    assert_eq!(written[0], dir.path().join("RE-3_Anhang1.pdf"));
    assert_eq!(written[1], dir.path().join("RE-3_Anhang3.pdf"));
    assert!(!dir.path().join("RE-3_Anhang2.pdf").exists());
}

#[test]
fn empty_element_consumes_a_number() {
    let dir = TempDir::new().unwrap();
    let xml = invoice_with(&[
        "<cbc:EmbeddedDocumentBinaryObject/>".to_string(),
        embedded(&BASE64.encode(b"zwei")),
    ]);

    let written = extract_attachments(&xml, dir.path(), "RE-4").unwrap();

    assert_eq!(written.len(), 1);
    assert_eq!(written[0], dir.path().join("RE-4_Anhang2.pdf"));
    assert!(!dir.path().join("RE-4_Anhang1.pdf").exists());
}

#[test]
fn no_attachments_yields_empty_list() {
    let dir = TempDir::new().unwrap();
    let written = extract_attachments("<Invoice><ID>R</ID></Invoice>", dir.path(), "RE-5").unwrap();
    assert!(written.is_empty());
}

#[test]
fn malformed_xml_is_fatal() {
    let dir = TempDir::new().unwrap();
    assert!(extract_attachments("<Invoice><open></Invoice>", dir.path(), "x").is_err());
}
