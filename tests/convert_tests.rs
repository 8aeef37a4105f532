//! End-to-end conversion through the public driver.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rechnungsdruck::convert::convert_file;
use rechnungsdruck::render::header_line;
use tempfile::TempDir;

const SCENARIO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Invoice>
  <ID>R-2025-001</ID>
  <IssueDate>2025-05-10</IssueDate>
  <InvoiceLine>
    <ID>1</ID>
    <InvoicedQuantity unitCode="HUR">2</InvoicedQuantity>
    <LineExtensionAmount currencyID="EUR">200.00</LineExtensionAmount>
    <Item><Name>Beratung</Name></Item>
  </InvoiceLine>
</Invoice>"#;

#[test]
fn converts_invoice_without_attachments() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("R-2025-001.xml");
    std::fs::write(&input, SCENARIO).unwrap();
    let out_dir = dir.path().join("out");

    let result = convert_file(&input, &out_dir).unwrap();

    assert_eq!(result.summary_pdf, out_dir.join("R-2025-001.pdf"));
    assert!(result.attachments.is_empty());

    let bytes = std::fs::read(&result.summary_pdf).unwrap();
    assert_eq!(&bytes[0..5], b"%PDF-");

    // No attachment files appear next to the summary.
    let files: Vec<_> = std::fs::read_dir(&out_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(files.len(), 1);
}

#[test]
fn scenario_header_contains_unpadded_date() {
    // The per-page header derived from the scenario document.
    assert_eq!(
        header_line(Some("R-2025-001"), Some("2025-05-10")),
        "Rechnungsnummer: R-2025-001 | Datum: 10.5.2025"
    );
}

#[test]
fn converts_invoice_with_attachment() {
    let dir = TempDir::new().unwrap();
    let xml = format!(
        r#"<Invoice>
          <ID>R-2025-002</ID>
          <AdditionalDocumentReference>
            <ID>DOC-1</ID>
            <DocumentDescription>Vertrag</DocumentDescription>
            <Attachment>
              <EmbeddedDocumentBinaryObject mimeCode="application/pdf">{}</EmbeddedDocumentBinaryObject>
            </Attachment>
          </AdditionalDocumentReference>
        </Invoice>"#,
        BASE64.encode(b"%PDF-1.4 vertrag")
    );
    let input = dir.path().join("R-2025-002.xml");
    std::fs::write(&input, &xml).unwrap();
    let out_dir = dir.path().join("out");

    let result = convert_file(&input, &out_dir).unwrap();

    assert_eq!(result.attachments.len(), 1);
    assert_eq!(result.attachments[0], out_dir.join("R-2025-002_Anhang1.pdf"));
    assert!(result.summary_pdf.exists());
    assert_eq!(
        std::fs::read(&result.attachments[0]).unwrap(),
        b"%PDF-1.4 vertrag".to_vec()
    );
}

#[test]
fn unparseable_input_fails_conversion() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("kaputt.xml");
    std::fs::write(&input, "<Invoice><kaputt></Invoice>").unwrap();

    assert!(convert_file(&input, &dir.path().join("out")).is_err());
}

#[test]
fn missing_input_file_fails() {
    let dir = TempDir::new().unwrap();
    assert!(convert_file(&dir.path().join("fehlt.xml"), dir.path()).is_err());
}
