//! End-to-end conversion driver: one XML file in, summary PDF plus
//! attachment files out.

use std::fs;
use std::path::{Path, PathBuf};

use crate::attachments::extract_attachments;
use crate::error::DruckError;
use crate::render::render_summary;
use crate::ubl::from_ubl_xml;

/// Files produced by one conversion.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// The three-logical-page summary PDF.
    pub summary_pdf: PathBuf,
    /// Extracted attachment files, in document order.
    pub attachments: Vec<PathBuf>,
}

/// Convert the e-invoice at `xml_path` into `<outputDir>/<stem>.pdf`
/// plus `<stem>_Anhang<N>.pdf` for every embedded attachment.
///
/// The output directory is created if absent. Malformed XML and output
/// I/O failures abort the conversion; missing invoice fields never do.
pub fn convert_file(xml_path: &Path, output_dir: &Path) -> Result<ConversionResult, DruckError> {
    fs::create_dir_all(output_dir)?;

    let xml = fs::read_to_string(xml_path)?;
    let base_name = xml_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("rechnung")
        .to_string();

    let attachments = extract_attachments(&xml, output_dir, &base_name)?;

    let data = from_ubl_xml(&xml)?;
    let bytes = render_summary(&data, &base_name);

    let summary_pdf = output_dir.join(format!("{base_name}.pdf"));
    fs::write(&summary_pdf, &bytes)?;
    log::info!("PDF-Rechnung gespeichert als: {}", summary_pdf.display());

    Ok(ConversionResult {
        summary_pdf,
        attachments,
    })
}
