//! # rechnungsdruck
//!
//! Converts a UBL-family electronic invoice (XRechnung, EN 16931) into
//! a fixed three-page, human-readable German PDF summary, and extracts
//! embedded base64 PDF attachments into standalone numbered files.
//!
//! Extraction is best-effort by design: fields are matched by local tag
//! name regardless of namespace prefix, every field is optional, and a
//! sparse document yields a sparse summary rather than an error. Only
//! malformed XML and output I/O abort a conversion.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use rechnungsdruck::convert::convert_file;
//!
//! let result = convert_file(Path::new("rechnung.xml"), Path::new("output")).unwrap();
//! println!("{}", result.summary_pdf.display());
//! ```

pub mod attachments;
pub mod convert;
pub mod error;
pub mod model;
pub mod render;
pub mod ubl;

pub use crate::convert::{ConversionResult, convert_file};
pub use crate::error::DruckError;
pub use crate::model::InvoiceData;
