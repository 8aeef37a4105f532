use thiserror::Error;

/// Errors that can occur while converting an e-invoice.
///
/// Missing fields are never an error — an absent element simply leaves
/// its slot in the model empty. Only malformed input and output I/O
/// are fatal; PDF assembly itself cannot fail.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DruckError {
    /// The source cannot be parsed as well-formed XML.
    #[error("XML parse error: {0}")]
    Xml(String),

    /// Reading the source or writing an output file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
