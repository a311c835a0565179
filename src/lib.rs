pub mod compiler;
pub mod document;
pub mod error;
pub mod smf;

pub use compiler::Compiler;
pub use document::{Document, Track};
pub use error::{Error, Result};

/// Parse a Markdown+MML document and compile it to an SMF byte stream
pub fn convert(src: &[u8]) -> Result<Vec<u8>> {
    let mut document = Document::parse(src);
    Compiler::new(document.divisions)?.compile(&mut document)
}
