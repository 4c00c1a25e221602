mod typst;

pub use typst::TypstEngine;

use crate::error::Result;
use crate::report::Page;

/// Serializes finished pages into a PDF byte stream.
pub trait PdfEngine {
    fn compile(&self, pages: &[Page]) -> Result<Vec<u8>>;
}
