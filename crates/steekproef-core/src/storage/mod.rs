//! Workbook codec: container bytes in, container bytes out.

pub mod parser;
pub mod writer;

pub use parser::decode_workbook;
pub use writer::encode_workbook;
