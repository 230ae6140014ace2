//! Input and output formats used by the binary.

pub mod csv;
pub mod report;
