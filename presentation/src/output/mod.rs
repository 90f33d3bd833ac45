//! Result rendering for the terminal and for export

pub mod console;
pub mod formatter;
pub mod markdown;
