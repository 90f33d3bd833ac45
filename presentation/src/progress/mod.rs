//! Live progress display driven by run events

pub mod reporter;
