//! Functionality to deal with the raw records of a PackOnly archive.

pub mod entry;
pub mod header;
