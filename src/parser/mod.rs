//! Parser for the text produced by `iostat -x -c <interval>`.

pub mod columns;
pub mod error;
pub mod iostat;
pub mod lines;

pub use error::ParseError;
pub use iostat::parse_iostat;
