use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: column '{column}' has non-numeric value '{value}'")]
    InvalidNumber {
        line:   usize,
        column: String,
        value:  String,
    },
}
