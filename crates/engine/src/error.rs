use std::fmt;

#[derive(Debug)]
pub enum ParseError {
    /// Input is not well-formed JSON.
    Json(String),
    /// Root is neither an object nor an array.
    NotADocument,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "document parse error: {msg}"),
            Self::NotADocument => write!(f, "document root must be an object or an array"),
        }
    }
}

impl std::error::Error for ParseError {}
