//! Error types for design loading.

/// Errors that can occur when loading a design file.
#[derive(Debug, thiserror::Error)]
pub enum IrError {
    /// An I/O error occurred while reading the design file.
    #[error("failed to read design: {0}")]
    IoError(#[from] std::io::Error),

    /// The design content could not be parsed.
    #[error("failed to parse design: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parse_error() {
        let err = IrError::ParseError("expected value at line 1".to_string());
        assert_eq!(
            format!("{err}"),
            "failed to parse design: expected value at line 1"
        );
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = IrError::from(io_err);
        assert!(format!("{err}").starts_with("failed to read design:"));
    }
}
