use std::io;

#[derive(Debug, thiserror::Error)]
pub enum SlidesError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, SlidesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        fn open() -> Result<String> {
            let text = std::fs::read_to_string("/nonexistent/md-slides/deck.md")?;
            Ok(text)
        }
        let err = open().unwrap_err();
        assert!(matches!(err, SlidesError::Io(_)));
        assert!(err.to_string().starts_with("IO error:"));
    }

    #[test]
    fn test_json_error_converts() {
        let err: SlidesError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
