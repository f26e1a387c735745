//! Error types for terrain synthesis and tessellation

use thiserror::Error;

/// Errors that can occur while generating or meshing a grid
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    /// A generation parameter is outside its documented range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// The backing storage for a grid could not be reserved
    #[error("failed to allocate a {width}x{height} grid")]
    AllocationFailed {
        /// Requested grid width
        width: usize,
        /// Requested grid height
        height: usize,
    },
}

/// Result type alias for terrain operations
pub type Result<T> = std::result::Result<T, TerrainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TerrainError::InvalidParameter("complexity must be in 1..=10 (got 11)".into());
        assert_eq!(
            err.to_string(),
            "invalid parameter: complexity must be in 1..=10 (got 11)"
        );

        let err = TerrainError::AllocationFailed {
            width: 2049,
            height: 2049,
        };
        assert_eq!(err.to_string(), "failed to allocate a 2049x2049 grid");
    }
}
