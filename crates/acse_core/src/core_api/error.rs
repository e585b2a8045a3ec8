use thiserror::Error;

use crate::generation::Generation;
use crate::record::{Field, FieldKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    UnsupportedGeneration,
    UnmappedFieldType,
    MissingCompanion,
    OutOfBounds,
    InvalidSchema,
    InvalidInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("unsupported generation: {0}")]
    UnsupportedGeneration(String),

    #[error("{field} has kind {kind:?}, which has no codec for {generation}")]
    UnmappedFieldType {
        field: Field,
        kind: FieldKind,
        generation: Generation,
    },

    /// A sized kind was declared without its count or size.
    #[error("{field} is missing its {companion}")]
    MissingCompanion {
        field: Field,
        companion: &'static str,
    },

    #[error("access of {len} bytes at {offset:#x} is outside the {blob_len:#x}-byte save")]
    OutOfBounds {
        offset: usize,
        len: usize,
        blob_len: usize,
    },

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    pub fn code(&self) -> CoreErrorCode {
        match self {
            Self::UnsupportedGeneration(_) => CoreErrorCode::UnsupportedGeneration,
            Self::UnmappedFieldType { .. } => CoreErrorCode::UnmappedFieldType,
            Self::MissingCompanion { .. } => CoreErrorCode::MissingCompanion,
            Self::OutOfBounds { .. } => CoreErrorCode::OutOfBounds,
            Self::InvalidSchema(_) => CoreErrorCode::InvalidSchema,
            Self::InvalidInput(_) => CoreErrorCode::InvalidInput,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_field() {
        let err = CoreError::MissingCompanion {
            field: Field::Pockets,
            companion: "count",
        };
        assert_eq!(err.to_string(), "Pockets is missing its count");
        assert_eq!(err.code(), CoreErrorCode::MissingCompanion);

        let err = CoreError::OutOfBounds {
            offset: 0x10,
            len: 4,
            blob_len: 0x12,
        };
        assert_eq!(
            err.to_string(),
            "access of 4 bytes at 0x10 is outside the 0x12-byte save"
        );
    }
}
