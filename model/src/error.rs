use std::fmt::Display;

/// Elaborates errors that may be emitted while encoding or decoding register values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The value does not fit in the destination field.
    OutOfRange {
        field: &'static str,
        value: u32,
        limit: u32,
    },
    /// The register has no field with the requested name.
    UnknownField { register: String, field: String },
    /// The memory has no element at the requested index.
    OutOfBounds {
        memory: String,
        index: u32,
        depth: u32,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::OutOfRange {
                field,
                value,
                limit,
            } => write!(
                f,
                "value 0x{value:x} does not fit field \"{field}\" (largest is 0x{limit:x})"
            ),
            Error::UnknownField { register, field } => {
                write!(f, "register \"{register}\" has no field \"{field}\"")
            }
            Error::OutOfBounds {
                memory,
                index,
                depth,
            } => write!(
                f,
                "index {index} is outside memory \"{memory}\" of depth {depth}"
            ),
        }
    }
}

impl std::error::Error for Error {}
