use std::fmt::Display;

use model::field::Access;

/// Elaborates errors that may be emitted while accessing the hardware.
///
/// `E` is the error type of the [`Bus`](crate::Bus) collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error<E> {
    /// A value does not fit in its destination field. Raised before any bus access.
    OutOfRange {
        field: &'static str,
        value: u32,
        limit: u32,
    },
    /// A probe operation was requested in a state that does not permit it.
    InvalidState {
        operation: &'static str,
        reason: &'static str,
    },
    /// The targeted map or revision lacks the requested register, field or stage.
    Unsupported {
        operation: String,
        revision: u32,
    },
    UnknownRegister(String),
    UnknownField { register: String, field: String },
    /// An index past the end of a memory.
    OutOfBounds {
        memory: String,
        index: u32,
        depth: u32,
    },
    /// A read of a write-only field or a write of a read-only field.
    Access {
        register: String,
        field: &'static str,
        access: Access,
    },
    /// The bus collaborator failed. The error is passed through verbatim.
    Bus(E),
}

impl<E> From<model::Error> for Error<E> {
    fn from(value: model::Error) -> Self {
        match value {
            model::Error::OutOfRange {
                field,
                value,
                limit,
            } => Self::OutOfRange {
                field,
                value,
                limit,
            },
            model::Error::UnknownField { register, field } => {
                Self::UnknownField { register, field }
            }
            model::Error::OutOfBounds {
                memory,
                index,
                depth,
            } => Self::OutOfBounds {
                memory,
                index,
                depth,
            },
        }
    }
}

impl<E> Display for Error<E>
where
    E: Display,
{
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
            Error::InvalidState { operation, reason } => {
                write!(f, "cannot {operation}: {reason}")
            }
            Error::Unsupported {
                operation,
                revision,
            } => write!(f, "{operation} is not supported by revision {revision}"),
            Error::UnknownRegister(name) => write!(f, "no register named \"{name}\""),
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
            Error::Access {
                register,
                field,
                access,
            } => write!(f, "field \"{register}.{field}\" is {access}"),
            Error::Bus(e) => write!(f, "bus error: {e}"),
        }
    }
}

impl<E> std::error::Error for Error<E> where E: std::error::Error {}
