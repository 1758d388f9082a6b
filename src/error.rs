//! Failure values carried from class callbacks back to the runtime

use core::fmt;
use thiserror::Error;

use crate::object::TypeKey;

/// Exception category the runtime raises for a failed slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TypeError,
    ValueError,
    AttributeError,
    KeyError,
    IndexError,
    RuntimeError,
    SystemError,
    MemoryError,
    NotImplementedError,
}

impl ErrorKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::TypeError => "TypeError",
            Self::ValueError => "ValueError",
            Self::AttributeError => "AttributeError",
            Self::KeyError => "KeyError",
            Self::IndexError => "IndexError",
            Self::RuntimeError => "RuntimeError",
            Self::SystemError => "SystemError",
            Self::MemoryError => "MemoryError",
            Self::NotImplementedError => "NotImplementedError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A failed callback outcome, consumed exactly once by `Host::raise`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct SlotError {
    pub kind: ErrorKind,
    pub message: String,
}

impl SlotError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    pub fn value_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValueError, message)
    }

    pub fn attribute_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AttributeError, message)
    }

    pub fn key_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::KeyError, message)
    }

    pub fn index_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IndexError, message)
    }

    pub fn runtime_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RuntimeError, message)
    }

    pub fn system_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SystemError, message)
    }

    pub fn memory_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MemoryError, message)
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotImplementedError, message)
    }
}

pub type SlotResult<T> = Result<T, SlotError>;

/// Errors from bridge setup (never seen by the runtime)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("slot bridge is already installed")]
    AlreadyInstalled,
    #[error("slot bridge has not been installed")]
    NotInstalled,
    #[error("a class context is already registered for {0}")]
    AlreadyRegistered(TypeKey),
}
