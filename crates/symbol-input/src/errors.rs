use thiserror::Error;

/// Errors returned by [`SymbolInputHandle`](crate::SymbolInputHandle) operations.
///
/// Lookup failures never show up here; they are folded into the input's
/// visible state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolInputError {
    /// The input's event loop has stopped.
    #[error("Symbol input is closed")]
    Closed,

    /// The field is disabled and does not accept text.
    #[error("Symbol input is disabled")]
    Disabled,
}

pub type Result<T> = std::result::Result<T, SymbolInputError>;
