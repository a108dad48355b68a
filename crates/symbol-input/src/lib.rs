//! Trade Journal Symbol Input
//!
//! Asynchronous symbol resolution behind the stock search field of the
//! trade journal forms. As the user types, the input
//!
//! - searches the symbol directory after a short quiet period (300 ms),
//! - validates and prices the symbol after a longer one (800 ms, only once
//!   the text looks like a full symbol),
//! - drops any response that belongs to text the user has since changed.
//!
//! # Architecture
//!
//! ```text
//!  keystroke ──> DebounceScheduler ──(timer due)──> ResolutionEngine ──> StockLookupService
//!                     │ token                              │
//!                     v                                    v
//!                InputSession  <──(token check)──  InputState (visible)
//! ```
//!
//! - [`DebounceScheduler`] owns the [`InputSession`] and both [`DebounceTimer`]s
//! - [`ResolutionEngine`] turns lookup answers and errors into values
//! - [`InputState`] applies responses only for the current [`SessionToken`]
//! - [`SymbolInput`] runs all of the above in one task and publishes
//!   [`InputSnapshot`]s

pub mod config;
pub mod engine;
pub mod errors;
pub mod reconcile;
pub mod scheduler;
pub mod session;
pub mod timer;
pub mod widget;

pub use config::{InputFlags, SymbolInputConfig};
pub use engine::{ResolutionEngine, ValidSymbol, ValidationResult};
pub use errors::SymbolInputError;
pub use reconcile::{InputState, ValidationApplied, ValidationStatus};
pub use scheduler::{DebounceScheduler, TextChange};
pub use session::{InputSession, PendingRequest, RequestKind, SessionToken};
pub use timer::DebounceTimer;
pub use widget::{
    InputSnapshot, NoopListener, SymbolInput, SymbolInputHandle, SymbolInputListener,
    REQUIRED_MESSAGE,
};
