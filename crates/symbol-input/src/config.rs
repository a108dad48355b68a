use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Quiet period before a search is sent.
pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(300);

/// Quiet period before a validation is sent.
pub const DEFAULT_VALIDATE_DELAY: Duration = Duration::from_millis(800);

/// Shorter queries clear the candidate list instead of searching.
pub const DEFAULT_MIN_SEARCH_LEN: usize = 2;

/// Shorter text is not considered a complete symbol.
pub const DEFAULT_MIN_VALIDATE_LEN: usize = 3;

/// Presentation flags of the symbol field.
///
/// They decide what the surrounding form shows and whether confirmed
/// prices are pushed; they never change debounce or staleness handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputFlags {
    pub show_price: bool,
    pub auto_fetch_price: bool,
    pub disabled: bool,
    pub required: bool,
}

impl Default for InputFlags {
    fn default() -> Self {
        Self {
            show_price: true,
            auto_fetch_price: false,
            disabled: false,
            required: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolInputConfig {
    pub search_delay: Duration,
    pub validate_delay: Duration,
    pub min_search_len: usize,
    pub min_validate_len: usize,
    pub flags: InputFlags,
}

impl Default for SymbolInputConfig {
    fn default() -> Self {
        Self {
            search_delay: DEFAULT_SEARCH_DELAY,
            validate_delay: DEFAULT_VALIDATE_DELAY,
            min_search_len: DEFAULT_MIN_SEARCH_LEN,
            min_validate_len: DEFAULT_MIN_VALIDATE_LEN,
            flags: InputFlags::default(),
        }
    }
}

impl SymbolInputConfig {
    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = delay;
        self
    }

    pub fn with_validate_delay(mut self, delay: Duration) -> Self {
        self.validate_delay = delay;
        self
    }

    pub fn with_flags(mut self, flags: InputFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Push confirmed prices to the listener.
    pub fn with_auto_fetch_price(mut self, enabled: bool) -> Self {
        self.flags.auto_fetch_price = enabled;
        self
    }
}
