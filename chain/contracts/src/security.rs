//! Shared security primitives for contract modules
//!
//! Provides the one-shot initialization guard that stands in for a
//! constructor when contract logic runs behind a proxy.

use crate::errors::ExchangeError;

/// Version recorded by the first (and only) initialization.
pub const INITIAL_VERSION: u8 = 1;

/// One-shot initialization flag.
///
/// Starts uninitialized. [`Initializable::initialize`] checks and sets the
/// flag in one step; every later call fails with
/// [`ExchangeError::AlreadyInitialized`].
#[derive(Debug, Clone, Default)]
pub struct Initializable {
    initialized: bool,
}

impl Initializable {
    /// Create a new uninitialized guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the flag. Returns the version initialized.
    pub fn initialize(&mut self) -> Result<u8, ExchangeError> {
        if self.initialized {
            return Err(ExchangeError::AlreadyInitialized);
        }
        self.initialized = true;
        Ok(INITIAL_VERSION)
    }

    /// Check if initialization has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}
