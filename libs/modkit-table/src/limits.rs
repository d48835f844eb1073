//! Request-side caps for table queries
//!
//! Hosts load this section from their configuration tree; every field has a
//! default so an empty section is valid:
//!
//! ```yaml
//! table:
//!   max_top: 500
//! ```

use serde::Deserialize;

use crate::{Error, Filter, Result};

/// Largest page the table service returns.
pub const SERVICE_MAX_TOP: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableLimits {
    /// Maximum value for $top (default: 1000)
    pub max_top: u32,
    /// Maximum length of the rendered $filter in bytes (default: 32768)
    pub max_filter_length: usize,
    /// Maximum nesting depth of a $filter tree (default: 128)
    pub max_filter_depth: usize,
}

impl Default for TableLimits {
    fn default() -> Self {
        Self {
            max_top: SERVICE_MAX_TOP,
            max_filter_length: 32 * 1024,
            max_filter_depth: 128,
        }
    }
}

impl TableLimits {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_top(mut self, max_top: u32) -> Self {
        self.max_top = max_top;
        self
    }

    #[must_use]
    pub fn with_max_filter_length(mut self, max: usize) -> Self {
        self.max_filter_length = max;
        self
    }

    #[must_use]
    pub fn with_max_filter_depth(mut self, max: usize) -> Self {
        self.max_filter_depth = max;
        self
    }

    /// Validate a $top value against limits
    ///
    /// # Errors
    /// Returns `Error::InvalidTop` for zero or values above `max_top`.
    pub fn validate_top(&self, top: u32) -> Result<()> {
        if top == 0 || top > self.max_top {
            return Err(Error::InvalidTop(top));
        }
        Ok(())
    }

    /// Validate a rendered $filter expression length
    ///
    /// # Errors
    /// Returns `Error::InvalidFilter` if the expression is too long.
    pub fn validate_filter(&self, filter: &str) -> Result<()> {
        if filter.len() > self.max_filter_length {
            return Err(Error::InvalidFilter(format!(
                "expression exceeds maximum length of {} bytes",
                self.max_filter_length
            )));
        }
        Ok(())
    }

    /// Validate the nesting depth of a filter tree before it is rendered
    ///
    /// # Errors
    /// Returns `Error::InvalidFilter` if the tree is nested too deeply.
    pub fn validate_filter_depth(&self, filter: &Filter) -> Result<()> {
        let depth = filter.depth();
        if depth > self.max_filter_depth {
            return Err(Error::InvalidFilter(format!(
                "expression depth {depth} exceeds maximum of {}",
                self.max_filter_depth
            )));
        }
        Ok(())
    }
}
