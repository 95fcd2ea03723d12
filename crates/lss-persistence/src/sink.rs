//! The per-key option write seam.

use serde_json::Value;

use crate::error::Result;

/// Host-provided persistence for widget options.
///
/// Each call stores one key; the last write for a key wins. Callers treat
/// writes as fire-and-forget and only log failures. Implementations may be
/// invoked while the caller is in the middle of a pipeline pass, and may in
/// turn notify that caller, so they take `&self`.
pub trait OptionSink {
    fn set_option(&self, key: &str, value: Value) -> Result<()>;
}

impl<S: OptionSink + ?Sized> OptionSink for &S {
    fn set_option(&self, key: &str, value: Value) -> Result<()> {
        (**self).set_option(key, value)
    }
}

impl<S: OptionSink + ?Sized> OptionSink for Box<S> {
    fn set_option(&self, key: &str, value: Value) -> Result<()> {
        (**self).set_option(key, value)
    }
}
