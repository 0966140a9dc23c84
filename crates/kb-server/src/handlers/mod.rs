//! HTTP request handlers.

pub(crate) mod content;
pub(crate) mod health;
pub(crate) mod navigation;
