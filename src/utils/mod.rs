//! Utility modules shared across the service.

pub mod date;
pub mod mime;
pub mod xml;
