#![deny(missing_docs)]
//! This lib provide several utilities for use in the `sip-locator` project.

pub mod arcstr;
pub mod dns_resolver;

pub use arcstr::*;
pub use dns_resolver::*;
