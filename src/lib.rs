//! BGT to Python source converter.
//!
//! Brace-delimited BGT scripts are rewritten line by line into Python, with
//! block nesting inferred from a running brace count. A coverage audit flags
//! runtime API names the script mentions so they can be checked by hand.

pub mod audit;
pub mod batch;
pub mod error;
pub mod logging;
pub mod translate;
