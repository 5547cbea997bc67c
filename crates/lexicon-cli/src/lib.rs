//! # Lexicon CLI
//!
//! Resolves the localized content for a single request described on the
//! command line and prints it as JSON.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod error;

pub use app::*;
pub use error::*;
