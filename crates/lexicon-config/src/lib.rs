//! # Lexicon Config
//!
//! Type-safe configuration for Lexicon: where localized content lives, which
//! locale to fall back to, which environment the process runs in, and how it
//! logs.
//!
//! Configuration is read from a YAML or TOML file, overridden from
//! `LEXICON_*` environment variables, and validated before use.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
