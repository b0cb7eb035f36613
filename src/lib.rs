pub mod adapters;
#[cfg(feature = "cli")]
pub mod config;
pub mod core;
pub mod domain;
pub mod formats;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::storage::LocalStorage;
pub use crate::core::{
    converter::Converter, registry::Registry, Codec, Conversion, Record, Row, Storage,
};
pub use crate::utils::error::{ConvertError, Result};
