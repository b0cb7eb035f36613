pub mod converter;
pub mod registry;

pub use crate::domain::model::{Conversion, Record, Row};
pub use crate::domain::ports::{Codec, Storage};
pub use crate::utils::error::Result;
