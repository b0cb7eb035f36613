// Format codecs. Each one is self-contained and shares nothing but the record model.

pub mod csv_format;
pub mod json_format;
pub mod python;
pub mod unimplemented;

pub use csv_format::CsvCodec;
pub use json_format::JsonCodec;
pub use python::PythonLiteralCodec;
pub use unimplemented::UnimplementedCodec;
