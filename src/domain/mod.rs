// Domain layer: the record model and the ports (codec, storage). No I/O here.

pub mod model;
pub mod ports;
