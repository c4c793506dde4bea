// Domain layer: record model and ports (interfaces) implemented by core and config.

pub mod model;
pub mod ports;
