// Domain layer: envelope models and ports (interfaces).

pub mod model;
pub mod ports;
