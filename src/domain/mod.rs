// Domain layer: the JSON object model and the serializable capability.

pub mod model;
pub mod ports;
