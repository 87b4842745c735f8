// Domain layer: request-scoped models and the ports the selector depends on.

pub mod model;
pub mod ports;
