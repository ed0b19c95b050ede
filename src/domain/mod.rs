// Domain layer: models and ports shared by the executor and the pools.

pub mod model;
pub mod ports;
