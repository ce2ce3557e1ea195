// Domain layer: models and ports for the collaborators the query core talks to.

pub mod model;
pub mod ports;
