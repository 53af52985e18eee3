pub mod analysis;
pub mod ladder;
pub mod model;
