pub mod actions;
pub mod migrations;
pub mod model;
pub mod sort;
pub mod store;
