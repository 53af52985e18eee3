pub mod live;
pub mod reveni;
