pub mod export;
pub mod filename;
pub mod import;
pub mod model;
