pub mod fixtures;
pub mod tables;
