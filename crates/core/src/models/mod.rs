pub mod analysis;
pub mod holding;
pub mod settings;
