pub mod index;
pub mod loader;
