pub mod catalog_loader;
pub mod ports;
pub mod share;
