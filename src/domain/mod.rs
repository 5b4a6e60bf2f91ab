// Domain data shapes shared across layers

pub mod work;

pub use work::{Catalog, WorkItem};
