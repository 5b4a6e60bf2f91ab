// Concrete adapters for the ports in `app::ports`

pub mod address;
pub mod host_share;
pub mod sanity_client;
pub mod session_store;
