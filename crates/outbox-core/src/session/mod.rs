//! Session lifecycle: in-memory registry, persistence trait, and the manager
//! that ties them to the channel transport.

pub mod manager;
pub mod registry;
pub mod repository;

pub use manager::SessionManager;
pub use registry::SessionRegistry;
pub use repository::SessionRepository;
