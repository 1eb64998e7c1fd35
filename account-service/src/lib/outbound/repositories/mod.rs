pub mod memory;

pub use memory::InMemorySecretStore;
