pub mod account;
pub mod memory;

pub use account::PostgresAccountRepository;
pub use memory::InMemoryAccountRepository;
