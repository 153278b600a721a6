//! In-memory repository implementations.

mod lobby;

pub use lobby::InMemoryLobbyRepository;
