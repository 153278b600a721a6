//! Domain layer for the relay server.
//!
//! This module contains the lobby model and the repository contract,
//! independent of DTOs and transport concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{Connection, Lobby};
pub use error::{LobbyError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use repository::{LobbyRepository, RepositoryError};
#[cfg(test)]
pub use repository::MockLobbyRepository;
pub use value_object::{ConnectionId, Timestamp};
