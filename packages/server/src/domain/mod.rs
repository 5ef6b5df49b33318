//! Domain layer: the session engine, duel coordination and the interfaces
//! of its collaborators.

pub mod connection;
pub mod dictionary;
pub mod duel;
pub mod entity;
pub mod error;
pub mod evaluator;
pub mod message_pusher;
pub mod repository;
pub mod value_object;
pub mod word_pool;

pub use connection::ConnectionRegistry;
pub use dictionary::Dictionary;
pub use duel::{DuelOutcome, PlayerResult, determine_outcome};
pub use entity::{
    Attachment, DuelHandshake, GameMode, GameResult, GuessOutcome, GuessReport, PlayerState,
    PlayerView, Session,
};
pub use error::{MessagePushError, RepositoryError, SessionError, ValueObjectError};
pub use evaluator::{TileState, evaluate};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{SessionHandle, SessionRepository};
pub use value_object::{
    ConnectionId, ConnectionIdFactory, GameConfig, PlayerName, SessionId, SessionIdFactory,
    Timestamp,
};
pub use word_pool::WordPool;
