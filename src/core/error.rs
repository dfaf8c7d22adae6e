//! Errors raised by the world mutation API.
//!
//! Deferred effects never propagate these: a failing mutation inside
//! `fire` is logged and the effect degrades to a no-op. Callers using the
//! world directly get a normal `Result`.

use thiserror::Error;

use super::actor::ActorId;
use super::coord::Coord;

/// Failure of a world mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("{0} is not in the actor directory")]
    ActorNotFound(ActorId),

    #[error("{0} is outside the map")]
    OutOfBounds(Coord),

    #[error("{0} is not passable")]
    Impassable(Coord),

    #[error("{pos} is occupied by {occupant}")]
    Occupied { pos: Coord, occupant: ActorId },

    #[error("no free cell within {radius} of {center}")]
    NoRoom { center: Coord, radius: i32 },
}

/// Result type for world mutations.
pub type WorldResult<T> = std::result::Result<T, WorldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = WorldError::ActorNotFound(ActorId(9));
        assert_eq!(err.to_string(), "Actor(9) is not in the actor directory");

        let err = WorldError::Occupied {
            pos: Coord::new(1, 2),
            occupant: ActorId(4),
        };
        assert_eq!(err.to_string(), "(1, 2) is occupied by Actor(4)");
    }
}
