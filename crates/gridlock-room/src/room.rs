//! A single room: two seats, one board, and the turn engine.

use std::time::{Duration, Instant};

use gridlock_protocol::{Board, GameSnapshot, RoomId, Symbol};
use gridlock_transport::ConnectionId;

use crate::{MoveRejection, RoomPhase};

/// A read-only summary of a room, for diagnostics and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub phase: RoomPhase,
    pub occupied_seats: usize,
    pub current_player: Symbol,
    pub board: Board,
}

/// Game state for one room.
///
/// Seats are indexed by symbol, so a room can never hold two
/// connections for the same symbol.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    seats: [Option<ConnectionId>; 2],
    board: Board,
    current_player: Symbol,
    /// Who opened the game in progress. `X` opens the first game.
    last_starter: Symbol,
    /// Set when the last seat empties; cleared when anyone sits down.
    vacated_at: Option<Instant>,
}

fn slot(symbol: Symbol) -> usize {
    match symbol {
        Symbol::X => 0,
        Symbol::O => 1,
    }
}

impl Room {
    /// Creates a room with both seats open, an empty board and `X` to move.
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            seats: [None, None],
            board: Board::new(),
            current_player: Symbol::X,
            last_starter: Symbol::X,
            vacated_at: None,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Symbol {
        self.current_player
    }

    pub fn last_starter(&self) -> Symbol {
        self.last_starter
    }

    /// Returns the connection holding `symbol`'s seat, if any.
    pub fn occupant(&self, symbol: Symbol) -> Option<ConnectionId> {
        self.seats[slot(symbol)]
    }

    /// Iterates over taken seats, `X` first.
    pub fn occupants(&self) -> impl Iterator<Item = (Symbol, ConnectionId)> + '_ {
        Symbol::ALL
            .into_iter()
            .filter_map(|symbol| self.occupant(symbol).map(|conn| (symbol, conn)))
    }

    /// Returns the seat held by `conn` in this room.
    pub fn seat_of(&self, conn: ConnectionId) -> Option<Symbol> {
        self.occupants()
            .find(|(_, occupant)| *occupant == conn)
            .map(|(symbol, _)| symbol)
    }

    pub fn occupied_seats(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    pub fn phase(&self) -> RoomPhase {
        RoomPhase::from_occupied(self.occupied_seats())
    }

    /// Shared board and turn state.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board,
            current_player: self.current_player,
        }
    }

    pub fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.id.clone(),
            phase: self.phase(),
            occupied_seats: self.occupied_seats(),
            current_player: self.current_player,
            board: self.board,
        }
    }

    /// How long the room has had no seated players, measured at `now`.
    pub fn idle_for(&self, now: Instant) -> Option<Duration> {
        self.vacated_at
            .map(|since| now.saturating_duration_since(since))
    }

    /// Puts `conn` in `symbol`'s seat. Callers check the seat is open.
    pub(crate) fn seat(&mut self, symbol: Symbol, conn: ConnectionId) {
        debug_assert!(self.occupant(symbol).is_none(), "seat {symbol} taken");
        self.seats[slot(symbol)] = Some(conn);
        self.vacated_at = None;
    }

    /// Frees whichever seat `conn` holds and returns it.
    pub(crate) fn vacate(&mut self, conn: ConnectionId, now: Instant) -> Option<Symbol> {
        let symbol = self.seat_of(conn)?;
        self.seats[slot(symbol)] = None;
        if self.occupied_seats() == 0 {
            self.vacated_at = Some(now);
        }
        Some(symbol)
    }

    /// Places `symbol` on `index` if the move is legal, then passes the
    /// turn to the other seat.
    ///
    /// A rejected move leaves the board and turn untouched.
    pub fn apply_move(
        &mut self,
        index: usize,
        symbol: Symbol,
    ) -> Result<GameSnapshot, MoveRejection> {
        match self.board.get(index) {
            None => return Err(MoveRejection::InvalidIndex(index)),
            Some(Some(_)) => return Err(MoveRejection::CellOccupied(index)),
            Some(None) => {}
        }
        if symbol != self.current_player {
            return Err(MoveRejection::WrongTurn {
                expected: self.current_player,
                actual: symbol,
            });
        }

        self.board.fill(index, symbol);
        self.current_player = symbol.opposite();
        Ok(self.snapshot())
    }

    /// Starts a new game with the opposite opener from the last one.
    ///
    /// Returns the new opener.
    pub fn restart(&mut self) -> Symbol {
        let starter = self.last_starter.opposite();
        self.last_starter = starter;
        self.board.clear();
        self.current_player = starter;
        starter
    }

    /// Discards the game in progress and starts a fresh one opened by `X`.
    ///
    /// `X` becomes the last starter, so the next restart hands the
    /// opening move to `O`.
    pub fn reset(&mut self) {
        self.board.clear();
        self.current_player = Symbol::X;
        self.last_starter = Symbol::X;
    }
}
