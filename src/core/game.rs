//! Two-player game session state machine
//! Owns the 3x3 board, symbol assignment and turn alternation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GridMatchError, Result};

pub const BOARD_SIZE: usize = 3;

/// Marker a participant places, assigned at pairing time and fixed
/// for the whole session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    pub fn other(&self) -> Symbol {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Finished,
    Abandoned,
}

/// One two-player game instance
#[derive(Debug)]
pub struct GameSession {
    pub id: String,
    pub player_x: String,
    pub player_o: String,
    pub board: [[Option<Symbol>; BOARD_SIZE]; BOARD_SIZE],
    pub current_turn: String,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
}

impl GameSession {
    /// Pair two players; the first takes X and the opening turn
    pub fn new(player_x: String, player_o: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            current_turn: player_x.clone(),
            player_x,
            player_o,
            board: [[None; BOARD_SIZE]; BOARD_SIZE],
            status: SessionStatus::Active,
            started_at: Utc::now(),
        }
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.player_x == player_id || self.player_o == player_id
    }

    pub fn symbol_of(&self, player_id: &str) -> Option<Symbol> {
        if self.player_x == player_id {
            Some(Symbol::X)
        } else if self.player_o == player_id {
            Some(Symbol::O)
        } else {
            None
        }
    }

    pub fn opponent_of(&self, player_id: &str) -> Option<&str> {
        if self.player_x == player_id {
            Some(&self.player_o)
        } else if self.player_o == player_id {
            Some(&self.player_x)
        } else {
            None
        }
    }

    /// Validate and apply a move, returning the symbol that was placed.
    ///
    /// The board mutates only after every precondition has passed; a
    /// rejected move leaves board and turn untouched. Play continues past
    /// three-in-a-row: the session never transitions to Finished on its own.
    pub fn apply_move(&mut self, player_id: &str, row: usize, col: usize) -> Result<Symbol> {
        if self.status != SessionStatus::Active {
            return Err(GridMatchError::GameStateError(
                "Game is no longer active".to_string(),
            ));
        }
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(GridMatchError::ValidationError(format!(
                "Row and column must be between 0 and {}",
                BOARD_SIZE - 1
            )));
        }
        if self.current_turn != player_id {
            return Err(GridMatchError::GameStateError("Not your turn".to_string()));
        }
        if self.board[row][col].is_some() {
            return Err(GridMatchError::GameStateError(
                "Cell is already taken".to_string(),
            ));
        }

        let (symbol, next_turn) = match (self.symbol_of(player_id), self.opponent_of(player_id)) {
            (Some(symbol), Some(opponent)) => (symbol, opponent.to_string()),
            _ => {
                return Err(GridMatchError::GameStateError(
                    "Not a participant in this game".to_string(),
                ))
            }
        };

        self.board[row][col] = Some(symbol);
        self.current_turn = next_turn;
        Ok(symbol)
    }

    pub fn abandon(&mut self) {
        self.status = SessionStatus::Abandoned;
    }
}
