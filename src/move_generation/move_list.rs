//! Fixed-capacity move buffer.
//!
//! Legal positions never exceed 218 moves. Pushing past capacity is reported
//! as an error rather than truncated.

use std::ops::Deref;

use crate::game_state::chess_rules::MAX_MOVES;
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerationError};
use crate::moves::chess_move::ChessMove;

#[derive(Clone)]
pub struct MoveList {
    moves: [ChessMove; MAX_MOVES],
    len: usize,
}

impl MoveList {
    #[inline]
    pub const fn new() -> Self {
        Self {
            moves: [ChessMove::NULL; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: ChessMove) -> MoveGenResult<()> {
        if self.len == MAX_MOVES {
            return Err(MoveGenerationError::CapacityExceeded {
                capacity: MAX_MOVES,
            });
        }
        self.moves[self.len] = mv;
        self.len += 1;
        Ok(())
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn as_slice(&self) -> &[ChessMove] {
        &self.moves[..self.len]
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for MoveList {
    type Target = [ChessMove];

    fn deref(&self) -> &[ChessMove] {
        self.as_slice()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a ChessMove;
    type IntoIter = std::slice::Iter<'a, ChessMove>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::MoveList;
    use crate::game_state::chess_rules::MAX_MOVES;
    use crate::move_generation::move_generator::MoveGenerationError;
    use crate::moves::chess_move::ChessMove;

    #[test]
    fn push_until_full_then_error() {
        let mut list = MoveList::new();
        for i in 0..MAX_MOVES {
            list.push(ChessMove::normal((i % 64) as u8, ((i + 1) % 64) as u8))
                .expect("within capacity");
        }
        assert_eq!(list.len(), MAX_MOVES);
        assert_eq!(
            list.push(ChessMove::normal(1, 2)),
            Err(MoveGenerationError::CapacityExceeded { capacity: MAX_MOVES })
        );
        assert_eq!(list.len(), MAX_MOVES);
    }

    #[test]
    fn slice_view_tracks_len() {
        let mut list = MoveList::new();
        assert!(list.is_empty());
        list.push(ChessMove::normal(8, 16)).expect("push");
        assert!(list.contains(&ChessMove::normal(8, 16)));
        assert_eq!(list.iter().count(), 1);
        list.clear();
        assert!(list.is_empty());
    }
}
