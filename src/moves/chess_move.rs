//! Packed move value.
//!
//! Layout (16 bits): origin square in bits 0-5, destination in 6-11, move kind
//! in 12-13, promotion piece in 14-15. Equality is structural. The all-zero
//! value (h1 to h1, normal) can never be generated and serves as the null move.

use std::fmt;

use crate::game_state::chess_types::{PieceKind, Square};

const FROM_SHIFT: u16 = 0;
const TO_SHIFT: u16 = 6;
const KIND_SHIFT: u16 = 12;
const PROMOTION_SHIFT: u16 = 14;

const SQUARE_MASK: u16 = 0x3F;
const TWO_BIT_MASK: u16 = 0x3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    Promotion,
    EnPassant,
    Castling,
}

impl MoveKind {
    #[inline]
    const fn code(self) -> u16 {
        match self {
            MoveKind::Normal => 0,
            MoveKind::Promotion => 1,
            MoveKind::EnPassant => 2,
            MoveKind::Castling => 3,
        }
    }

    #[inline]
    const fn from_code(code: u16) -> Self {
        match code & TWO_BIT_MASK {
            1 => MoveKind::Promotion,
            2 => MoveKind::EnPassant,
            3 => MoveKind::Castling,
            _ => MoveKind::Normal,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChessMove(u16);

impl ChessMove {
    pub const NULL: ChessMove = ChessMove(0);

    #[inline]
    pub const fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Self(
            ((from as u16 & SQUARE_MASK) << FROM_SHIFT)
                | ((to as u16 & SQUARE_MASK) << TO_SHIFT)
                | (kind.code() << KIND_SHIFT),
        )
    }

    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveKind::Normal)
    }

    /// `piece` must be one of knight, bishop, rook or queen.
    #[inline]
    pub const fn promotion(from: Square, to: Square, piece: PieceKind) -> Self {
        let code = match piece {
            PieceKind::Bishop => 1,
            PieceKind::Rook => 2,
            PieceKind::Queen => 3,
            _ => 0,
        };
        Self(Self::new(from, to, MoveKind::Promotion).0 | (code << PROMOTION_SHIFT))
    }

    #[inline]
    pub const fn from(self) -> Square {
        ((self.0 >> FROM_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub const fn to(self) -> Square {
        ((self.0 >> TO_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub const fn kind(self) -> MoveKind {
        MoveKind::from_code(self.0 >> KIND_SHIFT)
    }

    #[inline]
    pub const fn promotion_piece(self) -> Option<PieceKind> {
        match self.kind() {
            MoveKind::Promotion => Some(match (self.0 >> PROMOTION_SHIFT) & TWO_BIT_MASK {
                0 => PieceKind::Knight,
                1 => PieceKind::Bishop,
                2 => PieceKind::Rook,
                _ => PieceKind::Queen,
            }),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == Self::NULL.0
    }
}

impl fmt::Debug for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "ChessMove(null)");
        }
        write!(
            f,
            "ChessMove({}->{} {:?}",
            self.from(),
            self.to(),
            self.kind()
        )?;
        if let Some(piece) = self.promotion_piece() {
            write!(f, " ={piece:?}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::{ChessMove, MoveKind};
    use crate::game_state::chess_types::PieceKind;

    #[test]
    fn fields_survive_packing() {
        let mv = ChessMove::new(12, 28, MoveKind::Normal);
        assert_eq!(mv.from(), 12);
        assert_eq!(mv.to(), 28);
        assert_eq!(mv.kind(), MoveKind::Normal);
        assert_eq!(mv.promotion_piece(), None);

        let castle = ChessMove::new(3, 1, MoveKind::Castling);
        assert_eq!(castle.kind(), MoveKind::Castling);
        assert_ne!(castle, ChessMove::normal(3, 1));
    }

    #[test]
    fn promotion_pieces_are_distinct() {
        let moves: Vec<ChessMove> = PieceKind::PROMOTIONS
            .iter()
            .map(|&p| ChessMove::promotion(52, 60, p))
            .collect();
        for (mv, piece) in moves.iter().zip(PieceKind::PROMOTIONS) {
            assert_eq!(mv.promotion_piece(), Some(piece));
            assert_eq!(mv.kind(), MoveKind::Promotion);
        }
        assert_ne!(moves[0], moves[3]);
    }

    #[test]
    fn null_move() {
        assert!(ChessMove::NULL.is_null());
        assert!(!ChessMove::normal(0, 1).is_null());
        assert_eq!(ChessMove::default(), ChessMove::NULL);
    }
}
