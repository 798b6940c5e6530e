//! Canonical chess-rule constants.
//!
//! Static literals used to initialize positions and to decide draws by rule.

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Capacity of a generated move list. The most mobile legal position known
/// has 218 moves.
pub const MAX_MOVES: usize = 256;

/// Plies without a pawn move or capture after which the game is drawn.
pub const FIFTY_MOVE_HALFMOVES: u16 = 100;

/// Occurrences of one position (current one included) that draw the game.
pub const REPETITION_DRAW_COUNT: usize = 3;
