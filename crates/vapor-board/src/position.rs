//! Position façade over the external board primitives.
//!
//! The search mutates a [`Position`] strictly through `make`/`unmake` pairs;
//! every other accessor is read-only. The position carries the hash history
//! of everything played since game start (plus the current search path), so
//! repetition detection works across the game/search boundary.

use cozy_chess::{Board, Color, FenParseError, Move, Piece, Rank, Square};

/// A chess position plus the history needed for draw detection.
///
/// `make` pushes the pre-move board onto an internal stack, so `unmake`
/// restores every observable field (hash included) exactly.
#[derive(Debug, Clone)]
pub struct Position {
    board: Board,
    /// Hashes of all prior positions, game history first, search path after.
    history: Vec<u64>,
    /// Boards saved by `make`, popped by `unmake`.
    stack: Vec<Board>,
}

impl Position {
    /// The standard starting position with empty history.
    pub fn startpos() -> Self {
        Self::from_board(Board::default())
    }

    /// Set up from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenParseError> {
        Ok(Self::from_board(fen.parse()?))
    }

    fn from_board(board: Board) -> Self {
        Self {
            board,
            history: Vec::with_capacity(256),
            stack: Vec::with_capacity(256),
        }
    }

    /// The underlying board, for read-only evaluation and ordering code.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// Zobrist hash of the current position.
    pub fn hash(&self) -> u64 {
        self.board.hash()
    }

    /// Plies since the last capture or pawn move.
    pub fn halfmove_clock(&self) -> u8 {
        self.board.halfmove_clock()
    }

    pub fn fullmove_number(&self) -> u16 {
        self.board.fullmove_number()
    }

    /// All legal moves in the current position.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.board.generate_moves(|batch| {
            moves.extend(batch);
            false
        });
        moves
    }

    pub fn in_check(&self) -> bool {
        !self.board.checkers().is_empty()
    }

    /// Whether `mv` would leave the opponent in check.
    pub fn gives_check(&self, mv: Move) -> bool {
        gives_check(&self.board, mv)
    }

    /// Whether `mv` captures (including en passant).
    pub fn is_capture(&self, mv: Move) -> bool {
        is_capture(&self.board, mv)
    }

    /// Play a legal move, recording state for `unmake`.
    pub fn make(&mut self, mv: Move) {
        self.stack.push(self.board.clone());
        self.history.push(self.board.hash());
        self.board.play_unchecked(mv);
    }

    /// Undo the most recent `make` (or `make_null`).
    pub fn unmake(&mut self) {
        self.board = self.stack.pop().expect("unmake without matching make");
        self.history.pop();
    }

    /// Pass the turn, if legal (not in check). Returns whether it happened.
    pub fn make_null(&mut self) -> bool {
        match self.board.null_move() {
            Some(next) => {
                self.stack.push(self.board.clone());
                self.history.push(self.board.hash());
                self.board = next;
                true
            }
            None => false,
        }
    }

    /// Undo a `make_null`.
    pub fn unmake_null(&mut self) {
        self.unmake();
    }

    /// Whether the current position completes a threefold repetition: it has
    /// already occurred at least twice in the reversible-move window of the
    /// game-plus-search history.
    pub fn is_repetition(&self) -> bool {
        let current = self.board.hash();
        let window = self.board.halfmove_clock() as usize;
        self.history
            .iter()
            .rev()
            .take(window)
            .filter(|&&h| h == current)
            .count()
            >= 2
    }

    /// Draw by bare material: no pawns, rooks, or queens, and at most one
    /// minor piece on the board.
    pub fn insufficient_material(&self) -> bool {
        let heavy = self.board.pieces(Piece::Pawn)
            | self.board.pieces(Piece::Rook)
            | self.board.pieces(Piece::Queen);
        if !heavy.is_empty() {
            return false;
        }
        let minors = self.board.pieces(Piece::Knight) | self.board.pieces(Piece::Bishop);
        minors.len() <= 1
    }

    /// Whether `color` has any piece besides pawns and the king.
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        let non_pawn = self.board.pieces(Piece::Knight)
            | self.board.pieces(Piece::Bishop)
            | self.board.pieces(Piece::Rook)
            | self.board.pieces(Piece::Queen);
        !(non_pawn & self.board.colors(color)).is_empty()
    }

    /// Parse a UCI move literal against this position. See [`crate::parse_move`].
    pub fn parse_move(&self, literal: &str) -> Option<Move> {
        crate::moves::parse_move(&self.board, literal)
    }

    /// Format a move as a UCI literal. See [`crate::format_move`].
    pub fn format_move(&self, mv: Move) -> String {
        crate::moves::format_move(&self.board, mv)
    }
}

/// Whether `mv` captures on `board` (including en passant).
pub fn is_capture(board: &Board, mv: Move) -> bool {
    if board.color_on(mv.to) == Some(!board.side_to_move()) {
        return true;
    }
    // En passant: a pawn moving diagonally onto the en-passant file's
    // sixth-rank square (relative to the mover) with no piece on it.
    if board.piece_on(mv.from) == Some(Piece::Pawn)
        && let Some(ep_file) = board.en_passant()
    {
        let ep_square = Square::new(ep_file, Rank::Sixth.relative_to(board.side_to_move()));
        return mv.to == ep_square && mv.from.file() != mv.to.file();
    }
    false
}

/// Whether playing `mv` on `board` checks the opponent.
pub fn gives_check(board: &Board, mv: Move) -> bool {
    let mut next = board.clone();
    next.play_unchecked(mv);
    !next.checkers().is_empty()
}
