//! UCI move-literal conversion.
//!
//! The board primitives encode castling as the king capturing its own rook
//! (`e1h1`), while the UCI protocol expects the two-square king hop
//! (`e1g1`). Both conversions live here so the rest of the engine only ever
//! sees board-native moves.

use cozy_chess::{Board, File, Move, Piece, Square};

/// Format a board-native move as a standard UCI literal.
pub fn format_move(board: &Board, mv: Move) -> String {
    if is_castling(board, mv) {
        let file = if (mv.to.file() as i8) > (mv.from.file() as i8) {
            File::G
        } else {
            File::C
        };
        let king_to = Square::new(file, mv.from.rank());
        return format!("{}{}", mv.from, king_to);
    }
    mv.to_string()
}

/// Parse a UCI literal into the matching legal move, or `None` if the
/// literal is malformed or the move is illegal in `board`.
pub fn parse_move(board: &Board, literal: &str) -> Option<Move> {
    let mut mv: Move = literal.parse().ok()?;

    // Standard castling literal: king hops two files. Translate to the
    // board-native king-takes-rook encoding.
    if board.piece_on(mv.from) == Some(Piece::King) {
        let from_file = mv.from.file() as i8;
        let to_file = mv.to.file() as i8;
        if (from_file - to_file).abs() == 2 {
            let rook_file = if to_file > from_file { File::H } else { File::A };
            mv.to = Square::new(rook_file, mv.from.rank());
        }
    }

    let mut found = None;
    board.generate_moves(|batch| {
        for candidate in batch {
            if candidate == mv {
                found = Some(candidate);
                return true;
            }
        }
        false
    });
    found
}

fn is_castling(board: &Board, mv: Move) -> bool {
    board.piece_on(mv.from) == Some(Piece::King)
        && board.color_on(mv.to) == Some(board.side_to_move())
        && board.piece_on(mv.to) == Some(Piece::Rook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cozy_chess::Board;

    fn board(fen: &str) -> Board {
        fen.parse().unwrap()
    }

    #[test]
    fn plain_move_round_trips() {
        let b = Board::default();
        let mv = parse_move(&b, "e2e4").unwrap();
        assert_eq!(format_move(&b, mv), "e2e4");
    }

    #[test]
    fn promotion_round_trips() {
        let b = board("7k/4P3/8/8/8/8/8/4K3 w - - 0 1");
        let mv = parse_move(&b, "e7e8q").unwrap();
        assert_eq!(mv.promotion, Some(Piece::Queen));
        assert_eq!(format_move(&b, mv), "e7e8q");
    }

    #[test]
    fn kingside_castling_round_trips() {
        let b = board("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        let mv = parse_move(&b, "e1g1").unwrap();
        // Board-native form targets the rook square.
        assert_eq!(mv.to, Square::H1);
        assert_eq!(format_move(&b, mv), "e1g1");
    }

    #[test]
    fn queenside_castling_round_trips() {
        let b = board("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R b KQkq - 0 1");
        let mv = parse_move(&b, "e8c8").unwrap();
        assert_eq!(mv.to, Square::A8);
        assert_eq!(format_move(&b, mv), "e8c8");
    }

    #[test]
    fn illegal_move_rejected() {
        let b = Board::default();
        assert!(parse_move(&b, "e2e5").is_none());
        assert!(parse_move(&b, "e7e5").is_none());
        assert!(parse_move(&b, "zz99").is_none());
    }

    #[test]
    fn every_legal_move_round_trips() {
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
            "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N w - - 0 1",
        ];
        for fen in fens {
            let b = board(fen);
            let mut moves = Vec::new();
            b.generate_moves(|batch| {
                moves.extend(batch);
                false
            });
            for mv in moves {
                let literal = format_move(&b, mv);
                let parsed = parse_move(&b, &literal)
                    .unwrap_or_else(|| panic!("failed to re-parse {literal} in {fen}"));
                assert_eq!(parsed, mv, "round trip mismatch for {literal} in {fen}");
            }
        }
    }
}
