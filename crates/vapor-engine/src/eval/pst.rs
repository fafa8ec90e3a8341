//! Piece-square tables for all six piece types.
//!
//! All tables are defined from White's perspective in LERF order: index 0 =
//! a1, index 7 = h1, index 8 = a2, ..., index 63 = h8. Black lookups mirror
//! the square vertically. Each entry carries an opening and an endgame value;
//! the evaluator blends them by the continuous game phase.

use cozy_chess::{Board, Color, Piece, Square};

use crate::eval::score::{S, Score};

#[rustfmt::skip]
const PAWN_PST: [Score; 64] = [
    // Rank 1 — never occupied
    S(0,0),   S(0,0),   S(0,0),   S(0,0),    S(0,0),    S(0,0),   S(0,0),   S(0,0),
    // Rank 2
    S(5,0),   S(10,0),  S(10,-5), S(-20,-5), S(-20,-5), S(10,-5), S(10,0),  S(5,0),
    // Rank 3
    S(5,0),   S(-5,0),  S(-10,0), S(0,5),    S(0,5),    S(-10,0), S(-5,0),  S(5,0),
    // Rank 4
    S(0,5),   S(0,5),   S(0,10),  S(20,15),  S(20,15),  S(0,10),  S(0,5),   S(0,5),
    // Rank 5
    S(5,10),  S(5,10),  S(10,15), S(25,20),  S(25,20),  S(10,15), S(5,10),  S(5,10),
    // Rank 6
    S(10,25), S(10,25), S(20,30), S(30,35),  S(30,35),  S(20,30), S(10,25), S(10,25),
    // Rank 7
    S(50,80), S(50,80), S(50,80), S(50,80),  S(50,80),  S(50,80), S(50,80), S(50,80),
    // Rank 8 — never occupied
    S(0,0),   S(0,0),   S(0,0),   S(0,0),    S(0,0),    S(0,0),   S(0,0),   S(0,0),
];

#[rustfmt::skip]
const KNIGHT_PST: [Score; 64] = [
    S(-50,-50), S(-40,-40), S(-30,-30), S(-30,-30), S(-30,-30), S(-30,-30), S(-40,-40), S(-50,-50),
    S(-40,-40), S(-20,-20), S(0,0),     S(5,5),     S(5,5),     S(0,0),     S(-20,-20), S(-40,-40),
    S(-30,-30), S(0,0),     S(10,10),   S(15,15),   S(15,15),   S(10,10),   S(0,0),     S(-30,-30),
    S(-30,-30), S(5,5),     S(15,15),   S(20,20),   S(20,20),   S(15,15),   S(5,5),     S(-30,-30),
    S(-30,-30), S(0,5),     S(15,15),   S(20,20),   S(20,20),   S(15,15),   S(0,5),     S(-30,-30),
    S(-30,-30), S(5,0),     S(10,10),   S(15,15),   S(15,15),   S(10,10),   S(5,0),     S(-30,-30),
    S(-40,-40), S(-20,-20), S(0,0),     S(0,0),     S(0,0),     S(0,0),     S(-20,-20), S(-40,-40),
    S(-50,-50), S(-40,-40), S(-30,-30), S(-30,-30), S(-30,-30), S(-30,-30), S(-40,-40), S(-50,-50),
];

#[rustfmt::skip]
const BISHOP_PST: [Score; 64] = [
    S(-20,-20), S(-10,-10), S(-10,-10), S(-10,-10), S(-10,-10), S(-10,-10), S(-10,-10), S(-20,-20),
    S(-10,-10), S(5,0),     S(0,0),     S(0,0),     S(0,0),     S(0,0),     S(5,0),     S(-10,-10),
    S(-10,-10), S(10,5),    S(10,5),    S(10,10),   S(10,10),   S(10,5),    S(10,5),    S(-10,-10),
    S(-10,-5),  S(0,0),     S(10,10),   S(10,10),   S(10,10),   S(10,10),   S(0,0),     S(-10,-5),
    S(-10,-5),  S(5,5),     S(5,10),    S(10,10),   S(10,10),   S(5,10),    S(5,5),     S(-10,-5),
    S(-10,-5),  S(0,0),     S(5,5),     S(10,10),   S(10,10),   S(5,5),     S(0,0),     S(-10,-5),
    S(-10,-10), S(0,0),     S(0,0),     S(0,0),     S(0,0),     S(0,0),     S(0,0),     S(-10,-10),
    S(-20,-20), S(-10,-10), S(-10,-10), S(-10,-10), S(-10,-10), S(-10,-10), S(-10,-10), S(-20,-20),
];

#[rustfmt::skip]
const ROOK_PST: [Score; 64] = [
    S(0,0),  S(0,0),  S(0,5),  S(5,5),  S(5,5),  S(0,5),  S(0,0),  S(0,0),
    S(-5,0), S(0,0),  S(0,0),  S(0,0),  S(0,0),  S(0,0),  S(0,0),  S(-5,0),
    S(-5,0), S(0,0),  S(0,0),  S(0,0),  S(0,0),  S(0,0),  S(0,0),  S(-5,0),
    S(-5,0), S(0,0),  S(0,0),  S(0,0),  S(0,0),  S(0,0),  S(0,0),  S(-5,0),
    S(-5,0), S(0,0),  S(0,0),  S(0,0),  S(0,0),  S(0,0),  S(0,0),  S(-5,0),
    S(-5,0), S(0,0),  S(0,0),  S(0,0),  S(0,0),  S(0,0),  S(0,0),  S(-5,0),
    S(5,10), S(10,10),S(10,10),S(10,10),S(10,10),S(10,10),S(10,10),S(5,10),
    S(0,5),  S(0,5),  S(0,5),  S(0,5),  S(0,5),  S(0,5),  S(0,5),  S(0,5),
];

#[rustfmt::skip]
const QUEEN_PST: [Score; 64] = [
    S(-20,-20), S(-10,-10), S(-10,-10), S(-5,-5), S(-5,-5), S(-10,-10), S(-10,-10), S(-20,-20),
    S(-10,-10), S(0,0),     S(5,0),     S(0,0),   S(0,0),   S(0,0),     S(0,0),     S(-10,-10),
    S(-10,-5),  S(5,5),     S(5,5),     S(5,5),   S(5,5),   S(5,5),     S(0,5),     S(-10,-5),
    S(0,0),     S(0,5),     S(5,5),     S(5,10),  S(5,10),  S(5,5),     S(0,5),     S(-5,0),
    S(-5,0),    S(0,5),     S(5,5),     S(5,10),  S(5,10),  S(5,5),     S(0,5),     S(-5,0),
    S(-10,-5),  S(0,5),     S(5,5),     S(5,5),   S(5,5),   S(5,5),     S(0,5),     S(-10,-5),
    S(-10,-10), S(0,0),     S(0,0),     S(0,0),   S(0,0),   S(0,0),     S(0,0),     S(-10,-10),
    S(-20,-20), S(-10,-10), S(-10,-10), S(-5,-5), S(-5,-5), S(-10,-10), S(-10,-10), S(-20,-20),
];

/// King: opening values reward the castled corners and punish a central
/// king; endgame values reward centralisation.
#[rustfmt::skip]
const KING_PST: [Score; 64] = [
    S(20,-50),  S(30,-30),  S(10,-20),  S(0,-20),   S(0,-20),   S(10,-20),  S(30,-30),  S(20,-50),
    S(20,-30),  S(20,-10),  S(0,0),     S(0,0),     S(0,0),     S(0,0),     S(20,-10),  S(20,-30),
    S(-10,-20), S(-20,0),   S(-20,10),  S(-20,10),  S(-20,10),  S(-20,10),  S(-20,0),   S(-10,-20),
    S(-20,-20), S(-30,0),   S(-30,20),  S(-40,30),  S(-40,30),  S(-30,20),  S(-30,0),   S(-20,-20),
    S(-30,-20), S(-40,0),   S(-40,20),  S(-50,30),  S(-50,30),  S(-40,20),  S(-40,0),   S(-30,-20),
    S(-30,-20), S(-40,0),   S(-40,10),  S(-50,10),  S(-50,10),  S(-40,10),  S(-40,0),   S(-30,-20),
    S(-30,-30), S(-40,-10), S(-40,0),   S(-50,0),   S(-50,0),   S(-40,0),   S(-40,-10), S(-30,-30),
    S(-30,-50), S(-40,-30), S(-40,-20), S(-50,-20), S(-50,-20), S(-40,-20), S(-40,-30), S(-30,-50),
];

/// Look up the PST value for a piece of `color` on `sq`, from White's
/// perspective. Black squares are mirrored vertically.
pub fn pst_value(piece: Piece, color: Color, sq: Square) -> Score {
    let index = match color {
        Color::White => sq as usize,
        Color::Black => sq as usize ^ 56,
    };
    let table = match piece {
        Piece::Pawn => &PAWN_PST,
        Piece::Knight => &KNIGHT_PST,
        Piece::Bishop => &BISHOP_PST,
        Piece::Rook => &ROOK_PST,
        Piece::Queen => &QUEEN_PST,
        Piece::King => &KING_PST,
    };
    table[index]
}

/// Sum of PST values over all pieces, White minus Black.
pub fn pst(board: &Board) -> Score {
    let mut score = Score::ZERO;
    for color in [Color::White, Color::Black] {
        let mut side = Score::ZERO;
        for piece in Piece::ALL {
            for sq in board.pieces(piece) & board.colors(color) {
                side += pst_value(piece, color, sq);
            }
        }
        match color {
            Color::White => score += side,
            Color::Black => score -= side,
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_is_symmetric() {
        assert_eq!(pst(&Board::default()), Score::ZERO);
    }

    #[test]
    fn black_lookup_mirrors_white() {
        // e4 for White is e5 for Black.
        assert_eq!(
            pst_value(Piece::Knight, Color::White, Square::E4),
            pst_value(Piece::Knight, Color::Black, Square::E5),
        );
        assert_eq!(
            pst_value(Piece::Pawn, Color::White, Square::D2),
            pst_value(Piece::Pawn, Color::Black, Square::D7),
        );
    }

    #[test]
    fn central_knight_beats_rim_knight() {
        let center = pst_value(Piece::Knight, Color::White, Square::D4);
        let rim = pst_value(Piece::Knight, Color::White, Square::A1);
        assert!(center.mg() > rim.mg());
        assert!(center.eg() > rim.eg());
    }

    #[test]
    fn king_prefers_corner_in_opening_center_in_endgame() {
        let corner = pst_value(Piece::King, Color::White, Square::G1);
        let center = pst_value(Piece::King, Color::White, Square::E4);
        assert!(corner.mg() > center.mg());
        assert!(center.eg() > corner.eg());
    }

    #[test]
    fn seventh_rank_pawn_is_strong() {
        let seventh = pst_value(Piece::Pawn, Color::White, Square::E7);
        let second = pst_value(Piece::Pawn, Color::White, Square::E2);
        assert!(seventh.eg() > second.eg());
    }
}
