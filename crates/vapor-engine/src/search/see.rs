//! Static Exchange Evaluation (SEE).
//!
//! Determines the material outcome of a capture sequence on a single
//! square, assuming both sides recapture with their least valuable attacker
//! and may stop whenever continuing would lose material.

use cozy_chess::{
    BitBoard, Board, Color, Move, Piece, Rank, Square, get_between_rays, get_bishop_moves,
    get_king_moves, get_knight_moves, get_pawn_attacks, get_rook_moves,
};

use vapor_board::position::is_capture;

use crate::eval::material::piece_value;

/// King "value" for exchange purposes: capturing with the king is only ever
/// profitable when nothing can recapture.
const KING_SEE_VALUE: i32 = 20_000;

fn see_value(piece: Piece) -> i32 {
    match piece {
        Piece::King => KING_SEE_VALUE,
        other => piece_value(other),
    }
}

/// All pieces attacking `sq` under the given occupancy. Sliding attacks use
/// `occ` so that removing a piece reveals x-ray attackers behind it.
fn attackers_of(board: &Board, sq: Square, occ: BitBoard) -> BitBoard {
    let rook_like = board.pieces(Piece::Rook) | board.pieces(Piece::Queen);
    let bishop_like = board.pieces(Piece::Bishop) | board.pieces(Piece::Queen);
    let pawns = board.pieces(Piece::Pawn);

    let attacks = (get_knight_moves(sq) & board.pieces(Piece::Knight))
        | (get_king_moves(sq) & board.pieces(Piece::King))
        | (get_rook_moves(sq, occ) & rook_like)
        | (get_bishop_moves(sq, occ) & bishop_like)
        | (get_pawn_attacks(sq, Color::Black) & pawns & board.colors(Color::White))
        | (get_pawn_attacks(sq, Color::White) & pawns & board.colors(Color::Black));

    attacks & occ
}

/// Whether the piece on `attacker_sq` is pinned against its own king such
/// that capturing on `target` would expose the king.
///
/// A pinned piece may still take part in the exchange when the target lies
/// on the pin ray (capturing the pinner or interposing along the line).
fn pinned_off_ray(board: &Board, attacker_sq: Square, target: Square, occ: BitBoard) -> bool {
    let Some(color) = board.color_on(attacker_sq) else {
        return false;
    };
    let king = board.king(color);
    if attacker_sq == king {
        return false;
    }

    let without = occ & !attacker_sq.bitboard();
    let enemy = board.colors(!color) & without;
    let rook_like = (board.pieces(Piece::Rook) | board.pieces(Piece::Queen)) & enemy;
    let bishop_like = (board.pieces(Piece::Bishop) | board.pieces(Piece::Queen)) & enemy;

    let exposed = (get_rook_moves(king, without) & rook_like)
        | (get_bishop_moves(king, without) & bishop_like);

    for pinner in exposed {
        let ray = get_between_rays(king, pinner);
        if ray.has(attacker_sq) && !(ray.has(target) || pinner == target) {
            return true;
        }
    }
    false
}

/// Least valuable attacker of `side` in `attackers` that is free to
/// recapture on `target`.
fn least_valuable_attacker(
    board: &Board,
    attackers: BitBoard,
    side: Color,
    target: Square,
    occ: BitBoard,
) -> Option<(Square, Piece)> {
    for piece in Piece::ALL {
        let candidates = attackers & board.colors(side) & board.pieces(piece);
        for sq in candidates {
            if !pinned_off_ray(board, sq, target, occ) {
                return Some((sq, piece));
            }
        }
    }
    None
}

/// Static exchange evaluation of `mv` in centipawns for the side to move.
///
/// Non-captures score 0; en passant counts the victim as a pawn; a
/// promotion counts the promoted value minus the pawn given up.
pub fn see(board: &Board, mv: Move) -> i32 {
    if !is_capture(board, mv) {
        return 0;
    }

    let stm = board.side_to_move();
    let target = mv.to;
    let mut occ = board.occupied();

    let attacker_piece = match board.piece_on(mv.from) {
        Some(piece) => piece,
        None => return 0,
    };

    let is_en_passant = attacker_piece == Piece::Pawn
        && board.piece_on(target).is_none()
        && mv.from.file() != target.file();

    let mut gain = [0i32; 32];
    gain[0] = if is_en_passant {
        piece_value(Piece::Pawn)
    } else {
        board.piece_on(target).map_or(0, see_value)
    };

    // The piece now sitting on the target square, and its value to whoever
    // recaptures next.
    let mut occupant_value = match mv.promotion {
        Some(promoted) => {
            gain[0] += see_value(promoted) - piece_value(Piece::Pawn);
            see_value(promoted)
        }
        None => see_value(attacker_piece),
    };

    occ &= !mv.from.bitboard();
    if is_en_passant {
        let victim_rank = Rank::Fifth.relative_to(stm);
        occ &= !Square::new(target.file(), victim_rank).bitboard();
    }

    let mut attackers = attackers_of(board, target, occ);
    let mut side = !stm;
    let mut depth = 0usize;

    while depth + 1 < gain.len() {
        let Some((sq, piece)) =
            least_valuable_attacker(board, attackers, side, target, occ)
        else {
            break;
        };

        depth += 1;
        gain[depth] = occupant_value - gain[depth - 1];

        occupant_value = see_value(piece);
        occ &= !sq.bitboard();

        // Removing a piece can reveal sliders lined up behind it.
        if matches!(piece, Piece::Pawn | Piece::Bishop | Piece::Queen) {
            attackers |= get_bishop_moves(target, occ)
                & (board.pieces(Piece::Bishop) | board.pieces(Piece::Queen));
        }
        if matches!(piece, Piece::Rook | Piece::Queen) {
            attackers |= get_rook_moves(target, occ)
                & (board.pieces(Piece::Rook) | board.pieces(Piece::Queen));
        }
        attackers &= occ;
        side = !side;
    }

    // Negamax the swap list backwards: each side refuses a continuation
    // that worsens its outcome.
    while depth > 0 {
        gain[depth - 1] = -((-gain[depth - 1]).max(gain[depth]));
        depth -= 1;
    }
    gain[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use vapor_board::parse_move;

    fn see_uci(fen: &str, literal: &str) -> i32 {
        let board: Board = fen.parse().unwrap();
        let mv = parse_move(&board, literal).expect("move must be legal");
        see(&board, mv)
    }

    #[test]
    fn pawn_takes_undefended_knight() {
        assert_eq!(see_uci("4k3/8/8/3n4/4P3/8/8/4K3 w - - 0 1", "e4d5"), 300);
    }

    #[test]
    fn pawn_takes_defended_knight() {
        // PxN, pxP: 300 - 100 = 200.
        assert_eq!(see_uci("4k3/8/4p3/3n4/4P3/8/8/4K3 w - - 0 1", "e4d5"), 200);
    }

    #[test]
    fn queen_takes_defended_pawn_loses() {
        let score = see_uci("4k3/8/3p4/2p5/8/4Q3/8/4K3 w - - 0 1", "e3c5");
        assert_eq!(score, 100 - 900);
    }

    #[test]
    fn rook_takes_defended_pawn_loses() {
        // Rxh7 Kxh7 loses the rook for a pawn.
        let score = see_uci("6k1/2R4p/6p1/8/6K1/6P1/8/8 w - - 3 38", "c7h7");
        assert!(score < 0, "losing exchange should be negative, got {score}");
    }

    #[test]
    fn xray_recapture_is_seen() {
        // Rook takes pawn on an open file. With a second rook stacked behind
        // the capturer, the defender's recapture is answered and the pawn
        // stays won; alone, RxP RxR loses the exchange.
        let with_backup = see_uci("4r1k1/8/8/4p3/8/8/4R3/4R1K1 w - - 0 1", "e2e5");
        assert_eq!(with_backup, 100);
        let without_backup = see_uci("4r1k1/8/8/4p3/8/8/8/4R1K1 w - - 0 1", "e1e5");
        assert_eq!(without_backup, 100 - 500);
    }

    #[test]
    fn en_passant_counts_pawn_victim() {
        let score = see_uci(
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
            "e5d6",
        );
        assert_eq!(score, 100);
    }

    #[test]
    fn promotion_capture_gains_promoted_value() {
        // exd8=Q capturing an undefended rook.
        let score = see_uci("3r3k/4P3/8/8/8/8/8/4K3 w - - 0 1", "e7d8q");
        assert_eq!(score, 500 + 900 - 100);
    }

    #[test]
    fn pinned_defender_cannot_recapture() {
        // The d7 knight "defends" e5 but is pinned to the d8 king by the
        // rook on d1, so Bxe5 wins a clean pawn.
        let pinned = see_uci("3k4/3n4/8/4p3/8/6B1/8/3RK3 w - - 0 1", "g3e5");
        assert_eq!(pinned, 100);

        // Move the rook off the pin and the recapture costs the bishop.
        let unpinned = see_uci("3k4/3n4/8/4p3/8/6B1/8/R3K3 w - - 0 1", "g3e5");
        assert_eq!(unpinned, 100 - 300);
    }

    #[test]
    fn quiet_moves_score_zero() {
        assert_eq!(see_uci("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", "e2e3"), 0);
        // Even a move onto an attacked square: no capture, no exchange.
        assert_eq!(see_uci("4k3/8/3p4/8/8/5N2/8/4K3 w - - 0 1", "f3e5"), 0);
    }
}
