//! Static evaluation: material and piece-square tables tapered by a
//! continuous game phase, plus king and rook terms.

pub mod king_safety;
pub mod material;
pub mod phase;
pub mod pst;
pub mod rooks;
pub mod score;

use cozy_chess::{Board, Color};

pub use phase::game_phase;

/// Static evaluation in centipawns from the side to move.
///
/// Material and PST are blended between their opening and endgame values by
/// the continuous phase; the king and rook terms carry their own phase
/// gating. The result is computed from White's perspective and negated for
/// Black, so `eval(P) == -eval(P')` for the color-swapped mirror of `P`.
pub fn evaluate(board: &Board) -> i32 {
    let phase = game_phase(board);

    let tapered = material::material(board) + pst::pst(board);
    let mut total = tapered.taper(phase);
    total += king_safety::king_terms(board, phase);
    total += rooks::rook_terms(board, phase);

    match board.side_to_move() {
        Color::White => total,
        Color::Black => -total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::negamax::MATE_SCORE;

    fn eval_fen(fen: &str) -> i32 {
        evaluate(&fen.parse().unwrap())
    }

    /// Flip a FEN: swap colors, mirror ranks, swap side to move and
    /// castling rights.
    fn color_flip(fen: &str) -> String {
        let fields: Vec<&str> = fen.split(' ').collect();
        let flipped_board: Vec<String> = fields[0]
            .split('/')
            .rev()
            .map(|rank| {
                rank.chars()
                    .map(|c| {
                        if c.is_ascii_uppercase() {
                            c.to_ascii_lowercase()
                        } else if c.is_ascii_lowercase() {
                            c.to_ascii_uppercase()
                        } else {
                            c
                        }
                    })
                    .collect()
            })
            .collect();
        let stm = if fields[1] == "w" { "b" } else { "w" };
        let castling: String = if fields[2] == "-" {
            "-".to_string()
        } else {
            let mut swapped: Vec<char> = fields[2]
                .chars()
                .map(|c| {
                    if c.is_ascii_uppercase() {
                        c.to_ascii_lowercase()
                    } else {
                        c.to_ascii_uppercase()
                    }
                })
                .collect();
            swapped.sort_by_key(|c| (c.is_ascii_lowercase(), *c));
            swapped.into_iter().collect()
        };
        format!(
            "{} {} {} {} {} {}",
            flipped_board.join("/"),
            stm,
            castling,
            fields[3],
            fields[4],
            fields[5]
        )
    }

    #[test]
    fn starting_position_is_equal() {
        assert_eq!(eval_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"), 0);
    }

    #[test]
    fn extra_queen_dominates() {
        let score = eval_fen("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(score > 700, "queen-up eval too small: {score}");
    }

    #[test]
    fn side_to_move_sign_convention() {
        // Same material imbalance viewed by the side that is down: negative.
        let score = eval_fen("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1");
        assert!(score < -700, "losing side should see negative eval: {score}");
    }

    #[test]
    fn color_swapped_mirror_negates() {
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQ1RK1 w kq - 0 1",
            "8/5ppp/4k3/8/8/4K3/PPP5/8 w - - 0 1",
            "4r1k1/5ppp/8/8/8/8/1R3PPP/6K1 w - - 0 1",
        ];
        for fen in fens {
            let flipped = color_flip(fen);
            let a = eval_fen(fen);
            let b = eval_fen(&flipped);
            assert!(
                (a + b).abs() <= 1,
                "mirror asymmetry for {fen}: {a} vs {b} ({flipped})"
            );
        }
    }

    #[test]
    fn evaluation_is_bounded() {
        let fens = [
            "QQQQkQQQ/QQ6/8/8/8/8/7K/8 w - - 0 1",
            "qqqqKqqq/qq6/8/8/8/8/7k/8 w - - 0 1",
            "8/8/4k3/8/8/4K3/8/8 w - - 0 1",
        ];
        for fen in fens {
            let score = eval_fen(fen);
            assert!(score.abs() < MATE_SCORE, "eval out of range for {fen}: {score}");
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        let board: Board = "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQ1RK1 w kq - 0 1"
            .parse()
            .unwrap();
        let first = evaluate(&board);
        for _ in 0..10 {
            assert_eq!(evaluate(&board), first);
        }
    }
}
