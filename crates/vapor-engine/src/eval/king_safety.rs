//! King evaluation: shelter and attack pressure in the middlegame,
//! castling incentives while material is still on the board, and king
//! activity once the endgame arrives.

use cozy_chess::{
    BitBoard, Board, Color, File, Piece, Rank, Square, get_bishop_moves, get_knight_moves,
    get_pawn_attacks, get_rook_moves,
};

/// Bonus per shielding pawn on the two ranks in front of the king.
const SHIELD_BONUS: i32 = 10;
/// Penalty per king-zone file with no friendly pawn on it.
const OPEN_FILE_PENALTY: i32 = 15;
/// Penalty per enemy piece attacking the king zone.
const ZONE_ATTACKER_PENALTY: i32 = 6;

/// Castling-right and castled-king incentives.
const KINGSIDE_RIGHT_BONUS: i32 = 15;
const QUEENSIDE_RIGHT_BONUS: i32 = 10;
const CASTLED_KING_BONUS: i32 = 30;

/// All king terms combined, White minus Black, already phase-scaled.
///
/// Safety is active above phase 0.3 and scales linearly with phase;
/// castling incentives are active above phase 0.5; endgame activity is
/// active below phase 0.4 and scales with `1 - phase`.
pub fn king_terms(board: &Board, phase: f32) -> i32 {
    let mut total = 0i32;

    if phase > 0.3 {
        let raw = safety(board, Color::White) - safety(board, Color::Black);
        total += (raw as f32 * phase) as i32;
    }

    if phase > 0.5 {
        let raw = castling_incentives(board, Color::White) - castling_incentives(board, Color::Black);
        total += (raw as f32 * phase) as i32;
    }

    if phase < 0.4 {
        let raw = endgame_activity(board, Color::White) - endgame_activity(board, Color::Black);
        total += (raw as f32 * (1.0 - phase)) as i32;
    }

    total
}

/// Raw (unscaled) safety term for one side: pawn shield minus open-file and
/// attack-zone penalties.
fn safety(board: &Board, color: Color) -> i32 {
    let king = board.king(color);
    let own_pawns = board.pieces(Piece::Pawn) & board.colors(color);
    let forward: i8 = match color {
        Color::White => 1,
        Color::Black => -1,
    };

    let mut score = 0i32;

    // Pawn shield: the six squares on the two ranks in front of the king.
    for df in -1i8..=1 {
        for steps in 1i8..=2 {
            if let Some(sq) = king.try_offset(df, forward * steps)
                && own_pawns.has(sq)
            {
                score += SHIELD_BONUS;
            }
        }
    }

    // Files touching the king with no friendly pawn invite heavy pieces in.
    for df in -1i8..=1 {
        let file_index = king.file() as i8 + df;
        if file_index < 0 {
            continue;
        }
        if let Some(file) = File::try_index(file_index as usize)
            && (file.bitboard() & own_pawns).is_empty()
        {
            score -= OPEN_FILE_PENALTY;
        }
    }

    // Enemy pieces bearing on the zone within Chebyshev distance 2.
    let zone = king_zone(king);
    score -= zone_attackers(board, !color, zone) * ZONE_ATTACKER_PENALTY;

    score
}

/// Squares within Chebyshev distance 2 of the king.
fn king_zone(king: Square) -> BitBoard {
    let mut zone = BitBoard::EMPTY;
    for df in -2i8..=2 {
        for dr in -2i8..=2 {
            if let Some(sq) = king.try_offset(df, dr) {
                zone |= sq.bitboard();
            }
        }
    }
    zone
}

/// Count enemy pieces of `attacker` whose attack set intersects `zone`.
fn zone_attackers(board: &Board, attacker: Color, zone: BitBoard) -> i32 {
    let occ = board.occupied();
    let side = board.colors(attacker);
    let mut count = 0i32;

    for sq in board.pieces(Piece::Pawn) & side {
        if !(get_pawn_attacks(sq, attacker) & zone).is_empty() {
            count += 1;
        }
    }
    for sq in board.pieces(Piece::Knight) & side {
        if !(get_knight_moves(sq) & zone).is_empty() {
            count += 1;
        }
    }
    for sq in (board.pieces(Piece::Bishop) | board.pieces(Piece::Queen)) & side {
        if !(get_bishop_moves(sq, occ) & zone).is_empty() {
            count += 1;
        }
    }
    for sq in (board.pieces(Piece::Rook) | board.pieces(Piece::Queen)) & side {
        if !(get_rook_moves(sq, occ) & zone).is_empty() {
            count += 1;
        }
    }

    count
}

/// Raw castling incentives for one side: retained rights plus a bonus for a
/// king actually sitting on a castled square.
fn castling_incentives(board: &Board, color: Color) -> i32 {
    let rights = board.castle_rights(color);
    let mut score = 0i32;
    if rights.short.is_some() {
        score += KINGSIDE_RIGHT_BONUS;
    }
    if rights.long.is_some() {
        score += QUEENSIDE_RIGHT_BONUS;
    }

    let king = board.king(color);
    let home = Rank::First.relative_to(color);
    if king == Square::new(File::G, home) || king == Square::new(File::C, home) {
        score += CASTLED_KING_BONUS;
    }
    score
}

/// Raw endgame activity for one side: centralisation plus advancement.
fn endgame_activity(board: &Board, color: Color) -> i32 {
    let king = board.king(color);
    let file = king.file() as i32;
    let rank = king.rank() as i32;

    // Chebyshev distance to the nearest of d4/e4/d5/e5.
    let df = (3 - file).max(file - 4).max(0);
    let dr = (3 - rank).max(rank - 4).max(0);
    let center_distance = df.max(dr);

    let advancement = king.rank().relative_to(color) as i32;
    (4 - center_distance) * 10 + advancement * 5
}
