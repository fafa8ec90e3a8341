//! Principal-variation negamax search with quiescence.

use cozy_chess::{Move, Piece};

use vapor_board::Position;

use crate::eval::evaluate;
use crate::eval::material::piece_value;
use crate::search::control::SearchControl;
use crate::search::heuristics::{HistoryTable, KillerTable};
use crate::search::ordering::MovePicker;
use crate::search::tt::{Bound, TranspositionTable};

/// Score representing an unreachable bound.
pub const INF: i32 = 30_000;

/// Base score for checkmate; distance-to-mate is subtracted so shorter
/// mates score higher.
pub const MATE_SCORE: i32 = 29_000;

/// Scores beyond this threshold indicate a forced mate.
pub const MATE_THRESHOLD: i32 = 28_000;

/// Hard bound on the recursion: search depth plus extensions plus
/// quiescence can never exceed this many plies.
pub const MAX_PLY: usize = 128;

/// Cap on check extensions along a single path.
const MAX_EXTENSIONS: u8 = 16;

/// Futility margin for delta pruning in quiescence.
const DELTA_MARGIN: i32 = 200;

/// Triangular principal-variation table.
///
/// `lines[ply]` holds the best line found from that ply; completing a node
/// prepends its best move to the child's line.
pub struct PvTable {
    lines: Vec<[Option<Move>; MAX_PLY]>,
    lens: [usize; MAX_PLY],
}

impl PvTable {
    pub fn new() -> Self {
        Self {
            lines: vec![[None; MAX_PLY]; MAX_PLY],
            lens: [0; MAX_PLY],
        }
    }

    fn clear(&mut self, ply: usize) {
        if ply < MAX_PLY {
            self.lens[ply] = 0;
        }
    }

    fn update(&mut self, ply: usize, mv: Move) {
        if ply + 1 >= MAX_PLY {
            return;
        }
        let (head, tail) = self.lines.split_at_mut(ply + 1);
        let line = &mut head[ply];
        let child = &tail[0];

        line[0] = Some(mv);
        let child_len = self.lens[ply + 1].min(MAX_PLY - 1 - 1);
        line[1..=child_len].copy_from_slice(&child[..child_len]);
        self.lens[ply] = child_len + 1;
    }

    /// The best line from the root.
    pub fn root_line(&self) -> Vec<Move> {
        self.lines[0][..self.lens[0]].iter().flatten().copied().collect()
    }
}

impl Default for PvTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable state threaded through one root search.
pub(crate) struct SearchContext<'a> {
    pub nodes: u64,
    pub qnodes: u64,
    pub tt: &'a mut TranspositionTable,
    pub pv: PvTable,
    pub control: &'a SearchControl,
    pub killers: KillerTable,
    pub history: &'a mut HistoryTable,
}

impl SearchContext<'_> {
    fn total_nodes(&self) -> u64 {
        self.nodes + self.qnodes
    }
}

/// Negamax alpha-beta with principal-variation search.
///
/// Returns the score of the position from the side to move. On time expiry
/// the frame unwinds with a sentinel `0`; the driver discards the whole
/// depth, so the sentinel never reaches a decision.
#[allow(clippy::too_many_arguments)]
pub(crate) fn negamax(
    pos: &mut Position,
    depth: i32,
    ply: usize,
    mut alpha: i32,
    mut beta: i32,
    extensions: u8,
    allow_null: bool,
    ctx: &mut SearchContext,
) -> i32 {
    ctx.nodes += 1;
    if ctx.control.should_stop(ctx.total_nodes()) {
        return 0;
    }

    ctx.pv.clear(ply);

    if ply >= MAX_PLY - 1 {
        return evaluate(pos.board());
    }

    if ply > 0 {
        // Draws by rule. Repetition counts occurrences across game and
        // search history, so the third occurrence scores as a draw.
        if pos.is_repetition() || pos.halfmove_clock() >= 100 || pos.insufficient_material() {
            return 0;
        }

        // Mate-distance pruning: no line from here can beat a mate already
        // proven closer to the root.
        alpha = alpha.max(-MATE_SCORE + ply as i32);
        beta = beta.min(MATE_SCORE - ply as i32 - 1);
        if alpha >= beta {
            return alpha;
        }
    }

    let hash = pos.hash();
    let tt_probe = ctx.tt.probe(hash, ply);
    let tt_move = tt_probe.as_ref().and_then(|probe| probe.best_move);

    if ply > 0
        && let Some(probe) = &tt_probe
        && i32::from(probe.depth) >= depth
    {
        match probe.bound {
            Bound::Exact => return probe.score,
            Bound::Lower if probe.score >= beta => return probe.score,
            Bound::Upper if probe.score <= alpha => return probe.score,
            _ => {}
        }
    }

    if depth <= 0 {
        return qsearch(pos, alpha, beta, ply, ctx);
    }

    let in_check = pos.in_check();
    let is_pv = beta - alpha > 1;

    // Null-move pruning: hand the opponent a free move; if the position
    // still fails high at reduced depth, it will fail high for real.
    if allow_null
        && ply > 0
        && !is_pv
        && !in_check
        && depth >= 3
        && pos.has_non_pawn_material(pos.side_to_move())
        && evaluate(pos.board()) >= beta
        && pos.make_null()
    {
        let reduction = if depth > 6 { 3 } else { 2 };
        let score = -negamax(
            pos,
            depth - 1 - reduction,
            ply + 1,
            -beta,
            -beta + 1,
            extensions,
            false,
            ctx,
        );
        pos.unmake_null();
        if score >= beta {
            return beta;
        }
    }

    let moves = pos.legal_moves();
    if moves.is_empty() {
        return if in_check { -MATE_SCORE + ply as i32 } else { 0 };
    }

    let mut picker = MovePicker::new(&moves, pos.board(), tt_move, &ctx.killers, ctx.history, ply);

    let original_alpha = alpha;
    let mut best_score = -INF;
    let mut best_move: Option<Move> = None;
    let mut searched = 0u32;

    while let Some(mv) = picker.next() {
        let quiet = !pos.is_capture(mv) && mv.promotion.is_none();
        let moved_piece = pos.board().piece_on(mv.from).unwrap_or(Piece::Pawn);

        pos.make(mv);
        let gives_check = pos.in_check();
        let extend = u8::from(gives_check && extensions < MAX_EXTENSIONS);
        let child_depth = depth - 1 + i32::from(extend);
        let child_ext = extensions + extend;

        let score = if searched == 0 {
            -negamax(pos, child_depth, ply + 1, -beta, -alpha, child_ext, true, ctx)
        } else {
            let zw = -negamax(pos, child_depth, ply + 1, -alpha - 1, -alpha, child_ext, true, ctx);
            if zw > alpha && zw < beta {
                -negamax(pos, child_depth, ply + 1, -beta, -alpha, child_ext, true, ctx)
            } else {
                zw
            }
        };
        pos.unmake();
        searched += 1;

        if ctx.control.is_stopped() {
            return 0;
        }

        if score > best_score {
            best_score = score;
            best_move = Some(mv);
        }
        if score > alpha {
            alpha = score;
            ctx.pv.update(ply, mv);
        }
        if alpha >= beta {
            if quiet {
                ctx.killers.store(ply, mv);
                ctx.history.update(moved_piece, mv.to as usize, depth);
            }
            ctx.tt.store(hash, depth as u8, beta, best_move, Bound::Lower, ply);
            return beta;
        }
    }

    let bound = if alpha > original_alpha { Bound::Exact } else { Bound::Upper };
    ctx.tt.store(hash, depth as u8, alpha, best_move, bound, ply);
    alpha
}

/// Quiescence search: resolve captures, promotions, and check evasions
/// before trusting the static evaluation.
pub(crate) fn qsearch(
    pos: &mut Position,
    mut alpha: i32,
    beta: i32,
    ply: usize,
    ctx: &mut SearchContext,
) -> i32 {
    ctx.qnodes += 1;
    if ctx.control.should_stop(ctx.total_nodes()) || ply >= MAX_PLY - 1 {
        return evaluate(pos.board());
    }

    let in_check = pos.in_check();
    let mut stand_pat = -INF;

    if !in_check {
        // Stand pat: the side to move may refuse every tactical option.
        stand_pat = evaluate(pos.board());
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }
    }

    let moves = pos.legal_moves();
    if moves.is_empty() {
        return if in_check { -MATE_SCORE + ply as i32 } else { 0 };
    }

    let mut picker = MovePicker::new_qsearch(&moves, pos.board(), in_check);
    while let Some(mv) = picker.next() {
        // Delta pruning: even winning this victim outright cannot lift the
        // score back to alpha.
        if !in_check && pos.is_capture(mv) {
            let victim = pos
                .board()
                .piece_on(mv.to)
                .map_or(piece_value(Piece::Pawn), piece_value);
            if stand_pat + victim + DELTA_MARGIN < alpha {
                continue;
            }
        }

        pos.make(mv);
        let score = -qsearch(pos, -beta, -alpha, ply + 1, ctx);
        pos.unmake();

        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }

    alpha
}
