//! Iterative-deepening search driver.

pub mod control;
pub mod heuristics;
pub mod negamax;
pub mod ordering;
pub mod see;
pub mod tt;

use std::time::Instant;

use cozy_chess::Move;

use vapor_board::Position;

use control::SearchControl;
use heuristics::{HistoryTable, KillerTable};
use negamax::{INF, MATE_SCORE, MATE_THRESHOLD, PvTable, SearchContext, negamax};
use tt::TranspositionTable;

/// Depth ceiling for iterative deepening.
const MAX_DEPTH: u8 = 64;

/// Result of a completed root search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move from the deepest fully completed iteration, `None` only
    /// when the root has no legal moves.
    pub best_move: Option<Move>,
    /// Score in centipawns from the side to move (mate scores near ±29000).
    pub score: i32,
    /// Full-width nodes visited.
    pub nodes: u64,
    /// Quiescence nodes visited.
    pub qnodes: u64,
    /// Deepest completed iteration.
    pub depth: u8,
    /// Principal variation of the last completed iteration.
    pub pv: Vec<Move>,
}

/// Iterative-deepening searcher owning the state that outlives one search:
/// the transposition table (shared across moves of a game) and the history
/// table (halved between root searches).
pub struct Searcher {
    tt: TranspositionTable,
    history: HistoryTable,
}

impl Searcher {
    /// Searcher with a 16 MB transposition table (2²⁰ entries).
    pub fn new() -> Self {
        Self {
            tt: TranspositionTable::new(16),
            history: HistoryTable::new(),
        }
    }

    /// Forget everything learned in the current game.
    pub fn new_game(&mut self) {
        self.tt.clear();
        self.history.clear();
    }

    /// Replace the transposition table with one of the given size in MB.
    pub fn resize_tt(&mut self, mb: usize) {
        self.tt = TranspositionTable::new(mb);
    }

    /// Run iterative deepening up to `max_depth` under `control`.
    ///
    /// `on_iter(depth, score, nodes, pv)` fires after every completed
    /// iteration, in depth order, so the caller can emit protocol progress.
    /// An aborted iteration is discarded: the result always reflects the
    /// deepest iteration that ran to completion, falling back to any legal
    /// move if not even depth 1 finished.
    pub fn search<F>(
        &mut self,
        pos: &mut Position,
        max_depth: u8,
        control: &SearchControl,
        mut on_iter: F,
    ) -> SearchResult
    where
        F: FnMut(u8, i32, u64, &[Move]),
    {
        self.tt.new_generation();
        self.history.halve();

        let mut ctx = SearchContext {
            nodes: 0,
            qnodes: 0,
            tt: &mut self.tt,
            pv: PvTable::new(),
            control,
            killers: KillerTable::new(),
            history: &mut self.history,
        };

        let mut completed: Option<(Move, i32, u8, Vec<Move>)> = None;

        for depth in 1..=max_depth.clamp(1, MAX_DEPTH) {
            let depth_start = Instant::now();
            let score = negamax(pos, i32::from(depth), 0, -INF, INF, 0, true, &mut ctx);

            // An abort mid-iteration leaves sentinel scores in the tree;
            // whatever this iteration produced is discarded.
            if control.is_stopped() {
                break;
            }

            let pv = ctx.pv.root_line();
            if let Some(&first) = pv.first() {
                completed = Some((first, score, depth, pv.clone()));
            }
            on_iter(depth, score, ctx.nodes + ctx.qnodes, &pv);

            // A mate this iteration can already reach will not improve.
            if score.abs() > MATE_THRESHOLD && MATE_SCORE - score.abs() <= i32::from(depth) {
                break;
            }

            if control.should_stop_iterating() || control.predicted_overrun(depth_start.elapsed())
            {
                break;
            }
        }

        let nodes = ctx.nodes;
        let qnodes = ctx.qnodes;

        match completed {
            Some((best_move, score, depth, pv)) => SearchResult {
                best_move: Some(best_move),
                score,
                nodes,
                qnodes,
                depth,
                pv,
            },
            None => {
                // Not even depth 1 completed: fall back to any legal move.
                let fallback = pos.legal_moves().first().copied();
                let score = if fallback.is_some() {
                    0
                } else if pos.in_check() {
                    -MATE_SCORE
                } else {
                    0
                };
                SearchResult {
                    best_move: fallback,
                    score,
                    nodes,
                    qnodes,
                    depth: 0,
                    pv: Vec::new(),
                }
            }
        }
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}
