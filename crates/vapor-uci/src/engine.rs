//! Event-driven UCI engine loop.
//!
//! The main thread owns the engine state and processes events from two
//! sources: a stdin reader thread and, while searching, a worker thread
//! running the (single-threaded) search. The worker exists only so `stop`
//! is honoured mid-search; there is no parallel search.

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};

use tracing::{debug, info, warn};

use vapor_board::Position;
use vapor_engine::eval::game_phase;
use vapor_engine::search::negamax::{MATE_SCORE, MATE_THRESHOLD};
use vapor_engine::{PhaseBucket, SearchControl, SearchResult, Searcher, limits_from_go};

use crate::command::{Command, GoParams, parse_command};
use crate::error::UciError;

/// Whether the engine is idle or has a search in flight.
enum EngineState {
    Idle,
    Searching,
}

/// Events processed by the main loop.
enum EngineEvent {
    UciCommand(Result<Command, UciError>),
    SearchDone(Box<SearchDone>),
    InputClosed,
}

/// Payload returned by the search worker.
struct SearchDone {
    result: SearchResult,
    /// The position the search ran on, for move formatting.
    position: Position,
    searcher: Searcher,
}

/// The UCI engine: current position, searcher, and search lifecycle.
pub struct UciEngine {
    position: Position,
    searcher: Option<Searcher>,
    state: EngineState,
    stop_flag: Arc<AtomicBool>,
    pending_new_game: bool,
    pending_hash_mb: Option<usize>,
}

impl UciEngine {
    /// Engine at the starting position with a fresh searcher.
    pub fn new() -> Self {
        Self {
            position: Position::startpos(),
            searcher: Some(Searcher::new()),
            state: EngineState::Idle,
            stop_flag: Arc::new(AtomicBool::new(false)),
            pending_new_game: false,
            pending_hash_mb: None,
        }
    }

    /// Run the event loop until `quit` or stdin closes.
    pub fn run(mut self) -> io::Result<()> {
        let (tx, rx) = mpsc::channel::<EngineEvent>();

        let stdin_tx = tx.clone();
        std::thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            continue;
                        }
                        debug!(cmd = %trimmed, "received command");
                        if stdin_tx.send(EngineEvent::UciCommand(parse_command(trimmed))).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
            let _ = stdin_tx.send(EngineEvent::InputClosed);
        });

        for event in &rx {
            match event {
                EngineEvent::UciCommand(Ok(cmd)) => match cmd {
                    Command::Uci => self.handle_uci(),
                    Command::IsReady => println!("readyok"),
                    Command::UciNewGame => self.handle_ucinewgame(),
                    Command::Position(position) => self.position = *position,
                    Command::Go(params) => self.handle_go(params, &tx),
                    Command::SetOption { name, value } => self.handle_setoption(&name, &value),
                    Command::Stop => self.handle_stop(),
                    Command::Quit => {
                        if matches!(self.state, EngineState::Searching) {
                            self.handle_stop();
                            for ev in &rx {
                                if let EngineEvent::SearchDone(done) = ev {
                                    self.finish_search(*done);
                                    break;
                                }
                            }
                        }
                        break;
                    }
                    Command::Unknown(_) => {}
                },
                EngineEvent::UciCommand(Err(e)) => {
                    // Diagnose, keep the last known-good position, carry on.
                    warn!(error = %e, "rejected command");
                    println!("info string {e}");
                }
                EngineEvent::SearchDone(done) => self.finish_search(*done),
                EngineEvent::InputClosed => break,
            }
        }

        info!("vapor shutting down");
        Ok(())
    }

    fn handle_uci(&self) {
        println!("id name vapor {}", env!("CARGO_PKG_VERSION"));
        println!("id author the vapor developers");
        println!("option name Hash type spin default 16 min 1 max 1024");
        println!("uciok");
    }

    fn handle_ucinewgame(&mut self) {
        self.position = Position::startpos();
        match self.searcher.as_mut() {
            Some(searcher) => searcher.new_game(),
            // Worker owns the searcher; clear once it comes back.
            None => self.pending_new_game = true,
        }
    }

    fn handle_setoption(&mut self, name: &str, value: &str) {
        if name.eq_ignore_ascii_case("hash") {
            match value.parse::<usize>() {
                Ok(mb) if (1..=1024).contains(&mb) => match self.searcher.as_mut() {
                    Some(searcher) => searcher.resize_tt(mb),
                    None => self.pending_hash_mb = Some(mb),
                },
                _ => println!("info string invalid Hash value: {value}"),
            }
        } else {
            debug!(option = name, "ignoring unknown option");
        }
    }

    fn handle_go(&mut self, params: GoParams, tx: &mpsc::Sender<EngineEvent>) {
        if matches!(self.state, EngineState::Searching) {
            warn!("go received while searching, ignoring");
            return;
        }

        self.stop_flag = Arc::new(AtomicBool::new(false));

        let side = self.position.side_to_move();
        let (remaining, increment) = match side {
            vapor_board::Color::White => (params.wtime, params.winc),
            vapor_board::Color::Black => (params.btime, params.binc),
        };
        let bucket = PhaseBucket::from_phase(game_phase(self.position.board()));
        let control = Arc::new(limits_from_go(
            remaining,
            increment,
            params.movestogo,
            params.movetime,
            params.infinite,
            bucket,
            Arc::clone(&self.stop_flag),
        ));

        let max_depth = params.depth.unwrap_or(64);
        let mut searcher = self.searcher.take().unwrap_or_default();
        let mut position = self.position.clone();
        let search_control = Arc::clone(&control);
        let tx = tx.clone();

        std::thread::spawn(move || {
            // Make/unmake balance restores the position between depths, so
            // a snapshot of the root stays valid for formatting PV lines.
            let root = position.clone();
            let result = searcher.search(&mut position, max_depth, &search_control, |depth, score, nodes, pv| {
                emit_info(&root, &search_control, depth, score, nodes, pv);
            });
            let _ = tx.send(EngineEvent::SearchDone(Box::new(SearchDone {
                result,
                position,
                searcher,
            })));
        });

        self.state = EngineState::Searching;
    }

    fn handle_stop(&mut self) {
        self.stop_flag.store(true, Ordering::Release);
    }

    fn finish_search(&mut self, done: SearchDone) {
        let mut searcher = done.searcher;
        if self.pending_new_game {
            searcher.new_game();
            self.pending_new_game = false;
        }
        if let Some(mb) = self.pending_hash_mb.take() {
            searcher.resize_tt(mb);
        }
        self.searcher = Some(searcher);
        self.state = EngineState::Idle;

        match done.result.best_move {
            Some(best) => println!("bestmove {}", done.position.format_move(best)),
            None => println!("info string no legal moves"),
        }
    }
}

impl Default for UciEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Emit one `info` line for a completed depth.
fn emit_info(
    position: &Position,
    control: &SearchControl,
    depth: u8,
    score: i32,
    nodes: u64,
    pv: &[vapor_board::Move],
) {
    let elapsed_ms = control.elapsed().as_millis().max(1);
    let nps = nodes as u128 * 1000 / elapsed_ms;

    let mut line = format!(
        "info depth {depth} score {} nodes {nodes} nps {nps} time {elapsed_ms}",
        format_score(score)
    );

    if !pv.is_empty() {
        line.push_str(" pv");
        let mut walk = position.clone();
        for &mv in pv {
            line.push(' ');
            line.push_str(&walk.format_move(mv));
            walk.make(mv);
        }
    }

    println!("{line}");
}

/// `cp <n>` for normal scores, `mate <n>` (moves, signed) for forced mates.
fn format_score(score: i32) -> String {
    if score > MATE_THRESHOLD {
        let plies = MATE_SCORE - score;
        format!("mate {}", (plies + 1) / 2)
    } else if score < -MATE_THRESHOLD {
        let plies = MATE_SCORE + score;
        format!("mate -{}", (plies + 1) / 2)
    } else {
        format!("cp {score}")
    }
}
