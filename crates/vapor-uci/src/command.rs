//! UCI command parsing.

use std::time::Duration;

use vapor_board::Position;

use crate::error::UciError;

/// Parameters of the `go` command. All fields optional; a bare `go`
/// searches without limits.
#[derive(Debug, Clone, Default)]
pub struct GoParams {
    /// White's remaining time.
    pub wtime: Option<Duration>,
    /// Black's remaining time.
    pub btime: Option<Duration>,
    /// White's increment per move.
    pub winc: Option<Duration>,
    /// Black's increment per move.
    pub binc: Option<Duration>,
    /// Moves until the next time control.
    pub movestogo: Option<u32>,
    /// Search to exactly this depth.
    pub depth: Option<u8>,
    /// Search for exactly this duration.
    pub movetime: Option<Duration>,
    /// Search until `stop`.
    pub infinite: bool,
}

/// A parsed UCI command.
#[derive(Debug)]
pub enum Command {
    /// `uci` — identify the engine.
    Uci,
    /// `isready` — synchronisation ping.
    IsReady,
    /// `ucinewgame` — forget game state.
    UciNewGame,
    /// `position` — board set up with moves applied.
    Position(Box<Position>),
    /// `go` — start a search.
    Go(GoParams),
    /// `setoption name <name> value <value>`.
    SetOption {
        /// Option name, as sent by the GUI.
        name: String,
        /// Option value.
        value: String,
    },
    /// `stop` — end the current search early.
    Stop,
    /// `quit` — exit.
    Quit,
    /// Anything unrecognised (silently ignored per UCI convention).
    Unknown(String),
}

/// Parse one line of UCI input.
pub fn parse_command(line: &str) -> Result<Command, UciError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&head) = tokens.first() else {
        return Ok(Command::Unknown(String::new()));
    };

    match head {
        "uci" => Ok(Command::Uci),
        "isready" => Ok(Command::IsReady),
        "ucinewgame" => Ok(Command::UciNewGame),
        "stop" => Ok(Command::Stop),
        "quit" => Ok(Command::Quit),
        "position" => parse_position(&tokens[1..]),
        "go" => parse_go(&tokens[1..]),
        "setoption" => parse_setoption(&tokens[1..]),
        other => Ok(Command::Unknown(other.to_string())),
    }
}

/// `position startpos [moves …]` | `position fen <6 fields> [moves …]`.
fn parse_position(tokens: &[&str]) -> Result<Command, UciError> {
    if tokens.is_empty() {
        return Err(UciError::MalformedPosition);
    }

    let (mut position, rest) = if tokens[0] == "startpos" {
        (Position::startpos(), &tokens[1..])
    } else if tokens[0] == "fen" {
        if tokens.len() < 7 {
            return Err(UciError::InvalidFen {
                fen: tokens[1..].join(" "),
            });
        }
        let fen = tokens[1..7].join(" ");
        let position = Position::from_fen(&fen).map_err(|_| UciError::InvalidFen {
            fen: fen.clone(),
        })?;
        (position, &tokens[7..])
    } else {
        return Err(UciError::MalformedPosition);
    };

    if let Some((&"moves", literals)) = rest.split_first() {
        for literal in literals {
            let mv = position.parse_move(literal).ok_or_else(|| UciError::InvalidMove {
                uci_move: literal.to_string(),
            })?;
            position.make(mv);
        }
    }

    Ok(Command::Position(Box::new(position)))
}

/// `go [wtime n] [btime n] [winc n] [binc n] [movestogo n] [depth n]
/// [movetime n] [infinite]` — unknown tokens are skipped.
fn parse_go(tokens: &[&str]) -> Result<Command, UciError> {
    let mut params = GoParams::default();

    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            "wtime" => {
                params.wtime = Some(parse_millis(tokens.get(i + 1), "wtime")?);
                i += 2;
            }
            "btime" => {
                params.btime = Some(parse_millis(tokens.get(i + 1), "btime")?);
                i += 2;
            }
            "winc" => {
                params.winc = Some(parse_millis(tokens.get(i + 1), "winc")?);
                i += 2;
            }
            "binc" => {
                params.binc = Some(parse_millis(tokens.get(i + 1), "binc")?);
                i += 2;
            }
            "movestogo" => {
                params.movestogo = Some(parse_int(tokens.get(i + 1), "movestogo")?);
                i += 2;
            }
            "depth" => {
                params.depth = Some(parse_int(tokens.get(i + 1), "depth")?);
                i += 2;
            }
            "movetime" => {
                params.movetime = Some(parse_millis(tokens.get(i + 1), "movetime")?);
                i += 2;
            }
            "infinite" => {
                params.infinite = true;
                i += 1;
            }
            _ => {
                i += 1;
            }
        }
    }

    Ok(Command::Go(params))
}

/// `setoption name <name…> value <value…>`.
fn parse_setoption(tokens: &[&str]) -> Result<Command, UciError> {
    let name_at = tokens.iter().position(|&t| t == "name");
    let value_at = tokens.iter().position(|&t| t == "value");

    let Some(name_at) = name_at else {
        return Err(UciError::MissingValue {
            param: "name".to_string(),
        });
    };
    let name_end = value_at.unwrap_or(tokens.len());
    let name = tokens[name_at + 1..name_end].join(" ");
    let value = match value_at {
        Some(at) => tokens[at + 1..].join(" "),
        None => String::new(),
    };
    if name.is_empty() {
        return Err(UciError::MissingValue {
            param: "name".to_string(),
        });
    }

    Ok(Command::SetOption { name, value })
}

fn parse_millis(token: Option<&&str>, param: &str) -> Result<Duration, UciError> {
    let raw = token.ok_or_else(|| UciError::MissingValue {
        param: param.to_string(),
    })?;
    // Some GUIs send negative clocks when flagging; clamp to zero.
    let ms: i64 = raw.parse().map_err(|_| UciError::InvalidValue {
        param: param.to_string(),
        value: raw.to_string(),
    })?;
    Ok(Duration::from_millis(ms.max(0) as u64))
}

fn parse_int<T: std::str::FromStr>(token: Option<&&str>, param: &str) -> Result<T, UciError> {
    let raw = token.ok_or_else(|| UciError::MissingValue {
        param: param.to_string(),
    })?;
    raw.parse().map_err(|_| UciError::InvalidValue {
        param: param.to_string(),
        value: raw.to_string(),
    })
}
