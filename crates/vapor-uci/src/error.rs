//! UCI protocol errors.

/// Errors that can occur while handling UCI input.
///
/// These surface as `info string` diagnostics; the engine never crashes on
/// malformed input and keeps its last known-good position.
#[derive(Debug, thiserror::Error)]
pub enum UciError {
    /// The `position` command is missing `startpos` or `fen`.
    #[error("malformed position command: missing startpos or fen keyword")]
    MalformedPosition,

    /// Failed to parse a FEN string.
    #[error("invalid FEN: {fen}")]
    InvalidFen {
        /// The FEN string that failed to parse.
        fen: String,
    },

    /// A move in the `position` command was malformed or illegal.
    #[error("illegal move: {uci_move}")]
    InvalidMove {
        /// The offending move literal.
        uci_move: String,
    },

    /// A `go` or `setoption` parameter is missing its value.
    #[error("missing value for parameter: {param}")]
    MissingValue {
        /// The parameter name (e.g. "wtime", "depth").
        param: String,
    },

    /// A parameter value could not be parsed.
    #[error("invalid value for {param}: {value}")]
    InvalidValue {
        /// The parameter name.
        param: String,
        /// The value that failed to parse.
        value: String,
    },
}
