//! Board adapter for vapor.
//!
//! Wraps the `cozy-chess` board primitives behind the small capability set
//! the search and evaluation layers consume: legal-move enumeration,
//! make/unmake, check detection, repetition and draw bookkeeping, and UCI
//! move-literal conversion.

pub mod moves;
pub mod position;

pub use moves::{format_move, parse_move};
pub use position::Position;

pub use cozy_chess::{Board, Color, File, Move, Piece, Rank, Square};
