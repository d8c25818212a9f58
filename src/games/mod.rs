//! # Game Rules
//!
//! Board types for the games played in the arena. Line detection itself
//! lives in the `ttt-rules` crate; this module wraps it in typed cells and
//! marks and renders boards for the log.

pub mod tictactoe;
