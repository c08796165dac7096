//! Ignition Range Toolkit
//!
//! Parses Ignition (Bovada) poker hand-history exports and derives hero's
//! pre-flop statistics.
//!
//! This library provides:
//! - `history`: splits a log into hands and de-duplicates them
//! - `hand` / `round` / `line`: per-hand, per-street and per-line parsing
//! - `stats`: VPIP, PFR and hole cards bucketed by first pre-flop action
//! - `chart`: the 13x13 opening range chart, drawn with `canvas`
//! - `pipeline`: file input and CSV/PNG/log output
//!
//! Binaries:
//! - `hh-stats`: command-line front end

pub mod canvas;
pub mod cards;
pub mod chart;
pub mod config;
pub mod error;
pub mod hand;
pub mod history;
pub mod line;
pub mod pipeline;
pub mod round;
pub mod stats;

pub use cards::{Card, HoleCardPair, Rank, StartingHand, Suit};
pub use chart::{ChartCell, RangeChart};
pub use config::ParserConfig;
pub use error::{FormatError, HandRef, ParseError};
pub use hand::Hand;
pub use history::HandHistory;
pub use round::{BettingRound, Diagnostic, FirstAction, PreflopTally, Street};
pub use stats::PreflopStats;
