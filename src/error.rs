//! Error types for hand-history parsing and aggregation

use crate::round::Street;
use std::fmt;
use thiserror::Error;

/// A structural violation inside a single hand block.
///
/// Any of these means the format assumptions no longer hold, so the whole
/// ingestion run is aborted rather than skipping the hand.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("no hand identifier in seat segment header {header:?}")]
    MissingHandId { header: String },

    #[error("unrecognized segment {header:?}")]
    UnknownSegment { header: String },

    #[error("segment header {header:?} does not name a betting round")]
    UnknownStreet { header: String },

    #[error("deal line outside pre-flop in {street} round: {line:?}")]
    DealOutsidePreflop { street: Street, line: String },

    #[error("invalid card {token:?} in segment {header:?}")]
    InvalidCard { token: String, header: String },

    #[error("segment {header:?} is out of order")]
    SegmentOutOfOrder { header: String },

    #[error("{street} round present without the {missing} round")]
    StreetGap { street: Street, missing: Street },

    /// `index` is the 1-based segment position in the hand; `after` is the
    /// header of the segment before it.
    #[error(
        "empty segment {index}{}",
        .after.as_ref().map(|h| format!(" after {:?}", h)).unwrap_or_default()
    )]
    EmptySegment { index: usize, after: Option<String> },
}

/// Identifies a hand in error messages: by number when known, otherwise by
/// its 1-based position among the hand blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandRef {
    Id(u64),
    Block(usize),
}

impl fmt::Display for HandRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandRef::Id(id) => write!(f, "#{}", id),
            HandRef::Block(n) => write!(f, "in block {}", n),
        }
    }
}

/// Fatal errors from parsing a hand history or aggregating its statistics
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected text before the first hand marker: {preview:?}")]
    LeadingText { preview: String },

    #[error("hand {hand}: {source}")]
    Hand {
        hand: HandRef,
        #[source]
        source: FormatError,
    },

    #[error("hand #{hand_id} has no pre-flop round")]
    MissingPreflop { hand_id: u64 },
}

impl ParseError {
    /// The structural error behind a hand-scoped failure, if any
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            ParseError::Hand { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
