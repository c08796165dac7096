//! Single-hand parsing
//!
//! A hand block is split on the segment delimiter into the seat listing,
//! one segment per street reached, and the summary. Segments are routed by
//! the keyword on their first line and must appear in table order.

use crate::config::ParserConfig;
use crate::error::{FormatError, HandRef, ParseError};
use crate::round::{BettingRound, Diagnostic, PreflopTally, Street};
use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HAND_ID: Regex = Regex::new(r"^Hand #(\d+)\b").unwrap();
    static ref TABLE_ID: Regex = Regex::new(r"TBL#(\d+)").unwrap();
    static ref TIMESTAMP: Regex = Regex::new(r"(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})").unwrap();
}

/// One played hand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    /// Hand number from the `Hand #<digits>` header
    pub id: u64,
    /// Table number (`TBL#<digits>`), if present in the header
    pub table: Option<u64>,
    /// Start time from the header, if present
    pub played_at: Option<NaiveDateTime>,
    /// Raw seat-listing segment, header line first
    pub seats: Vec<String>,
    pub preflop: Option<BettingRound>,
    pub flop: Option<BettingRound>,
    pub turn: Option<BettingRound>,
    pub river: Option<BettingRound>,
    /// Raw summary segment, absent in truncated exports
    pub summary: Option<Vec<String>>,
}

/// Kind of a hand segment, from the keyword on its first line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentKind {
    Seats,
    Round(Street),
    Summary,
}

impl SegmentKind {
    fn of(header: &str) -> Option<SegmentKind> {
        if header.contains("Hand #") {
            Some(SegmentKind::Seats)
        } else if header.contains("HOLE") {
            Some(SegmentKind::Round(Street::HoleCards))
        } else if header.contains("FLOP") {
            Some(SegmentKind::Round(Street::Flop))
        } else if header.contains("TURN") {
            Some(SegmentKind::Round(Street::Turn))
        } else if header.contains("RIVER") {
            Some(SegmentKind::Round(Street::River))
        } else if header.contains("SUMMARY") {
            Some(SegmentKind::Summary)
        } else {
            None
        }
    }
}

/// Where the segment router is within a hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentState {
    AwaitingSeats,
    /// Seats seen; holds the last street parsed so far
    AwaitingRound(Option<Street>),
    AwaitingSummary,
    Done,
}

impl SegmentState {
    fn accept(self, kind: SegmentKind, header: &str) -> Result<SegmentState, FormatError> {
        let out_of_order = || FormatError::SegmentOutOfOrder {
            header: header.to_string(),
        };

        match (self, kind) {
            (SegmentState::AwaitingSeats, SegmentKind::Seats) => {
                Ok(SegmentState::AwaitingRound(None))
            }
            (SegmentState::AwaitingRound(last), SegmentKind::Round(street)) => {
                if last >= Some(street) {
                    return Err(out_of_order());
                }
                // Later streets imply every earlier street was played
                if let Some(previous) = street.previous() {
                    if last != Some(previous) {
                        return Err(FormatError::StreetGap {
                            street,
                            missing: previous,
                        });
                    }
                }
                Ok(if street == Street::River {
                    SegmentState::AwaitingSummary
                } else {
                    SegmentState::AwaitingRound(Some(street))
                })
            }
            (
                SegmentState::AwaitingRound(_) | SegmentState::AwaitingSummary,
                SegmentKind::Summary,
            ) => Ok(SegmentState::Done),
            // The identifier lives on the first line of the seat segment
            (SegmentState::AwaitingSeats, _) => Err(FormatError::MissingHandId {
                header: header.to_string(),
            }),
            _ => Err(out_of_order()),
        }
    }
}

impl Hand {
    /// Parse the raw text of one hand block (everything after a hand
    /// delimiter). `block` is the 1-based block position, used to name the
    /// hand in errors raised before its number is known.
    pub fn parse(
        text: &str,
        block: usize,
        config: &ParserConfig,
    ) -> Result<(Hand, Vec<Diagnostic>), ParseError> {
        let mut hand_ref = HandRef::Block(block);
        let wrap = |hand: HandRef| move |source: FormatError| ParseError::Hand { hand, source };

        let mut state = SegmentState::AwaitingSeats;
        let mut header_info: Option<(u64, Option<u64>, Option<NaiveDateTime>)> = None;
        let mut seats = Vec::new();
        let mut rounds: [Option<BettingRound>; 4] = [None, None, None, None];
        let mut summary = None;
        let mut diagnostics = Vec::new();

        let mut previous: Option<&str> = None;
        let segments = text.trim_start().split(config.segment_delimiter.as_str());
        for (index, segment) in segments.enumerate() {
            let lines: Vec<&str> = segment.lines().collect();
            let header = *lines
                .first()
                .ok_or_else(|| FormatError::EmptySegment {
                    index: index + 1,
                    after: previous.map(str::to_string),
                })
                .map_err(wrap(hand_ref))?;
            previous = Some(header);

            let kind = SegmentKind::of(header)
                .ok_or_else(|| FormatError::UnknownSegment {
                    header: header.to_string(),
                })
                .map_err(wrap(hand_ref))?;
            state = state.accept(kind, header).map_err(wrap(hand_ref))?;

            match kind {
                SegmentKind::Seats => {
                    let info = parse_header(header).map_err(wrap(hand_ref))?;
                    hand_ref = HandRef::Id(info.0);
                    header_info = Some(info);
                    seats = owned_lines(&lines);
                }
                SegmentKind::Round(street) => {
                    let (round, found) =
                        BettingRound::parse(&lines, config).map_err(wrap(hand_ref))?;
                    if round.street != street {
                        return Err(wrap(hand_ref)(FormatError::UnknownStreet {
                            header: header.to_string(),
                        }));
                    }
                    rounds[street as usize] = Some(round);
                    diagnostics.extend(found);
                }
                SegmentKind::Summary => summary = Some(owned_lines(&lines)),
            }
        }

        let (id, table, played_at) = header_info
            .ok_or_else(|| FormatError::MissingHandId {
                header: text.lines().next().unwrap_or("").to_string(),
            })
            .map_err(wrap(hand_ref))?;

        if state != SegmentState::Done {
            log::debug!("Hand #{} has no summary segment", id);
        }

        for diagnostic in &mut diagnostics {
            diagnostic.hand_id = Some(id);
        }

        let [preflop, flop, turn, river] = rounds;
        Ok((
            Hand {
                id,
                table,
                played_at,
                seats,
                preflop,
                flop,
                turn,
                river,
                summary,
            },
            diagnostics,
        ))
    }

    /// The round for a street, if that street was reached
    pub fn round(&self, street: Street) -> Option<&BettingRound> {
        match street {
            Street::HoleCards => self.preflop.as_ref(),
            Street::Flop => self.flop.as_ref(),
            Street::Turn => self.turn.as_ref(),
            Street::River => self.river.as_ref(),
        }
    }

    /// Rounds played, in street order
    pub fn rounds(&self) -> impl Iterator<Item = &BettingRound> {
        Street::ALL.into_iter().filter_map(move |s| self.round(s))
    }

    /// Hero's pre-flop tally, if the hand has a pre-flop round
    pub fn preflop_tally(&self) -> Option<PreflopTally> {
        self.preflop.as_ref().and_then(|round| round.tally)
    }
}

// Helper functions

/// Parse the `Hand #<digits> TBL#<digits> ... <timestamp>` header line
fn parse_header(header: &str) -> Result<(u64, Option<u64>, Option<NaiveDateTime>), FormatError> {
    let missing = || FormatError::MissingHandId {
        header: header.to_string(),
    };

    let id: u64 = HAND_ID
        .captures(header.trim_start())
        .and_then(|caps| caps[1].parse().ok())
        .ok_or_else(missing)?;
    if id == 0 {
        return Err(missing());
    }

    let table = TABLE_ID.captures(header).and_then(|caps| caps[1].parse().ok());
    let played_at = TIMESTAMP
        .captures(header)
        .and_then(|caps| NaiveDateTime::parse_from_str(&caps[1], "%Y-%m-%d %H:%M:%S").ok());

    Ok((id, table, played_at))
}

fn owned_lines(lines: &[&str]) -> Vec<String> {
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].iter().map(|l| l.to_string()).collect()
}
