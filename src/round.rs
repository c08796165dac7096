//! Betting round parsing
//!
//! A betting round is one street segment of a hand: the header line
//! (`HOLE CARDS ***`, `FLOP *** [7c 8d 2h]`, ...) followed by deal lines,
//! table noise and player actions. The pre-flop round additionally yields
//! hero's action tallies used for VPIP/PFR.

use crate::cards::{parse_card_list, Card, HoleCardPair};
use crate::config::ParserConfig;
use crate::error::FormatError;
use crate::line::{classify_line, Action, LineKind, Verb};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    static ref ROUND_NAME: Regex = Regex::new(r"^([A-Z ]+) \*\*\*").unwrap();
    static ref BRACKETED: Regex = Regex::new(r"\[([^\]]*)\]").unwrap();
}

/// One betting round of a hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Street {
    HoleCards,
    Flop,
    Turn,
    River,
}

impl Street {
    pub const ALL: [Street; 4] = [Street::HoleCards, Street::Flop, Street::Turn, Street::River];

    /// Street for a header name as the client writes it
    pub fn from_name(name: &str) -> Option<Street> {
        match name.trim() {
            "HOLE CARDS" => Some(Street::HoleCards),
            "FLOP" => Some(Street::Flop),
            "TURN" => Some(Street::Turn),
            "RIVER" => Some(Street::River),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Street::HoleCards => "HOLE CARDS",
            Street::Flop => "FLOP",
            Street::Turn => "TURN",
            Street::River => "RIVER",
        }
    }

    /// The street that must have been played before this one
    pub fn previous(self) -> Option<Street> {
        match self {
            Street::HoleCards => None,
            Street::Flop => Some(Street::HoleCards),
            Street::Turn => Some(Street::Flop),
            Street::River => Some(Street::Turn),
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every hole-card group dealt at the table, in dealing order, with an
/// optional index of hero's group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoleCards {
    groups: Vec<Vec<Card>>,
    hero: Option<usize>,
}

impl HoleCards {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one seat's cards; a hero deal marks this group as hero's
    pub fn push(&mut self, cards: Vec<Card>, is_hero: bool) {
        self.groups.push(cards);
        if is_hero {
            self.hero = Some(self.groups.len() - 1);
        }
    }

    pub fn groups(&self) -> &[Vec<Card>] {
        &self.groups
    }

    pub fn hero_index(&self) -> Option<usize> {
        self.hero
    }

    pub fn hero(&self) -> Option<&[Card]> {
        self.hero.map(|i| self.groups[i].as_slice())
    }

    /// Hero's cards as a Hold'em pair, if hero was dealt exactly two
    pub fn hero_pair(&self) -> Option<HoleCardPair> {
        self.hero().and_then(HoleCardPair::from_group)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Hero's first pre-flop action
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FirstAction {
    Raise,
    Call,
    Fold,
    /// Hero acted first with something other than a raise, call or fold
    /// (all-in, check, ...)
    Unclassified,
}

impl FirstAction {
    pub fn name(self) -> &'static str {
        match self {
            FirstAction::Raise => "Raise",
            FirstAction::Call => "Call",
            FirstAction::Fold => "Fold",
            FirstAction::Unclassified => "Unclassified",
        }
    }
}

impl From<Option<Verb>> for FirstAction {
    fn from(verb: Option<Verb>) -> Self {
        match verb {
            Some(Verb::Raise) => FirstAction::Raise,
            Some(Verb::Call) => FirstAction::Call,
            Some(Verb::Fold) => FirstAction::Fold,
            None => FirstAction::Unclassified,
        }
    }
}

impl fmt::Display for FirstAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hero's pre-flop action counts for one hand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreflopTally {
    /// Every hero action, whatever the verb
    pub actions: u32,
    pub raises: u32,
    pub calls: u32,
    /// Classification of hero's first action; `None` if hero never acted
    pub first: Option<FirstAction>,
}

impl PreflopTally {
    /// Tally hero's actions in order
    pub fn from_actions(actions: &[Action]) -> Self {
        actions
            .iter()
            .filter(|a| a.is_hero)
            .fold(PreflopTally::default(), |tally, a| tally.record(a.verb()))
    }

    fn record(self, verb: Option<Verb>) -> Self {
        PreflopTally {
            actions: self.actions + 1,
            raises: self.raises + u32::from(verb == Some(Verb::Raise)),
            calls: self.calls + u32::from(verb == Some(Verb::Call)),
            first: self.first.or(Some(FirstAction::from(verb))),
        }
    }

    /// Calls plus raises
    pub fn voluntary(&self) -> u32 {
        self.calls + self.raises
    }
}

/// A line inside a well-formed round that matched no known pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Hand number, attached once the enclosing hand has been parsed
    pub hand_id: Option<u64>,
    pub street: Street,
    /// 1-based line number within the street segment (header is line 1)
    pub line_number: usize,
    pub line: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hand_id {
            Some(id) => write!(f, "hand #{} ", id)?,
            None => write!(f, "unknown hand ")?,
        }
        write!(f, "{} line {}: unhandled line {:?}", self.street, self.line_number, self.line)
    }
}

/// One parsed street
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BettingRound {
    pub street: Street,
    /// Community cards revealed on this street (empty pre-flop)
    pub street_cards: Vec<Card>,
    /// Hole cards dealt (pre-flop only)
    pub hole_cards: HoleCards,
    /// Player actions in order
    pub actions: Vec<Action>,
    /// Hero tallies (pre-flop only)
    pub tally: Option<PreflopTally>,
}

impl BettingRound {
    /// Parse the lines of one street segment; `lines[0]` is the header.
    ///
    /// Unrecognized lines are returned as diagnostics and otherwise skipped.
    pub fn parse(
        lines: &[&str],
        config: &ParserConfig,
    ) -> Result<(BettingRound, Vec<Diagnostic>), FormatError> {
        let header = *lines.first().ok_or_else(|| FormatError::UnknownStreet {
            header: String::new(),
        })?;
        let street = parse_street(header)?;

        let street_cards = if street == Street::HoleCards {
            Vec::new()
        } else {
            parse_street_cards(header)?
        };

        let mut hole_cards = HoleCards::new();
        let mut actions = Vec::new();
        let mut diagnostics = Vec::new();

        for (idx, line) in lines.iter().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }

            match classify_line(line, street, config) {
                LineKind::HeroDeal(_) | LineKind::OtherDeal(_) if street != Street::HoleCards => {
                    return Err(FormatError::DealOutsidePreflop {
                        street,
                        line: line.to_string(),
                    });
                }
                LineKind::HeroDeal(cards) => {
                    hole_cards.push(parse_cards(cards, header)?, true);
                }
                LineKind::OtherDeal(cards) => {
                    hole_cards.push(parse_cards(cards, header)?, false);
                }
                LineKind::Noise => {}
                LineKind::Action(action) => actions.push(action),
                LineKind::Unrecognized => diagnostics.push(Diagnostic {
                    hand_id: None,
                    street,
                    line_number: idx + 1,
                    line: line.to_string(),
                }),
            }
        }

        let tally = if street == Street::HoleCards {
            Some(PreflopTally::from_actions(&actions))
        } else {
            None
        };

        Ok((
            BettingRound {
                street,
                street_cards,
                hole_cards,
                actions,
                tally,
            },
            diagnostics,
        ))
    }

    /// Hero's action lines, in order
    pub fn hero_actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter().filter(|a| a.is_hero)
    }
}

// Helper functions

fn parse_street(header: &str) -> Result<Street, FormatError> {
    ROUND_NAME
        .captures(header.trim_start())
        .and_then(|caps| Street::from_name(&caps[1]))
        .ok_or_else(|| FormatError::UnknownStreet {
            header: header.to_string(),
        })
}

/// The last bracketed list on the header holds this street's new cards:
/// `TURN *** [7c 8d 2h] [Qs]` reveals only `Qs`.
fn parse_street_cards(header: &str) -> Result<Vec<Card>, FormatError> {
    match BRACKETED.captures_iter(header).last() {
        Some(caps) => parse_cards(&caps[1], header),
        None => Ok(Vec::new()),
    }
}

fn parse_cards(list: &str, header: &str) -> Result<Vec<Card>, FormatError> {
    parse_card_list(list).map_err(|_| FormatError::InvalidCard {
        token: list.to_string(),
        header: header.to_string(),
    })
}
