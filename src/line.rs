//! Line classification within a betting round
//!
//! Every non-blank line after a street header is one of: a hole-card deal
//! (to hero or to another seat), table-management noise, a player action,
//! or something this parser does not know about yet.

use crate::config::ParserConfig;
use crate::round::Street;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BRACKETED: Regex = Regex::new(r"\[([^\]]*)\]").unwrap();
}

/// Action verbs that matter for pre-flop statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Raise,
    Call,
    Fold,
}

/// A player action line (`"<actor> : <action text>"`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// Seat label of the actor, e.g. `"Dealer [ME]"` or `"UTG+1"`
    pub actor: String,
    /// Everything after the separator, e.g. `"Raises $0.15 to $0.15"`
    pub text: String,
    /// Whether the actor carries the hero marker
    pub is_hero: bool,
}

impl Action {
    /// Classify the action text by the literal verbs the client writes
    pub fn verb(&self) -> Option<Verb> {
        if self.text.contains("Raises") {
            Some(Verb::Raise)
        } else if self.text.contains("Calls") {
            Some(Verb::Call)
        } else if self.text.contains("Folds") {
            Some(Verb::Fold)
        } else {
            None
        }
    }

    pub fn line(&self, separator: &str) -> String {
        format!("{}{}{}", self.actor, separator, self.text)
    }
}

/// What a single round line means
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Hole cards dealt to hero; holds the bracketed card list
    HeroDeal(&'a str),
    /// Hole cards dealt to another seat
    OtherDeal(&'a str),
    /// Seat/table bookkeeping with no statistical meaning
    Noise,
    Action(Action),
    Unrecognized,
}

/// Classify one line of a betting round.
///
/// Deal lines are only tagged as hero deals in the pre-flop round; the
/// flop, turn and river carry their cards on the header line instead.
pub fn classify_line<'a>(line: &'a str, street: Street, config: &ParserConfig) -> LineKind<'a> {
    if let Some(pos) = line.find(config.deal_marker.as_str()) {
        let tail = &line[pos + config.deal_marker.len()..];
        return match BRACKETED.captures(tail).and_then(|caps| caps.get(1)) {
            Some(cards) => {
                let cards = cards.as_str();
                if street == Street::HoleCards && line.contains(config.hero_marker.as_str()) {
                    LineKind::HeroDeal(cards)
                } else {
                    LineKind::OtherDeal(cards)
                }
            }
            None => LineKind::Unrecognized,
        };
    }

    if config.is_noise(line) {
        return LineKind::Noise;
    }

    if let Some((actor, text)) = line.split_once(config.action_separator.as_str()) {
        let actor = actor.trim();
        return LineKind::Action(Action {
            actor: actor.to_string(),
            text: text.trim().to_string(),
            is_hero: actor.contains(config.hero_marker.as_str()),
        });
    }

    LineKind::Unrecognized
}
