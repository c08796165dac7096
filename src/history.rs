//! Hand-history parsing
//!
//! Splits a concatenated log into hand blocks, parses them (in parallel),
//! and keeps the first occurrence of every hand number.

use crate::config::ParserConfig;
use crate::error::{ParseError, Result};
use crate::hand::Hand;
use crate::round::Diagnostic;
use rayon::prelude::*;
use std::collections::HashSet;

/// De-duplicated hands of one ingestion run, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct HandHistory {
    hands: Vec<Hand>,
    seen: HashSet<u64>,
    diagnostics: Vec<Diagnostic>,
    duplicates: usize,
}

impl HandHistory {
    /// Parse a full log with the default Ignition tokens
    pub fn parse(input: &str) -> Result<Self> {
        Self::parse_with(input, &ParserConfig::default())
    }

    /// Parse a full log.
    ///
    /// Text before the first hand delimiter must be empty. The first
    /// structural error (in source order) aborts the whole run.
    pub fn parse_with(input: &str, config: &ParserConfig) -> Result<Self> {
        let mut blocks = input.split(config.hand_delimiter.as_str());

        let leading = blocks.next().unwrap_or("");
        if !leading.is_empty() {
            return Err(ParseError::LeadingText {
                preview: leading.chars().take(60).collect(),
            });
        }

        let blocks: Vec<&str> = blocks.collect();
        let parsed: Vec<_> = blocks
            .par_iter()
            .enumerate()
            .map(|(i, block)| Hand::parse(block, i + 1, config))
            .collect();

        let mut history = HandHistory::default();
        for result in parsed {
            let (hand, diagnostics) = result?;
            history.insert(hand, diagnostics);
        }

        if history.duplicates > 0 {
            log::debug!(
                "Dropped {} duplicate hands ({} unique)",
                history.duplicates,
                history.hands.len()
            );
        }
        for diagnostic in &history.diagnostics {
            log::warn!("{}", diagnostic);
        }

        Ok(history)
    }

    /// Keep a hand unless its number was already seen. Returns whether it
    /// was kept; diagnostics of a dropped duplicate are discarded with it.
    pub fn insert(&mut self, hand: Hand, diagnostics: Vec<Diagnostic>) -> bool {
        if !self.seen.insert(hand.id) {
            self.duplicates += 1;
            return false;
        }
        self.hands.push(hand);
        self.diagnostics.extend(diagnostics);
        true
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    pub fn contains(&self, hand_id: u64) -> bool {
        self.seen.contains(&hand_id)
    }

    /// Unrecognized lines found in retained hands
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of hand blocks dropped as repeats of an earlier hand number
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FormatError, HandRef};

    fn hand(id: u64, hero_action: &str) -> String {
        format!(
            "Ignition Hand #{} TBL#1 HOLDEM No Limit - 2020-01-01 10:00:00\n\
             Seat 1: UTG [ME] ($10 in chips)\n\
             *** HOLE CARDS ***\n\
             UTG [ME] : Card dealt to a spot [Ah Kd]\n\
             UTG [ME] : {}\n\
             *** SUMMARY ***\n\
             Total Pot($0.07)\n\n\n",
            id, hero_action
        )
    }

    #[test]
    fn test_split_and_order() {
        let log = [
            hand(3, "Raises $0.15 to $0.15"),
            hand(1, "Folds"),
            hand(2, "Calls $0.05"),
        ]
        .concat();
        let history = HandHistory::parse(&log).unwrap();
        let ids: Vec<u64> = history.hands().iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(history.duplicates(), 0);
        assert!(history.contains(1));
        assert!(!history.contains(4));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let log = [hand(7, "Raises $0.15 to $0.15"), hand(8, "Folds"), hand(7, "Folds")].concat();
        let history = HandHistory::parse(&log).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.duplicates(), 1);
        let first = &history.hands()[0];
        assert_eq!(first.id, 7);
        assert_eq!(first.preflop_tally().unwrap().raises, 1);
    }

    #[test]
    fn test_leading_text_rejected() {
        let log = format!("garbage\n{}", hand(1, "Folds"));
        let err = HandHistory::parse(&log).unwrap_err();
        assert!(matches!(err, ParseError::LeadingText { .. }));
    }

    #[test]
    fn test_empty_input() {
        let history = HandHistory::parse("").unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_format_error_aborts_run() {
        let log = [
            hand(1, "Folds"),
            "Ignition Hand #2 HOLDEM\n*** MYSTERY ***\nUTG : Folds\n".to_string(),
            hand(3, "Folds"),
        ]
        .concat();
        let err = HandHistory::parse(&log).unwrap_err();
        assert_eq!(
            err,
            ParseError::Hand {
                hand: HandRef::Id(2),
                source: FormatError::UnknownSegment {
                    header: "MYSTERY ***".to_string()
                },
            }
        );
    }

    #[test]
    fn test_duplicate_diagnostics_dropped() {
        let odd = "Ignition Hand #5 HOLDEM\n*** HOLE CARDS ***\n\
                   UTG [ME] : Folds\n???\n*** SUMMARY ***\n";
        let log = [odd, odd].concat();
        let history = HandHistory::parse(&log).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.diagnostics().len(), 1);
        assert_eq!(history.diagnostics()[0].hand_id, Some(5));
    }
}
