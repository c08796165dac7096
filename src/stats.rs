//! Hero pre-flop statistics
//!
//! Sums each retained hand's pre-flop tally into VPIP/PFR and buckets hero's
//! hole cards by the first pre-flop action.

use crate::cards::HoleCardPair;
use crate::chart::RangeChart;
use crate::error::{ParseError, Result};
use crate::hand::Hand;
use crate::history::HandHistory;
use crate::round::FirstAction;
use std::collections::BTreeMap;

/// Aggregate hero pre-flop statistics over a set of hands
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreflopStats {
    /// Number of hands aggregated
    pub hands: usize,
    /// Hero pre-flop actions of any kind (VPIP/PFR denominator)
    pub actions: u64,
    /// Hero pre-flop calls plus raises
    pub calls_raises: u64,
    /// Hero pre-flop raises
    pub raises: u64,
    buckets: BTreeMap<FirstAction, Vec<HoleCardPair>>,
}

impl PreflopStats {
    pub fn from_history(history: &HandHistory) -> Result<Self> {
        Self::from_hands(history.hands())
    }

    /// Aggregate hands in order. Every hand must have a pre-flop round.
    pub fn from_hands(hands: &[Hand]) -> Result<Self> {
        let mut stats = PreflopStats::default();

        for hand in hands {
            let tally = hand
                .preflop_tally()
                .ok_or(ParseError::MissingPreflop { hand_id: hand.id })?;

            stats.hands += 1;
            stats.actions += u64::from(tally.actions);
            stats.calls_raises += u64::from(tally.voluntary());
            stats.raises += u64::from(tally.raises);

            let Some(first) = tally.first else {
                continue;
            };
            let hero_cards = hand
                .preflop
                .as_ref()
                .and_then(|round| round.hole_cards.hero_pair());
            match hero_cards {
                Some(pair) => stats.buckets.entry(first).or_default().push(pair),
                None => log::debug!("Hand #{}: hero acted without a two-card deal", hand.id),
            }
        }

        Ok(stats)
    }

    /// Voluntarily put money in pot: (calls + raises) / actions.
    /// `None` when hero never acted pre-flop.
    pub fn vpip(&self) -> Option<f64> {
        ratio(self.calls_raises, self.actions)
    }

    /// Pre-flop raise: raises / actions. `None` when hero never acted pre-flop.
    pub fn pfr(&self) -> Option<f64> {
        ratio(self.raises, self.actions)
    }

    /// Hero's hole cards for hands whose first pre-flop action was `action`
    pub fn bucket(&self, action: FirstAction) -> &[HoleCardPair] {
        self.buckets.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty buckets in Raise, Call, Fold, Unclassified order
    pub fn buckets(&self) -> impl Iterator<Item = (FirstAction, &[HoleCardPair])> {
        self.buckets.iter().map(|(action, hands)| (*action, hands.as_slice()))
    }

    /// Tabulate the Raise/Call/Fold buckets into a 13x13 chart
    pub fn range_chart(&self) -> RangeChart {
        let mut chart = RangeChart::new();
        for action in [FirstAction::Raise, FirstAction::Call, FirstAction::Fold] {
            for pair in self.bucket(action) {
                chart.record(pair.starting_hand(), action);
            }
        }
        chart
    }
}

fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(hero_lines: &[&[&str]]) -> HandHistory {
        let log: String = hero_lines
            .iter()
            .enumerate()
            .map(|(i, actions)| {
                let mut text = format!(
                    "Ignition Hand #{} HOLDEM\n*** HOLE CARDS ***\n\
                     UTG [ME] : Card dealt to a spot [Qs Jh]\n",
                    i + 1
                );
                for action in actions.iter() {
                    text.push_str(action);
                    text.push('\n');
                }
                text.push_str("*** SUMMARY ***\n\n");
                text
            })
            .collect();
        HandHistory::parse(&log).unwrap()
    }

    #[test]
    fn test_vpip_pfr() {
        let history = history(&[
            &["UTG [ME] : Raises $0.15 to $0.15"],
            &["UTG [ME] : Calls $0.05"],
        ]);
        let stats = PreflopStats::from_history(&history).unwrap();
        assert_eq!(stats.hands, 2);
        assert_eq!(stats.actions, 2);
        assert_eq!(stats.calls_raises, 2);
        assert_eq!(stats.raises, 1);
        assert_eq!(stats.vpip(), Some(1.0));
        assert_eq!(stats.pfr(), Some(0.5));
    }

    #[test]
    fn test_degenerate_when_hero_never_acts() {
        let history = history(&[&["Big Blind : Folds"], &[]]);
        let stats = PreflopStats::from_history(&history).unwrap();
        assert_eq!(stats.hands, 2);
        assert_eq!(stats.actions, 0);
        assert_eq!(stats.vpip(), None);
        assert_eq!(stats.pfr(), None);
        assert_eq!(stats.buckets().count(), 0);
    }

    #[test]
    fn test_buckets_by_first_action() {
        let history = history(&[
            &["UTG [ME] : Raises $0.15 to $0.15"],
            &["UTG [ME] : Folds"],
            &["UTG [ME] : Calls $0.05", "UTG [ME] : Raises $1 to $1"],
            &["UTG [ME] : All-in(raise) $10 to $10"],
        ]);
        let stats = PreflopStats::from_history(&history).unwrap();
        assert_eq!(stats.bucket(FirstAction::Raise).len(), 1);
        assert_eq!(stats.bucket(FirstAction::Call).len(), 1);
        assert_eq!(stats.bucket(FirstAction::Fold).len(), 1);
        assert_eq!(stats.bucket(FirstAction::Unclassified).len(), 1);
        assert_eq!(stats.bucket(FirstAction::Raise)[0].starting_hand().to_string(), "QJo");
        assert_eq!(stats.actions, 5);
        assert_eq!(stats.raises, 2);

        // Unclassified hands stay out of the chart
        let chart = stats.range_chart();
        assert_eq!(chart.dealt(), 3);
    }

    #[test]
    fn test_missing_preflop_is_fatal() {
        let log = "Ignition Hand #9 HOLDEM\nSeat 1: UTG\n*** SUMMARY ***\n";
        let history = HandHistory::parse(log).unwrap();
        let err = PreflopStats::from_history(&history).unwrap_err();
        assert_eq!(err, ParseError::MissingPreflop { hand_id: 9 });
    }
}
