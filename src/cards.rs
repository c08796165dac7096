//! Playing cards as they appear in Ignition hand histories
//!
//! Cards are written as two-character tokens, rank then suit (`Ah`, `Td`,
//! `2c`). Hero's two hole cards are summarized as a [`StartingHand`]
//! (`AKs`, `T9o`, `77`) for range tabulation.

use std::fmt;
use std::str::FromStr;

/// Card rank, ordered Two < Three < ... < Ace
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// All ranks from Ace down to Two (chart order)
    pub const DESCENDING: [Rank; 13] = [
        Rank::Ace,
        Rank::King,
        Rank::Queen,
        Rank::Jack,
        Rank::Ten,
        Rank::Nine,
        Rank::Eight,
        Rank::Seven,
        Rank::Six,
        Rank::Five,
        Rank::Four,
        Rank::Three,
        Rank::Two,
    ];

    pub fn from_char(c: char) -> Option<Rank> {
        match c.to_ascii_uppercase() {
            '2' => Some(Rank::Two),
            '3' => Some(Rank::Three),
            '4' => Some(Rank::Four),
            '5' => Some(Rank::Five),
            '6' => Some(Rank::Six),
            '7' => Some(Rank::Seven),
            '8' => Some(Rank::Eight),
            '9' => Some(Rank::Nine),
            'T' => Some(Rank::Ten),
            'J' => Some(Rank::Jack),
            'Q' => Some(Rank::Queen),
            'K' => Some(Rank::King),
            'A' => Some(Rank::Ace),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    /// Row/column of this rank in a 13x13 chart (Ace = 0, Two = 12)
    pub fn chart_index(self) -> usize {
        12 - self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub fn from_char(c: char) -> Option<Suit> {
        match c.to_ascii_lowercase() {
            'c' => Some(Suit::Clubs),
            'd' => Some(Suit::Diamonds),
            'h' => Some(Suit::Hearts),
            's' => Some(Suit::Spades),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        }
    }
}

/// A single playing card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }
}

impl FromStr for Card {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let chars: Vec<char> = s.chars().collect();
        // Some exports spell ten as "10"
        let (rank_char, suit_char) = match chars.as_slice() {
            [r, su] => (*r, *su),
            ['1', '0', su] => ('T', *su),
            _ => return Err(format!("Invalid card: {}", s)),
        };

        let rank =
            Rank::from_char(rank_char).ok_or_else(|| format!("Invalid rank: {}", rank_char))?;
        let suit =
            Suit::from_char(suit_char).ok_or_else(|| format!("Invalid suit: {}", suit_char))?;

        Ok(Card::new(rank, suit))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.to_char(), self.suit.to_char())
    }
}

/// Parse a whitespace-separated card list such as `"7c 8d 2h"`
pub fn parse_card_list(list: &str) -> Result<Vec<Card>, String> {
    list.split_whitespace().map(str::parse).collect()
}

/// Hero's two hole cards, highest rank first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoleCardPair(pub [Card; 2]);

impl HoleCardPair {
    pub fn new(a: Card, b: Card) -> Self {
        if b.rank > a.rank {
            HoleCardPair([b, a])
        } else {
            HoleCardPair([a, b])
        }
    }

    /// Build from a dealt card group; `None` unless exactly two cards
    pub fn from_group(group: &[Card]) -> Option<Self> {
        match group {
            [a, b] => Some(HoleCardPair::new(*a, *b)),
            _ => None,
        }
    }

    pub fn high(&self) -> Card {
        self.0[0]
    }

    pub fn low(&self) -> Card {
        self.0[1]
    }

    pub fn starting_hand(&self) -> StartingHand {
        StartingHand {
            high: self.high().rank,
            low: self.low().rank,
            suited: self.high().suit == self.low().suit,
        }
    }
}

impl fmt::Display for HoleCardPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.high(), self.low())
    }
}

/// Suit-independent starting hand class (`AKs`, `AKo`, `AA`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StartingHand {
    pub high: Rank,
    pub low: Rank,
    pub suited: bool,
}

impl StartingHand {
    pub fn is_pair(&self) -> bool {
        self.high == self.low
    }

    /// (row, col) in the 13x13 chart: suited above the diagonal, offsuit below
    pub fn chart_cell(&self) -> (usize, usize) {
        let hi = self.high.chart_index();
        let lo = self.low.chart_index();
        if self.suited {
            (hi, lo)
        } else {
            (lo, hi)
        }
    }

    /// Inverse of [`StartingHand::chart_cell`]
    pub fn from_chart_cell(row: usize, col: usize) -> StartingHand {
        let r = Rank::DESCENDING[row];
        let c = Rank::DESCENDING[col];
        if row < col {
            StartingHand {
                high: r,
                low: c,
                suited: true,
            }
        } else {
            StartingHand {
                high: c,
                low: r,
                suited: false,
            }
        }
    }
}

impl fmt::Display for StartingHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.high.to_char(), self.low.to_char())?;
        if !self.is_pair() {
            write!(f, "{}", if self.suited { 's' } else { 'o' })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_card() {
        let card: Card = "Ah".parse().unwrap();
        assert_eq!(card, Card::new(Rank::Ace, Suit::Hearts));
        assert_eq!("Td".parse::<Card>().unwrap().rank, Rank::Ten);
        assert_eq!("10s".parse::<Card>().unwrap(), Card::new(Rank::Ten, Suit::Spades));
        assert_eq!(card.to_string(), "Ah");
        assert!("Xh".parse::<Card>().is_err());
        assert!("Ax".parse::<Card>().is_err());
        assert!("A".parse::<Card>().is_err());
    }

    #[test]
    fn test_parse_card_list() {
        let cards = parse_card_list("7c 8d 2h").unwrap();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[2], Card::new(Rank::Two, Suit::Hearts));
        assert!(parse_card_list("").unwrap().is_empty());
    }

    #[test]
    fn test_starting_hand_labels() {
        let ak = HoleCardPair::new("Kd".parse().unwrap(), "Ad".parse().unwrap());
        assert_eq!(ak.high().rank, Rank::Ace);
        assert_eq!(ak.starting_hand().to_string(), "AKs");

        let t9 = HoleCardPair::new("9c".parse().unwrap(), "Th".parse().unwrap());
        assert_eq!(t9.starting_hand().to_string(), "T9o");

        let sevens = HoleCardPair::new("7c".parse().unwrap(), "7h".parse().unwrap());
        assert_eq!(sevens.starting_hand().to_string(), "77");
    }

    #[test]
    fn test_chart_cells() {
        let hand = |high, low, suited| StartingHand { high, low, suited };
        let aks = hand(Rank::Ace, Rank::King, true);
        let ako = hand(Rank::Ace, Rank::King, false);
        let deuces = hand(Rank::Two, Rank::Two, false);
        assert_eq!(aks.chart_cell(), (0, 1));
        assert_eq!(ako.chart_cell(), (1, 0));
        assert_eq!(deuces.chart_cell(), (12, 12));

        for row in 0..13 {
            for col in 0..13 {
                assert_eq!(StartingHand::from_chart_cell(row, col).chart_cell(), (row, col));
            }
        }
    }
}
