//! Literal tokens of the hand-history format
//!
//! The Ignition export is only loosely structured and its table-management
//! messages have drifted between client versions, so every marker the parser
//! keys on lives here instead of being baked into the parser.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tokens the parser uses to split and classify a hand history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Literal preceding every hand block
    pub hand_delimiter: String,
    /// Literal separating the seat listing, each betting round and the summary
    pub segment_delimiter: String,
    /// Token identifying the hero in deal and action lines
    pub hero_marker: String,
    /// Token identifying a hole-card deal line
    pub deal_marker: String,
    /// Separator between actor and action text
    pub action_separator: String,
    /// Substrings marking table-management lines that carry no meaning
    pub noise_keywords: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::ignition()
    }
}

impl ParserConfig {
    /// Tokens used by the Ignition / Bovada client export
    pub fn ignition() -> Self {
        Self {
            hand_delimiter: "Ignition ".to_string(),
            segment_delimiter: "\n*** ".to_string(),
            hero_marker: "[ME]".to_string(),
            deal_marker: "Card dealt to a spot".to_string(),
            action_separator: " : ".to_string(),
            noise_keywords: [
                "Seat sit down",
                "Seat stand",
                "Seat re-join",
                "Table deposit",
                "Table enter user",
                "Table leave user",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }

    /// Add a noise keyword (no-op if already present)
    pub fn with_noise_keyword(mut self, keyword: &str) -> Self {
        if !self.noise_keywords.iter().any(|k| k == keyword) {
            self.noise_keywords.push(keyword.to_string());
        }
        self
    }

    /// Remove a noise keyword
    pub fn without_noise_keyword(mut self, keyword: &str) -> Self {
        self.noise_keywords.retain(|k| k != keyword);
        self
    }

    /// Track a different hero marker
    pub fn with_hero_marker(mut self, marker: &str) -> Self {
        self.hero_marker = marker.to_string();
        self
    }

    /// Load config from a TOML file. Missing keys fall back to the Ignition
    /// defaults; a missing file yields the defaults outright.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No parser config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read parser config: {}", path.display()))?;
        let config: ParserConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid parser config: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid parser config: {}", path.display()))?;
        Ok(config)
    }

    /// Reject empty tokens: an empty string is contained in every line, so
    /// it would tag every actor as hero or every line as noise.
    pub fn validate(&self) -> Result<()> {
        let tokens = [
            ("hand_delimiter", &self.hand_delimiter),
            ("segment_delimiter", &self.segment_delimiter),
            ("hero_marker", &self.hero_marker),
            ("deal_marker", &self.deal_marker),
            ("action_separator", &self.action_separator),
        ];
        for (field, value) in tokens {
            if value.is_empty() {
                anyhow::bail!("{} must not be empty", field);
            }
        }
        if let Some(i) = self.noise_keywords.iter().position(|k| k.is_empty()) {
            anyhow::bail!("noise_keywords[{}] must not be empty", i);
        }
        Ok(())
    }

    /// Whether a line is table-management noise
    pub fn is_noise(&self, line: &str) -> bool {
        self.noise_keywords.iter().any(|k| line.contains(k.as_str()))
    }
}
