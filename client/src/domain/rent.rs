//! Rent rule parsing and resolution.
//!
//! Markets define rent either with the compact range grammar
//! (`"1-4:2600,5:2800,6-7:3400"`, days 1=Monday .. 7=Sunday) or with the
//! older flat weekday/weekend pair. Both normalize into [`RentRuleSet`] at
//! ingestion; rent for a date is then the rate of the unique range covering
//! that date's weekday.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::{Market, RentRules};
use thiserror::Error;

/// A token of the rule grammar failed to parse. Malformed rule data is never
/// silently defaulted; the error message is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleParseError {
    #[error("rent rule string is empty")]
    Empty,
    #[error("malformed rent rule token `{0}`")]
    MalformedToken(String),
    #[error("day `{0}` is outside 1-7")]
    InvalidDay(String),
    #[error("inverted day range {start}-{end}")]
    InvertedRange { start: u8, end: u8 },
    #[error("invalid rent rate `{0}`")]
    InvalidRate(String),
}

/// A structurally valid rule set failed to produce exactly one rate for a
/// weekday. Ranges are defined to be mutually exclusive and exhaustive over
/// 1-7, so either outcome means the stored rules are wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuleResolutionError {
    #[error("no rent rule covers weekday {0}")]
    NotCovered(u8),
    #[error("overlapping rent rules for weekday {0}")]
    Overlapping(u8),
}

/// An inclusive day-of-week range with its flat rent rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRange {
    /// First covered day, 1=Monday
    pub start: u8,
    /// Last covered day, 7=Sunday
    pub end: u8,
    pub rate: f64,
}

impl DayRange {
    fn covers(&self, weekday: u8) -> bool {
        self.start <= weekday && weekday <= self.end
    }
}

/// Canonical rent rule representation. Immutable once built; a market that
/// changes its rules gets a whole new set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentRuleSet {
    ranges: Vec<DayRange>,
}

impl RentRuleSet {
    /// Parse the compact grammar: comma-separated `range:rate` tokens, where
    /// a range is `start-end` or a single day.
    pub fn parse(encoded: &str) -> Result<Self, RuleParseError> {
        if encoded.trim().is_empty() {
            return Err(RuleParseError::Empty);
        }

        let mut ranges = Vec::new();
        for token in encoded.split(',') {
            let token = token.trim();
            let (days, rate) = token
                .split_once(':')
                .ok_or_else(|| RuleParseError::MalformedToken(token.to_string()))?;

            let rate: f64 = rate
                .trim()
                .parse()
                .map_err(|_| RuleParseError::InvalidRate(rate.trim().to_string()))?;
            if !rate.is_finite() || rate < 0.0 {
                return Err(RuleParseError::InvalidRate(rate.to_string()));
            }

            let (start, end) = match days.split_once('-') {
                Some((start, end)) => (parse_day(start)?, parse_day(end)?),
                // Single-day token: degenerate range
                None => {
                    let day = parse_day(days)?;
                    (day, day)
                }
            };
            if start > end {
                return Err(RuleParseError::InvertedRange { start, end });
            }

            ranges.push(DayRange { start, end, rate });
        }

        Ok(Self { ranges })
    }

    /// Normalize the flat weekday/weekend pair: Monday-Friday at one rate,
    /// Saturday-Sunday at the other.
    pub fn flat(weekday: f64, weekend: f64) -> Self {
        Self {
            ranges: vec![
                DayRange {
                    start: 1,
                    end: 5,
                    rate: weekday,
                },
                DayRange {
                    start: 6,
                    end: 7,
                    rate: weekend,
                },
            ],
        }
    }

    /// Single ingestion point for the polymorphic wire shape. Downstream code
    /// only ever sees the canonical form.
    pub fn normalize(raw: &RentRules) -> Result<Self, RuleParseError> {
        match raw {
            RentRules::Grammar(encoded) => Self::parse(encoded),
            RentRules::FlatRates { weekday, weekend } => Ok(Self::flat(*weekday, *weekend)),
        }
    }

    pub fn ranges(&self) -> &[DayRange] {
        &self.ranges
    }

    /// Rate for a weekday (1=Monday .. 7=Sunday). Exactly one range must
    /// cover the day.
    pub fn rate_for(&self, weekday: u8) -> Result<f64, RuleResolutionError> {
        let mut covering = self.ranges.iter().filter(|range| range.covers(weekday));

        let rate = match covering.next() {
            Some(range) => range.rate,
            None => return Err(RuleResolutionError::NotCovered(weekday)),
        };
        if covering.next().is_some() {
            return Err(RuleResolutionError::Overlapping(weekday));
        }
        Ok(rate)
    }
}

fn parse_day(s: &str) -> Result<u8, RuleParseError> {
    let day: u8 = s
        .trim()
        .parse()
        .map_err(|_| RuleParseError::InvalidDay(s.trim().to_string()))?;
    if !(1..=7).contains(&day) {
        return Err(RuleParseError::InvalidDay(day.to_string()));
    }
    Ok(day)
}

/// A market with its rules already normalized. Built once at ingestion;
/// serializable so the reference cache stores the normalized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRates {
    pub id: String,
    pub name: String,
    pub rules: RentRuleSet,
}

impl MarketRates {
    pub fn from_wire(market: Market) -> Result<Self, RuleParseError> {
        let rules = RentRuleSet::normalize(&market.rent_rules)?;
        Ok(Self {
            id: market.id,
            name: market.name,
            rules,
        })
    }
}

/// Rent owed at a market on a calendar date. Deterministic for a given
/// (market, date) pair, which keeps re-submission idempotent and lets a quote
/// be shown before the revenue entry is persisted.
pub fn resolve_rent(market: &MarketRates, date: NaiveDate) -> Result<f64, RuleResolutionError> {
    let weekday = date.weekday().number_from_monday() as u8;
    market.rules.rate_for(weekday)
}
