//! # Addressing: Locators, Entry Keys and Routes
//!
//! Every exercise is addressed by a five-part [`Locator`]:
//! `(periodId, blockId, week, day, exerciseId)`.
//!
//! The locator has two serialized forms:
//!
//! 1. **Entry key** ([`encode`] / [`decode`]): the overlay's map key. The five
//!    components joined with [`KEY_SEPARATOR`], numbers as decimal text:
//!    `serie-1-2026|1|1|1|squat`. Slugs never contain the separator, so the
//!    encoding is collision-free.
//! 2. **Route** ([`route`] / [`parse_route`]): ordered `(tag, value)` tokens for
//!    a router, `[p, periodId], [b, blockId], [w, week], [d, day], [e, exerciseId]`.
//!    Its text form is `p/serie-1-2026/b/1/w/1/d/1/e/squat`.
//!
//! A route may stop early: `p/serie-1-2026/b/2` selects a block without an
//! exercise. That coarser state is a [`Selection`]; a complete selection
//! converts to a locator.
//!
//! ## Normalization
//!
//! Block, week and day arrive from routes as text. They are parsed into `u32`
//! here and nowhere else, so every downstream comparison is numeric.

use crate::error::{Result, TrainlogError};
use std::fmt;
use std::str::FromStr;

/// Separator between entry key segments. Never produced by [`crate::model::slugify`].
pub const KEY_SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locator {
    pub period_id: String,
    pub block_id: u32,
    pub week: u32,
    pub day: u32,
    pub exercise_id: String,
}

impl Locator {
    pub fn new(
        period_id: impl Into<String>,
        block_id: u32,
        week: u32,
        day: u32,
        exercise_id: impl Into<String>,
    ) -> Self {
        Self {
            period_id: period_id.into(),
            block_id,
            week,
            day,
            exercise_id: exercise_id.into(),
        }
    }

    pub fn key(&self) -> String {
        encode(self)
    }

    pub fn selection(&self) -> Selection {
        Selection {
            period: Some(self.period_id.clone()),
            block: Some(self.block_id),
            week: Some(self.week),
            day: Some(self.day),
            exercise: Some(self.exercise_id.clone()),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", route(self))
    }
}

/// Canonical entry key for a locator.
pub fn encode(locator: &Locator) -> String {
    format!(
        "{p}{s}{b}{s}{w}{s}{d}{s}{e}",
        p = locator.period_id,
        b = locator.block_id,
        w = locator.week,
        d = locator.day,
        e = locator.exercise_id,
        s = KEY_SEPARATOR
    )
}

/// Inverse of [`encode`]. `None` unless the key has exactly five segments,
/// non-empty slugs and positive numbers, written the way [`encode`] writes
/// them: `p|01|1|1|x` and `p|+1|1|1|x` do not decode, so one entry has only
/// one key.
pub fn decode(key: &str) -> Option<Locator> {
    let parts: Vec<&str> = key.split(KEY_SEPARATOR).collect();
    if parts.len() != 5 || parts[0].is_empty() || parts[4].is_empty() {
        return None;
    }
    let locator = Locator {
        period_id: parts[0].to_string(),
        block_id: parse_number(parts[1])?,
        week: parse_number(parts[2])?,
        day: parse_number(parts[3])?,
        exercise_id: parts[4].to_string(),
    };
    (encode(&locator) == key).then_some(locator)
}

fn parse_number(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().filter(|n| *n > 0)
}

/// A possibly partial address: the components are filled left to right.
///
/// `Selection::default()` selects nothing; a selection with all five
/// components converts to a [`Locator`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    pub period: Option<String>,
    pub block: Option<u32>,
    pub week: Option<u32>,
    pub day: Option<u32>,
    pub exercise: Option<String>,
}

impl Selection {
    pub fn period(id: impl Into<String>) -> Self {
        Self {
            period: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn block(period: impl Into<String>, block: u32) -> Self {
        Self {
            block: Some(block),
            ..Self::period(period)
        }
    }

    pub fn week(period: impl Into<String>, block: u32, week: u32) -> Self {
        Self {
            week: Some(week),
            ..Self::block(period, block)
        }
    }

    pub fn day(period: impl Into<String>, block: u32, week: u32, day: u32) -> Self {
        Self {
            day: Some(day),
            ..Self::week(period, block, week)
        }
    }

    /// Number of leading components present (0..=5).
    pub fn depth(&self) -> usize {
        if self.period.is_none() {
            0
        } else if self.block.is_none() {
            1
        } else if self.week.is_none() {
            2
        } else if self.day.is_none() {
            3
        } else if self.exercise.is_none() {
            4
        } else {
            5
        }
    }

    pub fn is_empty(&self) -> bool {
        self.depth() == 0
    }

    /// The complete locator, if all five components are present.
    pub fn locator(&self) -> Option<Locator> {
        Some(Locator {
            period_id: self.period.clone()?,
            block_id: self.block?,
            week: self.week?,
            day: self.day?,
            exercise_id: self.exercise.clone()?,
        })
    }

    /// True when `locator` lies under this selection, i.e. every present
    /// leading component matches. The empty selection contains everything.
    pub fn contains(&self, locator: &Locator) -> bool {
        let depth = self.depth();
        (depth < 1 || self.period.as_deref() == Some(locator.period_id.as_str()))
            && (depth < 2 || self.block == Some(locator.block_id))
            && (depth < 3 || self.week == Some(locator.week))
            && (depth < 4 || self.day == Some(locator.day))
            && (depth < 5 || self.exercise.as_deref() == Some(locator.exercise_id.as_str()))
    }

    /// Drops every component after the first `depth`.
    pub fn truncated(&self, depth: usize) -> Selection {
        Selection {
            period: if depth >= 1 { self.period.clone() } else { None },
            block: if depth >= 2 { self.block } else { None },
            week: if depth >= 3 { self.week } else { None },
            day: if depth >= 4 { self.day } else { None },
            exercise: if depth >= 5 { self.exercise.clone() } else { None },
        }
    }

    pub fn route(&self) -> Route {
        let mut tokens = Vec::new();
        let depth = self.depth();
        if let Some(period) = &self.period {
            tokens.push(RouteToken::new(RouteTag::Period, period.clone()));
        }
        if depth >= 2 {
            if let Some(block) = self.block {
                tokens.push(RouteToken::new(RouteTag::Block, block.to_string()));
            }
        }
        if depth >= 3 {
            if let Some(week) = self.week {
                tokens.push(RouteToken::new(RouteTag::Week, week.to_string()));
            }
        }
        if depth >= 4 {
            if let Some(day) = self.day {
                tokens.push(RouteToken::new(RouteTag::Day, day.to_string()));
            }
        }
        if depth >= 5 {
            if let Some(exercise) = &self.exercise {
                tokens.push(RouteToken::new(RouteTag::Exercise, exercise.clone()));
            }
        }
        Route(tokens)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.route())
    }
}

impl From<&Locator> for Selection {
    fn from(locator: &Locator) -> Self {
        locator.selection()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteTag {
    Period,
    Block,
    Week,
    Day,
    Exercise,
}

impl RouteTag {
    const ORDER: [RouteTag; 5] = [
        RouteTag::Period,
        RouteTag::Block,
        RouteTag::Week,
        RouteTag::Day,
        RouteTag::Exercise,
    ];

    pub fn as_char(self) -> char {
        match self {
            RouteTag::Period => 'p',
            RouteTag::Block => 'b',
            RouteTag::Week => 'w',
            RouteTag::Day => 'd',
            RouteTag::Exercise => 'e',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::ORDER.into_iter().find(|tag| tag.as_char() == c)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteToken {
    pub tag: RouteTag,
    pub value: String,
}

impl RouteToken {
    pub fn new(tag: RouteTag, value: impl Into<String>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }
}

/// Ordered route tokens, as exchanged with an external router.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route(pub Vec<RouteToken>);

impl Route {
    pub fn tokens(&self) -> &[RouteToken] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|t| format!("{}/{}", t.tag.as_char(), t.value))
            .collect();
        f.write_str(&parts.join("/"))
    }
}

impl FromStr for Route {
    type Err = TrainlogError;

    /// Parses `p/<id>/b/<n>/...`. Leading/trailing slashes are ignored.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s
            .trim()
            .trim_matches('/')
            .split('/')
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() % 2 != 0 {
            return Err(TrainlogError::Api(format!(
                "Route '{}' must be tag/value pairs",
                s
            )));
        }
        let mut tokens = Vec::with_capacity(parts.len() / 2);
        for pair in parts.chunks(2) {
            let tag = single_char(pair[0])
                .and_then(RouteTag::from_char)
                .ok_or_else(|| {
                    TrainlogError::Api(format!("Unknown route tag '{}' in '{}'", pair[0], s))
                })?;
            tokens.push(RouteToken::new(tag, pair[1]));
        }
        Ok(Route(tokens))
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Route tokens for a complete locator.
pub fn route(locator: &Locator) -> Route {
    locator.selection().route()
}

/// Inverse of [`route`], tolerant of partial routes.
///
/// Tokens are consumed in the fixed `p, b, w, d, e` order. The first token
/// that is missing, out of order, empty, or (for numeric levels) not a positive
/// number
/// ends the selection; everything after it is ignored.
pub fn parse_route(route: &Route) -> Selection {
    let mut selection = Selection::default();
    for (expected, token) in RouteTag::ORDER.iter().zip(route.tokens()) {
        if token.tag != *expected || token.value.trim().is_empty() {
            break;
        }
        let value = token.value.trim();
        match expected {
            RouteTag::Period => selection.period = Some(value.to_string()),
            RouteTag::Exercise => selection.exercise = Some(value.to_string()),
            RouteTag::Block | RouteTag::Week | RouteTag::Day => {
                let Some(n) = parse_number(value) else {
                    break;
                };
                match expected {
                    RouteTag::Block => selection.block = Some(n),
                    RouteTag::Week => selection.week = Some(n),
                    _ => selection.day = Some(n),
                }
            }
        }
    }
    selection
}
