//! Dice notation parsing
//!
//! Parses notation like "2d6+3", "d20", "4d8-2" into a [`RollRequest`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::roll::DieSize;

/// Largest number of dice accepted in one request
pub const MAX_DICE: u32 = 100;

/// Die tokens that must appear somewhere in the notation
const ALLOWED_TOKENS: [&str; 7] = ["d4", "d6", "d8", "d10", "d12", "d20", "d100"];

/// Which numeric segment of the notation failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberField {
    Count,
    Sides,
    Modifier,
}

impl fmt::Display for NumberField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NumberField::Count => "dice count",
            NumberField::Sides => "die sides",
            NumberField::Modifier => "modifier",
        };
        f.write_str(name)
    }
}

/// Reasons a notation string is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("missing 'd' in dice notation")]
    MissingDieMarker,

    #[error("unsupported die size: {0}")]
    UnsupportedDieSize(String),

    #[error("invalid {field}: {value:?}")]
    InvalidNumber { field: NumberField, value: String },
}

impl ParseError {
    fn invalid(field: NumberField, value: &str) -> Self {
        ParseError::InvalidNumber {
            field,
            value: value.to_string(),
        }
    }
}

/// A validated roll: how many dice, which die, and a flat modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollRequest {
    count: u32,
    die: DieSize,
    modifier: i32,
}

impl RollRequest {
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn die(&self) -> DieSize {
        self.die
    }

    pub fn modifier(&self) -> i32 {
        self.modifier
    }
}

impl FromStr for RollRequest {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_notation(s)
    }
}

impl fmt::Display for RollRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifier > 0 {
            write!(f, "{}{}+{}", self.count, self.die, self.modifier)
        } else if self.modifier < 0 {
            write!(f, "{}{}{}", self.count, self.die, self.modifier)
        } else {
            write!(f, "{}{}", self.count, self.die)
        }
    }
}

/// Parse a dice notation string like "2d6+3"
///
/// The die-size gate only checks that one of the allowed die tokens occurs
/// somewhere in the normalized input; the parsed size must still be one of
/// the [`DieSize`] values.
pub fn parse_notation(raw: &str) -> Result<RollRequest, ParseError> {
    let notation: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();

    let (head, tail) = notation
        .split_once('d')
        .ok_or(ParseError::MissingDieMarker)?;

    if !ALLOWED_TOKENS.iter().any(|token| notation.contains(*token)) {
        return Err(ParseError::UnsupportedDieSize(tail.to_string()));
    }

    // "d6" means "1d6"
    let count = if head.is_empty() {
        1
    } else {
        parse_number(head, NumberField::Count)?
    };
    if count == 0 || count > MAX_DICE {
        return Err(ParseError::invalid(NumberField::Count, head));
    }

    let (sides_str, modifier) = split_modifier(tail)?;
    let sides = parse_number(sides_str, NumberField::Sides)?;
    let die = DieSize::from_sides(sides)
        .ok_or_else(|| ParseError::UnsupportedDieSize(sides_str.to_string()))?;

    Ok(RollRequest {
        count,
        die,
        modifier,
    })
}

/// Split "20+5" / "20-5" / "20" into the sides text and a signed modifier
fn split_modifier(tail: &str) -> Result<(&str, i32), ParseError> {
    let (sides, mod_str, negative) = if tail.contains('+') {
        let (sides, mod_str) = split_single(tail, '+')?;
        (sides, mod_str, false)
    } else if tail.contains('-') {
        let (sides, mod_str) = split_single(tail, '-')?;
        (sides, mod_str, true)
    } else {
        return Ok((tail, 0));
    };

    let magnitude = parse_number(mod_str, NumberField::Modifier)?;
    let magnitude =
        i32::try_from(magnitude).map_err(|_| ParseError::invalid(NumberField::Modifier, mod_str))?;

    Ok((sides, if negative { -magnitude } else { magnitude }))
}

/// Split on exactly one occurrence of `sign`
fn split_single(tail: &str, sign: char) -> Result<(&str, &str), ParseError> {
    let mut parts = tail.split(sign);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(sides), Some(mod_str), None) => Ok((sides, mod_str)),
        _ => Err(ParseError::invalid(NumberField::Modifier, tail)),
    }
}

/// Parse a run of ASCII digits; signs, blanks and overflow are all invalid
fn parse_number(text: &str, field: NumberField) -> Result<u32, ParseError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::invalid(field, text));
    }
    text.parse().map_err(|_| ParseError::invalid(field, text))
}
