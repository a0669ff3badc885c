//! Roll report formatting
//!
//! Turns raw faces into the lines shown to the user: modifier arithmetic,
//! natural 20 / natural 1 flavor, batch separators and the easter-egg link.

use std::fmt;

use super::flavor::{Critical, EasterEggs, FlavorTable};
use super::notation::RollRequest;
use super::roll::{DieSize, RandomSource, RollOutcome};

/// Marker placed before every line of a multi-die batch, the first one included
pub const BATCH_SEPARATOR: &str = "---\n";

/// Ordered report lines; `Display` joins them with newlines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Critical category of a single face, if any
pub fn critical_of(die: DieSize, face: u32) -> Option<Critical> {
    match (die, face) {
        (DieSize::D20, 20) => Some(Critical::Success),
        (DieSize::D20, 1) => Some(Critical::Failure),
        _ => None,
    }
}

/// Format every face of `outcome` in roll order
pub fn format_report(
    outcome: &RollOutcome,
    request: &RollRequest,
    flavor: &FlavorTable,
    eggs: &EasterEggs,
    user: &str,
    rng: &mut impl RandomSource,
) -> Report {
    let separator = if outcome.len() > 1 { BATCH_SEPARATOR } else { "" };
    let modifier = request.modifier();
    let mut lines = Vec::with_capacity(outcome.len());

    for &face in outcome.values() {
        let critical = critical_of(request.die(), face);
        let prefix = match critical {
            Some(kind) => format!("**{}** Natural ", flavor.choose(kind, rng)),
            None => String::new(),
        };

        let modified = i64::from(face) + i64::from(modifier);
        let body = if modifier == 0 {
            format!("{}.", modified)
        } else {
            let sign = if modifier < 0 { '-' } else { '+' };
            format!("{} ({}{}) = {}.", face, sign, modifier.unsigned_abs(), modified)
        };

        lines.push(format!("{}{}{}", separator, prefix, body));

        if critical == Some(Critical::Success) {
            lines.push(eggs.link_for(user));
        }
    }

    Report { lines }
}
