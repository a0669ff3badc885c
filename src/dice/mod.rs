//! Dice rolling
//!
//! Parse → roll → report:
//! - [`notation`] validates strings like "2d6+3" into a [`RollRequest`]
//! - [`roll`] rolls the dice from an injected [`RandomSource`]
//! - [`report`] renders faces with modifiers, critical flavor and the easter egg
//!
//! Nothing here logs or touches the filesystem; flavor tables are loaded by
//! the caller and passed in.

mod flavor;
mod notation;
mod report;
mod roll;

pub use flavor::{
    Critical, EasterEggs, FlavorError, FlavorPhrases, FlavorTable, DEFAULT_FALLBACK,
    DEFAULT_LINK_BASE,
};
pub use notation::{parse_notation, NumberField, ParseError, RollRequest, MAX_DICE};
pub use report::{critical_of, format_report, Report, BATCH_SEPARATOR};
pub use roll::{execute, DieSize, RandomSource, RngSource, RollOutcome};

/// Parse, roll and format `notation` for `user` in one go
pub fn roll_notation(
    notation: &str,
    user: &str,
    flavor: &FlavorTable,
    eggs: &EasterEggs,
    rng: &mut impl RandomSource,
) -> Result<Report, ParseError> {
    let request = parse_notation(notation)?;
    let outcome = execute(&request, rng);
    Ok(format_report(&outcome, &request, flavor, eggs, user, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays scripted faces and always picks the first phrase
    struct Scripted(VecDeque<u32>);

    impl RandomSource for Scripted {
        fn roll_die(&mut self, sides: u32) -> u32 {
            let face = self.0.pop_front().expect("script exhausted");
            assert!(face <= sides);
            face
        }
        fn pick(&mut self, _len: usize) -> usize {
            0
        }
    }

    fn flavor() -> FlavorTable {
        FlavorTable::new(vec!["Huzzah!".to_string()], vec!["Alas.".to_string()]).unwrap()
    }

    #[test]
    fn test_pipeline() {
        let mut rng = Scripted(VecDeque::from([4, 6]));
        let report =
            roll_notation("2d6+3", "anyone", &flavor(), &EasterEggs::default(), &mut rng).unwrap();
        assert_eq!(report.to_string(), "---\n4 (+3) = 7.\n---\n6 (+3) = 9.");
    }

    #[test]
    fn test_pipeline_rejects_before_rolling() {
        let mut rng = Scripted(VecDeque::new());
        let err = roll_notation("3d7", "anyone", &flavor(), &EasterEggs::default(), &mut rng)
            .unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedDieSize(_)));
    }
}
