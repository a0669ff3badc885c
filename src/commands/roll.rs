//! `/roll` command

use tracing::{info, warn};

use super::Reply;
use crate::dice::{roll_notation, ParseError, RandomSource};
use crate::resources::Resources;

/// Shown when the notation has no supported die in it
pub const ALLOWED_DICE_MESSAGE: &str = "Allowed dice are d4, d6, d8, d10, d12, d20, and d100.";

/// Roll `dice` for `user` and build the reply
pub fn roll_reply(
    dice: &str,
    user: &str,
    resources: &Resources,
    rng: &mut impl RandomSource,
) -> Reply {
    match roll_notation(dice, user, &resources.flavor, &resources.easter_eggs, rng) {
        Ok(report) => {
            let content = report.to_string();
            info!("/roll {} by {} => {:?}", dice, user, content);
            Reply::text(content)
        }
        Err(err) => {
            warn!("/roll {} by {} rejected: {}", dice, user, err);
            Reply::ephemeral(error_message(&err))
        }
    }
}

/// User-facing text for a rejected notation
pub fn error_message(err: &ParseError) -> String {
    match err {
        ParseError::MissingDieMarker | ParseError::UnsupportedDieSize(_) => {
            ALLOWED_DICE_MESSAGE.to_string()
        }
        ParseError::InvalidNumber { .. } => format!("Invalid format or numbers! {}", err),
    }
}
