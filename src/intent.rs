//! Discrete view commands issued by a presentation layer, once per frame tick.

use crate::error::{ExplorerError, Result};
use crate::viewport::{Direction, Outcome, Viewport};

/// Upper bound on the intents one script may expand to.
pub const MAX_SCRIPT_INTENTS: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Pan(Direction),
    ZoomIn,
    ZoomOut,
    Reset,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Pan(direction) => direction.label(),
            Intent::ZoomIn => "ZoomIn",
            Intent::ZoomOut => "ZoomOut",
            Intent::Reset => "Reset",
        }
    }

    /// Script key for an intent: `wasd` pan, `+`/`-` zoom, `r` reset.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'w' => Some(Intent::Pan(Direction::Up)),
            's' => Some(Intent::Pan(Direction::Down)),
            'a' => Some(Intent::Pan(Direction::Left)),
            'd' => Some(Intent::Pan(Direction::Right)),
            '+' => Some(Intent::ZoomIn),
            '-' => Some(Intent::ZoomOut),
            'r' => Some(Intent::Reset),
            _ => None,
        }
    }

    /// Parse a key script such as `"40+ 12d w r"`. A decimal count repeats
    /// the key that follows it; whitespace is ignored. The expansion is capped
    /// at [`MAX_SCRIPT_INTENTS`].
    pub fn parse_script(script: &str) -> Result<Vec<Intent>> {
        let mut intents = Vec::new();
        let mut digits = String::new();
        for key in script.chars() {
            if key.is_whitespace() {
                continue;
            }
            if key.is_ascii_digit() {
                digits.push(key);
                continue;
            }
            let intent = Intent::from_key(key).ok_or(ExplorerError::UnknownIntent(key))?;
            let count = if digits.is_empty() {
                1
            } else {
                parse_repeat(&digits)? as usize
            };
            digits.clear();
            if count > MAX_SCRIPT_INTENTS - intents.len() {
                return Err(ExplorerError::ScriptTooLong(MAX_SCRIPT_INTENTS));
            }
            intents.extend(std::iter::repeat(intent).take(count));
        }
        if digits.is_empty() {
            Ok(intents)
        } else {
            Err(ExplorerError::DanglingRepeat(parse_repeat(&digits)?))
        }
    }

    pub fn apply(self, viewport: &mut Viewport) -> Outcome {
        match self {
            Intent::Pan(direction) => viewport.pan(direction),
            Intent::ZoomIn => viewport.zoom_in(),
            Intent::ZoomOut => viewport.zoom_out(),
            Intent::Reset => {
                viewport.reset_view();
                Outcome::Applied
            }
        }
    }
}

fn parse_repeat(digits: &str) -> Result<u32> {
    digits
        .parse()
        .map_err(|_| ExplorerError::RepeatTooLarge(digits.to_string()))
}

/// Apply intents in order, logging the ones the viewport refuses.
/// Returns how many were rejected.
pub fn apply_all(viewport: &mut Viewport, intents: &[Intent]) -> usize {
    let mut rejected = 0;
    for intent in intents {
        if intent.apply(viewport) == Outcome::Rejected {
            rejected += 1;
            log::debug!("{} rejected at {:?}", intent.label(), viewport.view());
        }
    }
    rejected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewportSettings;

    #[test]
    fn parses_keys_and_repeats() {
        let intents = Intent::parse_script("3+ d\tW\n2-r").unwrap();
        assert_eq!(
            intents,
            vec![
                Intent::ZoomIn,
                Intent::ZoomIn,
                Intent::ZoomIn,
                Intent::Pan(Direction::Right),
                Intent::Pan(Direction::Up),
                Intent::ZoomOut,
                Intent::ZoomOut,
                Intent::Reset,
            ]
        );
        assert!(Intent::parse_script("").unwrap().is_empty());
        assert_eq!(Intent::parse_script("12a").unwrap().len(), 12);
    }

    #[test]
    fn zero_count_skips_key() {
        assert!(Intent::parse_script("0w").unwrap().is_empty());
    }

    #[test]
    fn rejects_unknown_keys_and_dangling_counts() {
        assert!(matches!(
            Intent::parse_script("w x"),
            Err(ExplorerError::UnknownIntent('x'))
        ));
        assert!(matches!(
            Intent::parse_script("w 15"),
            Err(ExplorerError::DanglingRepeat(15))
        ));
    }

    #[test]
    fn oversized_counts_are_errors() {
        assert!(matches!(
            Intent::parse_script("99999999999+"),
            Err(ExplorerError::RepeatTooLarge(digits)) if digits == "99999999999"
        ));
        assert!(matches!(
            Intent::parse_script("4294967297"),
            Err(ExplorerError::RepeatTooLarge(_))
        ));
        assert!(matches!(
            Intent::parse_script("50000000w"),
            Err(ExplorerError::ScriptTooLong(MAX_SCRIPT_INTENTS))
        ));
    }

    #[test]
    fn expansion_limit_counts_the_whole_script() {
        let at_limit = format!("{}d", MAX_SCRIPT_INTENTS);
        assert_eq!(Intent::parse_script(&at_limit).unwrap().len(), MAX_SCRIPT_INTENTS);

        let over = format!("{}d w", MAX_SCRIPT_INTENTS);
        assert!(matches!(
            Intent::parse_script(&over),
            Err(ExplorerError::ScriptTooLong(_))
        ));
    }

    #[test]
    fn apply_dispatches_to_viewport() {
        let mut vp = Viewport::new(ViewportSettings::default()).unwrap();
        assert_eq!(Intent::ZoomOut.apply(&mut vp), Outcome::Rejected);
        assert!(Intent::ZoomIn.apply(&mut vp).is_applied());
        assert!((vp.readout().zoom - 1.1).abs() < 1e-12);
        assert!(Intent::Pan(Direction::Down).apply(&mut vp).is_applied());
        assert!(vp.center_y() > 0.0);
        assert!(Intent::Reset.apply(&mut vp).is_applied());
        assert_eq!(vp.center_y(), 0.0);
    }

    #[test]
    fn apply_all_counts_rejections() {
        let mut vp = Viewport::new(ViewportSettings::default()).unwrap();
        let intents = Intent::parse_script("-- 30a").unwrap();
        let rejected = apply_all(&mut vp, &intents);
        // both zoom-outs, plus every left pan past the edge
        assert!(rejected > 2);
        assert!(vp.center_x() >= -2.0);
    }
}
