//! Scale direction calculation.

use std::fmt;

/// Which way a group must move, and by how much.
///
/// The two amounts are not symmetric: `In` carries the number
/// of instances to remove, `Out` carries the new absolute desired capacity.
/// Each executor consumes its variant in that form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleDirection {
    /// Raise desired capacity to this absolute value.
    Out(u32),
    /// Remove this many instances.
    In(u32),
    NoOp,
}

impl ScaleDirection {
    /// Magnitude paired with the direction tag.
    pub fn amount(&self) -> u32 {
        match self {
            Self::Out(n) | Self::In(n) => *n,
            Self::NoOp => 0,
        }
    }

    /// `"out"`, `"in"`, or `""` for no change.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Out(_) => "out",
            Self::In(_) => "in",
            Self::NoOp => "",
        }
    }
}

impl fmt::Display for ScaleDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Out(target) => write!(f, "out to {}", target),
            Self::In(delta) => write!(f, "in by {}", delta),
            Self::NoOp => f.write_str("none"),
        }
    }
}

/// Decide direction from the group's current desired capacity and the
/// strategy's desired count.
pub fn calculate_direction(current_desired: u32, strategy_desired: u32) -> ScaleDirection {
    if strategy_desired < current_desired {
        return ScaleDirection::In(current_desired - strategy_desired);
    }
    if strategy_desired > current_desired {
        return ScaleDirection::Out(strategy_desired);
    }
    ScaleDirection::NoOp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_in_yields_delta() {
        let direction = calculate_direction(5, 3);
        assert_eq!(direction, ScaleDirection::In(2));
        assert_eq!((direction.amount(), direction.tag()), (2, "in"));
    }

    #[test]
    fn test_scale_out_yields_absolute_target() {
        let direction = calculate_direction(3, 7);
        assert_eq!(direction, ScaleDirection::Out(7));
        assert_eq!((direction.amount(), direction.tag()), (7, "out"));
    }

    #[test]
    fn test_equal_counts_are_noop() {
        let direction = calculate_direction(4, 4);
        assert_eq!(direction, ScaleDirection::NoOp);
        assert_eq!((direction.amount(), direction.tag()), (0, ""));
    }

    #[test]
    fn test_scale_to_zero() {
        assert_eq!(calculate_direction(3, 0), ScaleDirection::In(3));
    }

    #[test]
    fn test_scale_from_zero() {
        assert_eq!(calculate_direction(0, 2), ScaleDirection::Out(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(ScaleDirection::Out(7).to_string(), "out to 7");
        assert_eq!(ScaleDirection::In(2).to_string(), "in by 2");
        assert_eq!(ScaleDirection::NoOp.to_string(), "none");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Direction and amount are fully determined by comparing the two counts.
            #[test]
            fn prop_direction_matches_comparison(current in 0u32..10_000, desired in 0u32..10_000) {
                let direction = calculate_direction(current, desired);
                let pair = (direction.amount(), direction.tag());

                if desired < current {
                    prop_assert_eq!(pair, (current - desired, "in"));
                } else if desired > current {
                    prop_assert_eq!(pair, (desired, "out"));
                } else {
                    prop_assert_eq!(pair, (0, ""));
                }
            }

            /// Moving amounts are always strictly positive.
            #[test]
            fn prop_moving_amount_positive(current in any::<u32>(), desired in any::<u32>()) {
                let direction = calculate_direction(current, desired);
                if direction != ScaleDirection::NoOp {
                    prop_assert!(direction.amount() > 0);
                }
            }
        }
    }
}
