// Permission Gate
// The single source of truth for whether directional risk may be taken.
// Runs last; no upstream driver list can bypass it.

use common::{Bias, Decision, Direction, ExecutionMode, Regime};

use crate::engine::INVALIDATION_RULE;
use crate::regime::RegimeAssessment;

/// Apply the hard authorization gate and assemble the final decision.
///
/// A neutral candidate direction or a confidence below the floor forces
/// a blocked decision: NEUTRAL direction, both sides disallowed, empty
/// drivers, TRANSITION regime, NO_TRADE execution mode.
pub fn enforce(assessment: &RegimeAssessment, confidence: f64, floor: f64) -> Decision {
    if assessment.direction == Direction::Neutral || confidence < floor {
        return Decision {
            regime: Regime::Transition,
            bias: Bias {
                direction: Direction::Neutral,
                confidence,
                disallowed: Direction::Neutral.disallowed(),
                drivers: Vec::new(),
            },
            execution_mode: ExecutionMode::NoTrade,
            invalidation: INVALIDATION_RULE.to_string(),
        };
    }

    Decision {
        regime: assessment.regime,
        bias: Bias {
            direction: assessment.direction,
            confidence,
            disallowed: assessment.direction.disallowed(),
            drivers: assessment.drivers.clone(),
        },
        execution_mode: ExecutionMode::Day,
        invalidation: INVALIDATION_RULE.to_string(),
    }
}
