// Structural Certainty Engine
// Composes normalizer, classifier, scorer and gate into the single
// evaluation entry point. Pure and synchronous: evaluating a symbol is
// one bounded computation with no I/O and no hidden state, so batches
// can run embarrassingly parallel on the caller's side.

use common::{Decision, MarketStructureSnapshot, ShortPressure, SignalError, VolumePressure};
use serde_json::Value;
use tracing::info;

use crate::normalizer::{normalize_short_pressure, normalize_snapshot, normalize_volume};
use crate::policy::EnginePolicy;
use crate::{confidence, gate, regime};

/// Fixed human-readable condition that voids any decision this engine
/// produces.
pub const INVALIDATION_RULE: &str = "OI dominance flip or loss of volume participation";

/// The decision engine. Holds only policy; every evaluation is
/// independent and produces a fresh, immutable `Decision`.
#[derive(Debug, Clone, Default)]
pub struct StructuralCertaintyEngine {
    policy: EnginePolicy,
}

impl StructuralCertaintyEngine {
    /// Engine with the canonical policy (0.4/0.3/0.3 weights, 0.60 floor).
    pub fn new() -> Self {
        Self::with_policy(EnginePolicy::default())
    }

    pub fn with_policy(policy: EnginePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &EnginePolicy {
        &self.policy
    }

    /// Evaluate normalized inputs into a decision. Total: low confidence
    /// and neutral regimes are successful outcomes, not errors.
    pub fn evaluate(
        &self,
        snapshot: &MarketStructureSnapshot,
        volume: &VolumePressure,
        short_pressure: Option<&ShortPressure>,
    ) -> Decision {
        let assessment = regime::classify(snapshot, short_pressure, &self.policy.thresholds);
        let confidence =
            confidence::score(snapshot, volume, assessment.dealer_aligned, &self.policy.weights);
        let decision = gate::enforce(&assessment, confidence, self.policy.confidence_floor);

        info!(
            regime = ?decision.regime,
            direction = ?decision.bias.direction,
            confidence = decision.bias.confidence,
            execution_mode = ?decision.execution_mode,
            drivers = ?decision.bias.drivers,
            disallowed = ?decision.bias.disallowed,
            snapshot_complete = snapshot.complete,
            "decision evaluated"
        );

        decision
    }

    /// Evaluate raw provider payloads: normalize, then decide. Fails only
    /// when the minimum viable inputs are absent or malformed.
    pub fn evaluate_raw(
        &self,
        chain: &Value,
        volume: &Value,
        short_pressure: Option<&Value>,
    ) -> Result<Decision, SignalError> {
        let snapshot = normalize_snapshot(chain)?;
        let volume = normalize_volume(volume)?;
        let short = short_pressure.and_then(normalize_short_pressure);

        Ok(self.evaluate(&snapshot, &volume, short.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Direction, Driver, ExecutionMode, Regime, Side};
    use serde_json::json;

    fn engine() -> StructuralCertaintyEngine {
        StructuralCertaintyEngine::new()
    }

    fn snapshot(
        call_oi: u64,
        put_oi: u64,
        call_delta: i64,
        dealer_gamma: f64,
    ) -> MarketStructureSnapshot {
        MarketStructureSnapshot {
            total_call_oi: call_oi,
            total_put_oi: put_oi,
            call_oi_delta: call_delta,
            put_oi_delta: 0,
            dealer_gamma,
            put_call_ratio: None,
            max_pain: None,
            itm_calls: None,
            itm_puts: None,
            complete: true,
        }
    }

    #[test]
    fn test_scenario_a_authorized_long() {
        let snap = snapshot(120_000, 40_000, 500, 10.0);
        let volume = VolumePressure {
            today_volume: 2_000_000.0,
            avg20_volume: 1_000_000.0,
        };

        let decision = engine().evaluate(&snap, &volume, None);
        assert_eq!(decision.bias.confidence, 0.80);
        assert_eq!(decision.bias.direction, Direction::LongOnly);
        assert_eq!(decision.execution_mode, ExecutionMode::Day);
        assert_eq!(decision.regime, Regime::Directional);
        assert_eq!(decision.bias.disallowed, vec![Side::Short]);
        assert_eq!(
            decision.bias.drivers,
            vec![Driver::CallOiDominance, Driver::DealerAlignment]
        );
        assert_eq!(decision.invalidation, INVALIDATION_RULE);
    }

    #[test]
    fn test_scenario_b_gate_blocks_low_confidence() {
        // Same OI skew, but dealers misaligned and no volume baseline.
        let snap = snapshot(120_000, 40_000, 500, -5.0);
        let volume = VolumePressure {
            today_volume: 2_000_000.0,
            avg20_volume: 0.0,
        };

        let decision = engine().evaluate(&snap, &volume, None);
        assert_eq!(decision.bias.confidence, 0.20);
        assert_eq!(decision.bias.direction, Direction::Neutral);
        assert_eq!(decision.execution_mode, ExecutionMode::NoTrade);
        assert_eq!(decision.regime, Regime::Transition);
        assert!(decision.bias.drivers.is_empty());
    }

    #[test]
    fn test_scenario_c_zero_oi_neutral_without_fault() {
        let raw_chain = json!({ "totalCallOI": 0, "totalPutOI": 0 });
        let raw_volume = json!({ "todayVolume": 1_000_000, "avg20Volume": 1_000_000 });

        // Both fields present (just zero), so no missing-signal error.
        let decision = engine()
            .evaluate_raw(&raw_chain, &raw_volume, None)
            .unwrap();
        assert_eq!(decision.bias.direction, Direction::Neutral);
        assert_eq!(decision.execution_mode, ExecutionMode::NoTrade);
    }

    #[test]
    fn test_determinism_bit_identical_output() {
        let snap = snapshot(90_000, 60_000, 1_200, 4.0);
        let volume = VolumePressure {
            today_volume: 1_500_000.0,
            avg20_volume: 1_000_000.0,
        };
        let short = ShortPressure {
            short_volume_ratio: 0.42,
            short_interest_change: -0.01,
            borrow_rate: 2.0,
        };

        let eng = engine();
        let first = eng.evaluate(&snap, &volume, Some(&short));
        let second = eng.evaluate(&snap, &volume, Some(&short));
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_gate_invariant_over_input_grid() {
        // For every input, confidence below the floor implies a blocked,
        // neutral decision.
        let eng = engine();
        let volumes = [0.0, 500_000.0, 2_000_000.0];
        let gammas = [-10.0, 0.0, 10.0];
        let oi_pairs = [(0u64, 0u64), (120_000, 40_000), (40_000, 120_000), (80_000, 80_000)];

        for &(calls, puts) in &oi_pairs {
            for &gamma in &gammas {
                for &today in &volumes {
                    let snap = snapshot(calls, puts, 500, gamma);
                    let volume = VolumePressure {
                        today_volume: today,
                        avg20_volume: 1_000_000.0,
                    };
                    let decision = eng.evaluate(&snap, &volume, None);

                    if decision.bias.confidence < 0.60 {
                        assert_eq!(decision.bias.direction, Direction::Neutral);
                        assert_eq!(decision.execution_mode, ExecutionMode::NoTrade);
                    }
                    // Complement invariant holds everywhere.
                    assert_eq!(
                        decision.bias.disallowed,
                        decision.bias.direction.disallowed()
                    );
                }
            }
        }
    }

    #[test]
    fn test_wire_shape_matches_contract() {
        let snap = snapshot(120_000, 40_000, 500, 10.0);
        let volume = VolumePressure {
            today_volume: 2_000_000.0,
            avg20_volume: 1_000_000.0,
        };

        let decision = engine().evaluate(&snap, &volume, None);
        let wire = serde_json::to_value(&decision).unwrap();

        assert_eq!(wire["regime"], "DIRECTIONAL");
        assert_eq!(wire["bias"]["direction"], "LONG_ONLY");
        assert_eq!(wire["bias"]["confidence"], 0.8);
        assert_eq!(wire["bias"]["disallowed"], json!(["SHORT"]));
        assert_eq!(
            wire["bias"]["drivers"],
            json!(["CALL_OI_DOMINANCE", "DEALER_ALIGNMENT"])
        );
        assert_eq!(wire["executionMode"], "DAY");
        assert_eq!(
            wire["invalidation"],
            "OI dominance flip or loss of volume participation"
        );
    }

    #[test]
    fn test_custom_floor_policy() {
        let mut policy = EnginePolicy::default();
        policy.confidence_floor = 0.90;
        let strict = StructuralCertaintyEngine::with_policy(policy);

        let snap = snapshot(120_000, 40_000, 500, 10.0);
        let volume = VolumePressure {
            today_volume: 2_000_000.0,
            avg20_volume: 1_000_000.0,
        };

        // 0.80 confidence passes the canonical floor but not this one.
        let decision = strict.evaluate(&snap, &volume, None);
        assert_eq!(decision.bias.direction, Direction::Neutral);
        assert_eq!(decision.execution_mode, ExecutionMode::NoTrade);
    }

    #[test]
    fn test_evaluate_raw_propagates_missing_signal() {
        let err = engine()
            .evaluate_raw(&json!({}), &json!({}), None)
            .unwrap_err();
        assert!(matches!(err, SignalError::MissingRequiredSignal(_)));
    }
}
