// Signal Normalizer
// Converts raw, possibly-partial provider records into canonical inputs.
// Providers disagree on field naming (camelCase vs snake_case vs the
// ChartExchange chain-summary shape), so every field is looked up
// through an alias list.

use common::{MarketStructureSnapshot, ShortPressure, SignalError, VolumePressure};
use serde_json::Value;

const TOTAL_CALL_OI: &[&str] = &["totalCallOI", "calls_total", "callsTotal", "total_call_oi"];
const TOTAL_PUT_OI: &[&str] = &["totalPutOI", "puts_total", "putsTotal", "total_put_oi"];
const CALL_OI_DELTA: &[&str] = &["callOIDelta", "call_oi_delta", "calls_change"];
const PUT_OI_DELTA: &[&str] = &["putOIDelta", "put_oi_delta", "puts_change"];
const DEALER_GAMMA: &[&str] = &["dealerGamma", "dealer_gamma", "net_gamma"];
const PUT_CALL_RATIO: &[&str] = &["putCallRatio", "pc_ratio", "put_call_ratio"];
const MAX_PAIN: &[&str] = &["maxPain", "max_pain"];
const ITM_CALLS: &[&str] = &["itmCalls", "itm_calls"];
const ITM_PUTS: &[&str] = &["itmPuts", "itm_puts"];

const TODAY_VOLUME: &[&str] = &["todayVolume", "today_volume", "volume"];
const AVG20_VOLUME: &[&str] = &["avg20Volume", "avg20_volume", "avg_volume_20d", "avg20"];

const SHORT_VOLUME_RATIO: &[&str] = &["short_volume_ratio", "shortVolumeRatio"];
const SHORT_INTEREST_CHANGE: &[&str] =
    &["short_interest_change", "shortInterestChange", "change", "change_pct"];
const BORROW_RATE: &[&str] = &["borrow_rate", "borrowRate", "rate"];

/// Normalize a raw option-chain record into a canonical snapshot.
///
/// Optional fields default to zero / absent without error. Fails with
/// `MissingRequiredSignal` only when both OI totals are absent (no basis
/// for any classification), and with `InvalidSignalShape` when a
/// required field is present but non-numeric.
pub fn normalize_snapshot(raw: &Value) -> Result<MarketStructureSnapshot, SignalError> {
    if raw.is_null() {
        return Err(SignalError::missing("market structure snapshot"));
    }

    let call_oi = required_number(raw, TOTAL_CALL_OI, "totalCallOI")?;
    let put_oi = required_number(raw, TOTAL_PUT_OI, "totalPutOI")?;

    if call_oi.is_none() && put_oi.is_none() {
        return Err(SignalError::missing(
            "totalCallOI and totalPutOI both absent from snapshot",
        ));
    }

    let complete = call_oi.is_some() && put_oi.is_some();

    Ok(MarketStructureSnapshot {
        total_call_oi: non_negative_count(call_oi),
        total_put_oi: non_negative_count(put_oi),
        call_oi_delta: optional_number(raw, CALL_OI_DELTA).unwrap_or(0.0) as i64,
        put_oi_delta: optional_number(raw, PUT_OI_DELTA).unwrap_or(0.0) as i64,
        dealer_gamma: optional_number(raw, DEALER_GAMMA).unwrap_or(0.0),
        put_call_ratio: optional_number(raw, PUT_CALL_RATIO),
        max_pain: optional_number(raw, MAX_PAIN),
        itm_calls: optional_number(raw, ITM_CALLS).map(|v| v.max(0.0) as u64),
        itm_puts: optional_number(raw, ITM_PUTS).map(|v| v.max(0.0) as u64),
        complete,
    })
}

/// Normalize a raw volume record. Fails only when the record is absent
/// entirely; individual fields default to zero.
pub fn normalize_volume(raw: &Value) -> Result<VolumePressure, SignalError> {
    if raw.is_null() {
        return Err(SignalError::missing("volume pressure record"));
    }

    Ok(VolumePressure {
        today_volume: optional_number(raw, TODAY_VOLUME).unwrap_or(0.0).max(0.0),
        avg20_volume: optional_number(raw, AVG20_VOLUME).unwrap_or(0.0).max(0.0),
    })
}

/// Normalize an optional short-pressure record. Returns `None` when no
/// usable record is present; a missing short volume ratio defaults to
/// the neutral 0.5 so an empty feed never reads as an extreme.
pub fn normalize_short_pressure(raw: &Value) -> Option<ShortPressure> {
    raw.as_object()?;

    Some(ShortPressure {
        short_volume_ratio: optional_number(raw, SHORT_VOLUME_RATIO)
            .unwrap_or(0.5)
            .clamp(0.0, 1.0),
        short_interest_change: optional_number(raw, SHORT_INTEREST_CHANGE).unwrap_or(0.0),
        borrow_rate: optional_number(raw, BORROW_RATE).unwrap_or(0.0).max(0.0),
    })
}

fn lookup<'a>(raw: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    let obj = raw.as_object()?;
    aliases
        .iter()
        .find_map(|key| obj.get(*key))
        .filter(|v| !v.is_null())
}

/// Required fields must be numbers as delivered; no string coercion.
fn required_number(
    raw: &Value,
    aliases: &[&str],
    canonical: &str,
) -> Result<Option<f64>, SignalError> {
    match lookup(raw, aliases) {
        None => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| SignalError::bad_shape(canonical, value_kind(value))),
    }
}

/// Optional fields tolerate numeric strings and fall back to the default
/// on any other shape.
fn optional_number(raw: &Value, aliases: &[&str]) -> Option<f64> {
    let value = lookup(raw, aliases)?;
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn non_negative_count(value: Option<f64>) -> u64 {
    value.unwrap_or(0.0).max(0.0) as u64
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chain_summary_aliases() {
        let raw = json!({
            "calls_total": 120000,
            "puts_total": 40000,
            "pc_ratio": 0.33,
            "itm_calls": 900,
            "itm_puts": 300,
            "max_pain": 455.0
        });

        let snapshot = normalize_snapshot(&raw).unwrap();
        assert_eq!(snapshot.total_call_oi, 120_000);
        assert_eq!(snapshot.total_put_oi, 40_000);
        assert_eq!(snapshot.put_call_ratio, Some(0.33));
        assert_eq!(snapshot.itm_calls, Some(900));
        assert!(snapshot.complete);
    }

    #[test]
    fn test_missing_optional_fields_default_to_zero() {
        let raw = json!({ "totalCallOI": 1000, "totalPutOI": 500 });
        let snapshot = normalize_snapshot(&raw).unwrap();
        assert_eq!(snapshot.call_oi_delta, 0);
        assert_eq!(snapshot.put_oi_delta, 0);
        assert_eq!(snapshot.dealer_gamma, 0.0);
        assert_eq!(snapshot.put_call_ratio, None);
        assert!(snapshot.complete);
    }

    #[test]
    fn test_both_oi_totals_absent_is_missing_signal() {
        let raw = json!({ "dealerGamma": 5.0 });
        let err = normalize_snapshot(&raw).unwrap_err();
        assert!(matches!(err, SignalError::MissingRequiredSignal(_)));
    }

    #[test]
    fn test_one_oi_total_present_is_incomplete_not_error() {
        let raw = json!({ "totalCallOI": 1000 });
        let snapshot = normalize_snapshot(&raw).unwrap();
        assert_eq!(snapshot.total_call_oi, 1000);
        assert_eq!(snapshot.total_put_oi, 0);
        assert!(!snapshot.complete);
    }

    #[test]
    fn test_required_field_with_wrong_type_is_shape_error() {
        let raw = json!({ "totalCallOI": "not-a-number", "totalPutOI": 500 });
        let err = normalize_snapshot(&raw).unwrap_err();
        assert_eq!(err, SignalError::bad_shape("totalCallOI", "a string"));
    }

    #[test]
    fn test_optional_numeric_string_is_coerced() {
        let raw = json!({
            "totalCallOI": 1000,
            "totalPutOI": 500,
            "dealerGamma": "12.5"
        });
        let snapshot = normalize_snapshot(&raw).unwrap();
        assert_eq!(snapshot.dealer_gamma, 12.5);
    }

    #[test]
    fn test_volume_absent_record_is_missing_signal() {
        let err = normalize_volume(&Value::Null).unwrap_err();
        assert!(matches!(err, SignalError::MissingRequiredSignal(_)));
    }

    #[test]
    fn test_volume_fields_default_to_zero() {
        let volume = normalize_volume(&json!({})).unwrap();
        assert_eq!(volume.today_volume, 0.0);
        assert_eq!(volume.avg20_volume, 0.0);
    }

    #[test]
    fn test_short_pressure_alias_chain() {
        let raw = json!({
            "shortVolumeRatio": 0.62,
            "change_pct": -0.04,
            "rate": 7.5
        });
        let short = normalize_short_pressure(&raw).unwrap();
        assert_eq!(short.short_volume_ratio, 0.62);
        assert_eq!(short.short_interest_change, -0.04);
        assert_eq!(short.borrow_rate, 7.5);
    }

    #[test]
    fn test_short_pressure_defaults_are_neutral() {
        let short = normalize_short_pressure(&json!({})).unwrap();
        assert_eq!(short.short_volume_ratio, 0.5);
        assert_eq!(short.short_interest_change, 0.0);
        assert_eq!(short.borrow_rate, 0.0);

        assert!(normalize_short_pressure(&Value::Null).is_none());
    }
}
