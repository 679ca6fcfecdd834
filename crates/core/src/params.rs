//! Lenient typed lookups on a `serde_json::Value` params object.
//!
//! Each helper takes a JSON value, a key and a default. A missing key or a
//! value of the wrong type yields the default; range checks happen later in
//! the config's `validate`.

use serde_json::Value;

/// Extracts an `f64` from `params[name]`. JSON integers are accepted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a non-negative integer from `params[name]` as `usize`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Extracts a `bool` from `params[name]`.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_f64_reads_floats_and_integers() {
        let params = json!({"bump_amplitude": 2.5, "bounds": 512});
        assert_eq!(param_f64(&params, "bump_amplitude", 4.0), 2.5);
        assert_eq!(param_f64(&params, "bounds", 1024.0), 512.0);
    }

    #[test]
    fn param_f64_falls_back_on_missing_or_mistyped() {
        let params = json!({"shrink_ms": "slow", "grow_ms": null});
        assert_eq!(param_f64(&params, "shrink_ms", 1000.0), 1000.0);
        assert_eq!(param_f64(&params, "grow_ms", 900.0), 900.0);
        assert_eq!(param_f64(&params, "absent", 1.5), 1.5);
        assert_eq!(param_f64(&json!([1, 2]), "absent", 7.0), 7.0);
    }

    #[test]
    fn param_usize_rejects_negative_and_fractional() {
        let params = json!({"size": 128, "octaves": -3, "scene_groups": 2.5});
        assert_eq!(param_usize(&params, "size", 256), 128);
        assert_eq!(param_usize(&params, "octaves", 15), 15);
        assert_eq!(param_usize(&params, "scene_groups", 2), 2);
    }

    #[test]
    fn param_bool_reads_only_booleans() {
        let params = json!({"master_fade": true, "fixed_phase_step": 1});
        assert!(param_bool(&params, "master_fade", false));
        assert!(!param_bool(&params, "fixed_phase_step", false));
    }
}
