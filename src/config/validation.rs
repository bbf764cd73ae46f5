//! Config validation: unknown-key detection with Levenshtein suggestions
//! and value checks.
//!
//! The raw TOML is first walked as a `toml::Value` tree and every dotted key
//! is compared against the known field names; unknown keys become warnings
//! with a "did you mean?" suggestion. Warnings never break a config.

use std::collections::HashSet;

use crate::validator::ValidationWarning;

use super::DashboardConfig;

/// Longest request timeout accepted, in seconds.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for `DashboardConfig`.
///
/// Maintained by hand; a new config field must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [server]
        "server",
        "server.addr",
        // [prediction]
        "prediction",
        "prediction.base_url",
        "prediction.request_timeout_secs",
        // [backend]
        "backend",
        "backend.base_url",
        "backend.source",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// A table `{ a = { b = 1, c = 2 } }` yields `["a", "a.b", "a.c"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (k, levenshtein(unknown, k)))
        .filter(|&(_, d)| d <= 3)
        .min_by(|(ka, da), (kb, db)| da.cmp(db).then_with(|| ka.cmp(kb)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// Parse errors return no warnings; serde reports them afterwards.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Value Checks
// ============================================================================

fn check_url(errors: &mut Vec<String>, key: &str, url: &str) {
    if url.trim().is_empty() {
        errors.push(format!("{key} must not be empty"));
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!("{key} = '{url}' must start with http:// or https://"));
    }
}

/// Errors for values that cannot work. An empty list means the config is usable.
pub fn validate_ranges(config: &DashboardConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if config.server.addr.trim().is_empty() {
        errors.push("server.addr must not be empty".to_string());
    }

    check_url(&mut errors, "prediction.base_url", &config.prediction.base_url);
    check_url(&mut errors, "backend.base_url", &config.backend.base_url);

    if config.prediction.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
        errors.push(format!(
            "prediction.request_timeout_secs = {} exceeds maximum of {MAX_REQUEST_TIMEOUT_SECS}",
            config.prediction.request_timeout_secs
        ));
    }

    errors
}

// ============================================================================
// Tests
// ============================================================================
