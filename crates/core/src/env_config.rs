//! Environment variable parsing with warn-level logging for bad values.

/// Parse an environment variable with a default fallback.
///
/// - Not set: returns `default` silently (the expected case).
/// - Set but unparseable: logs a warning and returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    match std::env::var(var) {
        Ok(v) => match v.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        Err(_) => default,
    }
}

/// Boolean env flag: `1`, `true`, `yes`, `on` (case-insensitive) enable it.
/// Anything else, including unset, is `false`.
#[must_use]
pub fn env_flag(var: &str) -> bool {
    std::env::var(var)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}
