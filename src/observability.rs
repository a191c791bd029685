//! This module provides the structured diagnostics hook used by the encoder and
//! decoder.
//!
//! The `log_metric!` macro emits a single key/value line through the `log`
//! facade at debug level. The pairs are only formatted when a logger is
//! installed with debug output enabled, so library users who never set up a
//! logger pay one level check per call.

/// Logs a structured key-value metric line at debug level.
///
/// # Example
/// ```
/// use huffpack::log_metric;
/// let symbols = 3;
/// log_metric!("event"="encode", "stage"="code_table", "symbols"=&symbols);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        if ::log::log_enabled!(::log::Level::Debug) {
            // Collect each pair as a JSON string fragment
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            ::log::debug!("HUFF_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}
