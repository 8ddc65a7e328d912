/// Substrings that mark decoded text as notable, in priority order.
pub const FLAG_INDICATORS: [&str; 4] = ["FLAG", "CTF", "KEY", "CODE"];

/// Returns whether `decoded` contains any flag indicator, ignoring case.
///
/// Only the first matching indicator is considered and it is only logged.
pub fn scan(decoded: &str) -> bool {
    let upper = decoded.to_uppercase();

    match FLAG_INDICATORS
        .iter()
        .find(|indicator| upper.contains(*indicator))
    {
        Some(indicator) => {
            tracing::debug!("Flag indicator '{}' matched in: {}", indicator, decoded);
            true
        }
        None => false,
    }
}
