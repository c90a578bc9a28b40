use std::time::Duration;

/// Human friendly latency, e.g. `850µs`, `12.3ms` or `1.20s`.
pub fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    match micros {
        m if m < 1_000 => format!("{m}µs"),
        m if m < 1_000_000 => format!("{:.1}ms", m as f64 / 1_000.0),
        m => format!("{:.2}s", m as f64 / 1_000_000.0),
    }
}

/// Nearest-rank percentile of an ascending slice.
pub fn percentile(sorted: &[Duration], p: f64) -> Option<Duration> {
    if sorted.is_empty() {
        return None;
    }
    let p = p.clamp(0.0, 100.0);
    let rank = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
    // rank is 1-based, p0 maps to the minimum
    sorted.get(rank.max(1) - 1).copied()
}
