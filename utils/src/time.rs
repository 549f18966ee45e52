//! Time formatting helpers.

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Describe a span of blocks with its approximate wall-clock length,
/// e.g. `"100 blocks (~16h 40m)"`.
pub fn format_block_span(blocks: u64, secs_per_block: u64) -> String {
    let noun = if blocks == 1 { "block" } else { "blocks" };
    if secs_per_block == 0 {
        return format!("{blocks} {noun}");
    }
    let secs = blocks.saturating_mul(secs_per_block);
    format!("{blocks} {noun} (~{})", format_duration(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(61), "1m 1s");
        assert_eq!(format_duration(60_000), "16h 40m");
        assert_eq!(format_duration(90_000), "1d 1h");
    }

    #[test]
    fn block_spans() {
        assert_eq!(format_block_span(100, 600), "100 blocks (~16h 40m)");
        assert_eq!(format_block_span(1, 30), "1 block (~30s)");
        assert_eq!(format_block_span(5, 0), "5 blocks");
    }
}
