//! Time formatting and parsing helpers shared by the views.

/// Formats seconds as `MM:SS`, or `HH:MM:SS` once an hour is reached.
///
/// ```
/// use timeflex::format::format_time;
///
/// assert_eq!(format_time(90), "01:30");
/// assert_eq!(format_time(3661), "01:01:01");
/// ```
pub fn format_time(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Parses `s`, `m:s` or `h:m:s` into seconds.
///
/// Parts that are not numbers count as zero; more than three parts yield zero.
pub fn parse_time_input(input: &str) -> u32 {
    let parts: Vec<u32> = input
        .trim()
        .split(':')
        .map(|part| part.trim().parse().unwrap_or(0))
        .collect();

    match parts.as_slice() {
        [seconds] => *seconds,
        [minutes, seconds] => minutes.saturating_mul(60).saturating_add(*seconds),
        [hours, minutes, seconds] => hours
            .saturating_mul(3600)
            .saturating_add(minutes.saturating_mul(60))
            .saturating_add(*seconds),
        _ => 0,
    }
}

/// Renders a fixed-width progress bar for a ratio in `[0, 1]`.
pub fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
