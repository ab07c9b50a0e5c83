//! Clock formatting for clients

/// Render seconds as a zero-padded `MM:SS` clock
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
