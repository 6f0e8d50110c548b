use std::collections::HashMap;
use std::process::{Command, Stdio};
use std::time::Duration;

use crate::error::ProbeError;
use crate::media::MediaRef;

/// Asks ffprobe for the container duration of a local file or remote URL.
pub fn probe_duration(url: &str) -> Result<Duration, ProbeError> {
    let output = Command::new("ffprobe")
        .stdin(Stdio::null())
        .args(["-v", "error"])
        .args(["-show_entries", "format=duration"])
        .args(["-of", "default=noprint_wrappers=1:nokey=1"])
        .arg(url)
        .output()?;

    if !output.status.success() {
        return Err(ProbeError::Failed { url: url.to_string(), status: output.status });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_duration(&stdout).ok_or_else(|| ProbeError::NoDuration {
        url: url.to_string(),
        output: stdout.trim().to_string(),
    })
}

/// ffprobe prints seconds as a decimal, or `N/A` for streams without a duration.
pub fn parse_duration(output: &str) -> Option<Duration> {
    let seconds: f64 = output.lines().next()?.trim().parse().ok()?;
    if seconds.is_finite() && seconds > 0.0 {
        Some(Duration::from_secs_f64(seconds))
    } else {
        None
    }
}

/// Probes every video once, up front. Videos that fail to probe are left out
/// and will never report as loaded.
pub fn probe_all<'a>(videos: impl Iterator<Item = &'a MediaRef>) -> HashMap<String, Duration> {
    let mut durations = HashMap::new();
    for media in videos {
        if durations.contains_key(&media.url) {
            continue;
        }
        match probe_duration(&media.url) {
            Ok(duration) => {
                tracing::debug!(url = %media.url, ?duration, "probed video duration");
                durations.insert(media.url.clone(), duration);
            }
            Err(e) => {
                tracing::warn!(url = %media.url, error = %e, "video duration unavailable, slide will run on its deadline");
            }
        }
    }
    durations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_seconds() {
        assert_eq!(parse_duration("4.250000\n"), Some(Duration::from_millis(4_250)));
        assert_eq!(parse_duration("12\n"), Some(Duration::from_secs(12)));
    }

    #[test]
    fn rejects_missing_or_zero_durations() {
        assert_eq!(parse_duration("N/A\n"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("0.000000"), None);
        assert_eq!(parse_duration("-3"), None);
    }
}
