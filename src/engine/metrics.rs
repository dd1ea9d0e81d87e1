/// Characters per word for speed figures.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Whole-percent accuracy of what has been typed so far.
///
/// Nothing typed yet reads as 100.
pub fn accuracy(correct: usize, typed: usize) -> u32 {
    if typed == 0 {
        return 100;
    }
    (correct as f64 / typed as f64 * 100.0).round() as u32
}

/// Words per minute from correct characters over whole elapsed seconds.
pub fn wpm(correct: usize, elapsed_secs: u64) -> u32 {
    if elapsed_secs == 0 {
        return 0;
    }
    ((correct as f64 / CHARS_PER_WORD) / (elapsed_secs as f64 / 60.0)).round() as u32
}

/// Format seconds as `m:ss`.
pub fn format_duration(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_empty_is_100() {
        assert_eq!(accuracy(0, 0), 100);
    }

    #[test]
    fn test_accuracy_rounds() {
        assert_eq!(accuracy(3, 4), 75);
        assert_eq!(accuracy(2, 3), 67);
        assert_eq!(accuracy(1, 8), 13);
        assert_eq!(accuracy(0, 5), 0);
    }

    #[test]
    fn test_wpm_zero_elapsed() {
        assert_eq!(wpm(100, 0), 0);
    }

    #[test]
    fn test_wpm_standard_word() {
        assert_eq!(wpm(25, 60), 5);
        assert_eq!(wpm(50, 30), 20);
        // 12 chars in 7s: (2.4 / (7/60)) = 20.57
        assert_eq!(wpm(12, 7), 21);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(600), "10:00");
    }
}
