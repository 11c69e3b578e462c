//! Input policy: message length cap and a simple rate limit.
//!
//! Violations are a normal control branch, not an error path — the caller
//! gets a user-facing notice and no prompt is built.

use std::time::{Duration, Instant};

/// Local input checks applied before any prompt assembly.
#[derive(Debug)]
pub struct InputPolicy {
    max_chars: usize,
    min_interval: Duration,
    last_accepted: Option<Instant>,
}

impl InputPolicy {
    pub fn new(max_chars: usize, min_interval: Duration) -> Self {
        Self {
            max_chars,
            min_interval,
            last_accepted: None,
        }
    }

    /// Check a message. Returns a rejection notice, or `None` if the
    /// message is accepted (which also arms the rate limit).
    pub fn check(&mut self, message: &str) -> Option<String> {
        let length = message.chars().count();
        if length > self.max_chars {
            return Some(format!(
                "Please keep your message under {} characters. Your message was {} characters.",
                self.max_chars, length
            ));
        }

        let now = Instant::now();
        if let Some(last) = self.last_accepted
            && now.duration_since(last) < self.min_interval
        {
            return Some("Please wait a moment before sending another message.".into());
        }

        self.last_accepted = Some(now);
        None
    }
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self::new(500, Duration::from_millis(2000))
    }
}
