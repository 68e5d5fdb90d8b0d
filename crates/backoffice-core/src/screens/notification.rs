use std::time::{Duration, Instant};

/// How long a success banner stays up
pub const SUCCESS_TIMEOUT: Duration = Duration::from_secs(3);

/// Inline banners for one screen: an error that stays until dismissed and a
/// success message that clears itself.
#[derive(Debug, Clone, Default)]
pub struct Notification {
    error: Option<String>,
    success: Option<(String, Instant)>,
}

impl Notification {
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn show_success(&mut self, message: impl Into<String>) {
        self.show_success_at(message, Instant::now());
    }

    pub fn show_success_at(&mut self, message: impl Into<String>, at: Instant) {
        self.success = Some((message.into(), at));
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_ref().map(|(m, _)| m.as_str())
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Dismiss whichever banner is showing, error first
    pub fn dismiss(&mut self) -> bool {
        if self.error.take().is_some() {
            return true;
        }
        self.success.take().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.success.is_none()
    }

    /// Drop a success banner that has been up long enough
    pub fn expire(&mut self, now: Instant) {
        if let Some((_, shown_at)) = self.success {
            if now.saturating_duration_since(shown_at) >= SUCCESS_TIMEOUT {
                self.success = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_expires_after_timeout() {
        let start = Instant::now();
        let mut n = Notification::default();
        n.show_success_at("Service deleted successfully", start);

        n.expire(start + Duration::from_millis(2999));
        assert_eq!(n.success(), Some("Service deleted successfully"));

        n.expire(start + SUCCESS_TIMEOUT);
        assert_eq!(n.success(), None);
    }

    #[test]
    fn test_error_stays_until_dismissed() {
        let start = Instant::now();
        let mut n = Notification::default();
        n.show_error("Failed to fetch services");
        n.expire(start + Duration::from_secs(60));
        assert_eq!(n.error(), Some("Failed to fetch services"));

        assert!(n.dismiss());
        assert!(n.is_empty());
        assert!(!n.dismiss());
    }
}
