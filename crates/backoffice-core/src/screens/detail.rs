use crate::api::ApiError;

use super::{LoadState, Notification};

/// State of a single-record screen
#[derive(Debug)]
pub struct DetailScreen<T> {
    record: Option<T>,
    pub state: LoadState,
    pub notice: Notification,
    not_found: bool,
}

impl<T> Default for DetailScreen<T> {
    fn default() -> Self {
        Self {
            record: None,
            state: LoadState::Loading,
            notice: Notification::default(),
            not_found: false,
        }
    }
}

impl<T> DetailScreen<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> Option<&T> {
        self.record.as_ref()
    }

    pub fn record_mut(&mut self) -> Option<&mut T> {
        self.record.as_mut()
    }

    pub fn set_record(&mut self, record: T) {
        self.record = Some(record);
        self.not_found = false;
        self.state = LoadState::Loaded;
    }

    /// Record a failed fetch. A 404 leaves the screen showing "not found"
    /// rather than an error banner.
    pub fn fail(&mut self, err: &ApiError, fallback: &str) {
        self.record = None;
        if matches!(err, ApiError::NotFound(_)) {
            self.not_found = true;
            self.state = LoadState::Loaded;
        } else {
            let message = err.user_message(fallback);
            self.notice.show_error(message.clone());
            self.state = LoadState::Failed(message);
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.not_found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_not_an_error() {
        let mut screen: DetailScreen<String> = DetailScreen::new();
        screen.fail(&ApiError::NotFound(None), "Failed to fetch review");
        assert!(screen.is_not_found());
        assert_eq!(screen.notice.error(), None);
        assert!(screen.record().is_none());
    }

    #[test]
    fn test_server_error_raises_banner() {
        let mut screen: DetailScreen<String> = DetailScreen::new();
        screen.fail(
            &ApiError::Server { status: 500, message: None },
            "Failed to fetch review",
        );
        assert_eq!(screen.notice.error(), Some("Failed to fetch review"));
        assert!(screen.state.is_failed());

        screen.set_record("loaded".to_string());
        assert_eq!(screen.record().map(String::as_str), Some("loaded"));
        assert!(!screen.is_not_found());
    }
}
