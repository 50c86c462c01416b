//! Notification content construction.
//!
//! This module provides a builder for notification content with a fluent
//! API, plus the canned messages used by the timer.

/// Application name, used as the notification title.
pub const APP_NAME: &str = "TimeFlex";

/// Body of the countdown completion notification.
pub const COMPLETION_MESSAGE: &str = "Time's Up!";

/// Body of the user-triggered test notification.
pub const TEST_MESSAGE: &str = "Test notification from TimeFlex!";

/// Maximum length for notification bodies.
const MAX_BODY_LENGTH: usize = 200;

/// A local notification ready to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    /// Whether the notification plays a sound
    pub sound: bool,
}

/// Builder for constructing notification content.
#[derive(Debug, Clone)]
pub struct NotificationContentBuilder {
    content: NotificationContent,
}

impl NotificationContentBuilder {
    /// Creates a builder titled with the application name, without sound.
    #[must_use]
    pub fn new() -> Self {
        Self {
            content: NotificationContent {
                title: APP_NAME.to_string(),
                body: String::new(),
                sound: false,
            },
        }
    }

    /// Sets the notification title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.content.title = title.to_string();
        self
    }

    /// Sets the notification body text.
    #[must_use]
    pub fn body(mut self, body: &str) -> Self {
        self.content.body = sanitize_body(body);
        self
    }

    /// Sets whether the notification plays a sound.
    #[must_use]
    pub fn sound(mut self, enabled: bool) -> Self {
        self.content.sound = enabled;
        self
    }

    /// Builds and returns the notification content.
    #[must_use]
    pub fn build(self) -> NotificationContent {
        self.content
    }
}

impl Default for NotificationContentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncates the body and strips control characters.
pub fn sanitize_body(body: &str) -> String {
    body.chars()
        .filter(|c| !c.is_control())
        .take(MAX_BODY_LENGTH)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_to_app_title() {
        let content = NotificationContentBuilder::new().body("done").build();
        assert_eq!(content.title, "TimeFlex");
        assert_eq!(content.body, "done");
        assert!(!content.sound);
    }

    #[test]
    fn test_builder_sets_sound() {
        let content = NotificationContentBuilder::new()
            .title("Custom")
            .sound(true)
            .build();
        assert_eq!(content.title, "Custom");
        assert!(content.sound);
    }

    #[test]
    fn test_sanitize_body() {
        assert_eq!(sanitize_body("Time's\x07 Up!"), "Time's Up!");
        assert_eq!(sanitize_body(&"a".repeat(500)).len(), 200);
    }
}
