//! Custom duration picker.
//!
//! Holds an hours/minutes/seconds selection. Confirming a zero duration is
//! not possible; `confirm` returns `None` instead of producing an error.

/// Largest selectable hour.
pub const MAX_HOURS: u32 = 23;

/// Largest selectable minute or second.
pub const MAX_MINUTES_OR_SECONDS: u32 = 59;

/// An hours/minutes/seconds selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimePicker {
    hours: u32,
    minutes: u32,
    seconds: u32,
}

impl TimePicker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a picker pre-set to the given components, clamped to range.
    #[must_use]
    pub fn with_values(hours: u32, minutes: u32, seconds: u32) -> Self {
        let mut picker = Self::new();
        picker.set_hours(hours);
        picker.set_minutes(minutes);
        picker.set_seconds(seconds);
        picker
    }

    pub fn set_hours(&mut self, hours: u32) {
        self.hours = hours.min(MAX_HOURS);
    }

    pub fn set_minutes(&mut self, minutes: u32) {
        self.minutes = minutes.min(MAX_MINUTES_OR_SECONDS);
    }

    pub fn set_seconds(&mut self, seconds: u32) {
        self.seconds = seconds.min(MAX_MINUTES_OR_SECONDS);
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Total selected duration in seconds.
    pub fn total_seconds(&self) -> u32 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }

    /// False while the selection is zero.
    pub fn can_confirm(&self) -> bool {
        self.total_seconds() > 0
    }

    /// Returns the selected duration and clears the picker.
    ///
    /// A zero selection returns `None` and leaves the picker untouched.
    pub fn confirm(&mut self) -> Option<u32> {
        if !self.can_confirm() {
            return None;
        }
        let total = self.total_seconds();
        self.cancel();
        Some(total)
    }

    /// Clears the selection.
    pub fn cancel(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_seconds() {
        let picker = TimePicker::with_values(1, 2, 3);
        assert_eq!(picker.total_seconds(), 3723);
    }

    #[test]
    fn test_values_are_clamped() {
        let picker = TimePicker::with_values(99, 75, 60);
        assert_eq!(picker.hours(), 23);
        assert_eq!(picker.minutes(), 59);
        assert_eq!(picker.seconds(), 59);
    }

    #[test]
    fn test_zero_cannot_be_confirmed() {
        let mut picker = TimePicker::new();
        assert!(!picker.can_confirm());
        assert_eq!(picker.confirm(), None);
    }

    #[test]
    fn test_confirm_resets_fields() {
        let mut picker = TimePicker::with_values(0, 1, 30);
        assert_eq!(picker.confirm(), Some(90));
        assert_eq!(picker, TimePicker::default());
    }

    #[test]
    fn test_cancel() {
        let mut picker = TimePicker::with_values(0, 5, 0);
        picker.cancel();
        assert_eq!(picker.total_seconds(), 0);
    }
}
