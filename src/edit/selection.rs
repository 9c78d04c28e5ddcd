// src/edit/selection.rs

use serde::{Deserialize, Serialize};

use crate::error::{AudioError, Result};

/// A time range within the active artifact, in seconds
///
/// Always satisfies `0 <= start < end <= duration` for the artifact it was
/// validated against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub start: f64,
    pub end: f64,
}

impl Selection {
    /// Create a selection with validation against `duration`
    pub fn new(start: f64, end: f64, duration: f64) -> Result<Self> {
        let invalid = !start.is_finite()
            || !end.is_finite()
            || start < 0.0
            || start >= end
            || end > duration;

        if invalid {
            return Err(AudioError::InvalidSelection {
                start,
                end,
                duration,
            });
        }

        Ok(Self { start, end })
    }

    /// The whole of an artifact of `duration` seconds
    pub fn full(duration: f64) -> Self {
        Self {
            start: 0.0,
            end: duration,
        }
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Whether this selection covers all of `duration`
    pub fn spans(&self, duration: f64) -> bool {
        self.start <= 0.0 && self.end >= duration
    }

    /// Bounds in minutes, rounded to 2 decimals for display
    pub fn as_minutes(&self) -> (f64, f64) {
        (to_minutes(self.start), to_minutes(self.end))
    }
}

fn to_minutes(seconds: f64) -> f64 {
    (seconds / 60.0 * 100.0).round() / 100.0
}

/// Owns the current selection of a loaded file
///
/// Updates replace both bounds together or not at all.
#[derive(Debug, Clone)]
pub struct SelectionModel {
    current: Selection,
}

impl SelectionModel {
    /// Start with the full width of an artifact
    pub fn full(duration: f64) -> Self {
        Self {
            current: Selection::full(duration),
        }
    }

    pub fn get(&self) -> Selection {
        self.current
    }

    /// Replace the selection; on error the previous one is kept
    pub fn set(&mut self, start: f64, end: f64, duration: f64) -> Result<Selection> {
        let selection = Selection::new(start, end, duration)?;
        self.current = selection;
        Ok(selection)
    }

    /// Restore a selection that is already known to be valid (from history)
    pub(crate) fn restore(&mut self, selection: Selection) {
        self.current = selection;
    }

    pub fn reset(&mut self, duration: f64) {
        self.current = Selection::full(duration);
    }

    pub fn as_minutes(&self) -> (f64, f64) {
        self.current.as_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_selection() {
        let selection = Selection::new(2.0, 4.0, 10.0).unwrap();
        assert_eq!(selection.length(), 2.0);
        assert!(!selection.spans(10.0));
        assert!(Selection::new(0.0, 10.0, 10.0).unwrap().spans(10.0));
    }

    #[test]
    fn test_invalid_selections() {
        // Negative start
        assert!(Selection::new(-1.0, 5.0, 10.0).is_err());
        // Empty
        assert!(Selection::new(3.0, 3.0, 10.0).is_err());
        // Inverted
        assert!(Selection::new(5.0, 3.0, 10.0).is_err());
        // Past the end
        assert!(Selection::new(5.0, 10.5, 10.0).is_err());
        // Not a number
        assert!(Selection::new(f64::NAN, 3.0, 10.0).is_err());
        assert!(Selection::new(1.0, f64::INFINITY, 10.0).is_err());
    }

    #[test]
    fn test_failed_set_keeps_previous() {
        let mut model = SelectionModel::full(10.0);
        model.set(2.0, 4.0, 10.0).unwrap();

        let result = model.set(-1.0, 5.0, 10.0);
        match result {
            Err(AudioError::InvalidSelection { start, end, duration }) => {
                assert_eq!((start, end, duration), (-1.0, 5.0, 10.0));
            }
            _ => panic!("Expected InvalidSelection error"),
        }
        assert!(model.set(3.0, 3.0, 10.0).is_err());

        assert_eq!(model.get(), Selection { start: 2.0, end: 4.0 });
    }

    #[test]
    fn test_as_minutes_rounds_to_two_decimals() {
        let selection = Selection::new(30.0, 100.0, 200.0).unwrap();
        assert_eq!(selection.as_minutes(), (0.5, 1.67));

        let selection = Selection::new(0.0, 7.0, 10.0).unwrap();
        assert_eq!(selection.as_minutes(), (0.0, 0.12));
    }

    #[test]
    fn test_as_minutes_over_a_range_of_selections() {
        let duration = 3600.0;
        for i in 0..200 {
            let start = i as f64 * 7.3;
            let end = start + 1.0 + i as f64 * 3.1;
            let selection = Selection::new(start, end, duration).unwrap();
            let (start_min, end_min) = selection.as_minutes();
            assert!((start_min - start / 60.0).abs() <= 0.005 + 1e-9);
            assert!((end_min - end / 60.0).abs() <= 0.005 + 1e-9);
        }
    }
}
