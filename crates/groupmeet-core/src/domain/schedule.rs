//! Course timetables keyed by day and half-day.

use std::collections::BTreeMap;

/// Who attends a course during each half-day: day → half → display names.
///
/// This is the shape produced by timetable exports, e.g.
/// `{"Thu": {"AM": ["Zhang San"], "PM": []}}`.
///
/// # Examples
///
/// ```
/// use groupmeet_core::CourseSchedule;
///
/// let mut schedule = CourseSchedule::new();
/// schedule.add("Thu", "AM", "Zhang San");
///
/// assert!(schedule.is_busy("Thu", "AM", "Zhang San"));
/// assert!(!schedule.is_busy("Thu", "PM", "Zhang San"));
/// assert!(!schedule.is_busy("Fri", "AM", "Zhang San"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CourseSchedule {
    days: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl CourseSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `name` has a course during `half` of `day`.
    pub fn add(&mut self, day: impl Into<String>, half: impl Into<String>, name: impl Into<String>) {
        let names = self
            .days
            .entry(day.into())
            .or_default()
            .entry(half.into())
            .or_default();
        let name = name.into();
        if !names.contains(&name) {
            names.push(name);
        }
    }

    /// Returns the names attending a course during `half` of `day`.
    pub fn names_at(&self, day: &str, half: &str) -> &[String] {
        self.days
            .get(day)
            .and_then(|halves| halves.get(half))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_busy(&self, day: &str, half: &str, name: &str) -> bool {
        self.names_at(day, half).iter().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.days
            .values()
            .all(|halves| halves.values().all(Vec::is_empty))
    }
}
