//! Candidate half-day slots.

use std::fmt;

/// A half-day period on a given day, e.g. Thursday morning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HalfDay {
    pub day: String,
    pub half: String,
}

impl HalfDay {
    pub fn new(day: impl Into<String>, half: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            half: half.into(),
        }
    }
}

impl fmt::Display for HalfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.day, self.half)
    }
}

/// One candidate slot for group meetings.
///
/// The `index` is stable and defines iteration and tie-break order. Exactly
/// one slot of a catalog is the overflow slot, which has no capacity cap.
///
/// # Examples
///
/// ```
/// use groupmeet_core::Slot;
///
/// let slots = Slot::catalog(["Thu AM", "Thu PM"]);
/// assert_eq!(slots.len(), 2);
/// assert!(!slots[0].is_overflow());
/// assert!(slots[1].is_overflow());
/// assert_eq!(slots[1].index(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot {
    index: usize,
    label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    period: Option<HalfDay>,
    #[cfg_attr(feature = "serde", serde(default))]
    is_overflow: bool,
}

impl Slot {
    /// Creates a regular (capped) slot.
    pub fn new(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
            period: None,
            is_overflow: false,
        }
    }

    /// Creates the uncapped overflow slot.
    pub fn overflow(index: usize, label: impl Into<String>) -> Self {
        Self::new(index, label).with_overflow(true)
    }

    /// Builds an indexed catalog from labels; the last slot is the overflow slot.
    pub fn catalog<I, L>(labels: I) -> Vec<Slot>
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let mut slots: Vec<Slot> = labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| Slot::new(index, label))
            .collect();
        if let Some(last) = slots.last_mut() {
            last.is_overflow = true;
        }
        slots
    }

    pub fn with_overflow(mut self, is_overflow: bool) -> Self {
        self.is_overflow = is_overflow;
        self
    }

    /// Attaches the half-day this slot covers, used to derive conflicts.
    pub fn with_period(mut self, day: impl Into<String>, half: impl Into<String>) -> Self {
        self.period = Some(HalfDay::new(day, half));
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn period(&self) -> Option<&HalfDay> {
        self.period.as_ref()
    }

    pub fn is_overflow(&self) -> bool {
        self.is_overflow
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)?;
        if self.is_overflow {
            f.write_str(" (overflow)")?;
        }
        Ok(())
    }
}
