//! Single-week selection for the calendar.

use crate::plan::PLAN_WEEKS;

/// Toggle selection: clicking the selected week deselects it, clicking any
/// other week selects that one.
pub fn select(current: Option<u8>, clicked: u8) -> Option<u8> {
    if current == Some(clicked) {
        None
    } else {
        Some(clicked)
    }
}

/// Calendar cursor plus the optional selected week.
///
/// The cursor always points at a valid week; the selection is what the
/// detail pane shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekSelection {
    cursor: u8,
    selected: Option<u8>,
}

impl Default for WeekSelection {
    fn default() -> Self {
        Self {
            cursor: 1,
            selected: None,
        }
    }
}

impl WeekSelection {
    pub fn cursor(&self) -> u8 {
        self.cursor
    }

    pub fn get(&self) -> Option<u8> {
        self.selected
    }

    /// Toggle the week under the cursor.
    pub fn toggle(&mut self) {
        self.selected = select(self.selected, self.cursor);
    }

    /// Toggle an explicit week, moving the cursor onto it.
    pub fn toggle_week(&mut self, week: u8) {
        if (1..=PLAN_WEEKS).contains(&week) {
            self.cursor = week;
            self.selected = select(self.selected, week);
        }
    }

    pub fn next(&mut self) {
        if self.cursor < PLAN_WEEKS {
            self.cursor += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.cursor > 1 {
            self.cursor -= 1;
        }
    }

    /// Drop the selection and reset the cursor to week 1.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
