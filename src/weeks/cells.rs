use serde::Serialize;
use std::iter::FusedIterator;

use super::{WEEKS_PER_YEAR, WeekBreakdown};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellState {
    Lived,
    Future,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekCell {
    pub index: u64,
    pub state: CellState,
}

impl WeekCell {
    /// 1-based week number, as shown in the cell tooltip.
    pub fn week_number(&self) -> u64 {
        self.index + 1
    }

    /// 1-based year the week falls in.
    pub fn year_number(&self) -> u64 {
        self.index / WEEKS_PER_YEAR + 1
    }
}

/// Lazy sequence of grid cells produced by [`WeekBreakdown::cells`].
#[derive(Debug, Clone)]
pub struct WeekCells {
    next: u64,
    end: u64,
    lived: u64,
}

impl WeekCells {
    pub(super) fn new(lived: u64, end: u64) -> Self {
        Self {
            next: 0,
            end,
            lived,
        }
    }
}

impl Iterator for WeekCells {
    type Item = WeekCell;

    fn next(&mut self) -> Option<WeekCell> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;
        let state = if index < self.lived {
            CellState::Lived
        } else {
            CellState::Future
        };
        Some(WeekCell { index, state })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }

    fn nth(&mut self, n: usize) -> Option<WeekCell> {
        self.next = self.next.saturating_add(n as u64).min(self.end);
        self.next()
    }
}

impl ExactSizeIterator for WeekCells {}

impl FusedIterator for WeekCells {}

/// Plain-text grid, one row of 52 cells per year.
pub fn render_text_grid(weeks: &WeekBreakdown) -> String {
    let mut out = String::new();
    for cell in weeks.cells() {
        if cell.index > 0 && cell.index % WEEKS_PER_YEAR == 0 {
            out.push('\n');
        }
        out.push(match cell.state {
            CellState::Lived => '■',
            CellState::Future => '□',
        });
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
