//! Week accounting
//!
//! Turns an age and a life expectancy into the numbers shown on the
//! life-in-weeks page: weeks lived, weeks remaining, and how the remainder
//! splits into sleeping and waking time.
//!
//! All week counts are floored. `awake_weeks` is always the remainder left
//! after `sleep_weeks`, so the two always add up to `remaining_weeks`.

mod cells;

pub use cells::{CellState, WeekCell, WeekCells, render_text_grid};

use serde::Serialize;
use thiserror::Error;

pub const WEEKS_PER_YEAR: u64 = 52;

/// Share of the remaining weeks spent asleep.
pub const SLEEP_FRACTION: f64 = 0.33;

pub const DEFAULT_AGE: f64 = 30.0;

/// Week breakdown for one `(age, life expectancy)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekBreakdown {
    pub weeks_lived: u64,
    pub total_weeks: u64,
    pub remaining_weeks: u64,
    pub sleep_weeks: u64,
    pub awake_weeks: u64,
    pub percentage_lived: f64,
}

/// Compute the week breakdown.
///
/// Never panics for finite input. A zero life expectancy yields
/// `percentage_lived == 0.0`. Negative inputs saturate to zero weeks; callers
/// that want to reject them should use [`validate_inputs`] first.
///
/// # Examples
///
/// ```
/// use life_in_weeks::compute;
///
/// let weeks = compute(30.0, 70.0);
/// assert_eq!(weeks.weeks_lived, 1560);
/// assert_eq!(weeks.sleep_weeks + weeks.awake_weeks, weeks.remaining_weeks);
/// ```
pub fn compute(current_age: f64, life_expectancy: f64) -> WeekBreakdown {
    let weeks_lived = years_to_weeks(current_age);
    let total_weeks = years_to_weeks(life_expectancy);
    let remaining_weeks = total_weeks.saturating_sub(weeks_lived);

    let sleep_weeks = ((remaining_weeks as f64 * SLEEP_FRACTION).floor() as u64).min(remaining_weeks);
    let awake_weeks = remaining_weeks - sleep_weeks;

    let percentage_lived = if total_weeks == 0 {
        0.0
    } else {
        (weeks_lived as f64 / total_weeks as f64 * 100.0).min(100.0)
    };

    WeekBreakdown {
        weeks_lived,
        total_weeks,
        remaining_weeks,
        sleep_weeks,
        awake_weeks,
        percentage_lived,
    }
}

// `as` saturates: NaN and negatives become 0.
fn years_to_weeks(years: f64) -> u64 {
    (years * WEEKS_PER_YEAR as f64).floor() as u64
}

impl WeekBreakdown {
    /// Grid cells, lived weeks first. Each call starts a fresh sequence.
    pub fn cells(&self) -> WeekCells {
        WeekCells::new(
            self.weeks_lived,
            self.weeks_lived
                .saturating_add(self.sleep_weeks)
                .saturating_add(self.awake_weeks),
        )
    }

    pub fn sleep_years(&self) -> f64 {
        self.sleep_weeks as f64 / WEEKS_PER_YEAR as f64
    }

    pub fn awake_years(&self) -> f64 {
        self.awake_weeks as f64 / WEEKS_PER_YEAR as f64
    }

    /// One-paragraph summary shown under the progress bar.
    pub fn summary(&self) -> String {
        format!(
            "You've lived {:.1}% of your expected life span. \
             Of your remaining time, you'll spend about {:.1} years sleeping \
             and {:.1} years awake.",
            self.percentage_lived,
            self.sleep_years(),
            self.awake_years()
        )
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum InputError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
}

/// Input checks for callers that feed user-entered values into [`compute`].
pub fn validate_inputs(current_age: f64, life_expectancy: f64) -> Result<(), InputError> {
    check_field("age", current_age)?;
    check_field("life expectancy", life_expectancy)
}

fn check_field(field: &'static str, value: f64) -> Result<(), InputError> {
    if !value.is_finite() {
        return Err(InputError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(InputError::Negative { field, value });
    }
    Ok(())
}
