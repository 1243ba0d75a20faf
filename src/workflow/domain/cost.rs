//! Derived time/cost accounting projections.

use super::ProjectTask;

/// Derived effort and cost figures for a task or a task list.
///
/// Pure projection: recomputed on every read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostSummary {
    /// Total estimated hours.
    pub estimated_hours: f64,
    /// Total logged hours.
    pub logged_hours: f64,
    /// Estimated cost (estimate x rate; zero when no rate is set).
    pub estimated_cost: f64,
    /// Logged cost (logged hours x rate; zero when no rate is set).
    pub logged_cost: f64,
    /// Logged minus estimated hours; positive means overrun.
    pub hours_variance: f64,
}

impl CostSummary {
    /// Computes the summary for a single task.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "cost accounting is inherently fractional-hour arithmetic"
    )]
    pub fn for_task(task: &ProjectTask) -> Self {
        let estimated_hours = task.estimated_hours().value();
        let logged_hours = task.logged_hours().value();
        let rate = task.hourly_rate().map_or(0.0, super::HourlyRate::value);
        Self {
            estimated_hours,
            logged_hours,
            estimated_cost: estimated_hours * rate,
            logged_cost: logged_hours * rate,
            hours_variance: logged_hours - estimated_hours,
        }
    }

    /// Folds the summaries of every task in the list.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "cost accounting is inherently fractional-hour arithmetic"
    )]
    pub fn total_for(tasks: &[ProjectTask]) -> Self {
        tasks.iter().map(Self::for_task).fold(
            Self::default(),
            |acc, summary| Self {
                estimated_hours: acc.estimated_hours + summary.estimated_hours,
                logged_hours: acc.logged_hours + summary.logged_hours,
                estimated_cost: acc.estimated_cost + summary.estimated_cost,
                logged_cost: acc.logged_cost + summary.logged_cost,
                hours_variance: acc.hours_variance + summary.hours_variance,
            },
        )
    }
}
