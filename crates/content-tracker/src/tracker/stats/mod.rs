//! Statistics derived from the contribution list.
//!
//! Everything here is a pure function over a snapshot of contributions and
//! the roster; [`StatsService`] only fetches the snapshot.

pub mod comeback;
pub mod counts;
pub mod dashboard;
pub mod leaderboard;
pub mod router;
pub mod service;
pub mod streak;

pub use comeback::{find_comebacks, is_comeback, months_since_previous, Comeback, COMEBACK_GAP_MONTHS};
pub use counts::{
    delivered_count, month_progress, published_count, year_to_date, GoalProgress, Period,
};
pub use dashboard::{
    build_dashboard, build_history, DashboardView, EmployeeCard, MonthHistoryEntry, TeamProgress,
    MONTHLY_TARGET,
};
pub use leaderboard::{Leaderboard, LeaderboardEntry, Standings};
pub use router::stats_router;
pub use service::{HistoryView, LeaderboardView, StatsService};
pub use streak::{published_months, publishing_streak};
