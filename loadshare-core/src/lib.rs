//! loadshare-core: household load aggregation and advice engine.
//!
//! Both entry points are pure: [`aggregate`] turns a task snapshot plus
//! [`Weights`] into weighted minutes, and [`advise`] turns that result into
//! ordered advice sections.

pub mod advisor;
pub mod aggregate;
pub mod error;
pub mod task;
pub mod units;
pub mod weights;

pub use advisor::{
    Advice, AdvisorPolicy, People, Section, SectionKind, advise, advise_with, quick_win_tip,
    BALANCE_THRESHOLD_HOURS, COGNITIVE_RATE_THRESHOLD, EMOTIONAL_RATE_THRESHOLD,
    MAX_QUICK_WIN_CATEGORIES, MAX_REBALANCE_CATEGORIES,
};
pub use aggregate::{AggregateResult, CategoryTotals, DerivedRow, PersonTotals, aggregate};
pub use error::EngineError;
pub use task::{Assignee, Category, MAX_LOAD, Task, default_template, new_task_id};
pub use units::min_to_h;
pub use weights::Weights;
