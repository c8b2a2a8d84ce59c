pub mod contributions;
pub mod domain;
pub mod roster;
pub mod stats;

pub use domain::{
    Contribution, ContributionError, ContributionId, ContributionKind, ContributionStatus,
    DomainParseError, EmployeeId, MonthKey, NewContribution,
};
pub use roster::{Employee, Roster};
