//! Contribution storage, the create/list/delete service, and its HTTP routes.

pub mod ledger;
pub mod repository;
pub mod router;
pub mod service;
pub mod sqlite;
pub mod transfer;

#[cfg(test)]
mod tests;

pub use ledger::{ContributionLedger, LedgerError};
pub use repository::{ContributionRepository, InMemoryContributionRepository, RepositoryError};
pub use router::contribution_router;
pub use service::{ContributionService, ContributionServiceError};
pub use sqlite::SqliteContributionRepository;
pub use transfer::{read_contributions, write_contributions, TransferError};
