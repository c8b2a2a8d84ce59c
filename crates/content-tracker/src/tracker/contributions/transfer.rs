use std::io::{Read, Write};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::domain::{
    Contribution, ContributionId, ContributionKind, ContributionStatus, EmployeeId,
};

/// CSV import/export failure.
#[derive(Debug)]
pub enum TransferError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: u64, reason: String },
}

impl std::fmt::Display for TransferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferError::Io(err) => write!(f, "failed to access contribution file: {}", err),
            TransferError::Csv(err) => write!(f, "invalid contribution CSV data: {}", err),
            TransferError::InvalidRow { line, reason } => {
                write!(f, "invalid contribution on line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for TransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransferError::Io(err) => Some(err),
            TransferError::Csv(err) => Some(err),
            TransferError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for TransferError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for TransferError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ContributionRow {
    id: String,
    employee_id: u32,
    title: String,
    #[serde(rename = "type")]
    kind: String,
    status: String,
    date: String,
}

/// Read contributions from CSV with the header
/// `id,employee_id,title,type,status,date`.
pub fn read_contributions<R: Read>(reader: R) -> Result<Vec<Contribution>, TransferError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut contributions = Vec::new();

    for record in csv_reader.deserialize::<ContributionRow>() {
        let row = record?;
        // header occupies line 1
        let line = contributions.len() as u64 + 2;
        contributions.push(decode(row, line)?);
    }

    Ok(contributions)
}

pub fn write_contributions<W: Write>(
    writer: W,
    contributions: &[Contribution],
) -> Result<(), TransferError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for contribution in contributions {
        csv_writer.serialize(ContributionRow {
            id: contribution.id.0.clone(),
            employee_id: contribution.employee_id.0,
            title: contribution.title.clone(),
            kind: contribution.kind.as_db().to_string(),
            status: contribution.status.as_db().to_string(),
            date: contribution.date.format("%Y-%m-%d").to_string(),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn decode(row: ContributionRow, line: u64) -> Result<Contribution, TransferError> {
    let invalid = |reason: String| TransferError::InvalidRow { line, reason };

    if row.id.is_empty() {
        return Err(invalid("missing id".to_string()));
    }
    if row.title.is_empty() {
        return Err(invalid("missing title".to_string()));
    }
    let kind: ContributionKind = row.kind.parse().map_err(|err| invalid(format!("{err}")))?;
    let status: ContributionStatus = row.status.parse().map_err(|err| invalid(format!("{err}")))?;
    let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
        .map_err(|err| invalid(format!("date '{}' ({err})", row.date)))?;

    Ok(Contribution {
        id: ContributionId(row.id),
        employee_id: EmployeeId(row.employee_id),
        title: row.title,
        kind,
        status,
        date,
    })
}
