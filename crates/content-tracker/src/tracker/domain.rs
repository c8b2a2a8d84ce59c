use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::roster::Roster;

/// Stable identifier of a roster member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub u32);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContributionId(pub String);

impl ContributionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContributionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionKind {
    #[serde(alias = "Innsikt")]
    Insight,
    #[serde(alias = "Kundehistorie")]
    CustomerStory,
    #[serde(alias = "Annet")]
    Other,
}

impl ContributionKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Insight => "Insight",
            Self::CustomerStory => "Customer story",
            Self::Other => "Other",
        }
    }

    pub const fn as_db(self) -> &'static str {
        match self {
            Self::Insight => "insight",
            Self::CustomerStory => "customer_story",
            Self::Other => "other",
        }
    }
}

impl FromStr for ContributionKind {
    type Err = DomainParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "insight" | "innsikt" => Ok(Self::Insight),
            "customer_story" | "customer-story" | "customerstory" | "kundehistorie" => {
                Ok(Self::CustomerStory)
            }
            "other" | "annet" => Ok(Self::Other),
            _ => Err(DomainParseError::Kind(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionStatus {
    #[serde(alias = "Draft")]
    Draft,
    #[serde(alias = "In Review")]
    InReview,
    #[serde(alias = "Published")]
    Published,
}

impl ContributionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::InReview => "In Review",
            Self::Published => "Published",
        }
    }

    pub const fn as_db(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InReview => "in_review",
            Self::Published => "published",
        }
    }

    /// Published or waiting for review; counts toward the monthly target.
    pub const fn is_delivered(self) -> bool {
        matches!(self, Self::InReview | Self::Published)
    }
}

impl FromStr for ContributionStatus {
    type Err = DomainParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "in_review" | "in review" | "in-review" | "inreview" => Ok(Self::InReview),
            "published" => Ok(Self::Published),
            _ => Err(DomainParseError::Status(value.to_string())),
        }
    }
}

/// One logged piece of content work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub id: ContributionId,
    #[serde(alias = "employeeId")]
    pub employee_id: EmployeeId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ContributionKind,
    pub status: ContributionStatus,
    pub date: NaiveDate,
}

impl Contribution {
    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }

    pub fn is_published(&self) -> bool {
        self.status == ContributionStatus::Published
    }
}

/// Create payload; the id and date are optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContribution {
    #[serde(default)]
    pub id: Option<ContributionId>,
    #[serde(alias = "employeeId")]
    pub employee_id: EmployeeId,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: ContributionKind,
    #[serde(default = "default_status")]
    pub status: ContributionStatus,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

fn default_kind() -> ContributionKind {
    ContributionKind::Insight
}

fn default_status() -> ContributionStatus {
    ContributionStatus::Draft
}

impl NewContribution {
    /// Check the payload against the roster and fill in the id and date.
    pub fn validate(self, roster: &Roster, today: NaiveDate) -> Result<Contribution, ContributionError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ContributionError::MissingTitle);
        }
        if roster.get(self.employee_id).is_none() {
            return Err(ContributionError::UnknownEmployee(self.employee_id));
        }

        let id = match self.id {
            Some(id) if !id.0.trim().is_empty() => ContributionId(id.0.trim().to_string()),
            _ => ContributionId::generate(),
        };

        Ok(Contribution {
            id,
            employee_id: self.employee_id,
            title,
            kind: self.kind,
            status: self.status,
            date: self.date.unwrap_or(today),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContributionError {
    #[error("contribution title is required")]
    MissingTitle,
    #[error("employee {0} is not on the roster")]
    UnknownEmployee(EmployeeId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainParseError {
    #[error("unknown contribution type '{0}'")]
    Kind(String),
    #[error("unknown contribution status '{0}'")]
    Status(String),
    #[error("'{0}' is not a YYYY-MM month")]
    Month(String),
}

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn month(self) -> u32 {
        self.month
    }

    /// Months since year zero; differences are whole calendar months.
    pub const fn ordinal(self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    pub const fn months_since(self, earlier: MonthKey) -> i64 {
        self.ordinal() - earlier.ordinal()
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn name(self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = DomainParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let invalid = || DomainParseError::Month(value.to_string());
        let (year, month) = trimmed.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
