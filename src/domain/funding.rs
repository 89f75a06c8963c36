//! Funding programs and farmers' applications to them

use super::common::{mysql_string_enum, StringUuid};
use super::user::Contact;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FundingType {
    Grant,
    Loan,
    Investment,
}

impl std::str::FromStr for FundingType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "grant" => Ok(FundingType::Grant),
            "loan" => Ok(FundingType::Loan),
            "investment" => Ok(FundingType::Investment),
            _ => Err(format!("Unknown funding type: {}", s)),
        }
    }
}

impl std::fmt::Display for FundingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FundingType::Grant => write!(f, "grant"),
            FundingType::Loan => write!(f, "loan"),
            FundingType::Investment => write!(f, "investment"),
        }
    }
}

mysql_string_enum!(FundingType);

/// Grant, loan or investment offered by a provider
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FundingProgram {
    pub id: StringUuid,
    pub title: String,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub funding_type: FundingType,
    pub deadline: Option<NaiveDate>,
    pub requirements: Option<String>,
    /// Percentage, e.g. 5.5
    pub interest_rate: f64,
    pub provider_id: StringUuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for FundingProgram {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            title: String::new(),
            description: String::new(),
            amount: 0.0,
            funding_type: FundingType::Grant,
            deadline: None,
            requirements: None,
            interest_rate: 0.0,
            provider_id: StringUuid::nil(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateFundingProgramInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub amount: f64,
    #[serde(rename = "type")]
    pub funding_type: FundingType,
    pub deadline: Option<NaiveDate>,
    pub requirements: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub interest_rate: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateFundingProgramInput {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub funding_type: Option<FundingType>,
    pub deadline: Option<NaiveDate>,
    pub requirements: Option<String>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub interest_rate: Option<f64>,
    pub is_active: Option<bool>,
}

impl FundingProgram {
    pub fn apply(&mut self, input: UpdateFundingProgramInput) {
        if let Some(title) = input.title {
            self.title = title;
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        if let Some(amount) = input.amount {
            self.amount = amount;
        }
        if let Some(funding_type) = input.funding_type {
            self.funding_type = funding_type;
        }
        if input.deadline.is_some() {
            self.deadline = input.deadline;
        }
        if input.requirements.is_some() {
            self.requirements = input.requirements;
        }
        if let Some(rate) = input.interest_rate {
            self.interest_rate = rate;
        }
        if let Some(is_active) = input.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Utc::now();
    }
}

/// Public program filters. Inactive programs are never listed.
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct FundingProgramQuery {
    #[serde(rename = "type")]
    #[param(rename = "type")]
    pub funding_type: Option<FundingType>,
    pub min_amount: Option<f64>,
}

impl FundingProgramQuery {
    pub fn matches(&self, program: &FundingProgram) -> bool {
        program.is_active
            && self.funding_type.is_none_or(|t| program.funding_type == t)
            && self.min_amount.is_none_or(|m| program.amount >= m)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "under_review" => Ok(ApplicationStatus::UnderReview),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            _ => Err(format!("Unknown application status: {}", s)),
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationStatus::Pending => write!(f, "pending"),
            ApplicationStatus::UnderReview => write!(f, "under_review"),
            ApplicationStatus::Approved => write!(f, "approved"),
            ApplicationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

mysql_string_enum!(ApplicationStatus);

/// A farmer's application to a funding program
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FundingApplication {
    pub id: StringUuid,
    pub program_id: StringUuid,
    pub applicant_id: StringUuid,
    pub status: ApplicationStatus,
    pub proposal_text: String,
    pub amount_requested: f64,
    #[sqlx(json)]
    pub documents: Vec<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for FundingApplication {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            program_id: StringUuid::nil(),
            applicant_id: StringUuid::nil(),
            status: ApplicationStatus::Pending,
            proposal_text: String::new(),
            amount_requested: 0.0,
            documents: Vec::new(),
            reviewed_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Program fields shown alongside an application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProgramSummary {
    pub id: StringUuid,
    pub title: String,
    #[serde(rename = "type")]
    pub funding_type: FundingType,
    pub amount: f64,
}

impl From<&FundingProgram> for ProgramSummary {
    fn from(program: &FundingProgram) -> Self {
        Self {
            id: program.id,
            title: program.title.clone(),
            funding_type: program.funding_type,
            amount: program.amount,
        }
    }
}

/// Application as listed to the applicant or the program's provider
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FundingApplicationView {
    #[serde(flatten)]
    pub application: FundingApplication,
    pub program: Option<ProgramSummary>,
    pub applicant: Option<Contact>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateApplicationInput {
    pub program_id: StringUuid,
    #[validate(length(min = 1))]
    pub proposal_text: String,
    #[validate(range(min = 0.0))]
    pub amount_requested: f64,
    #[serde(default)]
    pub documents: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateApplicationStatusInput {
    pub status: ApplicationStatus,
}
