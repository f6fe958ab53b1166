use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for companies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompanyId(pub String);

/// Identifier wrapper for published job offers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobOfferId(pub String);

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for notifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(pub String);

/// Role attached to a user account. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Applicant,
    CompanyRep,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Applicant => "applicant",
            Role::CompanyRep => "company_rep",
            Role::Admin => "admin",
        }
    }
}

/// Authenticated identity threaded explicitly through every operation.
///
/// Produced by the authentication layer; nothing below it ever reaches for an
/// ambient "current user".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// Directory record of a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub role: Role,
}

/// Company profile. Exactly one owning user per company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub owner_user_id: UserId,
    pub name: String,
}

/// A posting applicants can apply to, owned exclusively by one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOffer {
    pub id: JobOfferId,
    pub company_id: CompanyId,
    pub title: String,
    pub is_active: bool,
}

/// Workflow status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Interview,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Accepted and rejected close the application; nothing moves out of them.
    pub const fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rejection for status values outside the workflow enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid application status '{value}'")]
pub struct InvalidStatus {
    pub value: String,
}

impl FromStr for ApplicationStatus {
    type Err = InvalidStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "reviewed" => Ok(ApplicationStatus::Reviewed),
            "interview" => Ok(ApplicationStatus::Interview),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            _ => Err(InvalidStatus {
                value: value.to_string(),
            }),
        }
    }
}

/// One applicant's submission against one job offer.
///
/// Unique on (job_offer_id, applicant_user_id): an applicant holds at most one
/// application per offer, and the claim is never released, so a withdrawn
/// application cannot be refiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_offer_id: JobOfferId,
    pub applicant_user_id: UserId,
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Closed set of announcement kinds, keyed by the status that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    UnderReview,
    InterviewInvitation,
    Acceptance,
    Rejection,
}

impl NotificationKind {
    /// Kind announced when an application reaches `status`. Pending is the
    /// intake state and announces nothing.
    pub const fn for_status(status: ApplicationStatus) -> Option<Self> {
        match status {
            ApplicationStatus::Pending => None,
            ApplicationStatus::Reviewed => Some(NotificationKind::UnderReview),
            ApplicationStatus::Interview => Some(NotificationKind::InterviewInvitation),
            ApplicationStatus::Accepted => Some(NotificationKind::Acceptance),
            ApplicationStatus::Rejected => Some(NotificationKind::Rejection),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            NotificationKind::UnderReview => "under review",
            NotificationKind::InterviewInvitation => "interview invitation",
            NotificationKind::Acceptance => "acceptance",
            NotificationKind::Rejection => "rejection",
        }
    }

    /// Default body for a freshly created notification row.
    pub fn message(self) -> String {
        match self {
            NotificationKind::UnderReview => "Your application is under review.".to_string(),
            NotificationKind::InterviewInvitation => {
                "You have been invited to an interview.".to_string()
            }
            NotificationKind::Acceptance => {
                "Congratulations, your application has been accepted.".to_string()
            }
            NotificationKind::Rejection => {
                "Your application was not successful this time.".to_string()
            }
        }
    }
}

/// Row created as the side effect of a status transition. Clients never create
/// these directly; the only mutation after creation is the read flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_user_id: UserId,
    pub kind: NotificationKind,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Names the entity a failed lookup was after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    User,
    Company,
    JobOffer,
    Application,
    Notification,
}

impl ResourceKind {
    pub const fn label(self) -> &'static str {
        match self {
            ResourceKind::User => "user",
            ResourceKind::Company => "company",
            ResourceKind::JobOffer => "job offer",
            ResourceKind::Application => "application",
            ResourceKind::Notification => "notification",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
