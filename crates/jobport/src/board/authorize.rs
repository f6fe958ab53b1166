use std::fmt;

use super::domain::{Actor, Role, UserId};

/// Caller-facing wording for every denial. The precise grounds stay in the
/// `Denial` and reach the logs only.
pub const INSUFFICIENT_PERMISSIONS: &str = "insufficient permissions";

/// Pure permission check: one actor, one action, the ownership facts that
/// action was resolved against. Rules run top to bottom, first match wins,
/// and anything that falls through is denied.
///
/// The guard never touches storage. Ownership inputs come from
/// [`super::ownership::OwnershipResolver`], so a request payload can never
/// vote on its own permissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationGuard;

/// Actions the board exposes, each carrying the resolved facts it is judged
/// against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    CreateApplication,
    ReadOwnApplication { applicant: &'a UserId },
    UpdateApplicationStatus { company_owner: &'a UserId },
    ReadJobApplications { company_owner: &'a UserId },
    UpdateApplicationContent { applicant: &'a UserId },
    DeleteApplication { applicant: &'a UserId },
    PostJobOffer,
    ManageJobOffer { company_owner: &'a UserId },
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Specific grounds for a denial, retained for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub reason: &'static str,
}

impl Denial {
    const fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason)
    }
}

impl std::error::Error for Denial {}

impl AuthorizationGuard {
    pub fn authorize(&self, actor: &Actor, action: Action<'_>) -> Decision {
        // Admins clear every action; no owner-only carve-outs exist here.
        if actor.role == Role::Admin {
            return Decision::Allow;
        }

        match action {
            Action::CreateApplication => match actor.role {
                Role::Applicant => Decision::Allow,
                _ => Decision::Deny(Denial::new(INSUFFICIENT_PERMISSIONS)),
            },
            Action::ReadOwnApplication { applicant } => {
                if actor.user_id == *applicant {
                    Decision::Allow
                } else {
                    Decision::Deny(Denial::new("application belongs to another applicant"))
                }
            }
            Action::UpdateApplicationStatus { company_owner }
            | Action::ReadJobApplications { company_owner } => match actor.role {
                Role::CompanyRep if actor.user_id == *company_owner => Decision::Allow,
                Role::CompanyRep => {
                    Decision::Deny(Denial::new("job offer is owned by another company"))
                }
                _ => Decision::Deny(Denial::new(INSUFFICIENT_PERMISSIONS)),
            },
            Action::UpdateApplicationContent { applicant }
            | Action::DeleteApplication { applicant } => match actor.role {
                Role::Applicant if actor.user_id == *applicant => Decision::Allow,
                Role::Applicant => {
                    Decision::Deny(Denial::new("application belongs to another applicant"))
                }
                _ => Decision::Deny(Denial::new(INSUFFICIENT_PERMISSIONS)),
            },
            Action::PostJobOffer => match actor.role {
                Role::CompanyRep => Decision::Allow,
                _ => Decision::Deny(Denial::new(INSUFFICIENT_PERMISSIONS)),
            },
            Action::ManageJobOffer { company_owner } => match actor.role {
                Role::CompanyRep if actor.user_id == *company_owner => Decision::Allow,
                Role::CompanyRep => {
                    Decision::Deny(Denial::new("job offer is owned by another company"))
                }
                _ => Decision::Deny(Denial::new(INSUFFICIENT_PERMISSIONS)),
            },
        }
    }
}
