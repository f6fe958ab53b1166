//! Job board core: who may touch an application, and how it moves.
//!
//! Every entry point takes an explicit [`Actor`] and resolves ownership
//! server-side before a single authorization decision is made. The modules
//! split along those seams: `authorize` holds the pure permission rules,
//! `ownership` walks the application -> job offer -> company -> owner chain,
//! `uniqueness` guards the one-application-per-offer constraint, `lifecycle`
//! drives status transitions and their notifications, and `bulk` fans a
//! triage batch out into independent per-item transitions.

pub mod authorize;
pub mod bulk;
pub mod domain;
pub mod lifecycle;
pub mod memory;
pub mod notify;
pub mod ownership;
pub mod router;
pub mod service;
pub mod store;
pub mod uniqueness;

#[cfg(test)]
mod tests;

pub use authorize::{Action, AuthorizationGuard, Decision, Denial, INSUFFICIENT_PERMISSIONS};
pub use bulk::{BulkCoordinator, BulkFailure, BulkOutcome, EmptyBulk};
pub use domain::{
    Actor, Application, ApplicationId, ApplicationStatus, Company, CompanyId, InvalidStatus,
    JobOffer, JobOfferId, Notification, NotificationId, NotificationKind, ResourceKind, Role, User,
    UserId,
};
pub use lifecycle::{ApplicationLifecycle, TransitionError};
pub use memory::MemoryStore;
pub use notify::{NotificationDispatcher, NotifyError, StoreNotifier};
pub use ownership::{OwnershipResolver, ResolveError, ResolvedApplication, ResolvedJobOffer};
pub use router::{board_router, ACTOR_HEADER};
pub use service::{BoardError, BoardService};
pub use store::{ApplicationStore, BoardStore, DirectoryStore, NotificationStore, StoreError};
