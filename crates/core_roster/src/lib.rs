//! Channel roster core: member enumeration and first-seen preserving
//! reconciliation against a persisted mapping set.

pub mod directory;
pub mod enumerate;
pub mod error;
pub mod model;
pub mod reconcile;

pub use directory::SlackDirectory;
pub use enumerate::{MemberEnumerator, MEMBERS_PAGE_LIMIT};
pub use error::{Result, RosterError};
pub use model::{
    format_added_on, DirectMessageReceipt, MappingSet, MemberId, MemberPage, Profile, UserMapping,
};
pub use reconcile::{ReconcileOptions, Reconciler, Reconciliation, SkipReason, SkippedMember};
