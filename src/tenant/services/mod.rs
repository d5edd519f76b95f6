//! Authorization services shared by the conversation, ledger and agent
//! services.

mod guard;

pub use guard::{AuthorizationGuard, ensure_operator_access, ensure_visitor_access, operator_scope};
