mod attendance;
mod checkin;
mod event;
mod reconcile;
mod vote;

pub use event::CreateEventInput;
pub use reconcile::ReconcileReport;
pub use vote::VoteInput;

use clanhall_db::DocumentStore;

use crate::AwardConfig;

#[derive(Clone)]
pub struct Command<S> {
    pub(crate) store: S,
    pub(crate) awards: AwardConfig,
}

impl<S: DocumentStore> Command<S> {
    pub fn new(store: S, awards: AwardConfig) -> Self {
        Self { store, awards }
    }
}
