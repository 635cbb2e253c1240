use clanhall_db::{DocumentStore, DocumentStoreExt, Filter, Query as DocQuery, Stored};
use clanhall_shared::{Result, Role};

use crate::User;

#[derive(Clone)]
pub struct Query<S> {
    store: S,
}

impl<S: DocumentStore> Query<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn get(&self, user_id: &str) -> Result<Option<Stored<User>>> {
        self.store.get_doc::<User>(user_id).await
    }

    pub async fn pending(&self) -> Result<Vec<Stored<User>>> {
        self.store
            .find::<User>(&DocQuery::new().filter(Filter::eq("role", Role::Pending.as_ref())))
            .await
    }

    /// Approved members for the roster and ranking pages: admins first,
    /// then by balance, richest on top.
    pub async fn ranked_members(&self) -> Result<Vec<Stored<User>>> {
        let mut members = self
            .store
            .find::<User>(&DocQuery::new().filter(Filter::is_in(
                "role",
                [Role::Member.as_ref(), Role::Admin.as_ref()],
            )))
            .await?;

        members.sort_by(|a, b| {
            let a_admin = a.data.role == Role::Admin;
            let b_admin = b.data.role == Role::Admin;
            b_admin
                .cmp(&a_admin)
                .then_with(|| b.data.pontos.cmp(&a.data.pontos))
        });

        Ok(members)
    }
}
