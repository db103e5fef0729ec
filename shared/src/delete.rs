use std::collections::HashSet;

use tracing::{info, warn};

use crate::shelf::Shelf;
use crate::{BookApi, ClientError};

/// Ids with a delete request out, for per-item pending indicators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingDeletes {
    ids: HashSet<String>,
}

#[derive(Debug, PartialEq, Eq)]
#[must_use = "a delete ticket must be passed to `finish`"]
pub struct DeleteTicket {
    id: String,
}

impl DeleteTicket {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl PendingDeletes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` pending. `None` if a delete for it is already out.
    pub fn begin(&mut self, id: &str) -> Option<DeleteTicket> {
        if self.ids.insert(id.to_string()) {
            Some(DeleteTicket { id: id.to_string() })
        } else {
            None
        }
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Release the ticket and drop the item only if the server confirmed.
    pub fn finish<L: Shelf + ?Sized>(
        &mut self,
        ticket: DeleteTicket,
        list: &mut L,
        result: Result<(), ClientError>,
    ) -> Result<(), ClientError> {
        self.ids.remove(&ticket.id);
        match result {
            Ok(()) => {
                list.remove(&ticket.id);
                info!(id = %ticket.id, "recommendation deleted");
                Ok(())
            }
            Err(e) => {
                warn!(id = %ticket.id, error = %e, "delete failed");
                Err(e)
            }
        }
    }
}

/// Delete `id` on the server, then locally. Returns `false` when a delete
/// for the same id was already pending.
pub async fn delete_recommendation<A, L>(
    api: &A,
    token: &str,
    list: &mut L,
    pending: &mut PendingDeletes,
    id: &str,
) -> Result<bool, ClientError>
where
    A: BookApi + ?Sized,
    L: Shelf + ?Sized,
{
    let Some(ticket) = pending.begin(id) else {
        return Ok(false);
    };
    let result = api.delete_book(token, id).await;
    pending.finish(ticket, list, result)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shelf::Recommendations;
    use crate::testing::{book, FakeApi};

    fn shelf() -> Recommendations {
        [book("a"), book("b")].into_iter().collect()
    }

    #[tokio::test]
    async fn confirmed_delete_removes_item() {
        let api = FakeApi::new();
        api.unit.borrow_mut().push_back(Ok(()));
        let mut list = shelf();
        let mut pending = PendingDeletes::new();

        assert!(list.contains("a"));
        let done = delete_recommendation(&api, "t", &mut list, &mut pending, "a")
            .await
            .unwrap();
        assert!(done);
        assert!(!list.contains("a"));
        assert!(pending.is_empty());
        assert_eq!(api.calls(), ["delete t a"]);
    }

    #[tokio::test]
    async fn failed_delete_keeps_item_unchanged() {
        let api = FakeApi::new();
        api.unit.borrow_mut().push_back(Err(ClientError::Server {
            status: 403,
            message: "Unauthorized".into(),
        }));
        let mut list = shelf();
        let before = list.clone();
        let mut pending = PendingDeletes::new();

        let err = delete_recommendation(&api, "t", &mut list, &mut pending, "a").await;
        assert!(err.is_err());
        assert_eq!(list, before);
        assert!(!pending.is_pending("a"));
    }

    #[test]
    fn one_pending_delete_per_item() {
        let mut pending = PendingDeletes::new();
        let a = pending.begin("a").unwrap();
        assert!(pending.begin("a").is_none());
        let b = pending.begin("b").unwrap();
        assert!(pending.is_pending("a") && pending.is_pending("b"));

        let mut list = shelf();
        pending.finish(a, &mut list, Ok(())).unwrap();
        assert!(!pending.is_pending("a"));
        assert!(pending.is_pending("b"));
        assert_eq!(b.id(), "b");
        pending.finish(b, &mut list, Ok(())).unwrap();
        assert!(list.is_empty());
    }
}
