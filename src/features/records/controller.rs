use super::types::{Student, StudentDraft, StudentId};
use crate::{
    app_lib::AppError,
    features::transport::{Transport, TransportBinder},
};
use std::cell::{Cell, RefCell};
use tracing::{debug, error, warn};

/// Runs student operations on the active transport and keeps the local list.
///
/// Every mutation is followed by a full refetch; the list is only ever
/// replaced wholesale by a successful fetch. Failures are logged and leave the
/// list as it was. Nothing is retried. Fetches are numbered as they start and
/// a fetch that finishes after a later one has been applied is dropped.
pub struct StudentController {
    binder: TransportBinder,
    students: RefCell<Vec<Student>>,
    fetches_started: Cell<u64>,
    fetch_applied: Cell<u64>,
}

impl StudentController {
    pub fn new(binder: TransportBinder) -> Self {
        Self {
            binder,
            students: RefCell::new(Vec::new()),
            fetches_started: Cell::new(0),
            fetch_applied: Cell::new(0),
        }
    }

    pub fn students(&self) -> Vec<Student> {
        self.students.borrow().clone()
    }

    /// Drops the local list, e.g. after sign-out.
    pub fn clear(&self) {
        self.students.borrow_mut().clear();
    }

    pub async fn fetch_all(&self) -> Result<(), AppError> {
        let transport = self.transport("fetch students")?;
        let ticket = self.fetches_started.get() + 1;
        self.fetches_started.set(ticket);

        let result = transport.backend().get_students().await;
        let students = self.settle(&transport, result, "fetch students")?;

        if ticket < self.fetch_applied.get() {
            debug!(ticket, "Dropping a fetch overtaken by a newer one");
            return Ok(());
        }
        debug!(count = students.len(), "Fetched students");
        self.fetch_applied.set(ticket);
        *self.students.borrow_mut() = students;
        Ok(())
    }

    pub async fn add(&self, draft: &StudentDraft) -> Result<(), AppError> {
        let transport = self.transport("add student")?;
        let result = transport
            .backend()
            .add_student(&draft.name, &draft.email, draft.parsed_marks())
            .await;
        self.settle(&transport, result, "add student")?;

        self.refresh().await;
        Ok(())
    }

    pub async fn update(&self, id: &StudentId, draft: &StudentDraft) -> Result<(), AppError> {
        let transport = self.transport("update student")?;
        let result = transport
            .backend()
            .update_student(id, &draft.name, &draft.email, draft.parsed_marks())
            .await;
        self.settle(&transport, result, "update student")?;

        self.refresh().await;
        Ok(())
    }

    pub async fn delete(&self, id: &StudentId) -> Result<(), AppError> {
        let transport = self.transport("delete student")?;
        let result = transport.backend().delete_student(id).await;
        self.settle(&transport, result, "delete student")?;

        self.refresh().await;
        Ok(())
    }

    /// Resynchronizes after a mutation; a failed refetch is already logged and
    /// does not undo the mutation.
    async fn refresh(&self) {
        let _ = self.fetch_all().await;
    }

    fn transport(&self, operation: &str) -> Result<Transport, AppError> {
        self.binder.current().inspect_err(|err| {
            error!(operation, error = %err, "Backend call attempted without a bound transport");
        })
    }

    /// Discards results from a transport that was replaced mid-flight and logs
    /// backend failures.
    fn settle<T>(
        &self,
        transport: &Transport,
        result: Result<T, AppError>,
        operation: &str,
    ) -> Result<T, AppError> {
        if !self.binder.is_current(transport) {
            warn!(
                operation,
                generation = transport.generation(),
                "Discarding result from a replaced transport"
            );
            return Err(AppError::StaleTransport);
        }

        result.inspect_err(|err| error!(operation, error = %err, "Backend call failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::StudentController;
    use crate::app_lib::AppError;
    use crate::features::{
        records::types::{StudentDraft, StudentId},
        transport::TransportBinder,
    };
    use crate::test_support::{InMemoryBackend, identity, student};
    use std::rc::Rc;

    fn draft(name: &str, email: &str, marks: &str) -> StudentDraft {
        StudentDraft {
            name: name.to_string(),
            email: email.to_string(),
            marks: marks.to_string(),
        }
    }

    fn bound(backend: &Rc<InMemoryBackend>) -> (StudentController, TransportBinder) {
        let binder = TransportBinder::new(backend.connector());
        binder.bind(Some(&identity("aaaaa-aa", u64::MAX)));
        (StudentController::new(binder.clone()), binder)
    }

    #[tokio::test]
    async fn add_then_delete_tracks_backend_state() {
        let backend = Rc::new(InMemoryBackend::with_students(vec![student(
            1, "Alice", "a@x.com", 90,
        )]));
        let (controller, _binder) = bound(&backend);

        controller.fetch_all().await.unwrap();
        assert_eq!(controller.students(), backend.snapshot());
        assert_eq!(controller.students().len(), 1);

        controller.add(&draft("Bob", "b@x.com", "85")).await.unwrap();
        assert_eq!(backend.snapshot().len(), 2);
        assert_eq!(controller.students(), backend.snapshot());

        controller.delete(&StudentId::from(1)).await.unwrap();
        let remaining = controller.students();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "Bob");
        assert_eq!(remaining[0].marks, 85);
        assert_eq!(remaining, backend.snapshot());
    }

    #[tokio::test]
    async fn fetch_overtaken_by_a_mutation_refresh_is_dropped() {
        let backend = Rc::new(InMemoryBackend::with_students(vec![
            student(1, "Alice", "a@x.com", 90),
            student(2, "Bob", "b@x.com", 85),
        ]));
        let (controller, _binder) = bound(&backend);
        let release = backend.hold_next_fetch();

        // The first fetch reads both rows, then stalls until the delete and its
        // refresh have finished.
        let (fetched, deleted) = tokio::join!(controller.fetch_all(), async {
            let deleted = controller.delete(&StudentId::from(1)).await;
            let _ = release.send(());
            deleted
        });

        fetched.unwrap();
        deleted.unwrap();
        assert_eq!(backend.snapshot().len(), 1);
        assert_eq!(controller.students(), backend.snapshot());
    }

    #[tokio::test]
    async fn update_of_missing_id_leaves_the_list_unchanged() {
        let backend = Rc::new(InMemoryBackend::with_students(vec![student(
            2, "Bob", "b@x.com", 85,
        )]));
        let (controller, _binder) = bound(&backend);
        controller.fetch_all().await.unwrap();
        let before = controller.students();

        let result = controller
            .update(&StudentId::from(1), &draft("Alice B.", "a@x.com", "95"))
            .await;

        assert!(result.unwrap_err().is_not_found());
        assert_eq!(controller.students(), before);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_the_stale_list() {
        let backend = Rc::new(InMemoryBackend::with_students(vec![student(
            1, "Alice", "a@x.com", 90,
        )]));
        let (controller, _binder) = bound(&backend);
        controller.fetch_all().await.unwrap();

        backend.fail_next(AppError::Network("offline".to_string()));
        assert!(controller.fetch_all().await.is_err());
        assert_eq!(controller.students().len(), 1);
    }

    #[tokio::test]
    async fn non_numeric_marks_are_passed_through_for_the_backend() {
        let backend = Rc::new(InMemoryBackend::new());
        let (controller, _binder) = bound(&backend);

        let result = controller.add(&draft("Eve", "e@x.com", "lots")).await;

        assert!(matches!(result, Err(AppError::Http { status: 422, .. })));
        assert!(backend.snapshot().is_empty());
    }

    #[tokio::test]
    async fn calls_while_unbound_fail_fast() {
        let backend = Rc::new(InMemoryBackend::new());
        let binder = TransportBinder::new(backend.connector());
        let controller = StudentController::new(binder);

        assert_eq!(controller.fetch_all().await, Err(AppError::Unauthenticated));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn results_from_a_replaced_transport_are_discarded() {
        let backend = Rc::new(InMemoryBackend::with_students(vec![student(
            1, "Alice", "a@x.com", 90,
        )]));
        let (controller, binder) = bound(&backend);

        // Sign-out lands while the fetch is in flight.
        let unbind = binder.clone();
        backend.on_next_call(move || {
            unbind.bind(None);
        });

        assert_eq!(controller.fetch_all().await, Err(AppError::StaleTransport));
        assert!(controller.students().is_empty());
    }
}
