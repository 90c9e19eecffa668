use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Boxed future resolving to a task's outcome
pub type TaskFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;

/// An opaque unit of asynchronous work.
///
/// A task resolves exactly once with either a success value or a failure
/// reason; the orchestrator never inspects either payload. Within a run a
/// task's identity is its position in the input sequence; the id exists
/// for logging and events only.
pub struct Task<T, E> {
    id: String,
    future: TaskFuture<T, E>,
}

impl<T, E> Task<T, E> {
    /// Wrap a future as a task with a generated id
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::named(generate_task_id(), future)
    }

    /// Wrap a future as a task with a caller-supplied id
    pub fn named<F>(id: impl Into<String>, future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            id: id.into(),
            future: Box::pin(future),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn into_parts(self) -> (String, TaskFuture<T, E>) {
        (self.id, self.future)
    }
}

impl<T, E> fmt::Debug for Task<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").field("id", &self.id).finish()
    }
}

/// Generate a unique task id
pub fn generate_task_id() -> String {
    format!("task_{}", cuid2::create_id())
}
