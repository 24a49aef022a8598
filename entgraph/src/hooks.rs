//! Query observation hooks.
//!
//! Every builder terminal emits a [`QueryEvent`] before it touches the database
//! and the same event plus a [`QueryResultMeta`] afterwards. Events are always
//! logged through the `log` facade; registered [`QueryHook`]s receive them too.

use once_cell::sync::Lazy;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone)]
pub struct QueryEvent {
    pub builder: &'static str,
    pub entity: &'static str,
    pub details: String,
}

#[derive(Debug, Clone, Default)]
pub struct QueryResultMeta {
    pub row_count: Option<usize>,
    pub error: Option<String>,
    pub elapsed_ms: Option<u128>,
}

pub trait QueryHook: Send + Sync {
    fn before(&self, _event: &QueryEvent) {}
    fn after(&self, _event: &QueryEvent, _meta: &QueryResultMeta) {}
}

static HOOKS: Lazy<RwLock<Vec<Arc<dyn QueryHook>>>> = Lazy::new(|| RwLock::new(Vec::new()));

/// Register a hook for every builder in the process.
pub fn register_hook(hook: Arc<dyn QueryHook>) {
    match HOOKS.write() {
        Ok(mut hooks) => hooks.push(hook),
        Err(poisoned) => poisoned.into_inner().push(hook),
    }
}

/// Remove every registered hook.
pub fn clear_hooks() {
    match HOOKS.write() {
        Ok(mut hooks) => hooks.clear(),
        Err(poisoned) => poisoned.into_inner().clear(),
    }
}

fn snapshot() -> Vec<Arc<dyn QueryHook>> {
    match HOOKS.read() {
        Ok(hooks) => hooks.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

pub fn compose_details(operation: &str, entity: &str) -> String {
    format!("{} {}", operation, entity)
}

pub fn emit_before(event: &QueryEvent) {
    log::trace!("{} start: {}", event.builder, event.details);
    for hook in snapshot() {
        hook.before(event);
    }
}

pub fn emit_after(event: &QueryEvent, meta: &QueryResultMeta) {
    match &meta.error {
        Some(err) => log::debug!(
            "{} failed after {}ms: {}: {}",
            event.builder,
            meta.elapsed_ms.unwrap_or_default(),
            event.details,
            err
        ),
        None => log::debug!(
            "{} done in {}ms: {} ({} rows)",
            event.builder,
            meta.elapsed_ms.unwrap_or_default(),
            event.details,
            meta.row_count.unwrap_or_default()
        ),
    }
    for hook in snapshot() {
        hook.after(event, meta);
    }
}

/// Emit `before`, run `fut`, then emit `after` with the row count reported by
/// `rows`.
pub(crate) async fn observe<T, E, F>(
    event: QueryEvent,
    rows: impl FnOnce(&T) -> usize,
    fut: F,
) -> Result<T, E>
where
    F: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    emit_before(&event);
    let start = std::time::Instant::now();
    let res = fut.await;
    let meta = match &res {
        Ok(value) => QueryResultMeta {
            row_count: Some(rows(value)),
            error: None,
            elapsed_ms: Some(start.elapsed().as_millis()),
        },
        Err(e) => QueryResultMeta {
            row_count: None,
            error: Some(e.to_string()),
            elapsed_ms: Some(start.elapsed().as_millis()),
        },
    };
    emit_after(&event, &meta);
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter {
        before: AtomicUsize,
        after: AtomicUsize,
    }

    impl QueryHook for Counter {
        fn before(&self, _event: &QueryEvent) {
            self.before.fetch_add(1, Ordering::SeqCst);
        }
        fn after(&self, _event: &QueryEvent, _meta: &QueryResultMeta) {
            self.after.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn observe_reports_to_hooks() {
        let counter = Arc::new(Counter {
            before: AtomicUsize::new(0),
            after: AtomicUsize::new(0),
        });
        register_hook(counter.clone());
        let event = QueryEvent {
            builder: "Test",
            entity: "thing",
            details: compose_details("select", "thing"),
        };
        let res: Result<Vec<i32>, String> =
            observe(event, |v: &Vec<i32>| v.len(), async { Ok(vec![1, 2]) }).await;
        assert_eq!(res.unwrap().len(), 2);
        assert!(counter.before.load(Ordering::SeqCst) >= 1);
        assert!(counter.after.load(Ordering::SeqCst) >= 1);
    }
}
