//! Per-field streams over the session snapshot.

use super::Session;
use tokio::sync::watch;

/// A push-style view of one session field.
///
/// `current()` returns the value right away; `changed()` resolves on the next
/// *distinct* value of the field, ignoring updates to other fields.
pub struct Observable<T> {
    rx: watch::Receiver<Session>,
    project: fn(&Session) -> T,
    last: T,
}

impl<T> Observable<T>
where
    T: Clone + PartialEq,
{
    pub(crate) fn new(mut rx: watch::Receiver<Session>, project: fn(&Session) -> T) -> Self {
        let last = project(&rx.borrow_and_update());
        Self { rx, project, last }
    }

    /// Latest value of the field.
    pub fn current(&self) -> T {
        (self.project)(&self.rx.borrow())
    }

    /// Waits for the field to change. `None` once the session is gone.
    pub async fn changed(&mut self) -> Option<T> {
        loop {
            self.rx.changed().await.ok()?;
            let value = (self.project)(&self.rx.borrow_and_update());
            if value != self.last {
                self.last = value.clone();
                return Some(value);
            }
        }
    }

    /// Resolves with the first value (current included) that satisfies `pred`.
    pub async fn wait_for(&mut self, pred: impl Fn(&T) -> bool) -> Option<T> {
        let project = self.project;
        let snapshot = self.rx.wait_for(|s| pred(&project(s))).await.ok()?;
        let value = project(&snapshot);
        drop(snapshot);
        self.last = value.clone();
        Some(value)
    }
}
