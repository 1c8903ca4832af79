//! Two-phase optimistic updates.
//!
//! An `OptimisticUpdate` holds the value before the change and the proposed
//! value. Running it applies the proposal locally, awaits the remote call,
//! verifies the remote answer, and either commits (keeps the proposal) or
//! rolls back (re-applies the snapshot). Local state therefore only ever
//! holds one of the two values.

use std::future::Future;

use tasky_core::TaskyResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Proposed,
    Applied,
    Committed,
    RolledBack,
}

#[derive(Debug, Clone)]
pub struct OptimisticUpdate<T> {
    snapshot: T,
    proposed: T,
    phase: Phase,
}

impl<T: Clone> OptimisticUpdate<T> {
    pub fn new(snapshot: T, proposed: T) -> Self {
        Self {
            snapshot,
            proposed,
            phase: Phase::Proposed,
        }
    }

    pub fn snapshot(&self) -> &T {
        &self.snapshot
    }

    pub fn proposed(&self) -> &T {
        &self.proposed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// First phase: write the proposed value into local state.
    pub fn apply<A>(&mut self, apply: &mut A)
    where
        A: FnMut(T),
    {
        apply(self.proposed.clone());
        self.phase = Phase::Applied;
    }

    pub fn commit(&mut self) {
        self.phase = Phase::Committed;
    }

    pub fn rollback<A>(&mut self, apply: &mut A)
    where
        A: FnMut(T),
    {
        apply(self.snapshot.clone());
        self.phase = Phase::RolledBack;
    }

    /// Run both phases around `remote`.
    ///
    /// `verify` checks the remote answer against the proposal; a verification
    /// error is treated exactly like a remote failure.
    pub async fn run<R, A, Fut, V>(mut self, mut apply: A, remote: Fut, verify: V) -> TaskyResult<R>
    where
        A: FnMut(T),
        Fut: Future<Output = TaskyResult<R>>,
        V: FnOnce(&R, &T) -> TaskyResult<()>,
    {
        self.apply(&mut apply);
        let outcome = match remote.await {
            Ok(answer) => verify(&answer, &self.proposed).map(|_| answer),
            Err(e) => Err(e),
        };
        match outcome {
            Ok(answer) => {
                self.commit();
                Ok(answer)
            }
            Err(e) => {
                self.rollback(&mut apply);
                Err(e)
            }
        }
    }
}
