//! Join-of-two-tasks primitive.
//!
//! [`JoinPair`] spawns two fallible futures as independent tasks and joins
//! both. The first failure wins and the other task is aborted. Dropping the
//! pair (for example because the host dropped the run) aborts both tasks,
//! so cancellation reaches the in-flight invocations.

use std::future::Future;
use tokio::task::{JoinError, JoinHandle};

/// Which branch of a pair produced an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Side {
    Left,
    Right,
}

/// Why one branch of a pair did not produce a value
#[derive(Debug)]
pub(super) enum BranchFailure<E> {
    /// The branch's future returned an error
    Failed(E),
    /// The task panicked or was aborted
    Aborted(String),
}

/// Two spawned tasks joined as one unit.
pub(super) struct JoinPair<T, E> {
    left: JoinHandle<Result<T, E>>,
    right: JoinHandle<Result<T, E>>,
}

impl<T, E> JoinPair<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub(super) fn spawn<L, R>(left: L, right: R) -> Self
    where
        L: Future<Output = Result<T, E>> + Send + 'static,
        R: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            left: tokio::spawn(left),
            right: tokio::spawn(right),
        }
    }

    /// Wait for both branches, returning early on the first failure.
    pub(super) async fn try_join(mut self) -> Result<(T, T), (Side, BranchFailure<E>)> {
        let mut left: Option<T> = None;
        let mut right: Option<T> = None;

        loop {
            tokio::select! {
                joined = &mut self.left, if left.is_none() => {
                    left = Some(settle(joined).map_err(|e| (Side::Left, e))?);
                }
                joined = &mut self.right, if right.is_none() => {
                    right = Some(settle(joined).map_err(|e| (Side::Right, e))?);
                }
            }

            match (left, right) {
                (Some(l), Some(r)) => return Ok((l, r)),
                (l, r) => {
                    left = l;
                    right = r;
                }
            }
        }
    }
}

impl<T, E> Drop for JoinPair<T, E> {
    fn drop(&mut self) {
        // No-op for tasks that already finished
        self.left.abort();
        self.right.abort();
    }
}

fn settle<T, E>(joined: Result<Result<T, E>, JoinError>) -> Result<T, BranchFailure<E>> {
    match joined {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(BranchFailure::Failed(e)),
        Err(e) => Err(BranchFailure::Aborted(e.to_string())),
    }
}
