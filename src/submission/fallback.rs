//! Ordered "first success wins" probing.
//!
//! Candidates are tried one at a time in list order. The first `Ok` ends the
//! search; every failure is kept, in attempt order, so the caller can decide
//! what the terminal error should be.

use std::fmt::Display;
use std::future::Future;
use tracing::{debug, warn};

/// A candidate that produced a value, with its position in the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Winner<T> {
    pub index: usize,
    pub value: T,
}

/// Every candidate failed. `failures` is in the order the candidates were tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exhausted<E> {
    pub failures: Vec<E>,
}

impl<E> Exhausted<E> {
    pub fn last(&self) -> Option<&E> {
        self.failures.last()
    }
}

pub async fn first_success<C, T, E, F, Fut>(
    candidates: &[C],
    mut attempt: F,
) -> Result<Winner<T>, Exhausted<E>>
where
    C: Display,
    E: Display,
    F: FnMut(&C) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut failures = Vec::with_capacity(candidates.len());

    for (index, candidate) in candidates.iter().enumerate() {
        debug!("Trying candidate {} ({}/{})", candidate, index + 1, candidates.len());
        match attempt(candidate).await {
            Ok(value) => {
                debug!("Candidate {} succeeded", candidate);
                return Ok(Winner { index, value });
            }
            Err(e) => {
                warn!("Candidate {} failed: {}", candidate, e);
                failures.push(e);
            }
        }
    }

    Err(Exhausted { failures })
}
