//! Job-state predicates.

use crate::jobs::{JobRecord, JobStatus};

/// A boolean test over a single record.
pub trait Predicate {
    fn test(&self, record: &JobRecord) -> bool;

    fn and<P: Predicate>(self, other: P) -> And<Self, P>
    where
        Self: Sized,
    {
        And(self, other)
    }

    fn not(self) -> Not<Self>
    where
        Self: Sized,
    {
        Not(self)
    }
}

impl<F> Predicate for F
where
    F: Fn(&JobRecord) -> bool,
{
    fn test(&self, record: &JobRecord) -> bool {
        self(record)
    }
}

/// Matches records in exactly one job state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasStatus(pub JobStatus);

impl Predicate for HasStatus {
    fn test(&self, record: &JobRecord) -> bool {
        record.status == self.0
    }
}

pub const IS_IDLE: HasStatus = HasStatus(JobStatus::Idle);
pub const IS_RUNNING: HasStatus = HasStatus(JobStatus::Running);

#[derive(Debug, Clone, Copy)]
pub struct And<A, B>(A, B);

impl<A: Predicate, B: Predicate> Predicate for And<A, B> {
    fn test(&self, record: &JobRecord) -> bool {
        self.0.test(record) && self.1.test(record)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Not<A>(A);

impl<A: Predicate> Predicate for Not<A> {
    fn test(&self, record: &JobRecord) -> bool {
        !self.0.test(record)
    }
}

pub fn is_idle(record: &JobRecord) -> bool {
    IS_IDLE.test(record)
}

pub fn is_running(record: &JobRecord) -> bool {
    IS_RUNNING.test(record)
}

/// Keep the records matching `predicate`, in their original order.
pub fn filter<P: Predicate + ?Sized>(records: &[JobRecord], predicate: &P) -> Vec<JobRecord> {
    records
        .iter()
        .filter(|r| predicate.test(r))
        .cloned()
        .collect()
}
