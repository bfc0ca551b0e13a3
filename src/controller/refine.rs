//! Filters the backend cannot apply, run against the fetched page.
//!
//! Refinement only sees the records of the current page: a host on page 3
//! whose city matches is not pulled onto page 1. List templates say so next
//! to the filter input.

use crate::controller::mapper::UserDisplay;
use crate::domain::types::LocationNeedle;

/// Display records that carry a derived location.
pub trait Locatable {
    fn location(&self) -> &str;
}

impl Locatable for UserDisplay {
    fn location(&self) -> &str {
        &self.location
    }
}

/// A page-local filter over display records.
pub trait PageRefiner<D> {
    fn keep(&self, record: &D) -> bool;

    fn refine(&self, records: Vec<D>) -> Vec<D> {
        records.into_iter().filter(|r| self.keep(r)).collect()
    }
}

/// Leaves the page untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRefinement;

impl<D> PageRefiner<D> for NoRefinement {
    fn keep(&self, _record: &D) -> bool {
        true
    }
}

/// Case-insensitive substring match on the location field.
#[derive(Debug, Clone)]
pub struct LocationRefiner {
    needle: String,
}

impl LocationRefiner {
    pub fn new(needle: &LocationNeedle) -> Self {
        Self {
            needle: needle.as_str().to_lowercase(),
        }
    }
}

impl<D: Locatable> PageRefiner<D> for LocationRefiner {
    fn keep(&self, record: &D) -> bool {
        record.location().to_lowercase().contains(&self.needle)
    }
}

/// Refines `records` by `needle` when one is set.
pub fn refine_by_location<D: Locatable>(
    records: Vec<D>,
    needle: Option<&LocationNeedle>,
) -> Vec<D> {
    match needle {
        Some(needle) => LocationRefiner::new(needle).refine(records),
        None => NoRefinement.refine(records),
    }
}
