//! Picks the work list for a batch out of the client's listing.

use crate::error::ArchiverResult;
use crate::prompt::Prompt;
use crate::types::TorrentRecord;
use std::collections::HashSet;

/// Which records a batch applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    All,
    Ids(HashSet<u64>),
    /// Records with a seed ratio strictly below the threshold, each one
    /// individually accepted by the operator.
    BelowRatio(f64),
}

impl Selection {
    pub fn ids(ids: impl IntoIterator<Item = u64>) -> Self {
        Selection::Ids(ids.into_iter().collect())
    }

    /// Resolves several supplied modes; `all` wins over ids, ids win over ratio.
    pub fn from_flags(all: bool, ids: Option<Vec<u64>>, ratio: Option<f64>) -> Option<Self> {
        if all {
            Some(Selection::All)
        } else if let Some(ids) = ids {
            Some(Selection::ids(ids))
        } else {
            ratio.map(Selection::BelowRatio)
        }
    }
}

/// Filters `records` in listing order.
///
/// `decide` is consulted for every ratio candidate, and only for those; all
/// candidates are asked before returning.
pub fn select<F>(
    records: Vec<TorrentRecord>,
    selection: &Selection,
    mut decide: F,
) -> ArchiverResult<Vec<TorrentRecord>>
where
    F: FnMut(&TorrentRecord) -> ArchiverResult<bool>,
{
    match selection {
        Selection::All => Ok(records),
        Selection::Ids(ids) => Ok(records
            .into_iter()
            .filter(|record| ids.contains(&record.id))
            .collect()),
        Selection::BelowRatio(threshold) => {
            let mut selected = Vec::new();
            for record in records {
                if record.ratio < *threshold && decide(&record)? {
                    selected.push(record);
                }
            }
            Ok(selected)
        }
    }
}

/// [`select`] with ratio candidates confirmed at the prompt.
pub fn select_interactive<P: Prompt + ?Sized>(
    records: Vec<TorrentRecord>,
    selection: &Selection,
    prompt: &mut P,
) -> ArchiverResult<Vec<TorrentRecord>> {
    select(records, selection, |record| {
        prompt.confirm(
            &format!("Archive {}?  (Seed ratio {:.2})", record.name, record.ratio),
            "y/n:",
            "y",
        )
    })
}
