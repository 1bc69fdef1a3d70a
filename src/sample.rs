//! Sample selector: date window → per-record gates → random or score reduction.

use crate::dataset::Dataset;
use crate::filters::{date_window, qualifies};
use crate::query::{SampleQuery, SelectBy};
use crate::record::Comment;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::cmp::Reverse;

/// Portable, seedable RNG for selection. Identical seed + inputs give identical samples.
pub type SampleRng = ChaCha8Rng;

pub fn seeded_rng(seed: u64) -> SampleRng {
    ChaCha8Rng::seed_from_u64(seed)
}

impl Dataset {
    /// Records passing every filter, in date order, before reduction.
    pub fn qualifying(&self, q: &SampleQuery) -> Vec<&Comment> {
        date_window(self.comments(), q.start, q.end)
            .iter()
            .filter(|c| qualifies(c, q))
            .collect()
    }

    /// Filter, then bound to `q.number_of_comments`.
    pub fn sample<R: Rng + ?Sized>(&self, q: &SampleQuery, rng: &mut R) -> Vec<&Comment> {
        let matching = self.qualifying(q);
        let n_matching = matching.len();
        let out = reduce(matching, q.select_by, q.number_of_comments, rng);

        tracing::debug!(
            start = %q.start, end = %q.end, select_by = %q.select_by,
            matching = n_matching, returned = out.len(), "sample"
        );
        if q.warn_on_shortfall && q.number_of_comments != usize::MAX && out.len() < q.number_of_comments {
            tracing::warn!(
                "Could only find {} documents rather than the {} requested.",
                out.len(),
                q.number_of_comments
            );
        }
        out
    }
}

/// Reduction step. `Random` keeps date order when nothing has to be dropped,
/// otherwise returns the draw order. `Score` is a stable descending sort.
pub fn reduce<'a, R: Rng + ?Sized>(
    mut matching: Vec<&'a Comment>,
    by: SelectBy,
    n: usize,
    rng: &mut R,
) -> Vec<&'a Comment> {
    match by {
        SelectBy::Random => {
            if matching.len() <= n {
                return matching;
            }
            index::sample(rng, matching.len(), n)
                .into_iter()
                .map(|i| matching[i])
                .collect()
        }
        SelectBy::Score => {
            matching.sort_by_key(|c| Reverse(c.score));
            matching.truncate(n);
            matching
        }
    }
}
