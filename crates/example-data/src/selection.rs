//! Helpers for picking existing records.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::GenerationError;

/// Round-robin iterator over author identifiers.
///
/// Authors are handed out in the order supplied, wrapping around once the end
/// is reached, so twenty articles over three users yield 1, 2, 3, 1, 2, ...
///
/// # Example
///
/// ```
/// use example_data::AuthorCycle;
///
/// let mut cycle = AuthorCycle::new(vec![7, 9]).expect("authors");
/// assert_eq!(cycle.next_author(), 7);
/// assert_eq!(cycle.next_author(), 9);
/// assert_eq!(cycle.next_author(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct AuthorCycle {
    authors: Vec<i64>,
    position: usize,
}

impl AuthorCycle {
    /// Create a cycle over the given author identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::NoAuthors`] when `authors` is empty.
    pub fn new(authors: Vec<i64>) -> Result<Self, GenerationError> {
        if authors.is_empty() {
            return Err(GenerationError::NoAuthors);
        }
        Ok(Self {
            authors,
            position: 0,
        })
    }

    /// Return the next author, wrapping around at the end.
    pub fn next_author(&mut self) -> i64 {
        let author = self
            .authors
            .get(self.position)
            .copied()
            .unwrap_or_default();
        self.position += 1;
        if self.position >= self.authors.len() {
            self.position = 0;
        }
        author
    }
}

/// Select a random subset of `ids`.
///
/// The subset size is drawn from `min_count..=max_count`, clamped to the
/// number of available identifiers.
pub(crate) fn select_subset<R>(
    rng: &mut R,
    ids: &[i64],
    min_count: usize,
    max_count: usize,
) -> Vec<i64>
where
    R: Rng + ?Sized,
{
    if ids.is_empty() {
        return Vec::new();
    }

    let clamped_min = min_count.min(ids.len());
    let clamped_max = max_count.min(ids.len());

    let count = if clamped_min >= clamped_max {
        clamped_max
    } else {
        rng.random_range(clamped_min..=clamped_max)
    };

    let mut shuffled = ids.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count);
    shuffled
}
