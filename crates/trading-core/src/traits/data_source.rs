//! Inbound bar feed trait.

use crate::error::DataError;
use crate::types::BarRecord;

/// A source of bar batches, consumed one cycle at a time.
pub trait BarSource {
    /// The next batch of records, or `None` once the feed is exhausted.
    ///
    /// Records are handed over unvalidated; the store decides whether a
    /// batch is acceptable.
    fn next_batch(&mut self) -> Result<Option<Vec<BarRecord>>, DataError>;

    /// Source name for logging.
    fn name(&self) -> &str;
}
