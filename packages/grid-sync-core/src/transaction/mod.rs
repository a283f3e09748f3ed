//! Change detection, batch submission, and commit-or-discard transactions.

mod change;
pub mod diff;
mod outcome;
#[allow(clippy::module_inception)]
mod transaction;

pub use change::CellChange;
pub use diff::{calculate_updates, shape_drift, ShapeDrift};
pub use outcome::SyncOutcome;
pub use transaction::UpdateTransaction;
