//! Document ranking against a search term.
//!
//! Two rankers score the same documents differently:
//!
//! - [`rank_exact`]: number of term trigrams whose filter test passes.
//! - [`rank_approximate`]: bits shared between a query filter and the
//!   document filter.
//!
//! Both feed [`rank_descending`], so equal scores keep document order and
//! the two rankings differ only where the scores disagree.

mod approximate;
mod exact;
mod stable;

pub use approximate::{rank_approximate, score_approximate};
pub use exact::{rank_exact, score_exact};
pub use stable::{rank_descending, Ranking, ScoreEntry};
