//! Sonad primitives.
//! Stable, protocol-neutral, behavior-free.
//!
//! Rule: identifiers coming from outside the ledger are validated here,
//! at the boundary, never deep inside the engine.

pub mod primitives;
pub mod identifiers;
pub mod units;
pub mod errors;

pub use primitives::{Address, Amount, BlockHeight, NftId, PostId, Timestamp};
pub use identifiers::{ExternalRef, PostContent, MAX_CONTENT_LEN, MAX_EXTERNAL_REF_LEN};
pub use units::{tokens, DECIMALS, ONE_TOKEN};
pub use errors::{TypeError, TypeResult};
