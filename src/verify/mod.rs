//! Existence Verification Module
//!
//! Confirms that ingested objects are actually present in the repository.
//!
//! ## Check Strategies
//! Two interchangeable strategies answer "does this object exist?":
//! - **Index** (default): query the external search index for an exact
//!   identifier match and treat a matched count of one or more as presence.
//! - **Direct**: invoke the local item-manipulation tool and treat non-empty
//!   output as presence.
//!
//! The strategy is an enumerated parameter with exhaustive matching, so a
//! mistyped or silently defaulted dispatch cannot exist.
//!
//! ## Status Polling
//! [`Verifier::check_ingest_status`] resolves a recipe locator, checks the
//! book object first (short-circuiting when it is absent), then checks every
//! page and reduces the per-page flags to one `successful_load` flag.

pub mod checker;
pub mod manipulate;
pub mod types;

pub use checker::Verifier;
pub use manipulate::ManipOp;
pub use types::{CheckStrategy, ExistenceStatus, VerifyError};
