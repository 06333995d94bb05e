//! Coleman: the host contract ([`shared`]) and the public face plugin ([`face`]).
//!
//! The member crates carry all the code; this crate re-exports them and hosts
//! the end-to-end tests that boot the reference host with the face installed.

pub use coleman_face as face;
pub use coleman_shared as shared;
