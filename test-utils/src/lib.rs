//! Shared helpers for the tests of the workspace.

mod approx_eq;
mod store;

#[doc(hidden)]
pub use float_cmp::approx_eq;

pub use crate::{
    approx_eq::ApproxEqIter,
    store::{generic_document, google_document, ResultStore},
};
