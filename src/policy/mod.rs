//! Policy Module
//!
//! Named cache instances, one per data volatility class.

mod kind;
mod set;

pub use kind::PolicyKind;
pub use set::CachePolicies;
