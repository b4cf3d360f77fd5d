//! AULA Access — the RBAC permission evaluator.
//!
//! Authorization is purely permission-set membership: a user is allowed
//! to perform (resource, action) in a tenant iff one of their roles in
//! that tenant holds an exactly-matching permission grant. Role levels
//! are never consulted.

pub mod evaluator;

pub use evaluator::AccessEvaluator;
