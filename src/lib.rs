//! Truthiness evaluation for a dynamically-typed object model.
//!
//! Every value is an [`ORef`] pointing at a heap [`Object`](object::Object) whose
//! [`Type`](r#type::Type) may carry number, mapping and sequence method tables. The truth of a
//! value is decided by [`truth::evaluate_truth`] from those tables alone.

pub mod oref;
pub mod heap;
pub mod r#type;
pub mod object;
pub mod exception;
pub mod mutator;
pub mod bool;
pub mod builtins;
pub mod capability;
pub mod truth;
pub mod condition;
pub mod pos;
pub mod reader;
pub mod write;

pub use oref::ORef;
pub use mutator::{Cfg, Mutator};
pub use truth::{EvaluationError, evaluate_truth, is_falsy, logical_not};
pub use crate::bool::{true_value, false_value, from_bool};
