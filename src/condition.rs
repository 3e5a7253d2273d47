//! `not`, `and`, `or` and `yes if condition else no` over runtime values.
//!
//! `and`/`or` yield one of their operands rather than a `bool`, deciding from left to right
//! and never evaluating operands after the deciding one. A conditional evaluates only the
//! branch its condition selects.

use crate::builtins;
use crate::mutator::Mutator;
use crate::oref::ORef;
use crate::truth::{EvaluationError, evaluate_truth, logical_not};

#[derive(Debug)]
pub enum Expr {
    Const(ORef),
    Not(Box<Expr>),
    /// First operand and the rest. With an empty rest this is just `first`, whose truth is
    /// then never tested.
    And(Box<Expr>, Vec<Expr>),
    Or(Box<Expr>, Vec<Expr>),
    /// Condition, then the `yes` and `no` branches.
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
    Tuple(Vec<Expr>),
    List(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>)
}

fn eval_all(mt: &mut Mutator, exprs: &[Expr]) -> Result<Vec<ORef>, EvaluationError> {
    exprs.iter()
        .map(|expr| eval(mt, expr))
        .collect()
}

pub fn eval(mt: &mut Mutator, expr: &Expr) -> Result<ORef, EvaluationError> {
    match expr {
        Expr::Const(v) => Ok(*v),

        Expr::Not(arg) => {
            let v = eval(mt, arg)?;
            logical_not(mt, v)
        },

        Expr::And(first, rest) => {
            let mut v = eval(mt, first)?;
            for expr in rest {
                if !evaluate_truth(mt, v)? {
                    break;
                }
                v = eval(mt, expr)?;
            }
            Ok(v)
        },

        Expr::Or(first, rest) => {
            let mut v = eval(mt, first)?;
            for expr in rest {
                if evaluate_truth(mt, v)? {
                    break;
                }
                v = eval(mt, expr)?;
            }
            Ok(v)
        },

        Expr::Conditional(condition, yes, no) => {
            let v = eval(mt, condition)?;
            if evaluate_truth(mt, v)? {
                eval(mt, yes)
            } else {
                eval(mt, no)
            }
        },

        Expr::Tuple(items) => {
            let items = eval_all(mt, items)?;
            Ok(builtins::tuple(mt, &items))
        },

        Expr::List(items) => {
            let items = eval_all(mt, items)?;
            Ok(builtins::list(mt, &items))
        },

        Expr::Dict(entries) => {
            let mut evaluated = Vec::with_capacity(entries.len());
            for (k, v) in entries {
                let k = eval(mt, k)?;
                let v = eval(mt, v)?;
                evaluated.push((k, v));
            }
            Ok(builtins::dict(mt, &evaluated))
        }
    }
}
