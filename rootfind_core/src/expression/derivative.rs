//! Numerical differentiation, with an optional symbolic shortcut table.
//!
//! The central difference `(f(x + h) - f(x - h)) / 2h` is the canonical
//! method and the only one that works for every expression. The shortcut
//! table recognises a few textbook patterns of `x` (monomials, constant
//! multiples, sums, `sin`, `cos`, `exp`, `log`, `e^x`) and differentiates
//! them exactly; anything it does not recognise goes through the central
//! difference.

use std::f64::consts::E;

use serde::{Deserialize, Serialize};

use super::ast::{BinaryOp, Function, Node, UnaryOp};
use super::error::EvaluationError;
use crate::errors::{SolveResult, SolverError};

/// Default central-difference step.
pub const DEFAULT_STEP: f64 = 1e-7;

/// How derivatives are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Differentiation {
    /// Central difference everywhere
    #[default]
    CentralDifference,
    /// Exact derivative for recognised patterns, central difference otherwise
    Shortcut,
}

/// Derivative settings passed to [`Expression::derivative_with`](super::Expression::derivative_with).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivativeOptions {
    #[serde(default)]
    pub method: Differentiation,
    /// Central-difference step `h`
    #[serde(default = "default_step")]
    pub step: f64,
}

fn default_step() -> f64 {
    DEFAULT_STEP
}

impl Default for DerivativeOptions {
    fn default() -> Self {
        DerivativeOptions {
            method: Differentiation::CentralDifference,
            step: DEFAULT_STEP,
        }
    }
}

impl DerivativeOptions {
    pub fn shortcut() -> Self {
        DerivativeOptions {
            method: Differentiation::Shortcut,
            ..Default::default()
        }
    }

    /// Validate the step size.
    pub fn validate(&self) -> SolveResult<()> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(SolverError::invalid_parameters(
                "derivative_step",
                self.step.to_string(),
                "Derivative step must be a positive finite number",
            ));
        }
        Ok(())
    }
}

/// `(f(x + h) - f(x - h)) / 2h`
pub fn central_difference(node: &Node, x: f64, h: f64) -> Result<f64, EvaluationError> {
    let forward = node.eval(x + h)?;
    let backward = node.eval(x - h)?;
    let slope = (forward - backward) / (2.0 * h);
    if slope.is_finite() {
        Ok(slope)
    } else {
        Err(EvaluationError::NonFinite { x })
    }
}

/// Build the exact derivative tree for a recognised pattern.
///
/// Returns `None` as soon as any part of the tree falls outside the table;
/// there is no chain rule.
pub fn shortcut(node: &Node) -> Option<Node> {
    match node {
        Node::Number(_) => Some(Node::Number(0.0)),
        Node::Variable => Some(Node::Number(1.0)),
        Node::Unary {
            op: UnaryOp::Neg,
            operand,
        } => Some(Node::unary(UnaryOp::Neg, shortcut(operand)?)),
        Node::Binary { op, lhs, rhs } => match (op, lhs.as_ref(), rhs.as_ref()) {
            (BinaryOp::Add | BinaryOp::Sub, a, b) => {
                Some(Node::binary(*op, shortcut(a)?, shortcut(b)?))
            }
            (BinaryOp::Mul, Node::Number(c), g) | (BinaryOp::Mul, g, Node::Number(c)) => {
                Some(Node::binary(BinaryOp::Mul, Node::Number(*c), shortcut(g)?))
            }
            (BinaryOp::Div, g, Node::Number(c)) => {
                Some(Node::binary(BinaryOp::Div, shortcut(g)?, Node::Number(*c)))
            }
            // d/dx x^n = n x^(n-1)
            (BinaryOp::Pow, Node::Variable, Node::Number(n)) => Some(Node::binary(
                BinaryOp::Mul,
                Node::Number(*n),
                Node::binary(BinaryOp::Pow, Node::Variable, Node::Number(n - 1.0)),
            )),
            // d/dx e^x = e^x
            (BinaryOp::Pow, Node::Number(base), Node::Variable) if *base == E => {
                Some(node.clone())
            }
            _ => None,
        },
        Node::Call { function, arg } => match (function, arg.as_ref()) {
            (Function::Sin, Node::Variable) => Some(Node::call(Function::Cos, Node::Variable)),
            (Function::Cos, Node::Variable) => Some(Node::unary(
                UnaryOp::Neg,
                Node::call(Function::Sin, Node::Variable),
            )),
            (Function::Exp, Node::Variable) => Some(node.clone()),
            (Function::Log, Node::Variable) => Some(Node::binary(
                BinaryOp::Div,
                Node::Number(1.0),
                Node::Variable,
            )),
            _ => None,
        },
    }
}
