//! Syntax tree and tree-walking interpreter.
//!
//! The interpreter is closed over a fixed grammar: the only variable is `x`,
//! the only callables are the variants of [`Function`]. Nothing in a tree can
//! reach host code.

use std::fmt;

use super::error::EvaluationError;

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
}

/// Binary operators, in the usual precedence groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
        }
    }
}

/// Built-in single-argument functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Sqrt,
    Log,
    Exp,
    Abs,
}

impl Function {
    pub const ALL: [Function; 13] = [
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Asin,
        Function::Acos,
        Function::Atan,
        Function::Sinh,
        Function::Cosh,
        Function::Tanh,
        Function::Sqrt,
        Function::Log,
        Function::Exp,
        Function::Abs,
    ];

    /// Look up a function by the name used in function text.
    ///
    /// `ln` is accepted as an alias of the natural logarithm `log`.
    pub fn from_name(name: &str) -> Option<Function> {
        let function = match name {
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "tan" => Function::Tan,
            "asin" => Function::Asin,
            "acos" => Function::Acos,
            "atan" => Function::Atan,
            "sinh" => Function::Sinh,
            "cosh" => Function::Cosh,
            "tanh" => Function::Tanh,
            "sqrt" => Function::Sqrt,
            "log" | "ln" => Function::Log,
            "exp" => Function::Exp,
            "abs" => Function::Abs,
            _ => return None,
        };
        Some(function)
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Sinh => "sinh",
            Function::Cosh => "cosh",
            Function::Tanh => "tanh",
            Function::Sqrt => "sqrt",
            Function::Log => "log",
            Function::Exp => "exp",
            Function::Abs => "abs",
        }
    }

    pub fn arity(self) -> usize {
        1
    }

    /// Apply the function, rejecting arguments outside its real domain.
    fn apply(self, arg: f64, x: f64) -> Result<f64, EvaluationError> {
        let in_domain = match self {
            Function::Sqrt => arg >= 0.0,
            Function::Log => arg > 0.0,
            Function::Asin | Function::Acos => (-1.0..=1.0).contains(&arg),
            _ => true,
        };
        if !in_domain {
            return Err(EvaluationError::Domain {
                function: self.name().to_string(),
                argument: arg,
                x,
            });
        }

        Ok(match self {
            Function::Sin => arg.sin(),
            Function::Cos => arg.cos(),
            Function::Tan => arg.tan(),
            Function::Asin => arg.asin(),
            Function::Acos => arg.acos(),
            Function::Atan => arg.atan(),
            Function::Sinh => arg.sinh(),
            Function::Cosh => arg.cosh(),
            Function::Tanh => arg.tanh(),
            Function::Sqrt => arg.sqrt(),
            Function::Log => arg.ln(),
            Function::Exp => arg.exp(),
            Function::Abs => arg.abs(),
        })
    }
}

/// A node of the expression tree.
///
/// The constants `pi` and `e` are folded into [`Node::Number`] by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Number(f64),
    Variable,
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    /// Every built-in takes one argument; the parser rejects other arities.
    Call {
        function: Function,
        arg: Box<Node>,
    },
}

impl Node {
    pub fn unary(op: UnaryOp, operand: Node) -> Node {
        Node::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, lhs: Node, rhs: Node) -> Node {
        Node::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn call(function: Function, arg: Node) -> Node {
        Node::Call {
            function,
            arg: Box::new(arg),
        }
    }

    /// Number of nodes on the longest path from this node to a leaf.
    pub fn depth(&self) -> usize {
        match self {
            Node::Number(_) | Node::Variable => 1,
            Node::Unary { operand, .. } => 1 + operand.depth(),
            Node::Binary { lhs, rhs, .. } => 1 + lhs.depth().max(rhs.depth()),
            Node::Call { arg, .. } => 1 + arg.depth(),
        }
    }

    /// Evaluate the tree with `x` bound to the given value.
    ///
    /// Every intermediate value must be finite; the first NaN or infinity
    /// ends evaluation with [`EvaluationError::NonFinite`].
    pub fn eval(&self, x: f64) -> Result<f64, EvaluationError> {
        let value = match self {
            Node::Number(n) => *n,
            Node::Variable => x,
            Node::Unary {
                op: UnaryOp::Neg,
                operand,
            } => -operand.eval(x)?,
            Node::Binary { op, lhs, rhs } => {
                let a = lhs.eval(x)?;
                let b = rhs.eval(x)?;
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => {
                        if b == 0.0 {
                            return Err(EvaluationError::DivisionByZero { x });
                        }
                        a / b
                    }
                    BinaryOp::Pow => power(a, b, x)?,
                }
            }
            Node::Call { function, arg } => function.apply(arg.eval(x)?, x)?,
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvaluationError::NonFinite { x })
        }
    }

    /// Does the tree reference `x` anywhere?
    pub fn depends_on_x(&self) -> bool {
        match self {
            Node::Number(_) => false,
            Node::Variable => true,
            Node::Unary { operand, .. } => operand.depends_on_x(),
            Node::Binary { lhs, rhs, .. } => lhs.depends_on_x() || rhs.depends_on_x(),
            Node::Call { arg, .. } => arg.depends_on_x(),
        }
    }
}

/// `base ^ exponent`, using exact repeated multiplication for small integer
/// exponents so results do not depend on the platform `pow` implementation.
fn power(base: f64, exponent: f64, x: f64) -> Result<f64, EvaluationError> {
    if exponent.fract() == 0.0 && exponent.abs() <= i32::MAX as f64 {
        if base == 0.0 && exponent < 0.0 {
            return Err(EvaluationError::DivisionByZero { x });
        }
        return Ok(base.powi(exponent as i32));
    }
    if base < 0.0 {
        return Err(EvaluationError::Domain {
            function: "^".to_string(),
            argument: base,
            x,
        });
    }
    Ok(base.powf(exponent))
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Number(n) => write!(f, "{n}"),
            Node::Variable => f.write_str("x"),
            Node::Unary { operand, .. } => write!(f, "-({operand})"),
            Node::Binary { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.symbol()),
            Node::Call { function, arg } => write!(f, "{}({arg})", function.name()),
        }
    }
}
