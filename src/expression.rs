//! Parsed single-variable expressions and their point-wise evaluation.
//!
//! Parsing and operator evaluation are done by `evalexpr`. This module binds
//! `x`, supplies the function and constant tables and turns undefined values
//! into evaluation errors.

use crate::builtins;
use crate::error::{IntegrationError, Result};
use crate::integrand::Integrand;
use evalexpr::{build_operator_tree, Context, EvalexprError, EvalexprResult, Node, Operator, Value};
use std::fmt;
use std::str::FromStr;

/// Name of the free variable.
pub const VARIABLE: &str = "x";

/// Rewrite `**` as `^`, drop unary `+` and spell every numeric literal as a
/// float, so `1/2` is 0.5 and not integer division.
fn normalize(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '*' && chars.get(i + 1) == Some(&'*') {
            out.push('^');
            i += 2;
        } else if c == '+' && operand_expected(&out) {
            i += 1;
        } else if c.is_alphabetic() || c == '_' {
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                out.push(chars[i]);
                i += 1;
            }
        } else if c.is_ascii_digit() || c == '.' {
            let end = literal_end(&chars, i);
            let literal: String = chars[i..end].iter().collect();
            match literal.parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    let text = value.to_string();
                    out.push_str(&text);
                    if !text.contains('.') {
                        out.push_str(".0");
                    }
                }
                _ => out.push_str(&literal),
            }
            i = end;
        } else {
            out.push(c);
            i += 1;
        }
    }
    out
}

fn operand_expected(out: &str) -> bool {
    match out.trim_end().chars().last() {
        None => true,
        Some(c) => "(^*/+-,".contains(c),
    }
}

/// End of the numeric literal starting at `start`, exponent included.
fn literal_end(chars: &[char], start: usize) -> usize {
    let mut end = start;
    while end < chars.len() && (chars[end].is_ascii_digit() || chars[end] == '.') {
        end += 1;
    }
    if end < chars.len() && (chars[end] == 'e' || chars[end] == 'E') {
        let mut exp = end + 1;
        if exp < chars.len() && (chars[exp] == '+' || chars[exp] == '-') {
            exp += 1;
        }
        if exp < chars.len() && chars[exp].is_ascii_digit() {
            while exp < chars.len() && chars[exp].is_ascii_digit() {
                exp += 1;
            }
            end = exp;
        }
    }
    end
}

/// Evaluation context binding `x` to a single sample point.
struct Point {
    x: Value,
}

impl Context for Point {
    fn get_value(&self, identifier: &str) -> Option<&Value> {
        if identifier == VARIABLE {
            Some(&self.x)
        } else {
            builtins::constant(identifier)
        }
    }

    fn call_function(&self, identifier: &str, argument: &Value) -> EvalexprResult<Value> {
        let function = builtins::function(identifier)
            .ok_or_else(|| EvalexprError::FunctionIdentifierNotFound(identifier.to_string()))?;
        let arg = argument.as_number()?;
        function
            .call(arg)
            .map(Value::Float)
            .map_err(EvalexprError::CustomMessage)
    }

    fn are_builtin_functions_disabled(&self) -> bool {
        true
    }

    fn set_builtin_functions_disabled(&mut self, disabled: bool) -> EvalexprResult<()> {
        if disabled {
            Ok(())
        } else {
            Err(EvalexprError::CustomMessage(
                "builtin functions cannot be enabled".to_string(),
            ))
        }
    }
}

/// Check that the tree only uses arithmetic, `x`, known constants and known
/// functions. Returns whether `x` occurs.
fn check_tree(source: &str, root: &Node) -> Result<bool> {
    let mut depends_on_x = false;
    for node in root.iter() {
        match node.operator() {
            Operator::RootNode => {
                if node.children().is_empty() {
                    return Err(IntegrationError::parse(format!(
                        "'{}': empty parentheses",
                        source
                    )));
                }
            }
            Operator::Add
            | Operator::Sub
            | Operator::Neg
            | Operator::Mul
            | Operator::Div
            | Operator::Exp => {}
            Operator::Const {
                value: Value::Float(_),
            }
            | Operator::Const {
                value: Value::Int(_),
            } => {}
            Operator::VariableIdentifierRead { identifier } => {
                if identifier == VARIABLE {
                    depends_on_x = true;
                } else if builtins::constant(identifier).is_none() {
                    return Err(IntegrationError::parse(format!(
                        "'{}': unknown symbol '{}'",
                        source, identifier
                    )));
                }
            }
            Operator::FunctionIdentifier { identifier } => {
                if builtins::function(identifier).is_none() {
                    return Err(IntegrationError::parse(format!(
                        "'{}': unknown function '{}'",
                        source, identifier
                    )));
                }
            }
            other => {
                return Err(IntegrationError::parse(format!(
                    "'{}': unsupported operator {:?}",
                    source, other
                )))
            }
        }
    }
    Ok(depends_on_x)
}

/// An immutable real function of `x`, parsed once from text.
///
/// # Examples
///
/// ```
/// use trapz_romberg::expression::Expression;
///
/// let form = Expression::parse("x**2 + 1").unwrap();
/// assert_eq!(form.evaluate(2.0).unwrap(), 5.0);
/// ```
#[derive(Clone, Debug)]
pub struct Expression {
    source: String,
    root: Node,
    depends_on_x: bool,
}

impl Expression {
    /// Parse `text` as a function of the single free variable `x`.
    pub fn parse(text: &str) -> Result<Expression> {
        let source = text.trim();
        if source.is_empty() {
            return Err(IntegrationError::parse("empty expression"));
        }
        let root = build_operator_tree(&normalize(source))
            .map_err(|err| IntegrationError::parse(format!("'{}': {}", source, err)))?;
        let depends_on_x = check_tree(source, &root)?;
        Ok(Expression {
            source: source.to_string(),
            root,
            depends_on_x,
        })
    }

    /// Parse and evaluate an expression that must not reference `x`,
    /// e.g. an integration bound such as `pi/2`.
    pub fn parse_constant(text: &str) -> Result<f64> {
        let expression = Expression::parse(text)?;
        if expression.depends_on_x {
            return Err(IntegrationError::parse(format!(
                "'{}' must not depend on '{}'",
                expression.source, VARIABLE
            )));
        }
        expression.evaluate(0.0)
    }

    /// Text the expression was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the expression depends on `x` at all.
    pub fn is_constant(&self) -> bool {
        !self.depends_on_x
    }

    pub fn evaluate(&self, x: f64) -> Result<f64> {
        let point = Point { x: Value::Float(x) };
        let value = self
            .root
            .eval_number_with_context(&point)
            .map_err(|err| match err {
                EvalexprError::CustomMessage(reason) => IntegrationError::evaluation(x, reason),
                other => IntegrationError::evaluation(x, other.to_string()),
            })?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(IntegrationError::evaluation(
                x,
                format!("{} is not a finite real number", value),
            ))
        }
    }

    /// Evaluate at every point of `xs`, keeping the order of the input.
    pub fn evaluate_range<'a, I>(&self, xs: I) -> Result<Vec<f64>>
    where
        I: IntoIterator<Item = &'a f64>,
    {
        xs.into_iter().map(|x| self.evaluate(*x)).collect()
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl FromStr for Expression {
    type Err = IntegrationError;

    fn from_str(s: &str) -> Result<Self> {
        Expression::parse(s)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl Integrand<f64> for Expression {
    fn eval(&self, x: f64) -> Result<f64> {
        self.evaluate(x)
    }
}

/// Value of `form` at `x`.
pub fn evaluate(form: &Expression, x: f64) -> Result<f64> {
    form.evaluate(x)
}

/// Values of `form` at each of `xs`, in the same order.
pub fn evaluate_range(form: &Expression, xs: &[f64]) -> Result<Vec<f64>> {
    form.evaluate_range(xs)
}
