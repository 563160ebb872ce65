//! Arithmetic functions: `Fn::Add`, `Fn::Avg`, `Fn::Max`, `Fn::Min` and
//! `Fn::Calculate`.
//!
//! Folding happens in `f64`; results are normalized back to an integer when
//! they have no fractional part. A result that overflows to infinity or is
//! NaN is a hard error.

use super::{FunctionCategory, FunctionContext, FunctionRegistry};
use crate::core::{ResolverError, Result, Value};
use crate::parser::{self, ParseError};
use crate::register_function;

/// Numeric folding helpers shared by the list arithmetic functions
pub struct ArithmeticOperations;

impl ArithmeticOperations {
    /// Resolve every element of the argument list as a number.
    ///
    /// `None` when any element is still a function-call node.
    pub fn numbers(context: &FunctionContext, min_len: usize) -> Result<Option<Vec<f64>>> {
        let args = context.at_least_arguments(min_len)?;
        let Some(values) = context.resolve_each(args)? else {
            return Ok(None);
        };
        values
            .iter()
            .map(|value| {
                value
                    .as_f64()
                    .ok_or_else(|| context.invalid_type("element", "a number", value))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// Apply `fold` to the resolved numbers, or return the call unresolved
    pub fn fold(
        context: &FunctionContext,
        min_len: usize,
        fold: impl FnOnce(&[f64]) -> f64,
    ) -> Result<Value> {
        match Self::numbers(context, min_len)? {
            Some(numbers) => Self::finite(context, fold(&numbers)),
            None => Ok(context.unresolved()),
        }
    }

    /// Wrap a computed number, rejecting infinities and NaN
    pub fn finite(context: &FunctionContext, result: f64) -> Result<Value> {
        if result.is_finite() {
            Ok(Value::number(result))
        } else {
            Err(ResolverError::NonFiniteResult {
                function: context.key.to_string(),
                value: result,
            })
        }
    }
}

impl FunctionRegistry {
    pub fn register_math_functions(&self) -> Result<()> {
        self.register_add_function()?;
        self.register_avg_function()?;
        self.register_max_function()?;
        self.register_min_function()?;
        self.register_calculate_function()?;
        Ok(())
    }

    fn register_add_function(&self) -> Result<()> {
        register_function!(
            self,
            "Add",
            category: FunctionCategory::Math,
            description: "Sums a list of at least two numbers",
            parameters: ["values": Some("list<number>") => "Numbers to add"],
            return_type: "number",
            examples: ["{\"Fn::Add\": [1, 2, 3]}", "{\"Fn::Add\": [{\"Ref\": \"Count\"}, 1]}"],
            implementation: add
        )
    }

    fn register_avg_function(&self) -> Result<()> {
        register_function!(
            self,
            "Avg",
            category: FunctionCategory::Math,
            description: "Arithmetic mean of a non-empty list of numbers",
            parameters: ["values": Some("list<number>") => "Numbers to average"],
            return_type: "number",
            examples: ["{\"Fn::Avg\": [1, 2, 6]}"],
            implementation: avg
        )
    }

    fn register_max_function(&self) -> Result<()> {
        register_function!(
            self,
            "Max",
            category: FunctionCategory::Math,
            description: "Largest element of a non-empty list of numbers",
            parameters: ["values": Some("list<number>") => "Numbers to compare"],
            return_type: "number",
            examples: ["{\"Fn::Max\": [1, 7, 3]}"],
            implementation: max
        )
    }

    fn register_min_function(&self) -> Result<()> {
        register_function!(
            self,
            "Min",
            category: FunctionCategory::Math,
            description: "Smallest element of a non-empty list of numbers",
            parameters: ["values": Some("list<number>") => "Numbers to compare"],
            return_type: "number",
            examples: ["{\"Fn::Min\": [4, 2.5, 9]}"],
            implementation: min
        )
    }

    fn register_calculate_function(&self) -> Result<()> {
        register_function!(
            self,
            "Calculate",
            category: FunctionCategory::Math,
            description: "Evaluates an infix arithmetic expression supporting + - * / // % ** and parentheses. Expressions that are not purely numeric are left unresolved.",
            parameters: ["expression": Some("string") => "Arithmetic expression"],
            return_type: "number",
            examples: ["{\"Fn::Calculate\": \"(10 + 5) * 2 ** 2\"}", "{\"Fn::Calculate\": \"7 // 2\"}"],
            implementation: calculate
        )
    }
}

fn add(context: &FunctionContext) -> Result<Value> {
    ArithmeticOperations::fold(context, 2, |numbers| numbers.iter().sum())
}

fn avg(context: &FunctionContext) -> Result<Value> {
    ArithmeticOperations::fold(context, 1, |numbers| {
        numbers.iter().sum::<f64>() / numbers.len() as f64
    })
}

fn max(context: &FunctionContext) -> Result<Value> {
    ArithmeticOperations::fold(context, 1, |numbers| {
        numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

fn min(context: &FunctionContext) -> Result<Value> {
    ArithmeticOperations::fold(context, 1, |numbers| {
        numbers.iter().copied().fold(f64::INFINITY, f64::min)
    })
}

fn calculate(context: &FunctionContext) -> Result<Value> {
    let expression = context.resolve(context.arguments)?;
    if context.is_function(&expression) {
        return Ok(context.unresolved());
    }
    let Some(text) = expression.as_str() else {
        return Err(context.invalid_type("expression", "a string", &expression));
    };

    match parser::evaluate(text) {
        Ok(result) => ArithmeticOperations::finite(context, result),
        Err(ParseError::DivisionByZero) => Err(ResolverError::DivisionByZero),
        Err(ParseError::ModuloByZero) => Err(ResolverError::ModuloByZero),
        Err(err) => {
            log::trace!("{}: leaving {text:?} unresolved: {err}", context.key);
            Ok(context.unresolved())
        }
    }
}
