use crate::error::{Error, Result};
use log::debug;
use meval::{Context, Expr};

/// Bridge to the `meval` expression engine.
///
/// Expressions must already be canonical (see [`crate::canonical`]). On top of
/// meval's builtins the context provides `log10`, a natural `log`, `pow` and
/// `factorial`. Infinite and NaN results are reported as errors, never as values.
#[derive(Debug, Default, Clone, Copy)]
pub struct Calculator;

impl Calculator {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, expression: &str) -> Result<f64> {
        self.run(expression, context())
    }

    /// Evaluate with one extra variable bound, e.g. `x` for graphing.
    pub fn evaluate_at(&self, expression: &str, var: &str, value: f64) -> Result<f64> {
        let mut ctx = context();
        ctx.var(var, value);
        self.run(expression, ctx)
    }

    fn run(&self, expression: &str, ctx: Context) -> Result<f64> {
        let expr = expression.trim();
        if expr.is_empty() {
            return Err(Error::MalformedExpression("nothing to evaluate".to_string()));
        }

        let parsed: Expr = expr.parse()?;
        let result = parsed.eval_with_context(ctx)?;
        debug!("Calculator: {:?} -> {:?}", expr, result);

        if !result.is_finite() {
            return Err(Error::NonFiniteResult(expr.to_string()));
        }
        Ok(result)
    }
}

fn context<'a>() -> Context<'a> {
    let mut ctx = Context::new();
    ctx.func("log10", f64::log10)
        .func("log", f64::ln)
        .func("factorial", factorial)
        .func2("pow", f64::powf);
    ctx
}

fn factorial(n: f64) -> f64 {
    if n < 0.0 || n.fract() != 0.0 {
        return f64::NAN;
    }
    if n > 170.0 {
        return f64::INFINITY;
    }
    (1..=n as u64).map(|k| k as f64).product()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &str) -> f64 {
        Calculator::new().evaluate(expr).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("2 + 3 * 4"), 14.0);
        assert_eq!(eval("(2 + 3) * 4"), 20.0);
        assert_eq!(eval("2 ^ 10"), 1024.0);
        assert_eq!(eval("7 % 3"), 1.0);
        assert_eq!(eval("-(2 ^ 2)"), -4.0);
    }

    #[test]
    fn test_functions_and_constants() {
        assert!(close(eval("log10(1000)"), 3.0));
        assert!(close(eval("log(e)"), 1.0));
        assert!(close(eval("ln(e)"), 1.0));
        assert!(close(eval("pow(10, 2)"), 100.0));
        assert!(close(eval("exp(0)"), 1.0));
        assert!(close(eval("sqrt(16)"), 4.0));
        assert!(close(eval("sin(pi / 2)"), 1.0));
        assert_eq!(eval("factorial(5)"), 120.0);
        assert_eq!(eval("factorial(0)"), 1.0);
    }

    #[test]
    fn test_variable() {
        let calc = Calculator::new();
        assert!(close(calc.evaluate_at("x ^ 2 + 1", "x", 3.0).unwrap(), 10.0));
        assert!(calc.evaluate("x + 1").is_err());
    }

    #[test]
    fn test_failures() {
        let calc = Calculator::new();
        assert!(matches!(calc.evaluate("5 / 0"), Err(Error::NonFiniteResult(_))));
        assert!(matches!(calc.evaluate("factorial(-1)"), Err(Error::NonFiniteResult(_))));
        assert!(matches!(calc.evaluate("asin(2)"), Err(Error::NonFiniteResult(_))));
        assert!(matches!(calc.evaluate("2 +"), Err(Error::MalformedExpression(_))));
        assert!(matches!(calc.evaluate("foo(1)"), Err(Error::MalformedExpression(_))));
        assert!(matches!(calc.evaluate(""), Err(Error::MalformedExpression(_))));
    }
}
