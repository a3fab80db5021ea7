//! Rewrites keypad notation into the syntax the evaluator accepts.
//!
//! The raw text is tokenized and parsed into a small tree, then emitted
//! again with canonical names:
//! * constants: `π` becomes `pi`, a bare `e` stays Euler's constant
//! * functions: `log` is base 10 (`log10`), `ln` is natural, `sin⁻¹` and
//!   friends become `asin`/`acos`/`atan`, `√` becomes `sqrt`
//! * `10^(x)` becomes `pow(10, x)` and `e^(x)` becomes `exp(x)`
//! * postfix `n!` becomes `factorial(n)`
//! * `×`, `÷`, `−` and `mod` map to `*`, `/`, `-` and `%`
//! * adjacent factors such as `2π` or `3(4)` multiply
//!
//! In degree mode every forward trig call gets its argument scaled by
//! `pi / 180` and every inverse trig call gets its result scaled by
//! `180 / pi`. The conversion is attached to the call node itself, so
//! nested calls are each converted exactly once.

use crate::error::{Error, Result};
use crate::mode::AngleMode;
use log::debug;

/// Deepest nesting of groups, calls and prefix operators the parser accepts.
const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(String),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Bang,
    LParen,
    RParen,
    Comma,
}

impl Token {
    fn starts_operand(&self) -> bool {
        matches!(self, Token::Number(_) | Token::Ident(_) | Token::LParen)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl BinOp {
    fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Pow => "^",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Number(String),
    Name(String),
    Call { name: String, args: Vec<Node> },
    Group(Box<Node>),
    Neg(Box<Node>),
    Factorial(Box<Node>),
    Binary { op: BinOp, lhs: Box<Node>, rhs: Box<Node> },
}

/// Rewrite `raw` into evaluator syntax for the given angle mode.
pub fn canonicalize(raw: &str, angle: AngleMode) -> Result<String> {
    let tokens = tokenize(raw)?;
    if tokens.is_empty() {
        return Err(Error::MalformedExpression("empty expression".to_string()));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let tree = parser.parse_expr()?;
    if let Some(token) = parser.peek() {
        return Err(Error::MalformedExpression(format!(
            "unexpected {:?} in '{}'",
            token, raw
        )));
    }

    let canonical = emit(&tree, angle);
    debug!("Canonicalized {:?} ({}) -> {:?}", raw, angle, canonical);
    Ok(canonical)
}

fn tokenize(raw: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = raw.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                i = exponent_end(&chars, i);
                let text: String = chars[start..i].iter().collect();
                if text.matches('.').count() > 1 || text == "." {
                    return Err(Error::MalformedExpression(format!("bad number '{}'", text)));
                }
                tokens.push(Token::Number(text));
            }
            'π' | '√' => {
                tokens.push(Token::Ident(c.to_string()));
                i += 1;
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_ascii_alphanumeric() || chars[i] == '_')
                {
                    i += 1;
                }
                let mut name: String = chars[start..i].iter().collect();
                if chars.get(i) == Some(&'⁻') && chars.get(i + 1) == Some(&'¹') {
                    name.push_str("⁻¹");
                    i += 2;
                }
                if name == "mod" {
                    tokens.push(Token::Percent);
                } else {
                    tokens.push(Token::Ident(name));
                }
            }
            _ => {
                let token = match c {
                    '+' => Token::Plus,
                    '-' | '−' => Token::Minus,
                    '*' | '×' => Token::Star,
                    '/' | '÷' => Token::Slash,
                    '%' => Token::Percent,
                    '^' => Token::Caret,
                    '!' => Token::Bang,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    ',' => Token::Comma,
                    _ => {
                        return Err(Error::MalformedExpression(format!(
                            "unexpected character '{}'",
                            c
                        )))
                    }
                };
                tokens.push(token);
                i += 1;
            }
        }
    }

    Ok(tokens)
}

/// Extend a number literal over `e10`, `E-3` and similar suffixes.
/// A lone `e` is left alone so it can be read as the constant.
fn exponent_end(chars: &[char], i: usize) -> usize {
    if !matches!(chars.get(i), Some('e') | Some('E')) {
        return i;
    }
    let mut j = i + 1;
    if matches!(chars.get(j), Some('+') | Some('-')) {
        j += 1;
    }
    if !chars.get(j).is_some_and(|c| c.is_ascii_digit()) {
        return i;
    }
    while chars.get(j).is_some_and(|c| c.is_ascii_digit()) {
        j += 1;
    }
    j
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(Error::MalformedExpression(format!(
                "expected {:?}, found {:?}",
                expected, token
            ))),
            None => Err(Error::MalformedExpression(format!(
                "expected {:?} before end of input",
                expected
            ))),
        }
    }

    fn parse_expr(&mut self) -> Result<Node> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_term()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_term(&mut self) -> Result<Node> {
        let mut lhs = self.parse_unary()?;
        loop {
            let rhs = match self.peek() {
                Some(Token::Star) | Some(Token::Slash) | Some(Token::Percent) => {
                    let op = match self.next() {
                        Some(Token::Star) => BinOp::Mul,
                        Some(Token::Slash) => BinOp::Div,
                        _ => BinOp::Rem,
                    };
                    let rhs = self.parse_unary()?;
                    lhs = binary(op, lhs, rhs);
                    continue;
                }
                Some(token) if token.starts_operand() => {
                    let previous = &self.tokens[self.pos - 1];
                    if matches!(previous, Token::Number(_)) && matches!(token, Token::Number(_)) {
                        return Err(Error::MalformedExpression(
                            "missing operator between numbers".to_string(),
                        ));
                    }
                    self.parse_power()?
                }
                _ => return Ok(lhs),
            };
            lhs = binary(BinOp::Mul, lhs, rhs);
        }
    }

    /// Every recursive path of the grammar passes through here, so this is
    /// where nesting is bounded.
    fn parse_unary(&mut self) -> Result<Node> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::MalformedExpression(format!(
                "expression nested deeper than {} levels",
                MAX_DEPTH
            )));
        }
        let node = match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                self.parse_unary().map(|inner| Node::Neg(Box::new(inner)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.parse_unary()
            }
            _ => self.parse_power(),
        };
        self.depth -= 1;
        node
    }

    fn parse_power(&mut self) -> Result<Node> {
        let base = self.parse_postfix()?;
        if self.peek() == Some(&Token::Caret) {
            self.pos += 1;
            let exponent = self.parse_unary()?;
            return Ok(binary(BinOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn parse_postfix(&mut self) -> Result<Node> {
        let mut node = self.parse_primary()?;
        while self.peek() == Some(&Token::Bang) {
            self.pos += 1;
            node = Node::Factorial(Box::new(node));
        }
        Ok(node)
    }

    fn parse_primary(&mut self) -> Result<Node> {
        match self.next() {
            Some(Token::Number(text)) => Ok(Node::Number(text)),
            Some(Token::Ident(name)) => {
                if self.peek() != Some(&Token::LParen) {
                    return Ok(Node::Name(name));
                }
                self.pos += 1;
                let mut args = Vec::new();
                if self.peek() == Some(&Token::RParen) {
                    self.pos += 1;
                    return Ok(Node::Call { name, args });
                }
                loop {
                    args.push(self.parse_expr()?);
                    match self.next() {
                        Some(Token::Comma) => continue,
                        Some(Token::RParen) => break,
                        other => {
                            return Err(Error::MalformedExpression(format!(
                                "unclosed call to '{}' (found {:?})",
                                name, other
                            )))
                        }
                    }
                }
                Ok(Node::Call { name, args })
            }
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Ok(Node::Group(Box::new(inner)))
            }
            Some(token) => Err(Error::MalformedExpression(format!(
                "unexpected {:?}",
                token
            ))),
            None => Err(Error::MalformedExpression(
                "unexpected end of expression".to_string(),
            )),
        }
    }
}

fn binary(op: BinOp, lhs: Node, rhs: Node) -> Node {
    Node::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn canonical_function(name: &str) -> &str {
    match name {
        "log" => "log10",
        "sin⁻¹" => "asin",
        "cos⁻¹" => "acos",
        "tan⁻¹" => "atan",
        "√" => "sqrt",
        other => other,
    }
}

fn canonical_constant(name: &str) -> &str {
    match name {
        "π" | "PI" => "pi",
        "E" => "e",
        other => other,
    }
}

/// `10^(x)` and `e^(x)` are emitted as calls.
fn is_power_call(lhs: &Node, rhs: &Node) -> bool {
    matches!(rhs, Node::Group(_))
        && match lhs {
            Node::Number(n) => n == "10",
            Node::Name(n) => canonical_constant(n) == "e",
            _ => false,
        }
}

fn precedence(node: &Node) -> u8 {
    match node {
        Node::Binary { op, lhs, rhs } => match op {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div | BinOp::Rem => 2,
            BinOp::Pow if is_power_call(lhs, rhs) => 5,
            BinOp::Pow => 4,
        },
        Node::Neg(_) => 3,
        _ => 5,
    }
}

fn emit(node: &Node, angle: AngleMode) -> String {
    Emitter { angle }.node(node)
}

struct Emitter {
    angle: AngleMode,
}

impl Emitter {
    fn node(&self, node: &Node) -> String {
        match node {
            Node::Number(text) => normalize_number(text),
            Node::Name(name) => canonical_constant(name).to_string(),
            Node::Group(inner) => format!("({})", self.node(inner)),
            Node::Neg(inner) => format!("-{}", self.operand(inner, 5)),
            Node::Factorial(inner) => match inner.as_ref() {
                Node::Group(body) => format!("factorial({})", self.node(body)),
                other => format!("factorial({})", self.node(other)),
            },
            Node::Call { name, args } => self.call(name, args),
            Node::Binary { op, lhs, rhs } => self.binary(*op, lhs, rhs),
        }
    }

    fn call(&self, name: &str, args: &[Node]) -> String {
        let name = canonical_function(name);
        let args = args
            .iter()
            .map(|arg| self.node(arg))
            .collect::<Vec<_>>()
            .join(", ");

        if self.angle == AngleMode::Deg {
            match name {
                "sin" | "cos" | "tan" => return format!("{}(({}) * pi / 180)", name, args),
                "asin" | "acos" | "atan" => return format!("({}({}) * 180 / pi)", name, args),
                _ => {}
            }
        }
        format!("{}({})", name, args)
    }

    fn binary(&self, op: BinOp, lhs: &Node, rhs: &Node) -> String {
        if op == BinOp::Pow {
            if let Some((name, args)) = self.power_call(lhs, rhs) {
                return format!("{}({})", name, args);
            }
        }

        let (lhs_min, rhs_min) = match op {
            BinOp::Add | BinOp::Sub => (1, 2),
            BinOp::Mul | BinOp::Div | BinOp::Rem => (2, 4),
            BinOp::Pow => (5, 5),
        };
        format!(
            "{} {} {}",
            self.operand(lhs, lhs_min),
            op.symbol(),
            self.right_operand(rhs, rhs_min)
        )
    }

    fn power_call(&self, lhs: &Node, rhs: &Node) -> Option<(&'static str, String)> {
        if !is_power_call(lhs, rhs) {
            return None;
        }
        let Node::Group(inner) = rhs else {
            return None;
        };
        match lhs {
            Node::Number(_) => Some(("pow", format!("10, {}", self.node(inner)))),
            _ => Some(("exp", self.node(inner))),
        }
    }

    fn operand(&self, node: &Node, min: u8) -> String {
        if precedence(node) < min {
            format!("({})", self.node(node))
        } else {
            self.node(node)
        }
    }

    fn right_operand(&self, node: &Node, min: u8) -> String {
        if matches!(node, Node::Neg(_)) {
            format!("({})", self.node(node))
        } else {
            self.operand(node, min)
        }
    }
}

fn normalize_number(text: &str) -> String {
    let text = text.replace('E', "e");
    let text = match text.strip_prefix('.') {
        Some(rest) => format!("0.{}", rest),
        None => text,
    };
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            format!("{}e{}", mantissa.trim_end_matches('.'), exponent)
        }
        None => text.trim_end_matches('.').to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rad(raw: &str) -> String {
        canonicalize(raw, AngleMode::Rad).unwrap()
    }

    fn deg(raw: &str) -> String {
        canonicalize(raw, AngleMode::Deg).unwrap()
    }

    #[test]
    fn test_constants() {
        assert_eq!(rad("π"), "pi");
        assert_eq!(rad("2π"), "2 * pi");
        assert_eq!(rad("e + 1"), "e + 1");
        assert_eq!(rad("2e"), "2 * e");
        assert_eq!(rad("1.5e10 + 1"), "1.5e10 + 1");
    }

    #[test]
    fn test_function_names() {
        assert_eq!(rad("log(100)"), "log10(100)");
        assert_eq!(rad("ln(e)"), "ln(e)");
        assert_eq!(rad("sin⁻¹(0.5)"), "asin(0.5)");
        assert_eq!(rad("cos⁻¹(1) + tan⁻¹(1)"), "acos(1) + atan(1)");
        assert_eq!(rad("10^(2)"), "pow(10, 2)");
        assert_eq!(rad("e^(1)"), "exp(1)");
        assert_eq!(rad("√(9)"), "sqrt(9)");
    }

    #[test]
    fn test_factorial() {
        assert_eq!(rad("5!"), "factorial(5)");
        assert_eq!(rad("(2 + 1)!"), "factorial(2 + 1)");
        assert_eq!(rad("3! + 4!"), "factorial(3) + factorial(4)");
    }

    #[test]
    fn test_operators() {
        assert_eq!(rad("3 × 4 ÷ 2 − 1"), "3 * 4 / 2 - 1");
        assert_eq!(rad("7 mod 3"), "7 % 3");
        assert_eq!(rad("12+3"), "12 + 3");
        assert_eq!(rad("2 * -3"), "2 * (-3)");
        assert_eq!(rad("-2^2"), "-(2 ^ 2)");
        assert_eq!(rad("2^-1"), "2 ^ (-1)");
        assert_eq!(rad("0. + .5"), "0 + 0.5");
    }

    #[test]
    fn test_degree_mode() {
        assert_eq!(deg("sin(90)"), "sin((90) * pi / 180)");
        assert_eq!(deg("sin⁻¹(0.5)"), "(asin(0.5) * 180 / pi)");
        assert_eq!(deg("cos(60) + 1"), "cos((60) * pi / 180) + 1");
    }

    #[test]
    fn test_degree_mode_nested_calls_convert_once() {
        assert_eq!(
            deg("sin(cos⁻¹(0))"),
            "sin(((acos(0) * 180 / pi)) * pi / 180)"
        );
        assert_eq!(
            deg("asin(sin(30))"),
            "(asin(sin((30) * pi / 180)) * 180 / pi)"
        );
    }

    #[test]
    fn test_radian_mode_leaves_trig_alone() {
        assert_eq!(rad("sin(90)"), "sin(90)");
        assert_eq!(rad("sin⁻¹(1)"), "asin(1)");
    }

    #[test]
    fn test_idempotent_on_canonical_input() {
        for canonical in [
            "2 + 3 * 4",
            "sqrt(16) + log10(100)",
            "pow(10, 2) - exp(1)",
            "factorial(5) / (2 - 1)",
            "2 * (-3)",
            "sin(pi / 2)",
            "7 % 3",
        ] {
            assert_eq!(rad(canonical), canonical);
        }
        for raw in ["2π + 5!", "log(1000) × 3", "-2^2 + sin⁻¹(1)", "10^(3)"] {
            let once = rad(raw);
            assert_eq!(rad(&once), once);
        }
    }

    #[test]
    fn test_malformed() {
        for raw in [
            "", "   ", "(2 + 3", "2 +", "2 3", "2 + )", "1..2", "3 # 4", "sin(1", "2 + é",
            "sin(θ)", "µ",
        ] {
            assert!(
                matches!(
                    canonicalize(raw, AngleMode::Rad),
                    Err(Error::MalformedExpression(_))
                ),
                "expected failure for {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000));
        assert!(matches!(
            canonicalize(&deep, AngleMode::Rad),
            Err(Error::MalformedExpression(_))
        ));

        let calls = format!("{}1{}", "sin(".repeat(5_000), ")".repeat(5_000));
        assert!(canonicalize(&calls, AngleMode::Deg).is_err());

        let signs = format!("{}1", "-".repeat(20_000));
        assert!(canonicalize(&signs, AngleMode::Rad).is_err());

        let shallow = format!("{}1{}", "(".repeat(20), ")".repeat(20));
        assert!(canonicalize(&shallow, AngleMode::Rad).is_ok());
    }
}
