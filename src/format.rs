//! Number formatting for the display and for history results.

use crate::error::ERROR_DISPLAY;

pub const DEFAULT_PRECISION: usize = 8;
pub const DEFAULT_SEPARATOR: char = ',';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    /// Fractional digits kept for non-integers before trailing zeros are trimmed.
    pub precision: usize,
    pub separator: Option<char>,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            separator: Some(DEFAULT_SEPARATOR),
        }
    }
}

impl NumberFormat {
    pub fn new(precision: usize, separator: Option<char>) -> Self {
        Self {
            precision,
            separator,
        }
    }

    /// Same rounding, no digit grouping.
    pub fn plain(precision: usize) -> Self {
        Self::new(precision, None)
    }

    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return ERROR_DISPLAY.to_string();
        }
        // -0 prints as "-0"
        let value = if value == 0.0 { 0.0 } else { value };

        let raw = if value.fract() == 0.0 {
            format!("{:.0}", value)
        } else {
            trim_fraction(&format!("{:.*}", self.precision, value))
        };
        let raw = if raw == "-0" { "0".to_string() } else { raw };

        match self.separator {
            Some(sep) => group_digits(&raw, sep),
            None => raw,
        }
    }

    /// Parse display text back into a number, ignoring group separators.
    pub fn parse(&self, text: &str) -> Option<f64> {
        let cleaned = self.strip(text);
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return None;
        }
        cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Remove group separators so the text can be spliced into an expression.
    pub fn strip(&self, text: &str) -> String {
        match self.separator {
            Some(sep) => text.chars().filter(|&c| c != sep).collect(),
            None => text.to_string(),
        }
    }
}

/// Format with the default precision and separator.
pub fn format_number(value: f64) -> String {
    NumberFormat::default().format(value)
}

/// Parse display text produced by [`format_number`].
pub fn parse_numeric(text: &str) -> Option<f64> {
    NumberFormat::default().parse(text)
}

fn trim_fraction(text: &str) -> String {
    if !text.contains('.') {
        return text.to_string();
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn group_digits(text: &str, sep: char) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(sep);
        }
        grouped.push(digit);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(1234.0), "1,234");
        assert_eq!(format_number(-1234567.0), "-1,234,567");
        assert_eq!(format_number(100000.0), "100,000");
    }

    #[test]
    fn test_fractions() {
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(1.0 / 3.0), "0.33333333");
        assert_eq!(format_number(1234.5), "1,234.5");
        assert_eq!(format_number(-0.5), "-0.5");
        assert_eq!(format_number(2.999999999999), "3");
        assert_eq!(format_number(-0.000000001), "0");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(format_number(f64::INFINITY), "Error");
        assert_eq!(format_number(f64::NAN), "Error");
    }

    #[test]
    fn test_plain_and_precision() {
        let plain = NumberFormat::plain(4);
        assert_eq!(plain.format(1234.56789), "1234.5679");
        assert_eq!(plain.format(1609.34), "1609.34");
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse_numeric("1,234.5"), Some(1234.5));
        assert_eq!(parse_numeric("0."), Some(0.0));
        assert_eq!(parse_numeric("-8"), Some(-8.0));
        assert_eq!(parse_numeric("Error"), None);
        assert_eq!(parse_numeric("sin(30)"), None);
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("inf"), None);
    }

    #[test]
    fn test_format_is_stable_under_reparse() {
        for x in [0.0, 7.0, -12.75, 1.0 / 3.0, 123456789.125, 1e-9, 98765.4321, -1e15] {
            let once = format_number(x);
            let again = format_number(parse_numeric(&once).unwrap());
            assert_eq!(once, again, "unstable for {}", x);
        }
    }
}
