use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculatorMode {
    #[default]
    Standard,
    Scientific,
    Graphing,
    Financial,
    Conversion,
}

impl CalculatorMode {
    pub const ALL: [CalculatorMode; 5] = [
        CalculatorMode::Standard,
        CalculatorMode::Scientific,
        CalculatorMode::Graphing,
        CalculatorMode::Financial,
        CalculatorMode::Conversion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CalculatorMode::Standard => "standard",
            CalculatorMode::Scientific => "scientific",
            CalculatorMode::Graphing => "graphing",
            CalculatorMode::Financial => "financial",
            CalculatorMode::Conversion => "conversion",
        }
    }

    /// Modes driven by button presses on a keypad.
    pub fn has_keypad(self) -> bool {
        matches!(self, CalculatorMode::Standard | CalculatorMode::Scientific)
    }
}

impl fmt::Display for CalculatorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CalculatorMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalculatorMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidArgument(format!("unknown calculator mode '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    #[default]
    Deg,
    Rad,
}

impl AngleMode {
    pub fn toggled(self) -> Self {
        match self {
            AngleMode::Deg => AngleMode::Rad,
            AngleMode::Rad => AngleMode::Deg,
        }
    }
}

impl fmt::Display for AngleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AngleMode::Deg => write!(f, "DEG"),
            AngleMode::Rad => write!(f, "RAD"),
        }
    }
}

impl FromStr for AngleMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deg" | "degree" | "degrees" => Ok(AngleMode::Deg),
            "rad" | "radian" | "radians" => Ok(AngleMode::Rad),
            _ => Err(Error::InvalidArgument(format!("unknown angle mode '{}'", s))),
        }
    }
}
