//! Unit conversion mode.
//!
//! Linear categories convert through a base unit (`value * from.factor / to.factor`).
//! Temperature is piecewise through Celsius.

use crate::error::{Error, Result};
use crate::format::NumberFormat;
use log::debug;

const LINEAR_PRECISION: usize = 8;
const TEMPERATURE_PRECISION: usize = 4;
const QUICK_PRECISION: usize = 2;

/// Values offered as one-click conversions.
pub const QUICK_VALUES: [f64; 4] = [1.0, 10.0, 100.0, 1000.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    pub name: &'static str,
    pub symbol: &'static str,
    /// Size of one unit in the category's base unit. Unused for temperature.
    pub factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Category {
    pub name: &'static str,
    pub units: &'static [Unit],
}

const fn unit(name: &'static str, symbol: &'static str, factor: f64) -> Unit {
    Unit {
        name,
        symbol,
        factor,
    }
}

pub static CATEGORIES: [Category; 6] = [
    Category {
        name: "Length",
        units: &[
            unit("Meter", "m", 1.0),
            unit("Kilometer", "km", 1000.0),
            unit("Centimeter", "cm", 0.01),
            unit("Millimeter", "mm", 0.001),
            unit("Inch", "in", 0.0254),
            unit("Foot", "ft", 0.3048),
            unit("Yard", "yd", 0.9144),
            unit("Mile", "mi", 1609.34),
        ],
    },
    Category {
        name: "Weight",
        units: &[
            unit("Kilogram", "kg", 1.0),
            unit("Gram", "g", 0.001),
            unit("Pound", "lb", 0.453592),
            unit("Ounce", "oz", 0.0283495),
            unit("Stone", "st", 6.35029),
            unit("Ton", "t", 1000.0),
        ],
    },
    Category {
        name: "Temperature",
        units: &[
            unit("Celsius", "°C", 1.0),
            unit("Fahrenheit", "°F", 1.0),
            unit("Kelvin", "K", 1.0),
        ],
    },
    Category {
        name: "Area",
        units: &[
            unit("Square Meter", "m²", 1.0),
            unit("Square Kilometer", "km²", 1_000_000.0),
            unit("Square Centimeter", "cm²", 0.0001),
            unit("Square Inch", "in²", 0.00064516),
            unit("Square Foot", "ft²", 0.092903),
            unit("Acre", "acre", 4046.86),
            unit("Hectare", "ha", 10000.0),
        ],
    },
    Category {
        name: "Volume",
        units: &[
            unit("Liter", "L", 1.0),
            unit("Milliliter", "mL", 0.001),
            unit("Gallon (US)", "gal", 3.78541),
            unit("Quart (US)", "qt", 0.946353),
            unit("Pint (US)", "pt", 0.473176),
            unit("Cup (US)", "cup", 0.236588),
            unit("Fluid Ounce (US)", "fl oz", 0.0295735),
        ],
    },
    Category {
        name: "Time",
        units: &[
            unit("Second", "s", 1.0),
            unit("Minute", "min", 60.0),
            unit("Hour", "h", 3600.0),
            unit("Day", "d", 86400.0),
            unit("Week", "wk", 604800.0),
            unit("Month", "mo", 2629746.0),
            unit("Year", "yr", 31556952.0),
        ],
    },
];

/// Look a category up by name, ignoring case.
pub fn category(name: &str) -> Result<&'static Category> {
    let name = name.trim();
    CATEGORIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::UnknownUnit(format!("no category named '{}'", name)))
}

impl Category {
    pub fn is_temperature(&self) -> bool {
        self.name == "Temperature"
    }

    /// Find a unit by symbol, then by name or symbol ignoring case.
    /// The degree sign is optional (`C` finds `°C`).
    pub fn unit(&self, key: &str) -> Result<&'static Unit> {
        let key = key.trim();
        self.units
            .iter()
            .find(|u| u.symbol == key)
            .or_else(|| {
                self.units.iter().find(|u| {
                    u.name.eq_ignore_ascii_case(key)
                        || u.symbol.eq_ignore_ascii_case(key)
                        || u.symbol.trim_start_matches('°').eq_ignore_ascii_case(key)
                })
            })
            .ok_or_else(|| Error::UnknownUnit(format!("'{}' is not a {} unit", key, self.name)))
    }

    fn precision(&self) -> usize {
        if self.is_temperature() {
            TEMPERATURE_PRECISION
        } else {
            LINEAR_PRECISION
        }
    }
}

/// A category with a selected from/to pair, as the conversion form holds it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    category: &'static Category,
    from: &'static Unit,
    to: &'static Unit,
}

impl Conversion {
    /// Starts on the first two units of the category.
    pub fn new(category: &'static Category) -> Self {
        let from = &category.units[0];
        let to = category.units.get(1).unwrap_or(from);
        Self { category, from, to }
    }

    pub fn between(category: &'static Category, from: &str, to: &str) -> Result<Self> {
        Ok(Self {
            category,
            from: category.unit(from)?,
            to: category.unit(to)?,
        })
    }

    pub fn category(&self) -> &'static Category {
        self.category
    }

    pub fn from_unit(&self) -> &'static Unit {
        self.from
    }

    pub fn to_unit(&self) -> &'static Unit {
        self.to
    }

    pub fn set_from(&mut self, key: &str) -> Result<()> {
        self.from = self.category.unit(key)?;
        Ok(())
    }

    pub fn set_to(&mut self, key: &str) -> Result<()> {
        self.to = self.category.unit(key)?;
        Ok(())
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }

    pub fn apply(&self, value: f64) -> f64 {
        if self.category.is_temperature() {
            let celsius = to_celsius(self.from.symbol, value);
            from_celsius(self.to.symbol, celsius)
        } else {
            value * self.from.factor / self.to.factor
        }
    }

    /// Convert the text of the input field and format the result for display.
    pub fn convert_text(&self, input: &str) -> Result<String> {
        let value = NumberFormat::default()
            .parse(input)
            .ok_or_else(|| Error::InvalidNumericInput(input.trim().to_string()))?;
        let result = self.apply(value);
        debug!(
            "Convert {} {} -> {} {}",
            value, self.from.symbol, result, self.to.symbol
        );
        Ok(NumberFormat::plain(self.category.precision()).format(result))
    }

    /// [`QUICK_VALUES`] converted with two decimals.
    pub fn quick_conversions(&self) -> Vec<(f64, String)> {
        let format = NumberFormat::plain(QUICK_PRECISION);
        QUICK_VALUES
            .iter()
            .map(|&v| (v, format.format(self.apply(v))))
            .collect()
    }
}

/// One-shot conversion: `convert("Length", "mi", "m", "1")` is `"1609.34"`.
pub fn convert(category_name: &str, from: &str, to: &str, input: &str) -> Result<String> {
    Conversion::between(category(category_name)?, from, to)?.convert_text(input)
}

fn to_celsius(symbol: &str, value: f64) -> f64 {
    match symbol {
        "°F" => (value - 32.0) * 5.0 / 9.0,
        "K" => value - 273.15,
        _ => value,
    }
}

fn from_celsius(symbol: &str, celsius: f64) -> f64 {
    match symbol {
        "°F" => celsius * 9.0 / 5.0 + 32.0,
        "K" => celsius + 273.15,
        _ => celsius,
    }
}
