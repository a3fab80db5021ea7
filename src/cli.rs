use crate::mode::{AngleMode, CalculatorMode};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "calcsuite")]
#[command(about = "Multi-mode calculator: keypad scripts, unit conversion, finance and plots", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Calculator mode to start in: standard or scientific
    #[arg(short, long)]
    pub mode: Option<CalculatorMode>,

    /// Angle mode for trigonometry: deg or rad
    #[arg(short, long)]
    pub angle: Option<AngleMode>,

    /// Print the history after running the keys
    #[arg(long)]
    pub history: bool,

    /// Key presses, e.g. `12 + sin ( 30 ) =`. Reads lines from stdin when empty
    #[arg(allow_hyphen_values = true)]
    pub keys: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a value between units of one category
    Convert {
        /// Category: length, weight, temperature, area, volume or time
        category: String,
        /// Value to convert
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Unit symbol or name to convert from
        from: String,
        /// Unit symbol or name to convert to
        to: String,
        /// Also print the 1/10/100/1000 quick conversions
        #[arg(short, long)]
        quick: bool,
    },
    /// List conversion categories and their units
    Units {
        /// Only show this category
        category: Option<String>,
    },
    /// Monthly payment of an amortised loan
    Loan {
        principal: f64,
        /// Annual interest rate in percent
        rate: f64,
        /// Term in years
        years: f64,
    },
    /// Compound interest on a principal
    Compound {
        principal: f64,
        /// Annual interest rate in percent
        rate: f64,
        years: f64,
        /// Compounding periods per year
        #[arg(short, long, default_value_t = 12.0)]
        frequency: f64,
    },
    /// Future value of an initial sum plus monthly contributions
    Invest {
        initial: f64,
        monthly: f64,
        /// Annual interest rate in percent
        rate: f64,
        years: f64,
    },
    /// Sample functions of x across a window
    Plot {
        /// Expressions in x, e.g. `x^2` or `sin(x)`
        #[arg(required = true)]
        expressions: Vec<String>,
        #[arg(long, default_value_t = -10.0, allow_hyphen_values = true)]
        x_min: f64,
        #[arg(long, default_value_t = 10.0, allow_hyphen_values = true)]
        x_max: f64,
        /// Print every n-th sample
        #[arg(long, default_value_t = 40)]
        every: usize,
    },
}
