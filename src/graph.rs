//! Graphing mode: a list of `y = f(x)` functions sampled across a window.

use crate::calculator::Calculator;
use crate::canonical::canonicalize;
use crate::error::{Error, Result};
use crate::mode::AngleMode;
use log::{debug, warn};

pub const SAMPLE_STEPS: usize = 400;
const DEFAULT_EXTENT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GraphFunction {
    pub id: u64,
    pub expression: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            x_min: -DEFAULT_EXTENT,
            x_max: DEFAULT_EXTENT,
            y_min: -DEFAULT_EXTENT,
            y_max: DEFAULT_EXTENT,
        }
    }
}

impl Window {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self> {
        for (lo, hi, axis) in [(x_min, x_max, "x"), (y_min, y_max, "y")] {
            if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                return Err(Error::InvalidArgument(format!(
                    "{} range {}..{} is empty",
                    axis, lo, hi
                )));
            }
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// `SAMPLE_STEPS + 1` evenly spaced x values, both ends included.
    pub fn x_values(&self) -> Vec<f64> {
        let span = self.x_max - self.x_min;
        (0..=SAMPLE_STEPS)
            .map(|i| self.x_min + span * i as f64 / SAMPLE_STEPS as f64)
            .collect()
    }
}

/// Sampled curve of one visible function. `None` marks a gap where the
/// function is undefined or not finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub id: u64,
    pub label: String,
    pub points: Vec<(f64, Option<f64>)>,
}

impl Series {
    pub fn defined_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().filter_map(|&(x, y)| y.map(|y| (x, y)))
    }
}

#[derive(Debug, Clone)]
pub struct Plot {
    functions: Vec<GraphFunction>,
    window: Window,
    next_id: u64,
    calculator: Calculator,
}

impl Default for Plot {
    /// Starts with `x^2` plotted.
    fn default() -> Self {
        let mut plot = Self::empty();
        plot.functions.push(GraphFunction {
            id: 1,
            expression: "x^2".to_string(),
            visible: true,
        });
        plot.next_id = 2;
        plot
    }
}

impl Plot {
    pub fn empty() -> Self {
        Self {
            functions: Vec::new(),
            window: Window::default(),
            next_id: 1,
            calculator: Calculator::new(),
        }
    }

    pub fn functions(&self) -> &[GraphFunction] {
        &self.functions
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn set_window(&mut self, window: Window) {
        self.window = window;
    }

    /// Add a function of `x`. Expressions that cannot be parsed are rejected.
    pub fn add(&mut self, expression: &str) -> Result<u64> {
        let expression = expression.trim();
        canonicalize(expression, AngleMode::Rad)?;

        let id = self.next_id;
        self.next_id += 1;
        self.functions.push(GraphFunction {
            id,
            expression: expression.to_string(),
            visible: true,
        });
        debug!("Plot: added #{} y = {}", id, expression);
        Ok(id)
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.functions.len();
        self.functions.retain(|f| f.id != id);
        self.functions.len() != before
    }

    /// Flip visibility; returns the new state, or `None` for an unknown id.
    pub fn toggle(&mut self, id: u64) -> Option<bool> {
        let function = self.functions.iter_mut().find(|f| f.id == id)?;
        function.visible = !function.visible;
        Some(function.visible)
    }

    /// Sample every visible function across the x-window.
    pub fn sample(&self) -> Vec<Series> {
        let xs = self.window.x_values();
        self.functions
            .iter()
            .filter(|f| f.visible)
            .map(|f| Series {
                id: f.id,
                label: format!("y = {}", f.expression),
                points: self.sample_function(&f.expression, &xs),
            })
            .collect()
    }

    fn sample_function(&self, expression: &str, xs: &[f64]) -> Vec<(f64, Option<f64>)> {
        let canonical = match canonicalize(expression, AngleMode::Rad) {
            Ok(canonical) => canonical,
            Err(err) => {
                warn!("Cannot plot {:?}: {}", expression, err);
                return xs.iter().map(|&x| (x, None)).collect();
            }
        };
        xs.iter()
            .map(|&x| (x, self.calculator.evaluate_at(&canonical, "x", x).ok()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plot_samples_parabola() {
        let plot = Plot::default();
        let series = plot.sample();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label, "y = x^2");

        let points = &series[0].points;
        assert_eq!(points.len(), SAMPLE_STEPS + 1);
        assert_eq!(points[0], (-10.0, Some(100.0)));
        assert_eq!(points[200].0, 0.0);
        assert_eq!(points[200].1, Some(0.0));
        assert!((points[400].0 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_gaps_for_undefined_points() {
        let mut plot = Plot::empty();
        plot.add("1 / x").unwrap();
        plot.add("sqrt(x)").unwrap();
        let series = plot.sample();

        assert_eq!(series[0].points[200].1, None);
        assert!(series[0].points[100].1.is_some());
        assert_eq!(series[1].points[0].1, None);
        assert_eq!(series[1].defined_points().count(), 201);
    }

    #[test]
    fn test_visibility_and_removal() {
        let mut plot = Plot::default();
        let id = plot.add("2x + 1").unwrap();
        assert_eq!(plot.sample().len(), 2);

        assert_eq!(plot.toggle(id), Some(false));
        assert_eq!(plot.sample().len(), 1);
        assert_eq!(plot.toggle(99), None);

        assert!(plot.remove(1));
        assert!(!plot.remove(1));
        assert!(plot.sample().is_empty());
        assert_eq!(plot.functions().len(), 1);
    }

    #[test]
    fn test_trig_uses_radians() {
        let mut plot = Plot::empty();
        plot.set_window(Window::new(0.0, std::f64::consts::PI, -1.0, 1.0).unwrap());
        plot.add("sin(x)").unwrap();
        let series = plot.sample();
        let peak = series[0].points[200].1.unwrap();
        assert!((peak - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut plot = Plot::empty();
        assert!(plot.add("x +").is_err());
        assert!(plot.add("sin(θ)").is_err());
        assert!(plot.functions().is_empty());
        assert!(Window::new(5.0, -5.0, -1.0, 1.0).is_err());
    }
}
