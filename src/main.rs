use anyhow::{bail, Context, Result};
use calcsuite::app::AppState;
use calcsuite::cli::{Cli, Commands};
use calcsuite::config::Config;
use calcsuite::convert::{self, Conversion, CATEGORIES};
use calcsuite::financial::{self, format_amount};
use calcsuite::graph::{Plot, Window};
use calcsuite::input::parse_keys;
use calcsuite::mode::CalculatorMode;
use clap::Parser;
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut config = Config::load(cli.config.clone())?;
    if let Some(mode) = cli.mode {
        config.start_mode = mode;
    }
    if let Some(angle) = cli.angle {
        config.angle_mode = angle;
    }

    match cli.command {
        Some(command) => run_command(command),
        None => run_keypad(&config, &cli.keys, cli.history),
    }
}

fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Convert {
            category,
            value,
            from,
            to,
            quick,
        } => {
            let category = convert::category(&category)?;
            let conversion = Conversion::between(category, &from, &to)?;
            let result = conversion.convert_text(&value)?;
            let (from, to) = (conversion.from_unit().symbol, conversion.to_unit().symbol);
            println!("{} {} = {} {}", value.trim(), from, result, to);
            if quick {
                for (value, result) in conversion.quick_conversions() {
                    println!("{} {} -> {} {}", value, from, result, to);
                }
            }
        }
        Commands::Units { category } => {
            let categories = match category {
                Some(name) => vec![convert::category(&name)?],
                None => CATEGORIES.iter().collect(),
            };
            for category in categories {
                println!("{}", category.name);
                for unit in category.units {
                    println!("  {:<18} {}", unit.name, unit.symbol);
                }
            }
        }
        Commands::Loan {
            principal,
            rate,
            years,
        } => {
            let loan = financial::loan_payment(principal, rate, years)?;
            println!("Monthly payment: {}", format_amount(loan.monthly_payment));
            println!("Total interest:  {}", format_amount(loan.total_interest));
            println!("Total paid:      {}", format_amount(loan.total_paid));
        }
        Commands::Compound {
            principal,
            rate,
            years,
            frequency,
        } => {
            let compound = financial::compound_interest(principal, rate, frequency, years)?;
            println!("Final amount:    {}", format_amount(compound.amount));
            println!("Interest earned: {}", format_amount(compound.interest_earned));
        }
        Commands::Invest {
            initial,
            monthly,
            rate,
            years,
        } => {
            let investment = financial::investment_future_value(initial, monthly, rate, years)?;
            println!("Future value:        {}", format_amount(investment.future_value));
            println!("Total contributions: {}", format_amount(investment.total_contributions));
            println!("Investment gains:    {}", format_amount(investment.gains));
        }
        Commands::Plot {
            expressions,
            x_min,
            x_max,
            every,
        } => run_plot(&expressions, x_min, x_max, every)?,
    }
    Ok(())
}

fn run_plot(expressions: &[String], x_min: f64, x_max: f64, every: usize) -> Result<()> {
    let window = Window::default();
    let mut plot = Plot::empty();
    plot.set_window(Window::new(x_min, x_max, window.y_min, window.y_max)?);
    for expression in expressions {
        plot.add(expression)
            .with_context(|| format!("Cannot plot {:?}", expression))?;
    }

    for series in plot.sample() {
        println!("{}", series.label);
        for (x, y) in series.points.iter().step_by(every.max(1)) {
            match y {
                Some(y) => println!("  {:>10.4} {:>14.6}", x, y),
                None => println!("  {:>10.4} {:>14}", x, "-"),
            }
        }
    }
    Ok(())
}

fn run_keypad(config: &Config, keys: &[String], show_history: bool) -> Result<()> {
    let mut app = AppState::new(config);
    if !app.mode().has_keypad() {
        bail!("{} mode has no keypad; use a subcommand instead", app.mode());
    }

    if keys.is_empty() {
        repl(&mut app)?;
    } else {
        app.press_all(parse_keys(&keys.join(" "))?);
        print_state(&app);
    }

    if show_history {
        print_history(&app);
    }
    Ok(())
}

/// One key script per line. Lines starting with `:` are session commands.
fn repl(app: &mut AppState) -> Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.strip_prefix(':') {
            Some(command) => {
                if !session_command(app, command) {
                    break;
                }
            }
            None => match parse_keys(line) {
                Ok(keys) => {
                    app.press_all(keys);
                    print_state(app);
                }
                Err(err) => eprintln!("{}", err),
            },
        }
        io::stdout().flush().context("Failed to flush stdout")?;
    }
    Ok(())
}

/// Returns false when the loop should stop.
fn session_command(app: &mut AppState, command: &str) -> bool {
    let mut words = command.split_whitespace();
    match (words.next(), words.next()) {
        (Some("quit") | Some("q"), _) => return false,
        (Some("history"), _) => print_history(app),
        (Some("clear-history"), _) => app.clear_history(),
        (Some("theme"), _) => {
            app.toggle_dark_mode();
            let theme = if app.session().is_dark_mode() { "dark" } else { "light" };
            println!("{} theme", theme);
        }
        (Some("mode"), Some(name)) => match name.parse::<CalculatorMode>() {
            Ok(mode) if mode.has_keypad() => {
                app.set_mode(mode);
                print_state(app);
            }
            Ok(mode) => eprintln!("{} mode has no keypad", mode),
            Err(err) => eprintln!("{}", err),
        },
        (Some("recall"), Some(id)) => match id.parse::<u64>() {
            Ok(id) if app.select_history(id) => print_state(app),
            _ => eprintln!("No history entry {}", id),
        },
        _ => eprintln!("Unknown command :{}", command),
    }
    true
}

fn print_state(app: &AppState) {
    let expression = app.expression();
    if expression.is_empty() {
        println!("{}", app.display());
    } else {
        println!("{}    [{}]", app.display(), expression);
    }
}

fn print_history(app: &AppState) {
    for entry in app.history() {
        println!(
            "#{:<3} {} {:<11} {} = {}",
            entry.id,
            entry.timestamp.format("%H:%M:%S"),
            entry.mode.name(),
            entry.expression,
            entry.result
        );
    }
}
