#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for the receiving tool.
//!
//! [`init_logger`] sets up `indicatif-log-bridge` so that `log::info!` and
//! friends are suspended while spinners redraw. [`spinner`] creates those
//! spinners, and [`prompt_quantity`] asks for a received quantity.

use std::time::Duration;

use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// Adds a steadily ticking spinner showing `message` to `multi`.
///
/// Finish it with [`ProgressBar::finish_with_message`] or
/// [`ProgressBar::finish_and_clear`].
#[must_use]
pub fn spinner(multi: &MultiProgress, message: &str) -> ProgressBar {
    let bar = multi.add(ProgressBar::new_spinner());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar
}

/// Parses a quantity typed by the user.
///
/// Accepts `1,000`-style grouping and surrounding whitespace.
///
/// # Errors
///
/// Returns a message suitable for display if the input is not a finite,
/// non-negative number.
pub fn parse_quantity(input: &str) -> Result<f64, String> {
    let cleaned = input.trim().replace(',', "");
    let value: f64 = cleaned
        .parse()
        .map_err(|_| format!("'{}' is not a number", input.trim()))?;

    if !value.is_finite() {
        return Err(format!("'{}' is not a number", input.trim()));
    }
    if value < 0.0 {
        return Err("Quantity cannot be negative".to_string());
    }
    Ok(value)
}

/// Prompts for a non-negative quantity, re-asking until one is entered.
///
/// Pressing enter accepts `default`.
///
/// # Errors
///
/// Returns [`dialoguer::Error`] if the terminal cannot be read.
pub fn prompt_quantity(prompt: &str, default: &str) -> Result<f64, dialoguer::Error> {
    let answer: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .validate_with(|s: &String| parse_quantity(s).map(|_| ()))
        .interact_text()?;

    Ok(parse_quantity(&answer).unwrap_or_default())
}

/// Initializes the global logger wrapped in `indicatif-log-bridge` so that
/// `log::info!` and friends are suspended while spinners redraw.
///
/// Returns the [`MultiProgress`] that all spinners must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // Already set (e.g., in tests)

    log::set_max_level(level);

    multi
}
