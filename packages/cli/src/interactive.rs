//! Interactive menu for running the tool without arguments.

use std::path::PathBuf;

use dc_receiving_cli_utils::MultiProgress;
use dialoguer::{Input, Select};

use crate::commands::{self, ProfileArgs};

/// Top-level actions available in the interactive menu.
#[derive(Clone, Copy)]
enum Action {
    Receive,
    Extract,
    Csv,
    Worksheet,
    Profiles,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Receive,
        Self::Extract,
        Self::Csv,
        Self::Worksheet,
        Self::Profiles,
    ];

    #[must_use]
    const fn label(self) -> &'static str {
        match self {
            Self::Receive => "Receive a manifest (enter quantities)",
            Self::Extract => "Show extracted packages",
            Self::Csv => "Export package list CSV",
            Self::Worksheet => "Print verification worksheet",
            Self::Profiles => "List extraction profiles",
        }
    }

    const fn needs_file(self) -> bool {
        !matches!(self, Self::Profiles)
    }
}

/// Prompts for an action and the manifest to run it on.
pub fn run(multi: &MultiProgress, profile: &ProfileArgs) -> Result<(), Box<dyn std::error::Error>> {
    println!("DC Receiving Tool");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(|a| a.label()).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;
    let action = Action::ALL[idx];

    let file = if action.needs_file() {
        let path: String = Input::new()
            .with_prompt("Manifest file (PDF or text)")
            .validate_with(|s: &String| {
                if PathBuf::from(s.trim()).is_file() {
                    Ok(())
                } else {
                    Err(format!("No such file: {}", s.trim()))
                }
            })
            .interact_text()?;
        PathBuf::from(path.trim())
    } else {
        PathBuf::new()
    };

    match action {
        Action::Receive => commands::receive(multi, profile, &file, None, None),
        Action::Extract => commands::extract(multi, profile, &file, false),
        Action::Csv => commands::csv(multi, profile, &file, None),
        Action::Worksheet => commands::worksheet(multi, profile, &file, None),
        Action::Profiles => {
            commands::profiles();
            Ok(())
        }
    }
}
