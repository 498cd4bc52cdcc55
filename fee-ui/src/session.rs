//! The interactive session: reads command lines, applies them to the
//! estimate and writes the results.
//!
//! Input and output are generic so the whole loop can be driven from tests.

use std::fs;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use fee_core::{Catalogue, CustomField};
use tracing::{info, warn};

use crate::commands::{Command, CommandParser, HELP};
use crate::logging;
use crate::preferences::PreferenceStore;
use crate::report;
use crate::state::AppState;
use crate::tutorial::{STEPS, TourProgress, Tutorial};
use crate::utils::is_affirmative;

pub const PROMPT: &str = "> ";

pub const RESET_CONFIRMATION: &str =
    "Are you sure you want to reset the calculator? This will clear all selections.";

/// Whether the session keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

pub struct Session<'a, P: PreferenceStore> {
    state: AppState<'a>,
    parser: CommandParser,
    preferences: P,
}

impl<'a, P: PreferenceStore> Session<'a, P> {
    /// Starts a session over `catalogue`, reading the tour flag from
    /// `preferences`.
    pub fn new(
        catalogue: &'a Catalogue,
        preferences: P,
    ) -> Result<Self> {
        let tutorial = Tutorial::load(&preferences).context("Failed to read preferences")?;
        let parser = CommandParser::new().context("Failed to build command parser")?;

        Ok(Self {
            state: AppState::new(catalogue, tutorial),
            parser,
            preferences,
        })
    }

    pub fn state(&self) -> &AppState<'a> {
        &self.state
    }

    pub fn preferences(&self) -> &P {
        &self.preferences
    }

    /// Banner shown once at startup.
    pub fn greeting(&self) -> String {
        let mut text = format!(
            "{} estimator ({} catalogue items). Type `help` for commands.",
            report::ESTIMATE_HEADING,
            self.state.estimator.catalogue().len()
        );
        if !self.state.tutorial.is_completed() {
            text.push_str("\nNew here? Type `tour` for a quick guided tour.");
        }
        text
    }

    /// Runs until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        mut output: W,
    ) -> Result<()> {
        writeln!(output, "{}", self.greeting())?;

        loop {
            write!(output, "{PROMPT}")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break;
            }

            if self.execute(&line, &mut input, &mut output)? == Outcome::Quit {
                break;
            }
        }

        info!("session ended");
        Ok(())
    }

    /// Executes one command line. Bad input and failing commands are reported
    /// on `output`; only failures to write to `output` are returned.
    pub fn execute<R: BufRead, W: Write>(
        &mut self,
        line: &str,
        input: &mut R,
        output: &mut W,
    ) -> Result<Outcome> {
        let command = match self.parser.parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Outcome::Continue),
            Err(e) => {
                writeln!(output, "{e}")?;
                return Ok(Outcome::Continue);
            }
        };

        match self.dispatch(command, input, output) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "command failed");
                writeln!(output, "Error: {e:#}")?;
                Ok(Outcome::Continue)
            }
        }
    }

    fn dispatch<R: BufRead, W: Write>(
        &mut self,
        command: Command,
        input: &mut R,
        output: &mut W,
    ) -> Result<Outcome> {
        let estimator = &mut self.state.estimator;

        match command {
            Command::SetType(property_type) => {
                estimator.set_property_type(property_type);
                match property_type {
                    Some(pt) => writeln!(
                        output,
                        "{} ({}): {} items selected.",
                        pt.label(),
                        pt.blurb(),
                        estimator.selected_count()
                    )?,
                    None => writeln!(output, "Property type cleared.")?,
                }
            }
            Command::Check(id) => {
                estimator.toggle_item(&id, true);
                if estimator.is_selected(&id) {
                    writeln!(output, "Selected {id}.")?;
                } else {
                    writeln!(output, "{id} was not selected (unknown id, or custom item needs a description and cost).")?;
                }
            }
            Command::Uncheck(id) => {
                estimator.toggle_item(&id, false);
                writeln!(output, "Deselected {id}.")?;
            }
            Command::Quantity { id, quantity } => {
                if estimator.catalogue().get(&id).is_none() && estimator.custom_item(&id).is_none() {
                    writeln!(output, "Unknown item '{id}'.")?;
                } else {
                    estimator.set_quantity(&id, i64::from(quantity));
                    writeln!(output, "{id}: quantity {}.", estimator.quantity(&id))?;
                }
            }
            Command::Add => {
                let id = estimator.add_custom_item();
                writeln!(
                    output,
                    "Added {id}. Set it up with `desc {id} <text>` and `cost {id} <amount>`."
                )?;
            }
            Command::Describe { id, text } => {
                self.update_custom(&id, CustomField::Description, text, output)?;
            }
            Command::Cost { id, text } => {
                self.update_custom(&id, CustomField::UnitCost, text, output)?;
            }
            Command::List => writeln!(output, "{}", report::catalogue_table(estimator))?,
            Command::Summary => writeln!(output, "{}", report::summary(estimator))?,
            Command::Print(None) => write!(output, "{}", report::printable_estimate(estimator))?,
            Command::Print(Some(path)) => {
                fs::write(&path, report::printable_estimate(estimator))
                    .with_context(|| format!("Failed to write estimate: {}", path.display()))?;
                info!(path = %path.display(), "estimate saved");
                writeln!(output, "Estimate written to {}.", path.display())?;
            }
            Command::Reset => {
                if !self.state.has_estimate_data() {
                    writeln!(output, "Nothing to reset.")?;
                    return Ok(Outcome::Continue);
                }
                write!(output, "{RESET_CONFIRMATION} [y/N] ")?;
                output.flush()?;
                let mut answer = String::new();
                input.read_line(&mut answer)?;

                if is_affirmative(&answer) {
                    self.state.clear_estimate();
                    writeln!(output, "Calculator reset.")?;
                } else {
                    writeln!(output, "Reset cancelled.")?;
                }
            }
            Command::Tour => {
                if self.state.tutorial.is_running() {
                    writeln!(output, "Restarting the tour.")?;
                }
                let progress = self.state.tutorial.start();
                self.show_tour(progress, output)?;
            }
            Command::Next => {
                let progress = self.state.tutorial.next(&mut self.preferences)?;
                self.show_tour(progress, output)?;
            }
            Command::Back => {
                let progress = self.state.tutorial.back();
                self.show_tour(progress, output)?;
            }
            Command::Skip => {
                let progress = self.state.tutorial.skip(&mut self.preferences)?;
                self.show_tour(progress, output)?;
            }
            Command::Log(level) => {
                logging::set_log_level(&level)?;
                writeln!(output, "Log level set to {level}.")?;
            }
            Command::Help => writeln!(output, "{HELP}")?,
            Command::Quit => return Ok(Outcome::Quit),
        }

        Ok(Outcome::Continue)
    }

    fn update_custom<W: Write>(
        &mut self,
        id: &str,
        field: CustomField,
        text: String,
        output: &mut W,
    ) -> Result<()> {
        let estimator = &mut self.state.estimator;
        if estimator.custom_item(id).is_none() {
            writeln!(output, "Unknown custom item '{id}'.")?;
            return Ok(());
        }

        estimator.update_custom_item(id, field, text);
        if estimator.is_selected(id) {
            writeln!(output, "{id} is included in the estimate.")?;
        } else {
            writeln!(output, "{id} needs a description and a valid cost before it is included.")?;
        }
        Ok(())
    }

    fn show_tour<W: Write>(
        &self,
        progress: TourProgress,
        output: &mut W,
    ) -> Result<()> {
        match progress {
            TourProgress::Step(_) => {
                let Some((index, step)) = self.state.tutorial.current_step() else {
                    return Ok(());
                };
                writeln!(
                    output,
                    "Step {} of {}: {}\n{}\n(next, back, skip)",
                    index + 1,
                    STEPS.len(),
                    step.title,
                    step.body
                )?;
            }
            TourProgress::Finished => writeln!(output, "Tour complete.")?,
            TourProgress::NotRunning => writeln!(output, "No tour in progress. Type `tour` to start one.")?,
        }
        Ok(())
    }
}
