//! Output rendering and formatting

use arcade_ops::{OperationResult, PlayOutcome, StatusReport, TitleSummary};
use arcade_types::{ColorChoice, Decision};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
            term: Term::stdout(),
        }
    }

    pub fn is_json(&self) -> bool {
        self.json_output
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            self.render_json(result)
        } else {
            self.render_table(result)
        }
    }

    fn render_json(&self, result: &OperationResult) -> io::Result<()> {
        let json = result.to_json().map_err(io::Error::other)?;
        self.term.write_line(&json)
    }

    fn render_table(&self, result: &OperationResult) -> io::Result<()> {
        match result {
            OperationResult::TitleList(titles) => self.render_title_list(titles),
            OperationResult::Status(report) => self.render_status(report),
            OperationResult::Play(outcome) => self.render_play(outcome),
            OperationResult::Success(message) => self.render_success_message(message),
        }
    }

    /// Render the catalog with install state
    fn render_title_list(&self, titles: &[TitleSummary]) -> io::Result<()> {
        if titles.is_empty() {
            return self.term.write_line("The catalog is empty.");
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Id").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Version").add_attribute(Attribute::Bold),
            Cell::new("Installed").add_attribute(Attribute::Bold),
            Cell::new("Action").add_attribute(Attribute::Bold),
        ]);

        for title in titles {
            table.add_row(vec![
                Cell::new(title.index),
                Cell::new(&title.id),
                Cell::new(&title.name),
                Cell::new(if title.version.is_empty() {
                    "-"
                } else {
                    &title.version
                }),
                Cell::new(title.installed_version.as_deref().unwrap_or("-")),
                self.action_cell(title),
            ]);
        }

        self.term.write_line(&table.to_string())
    }

    fn action_cell(&self, title: &TitleSummary) -> Cell {
        let (label, color) = if title.downloadable {
            match title.action {
                Decision::Launch => ("play", Color::Green),
                Decision::Install => ("install", Color::Blue),
                Decision::Update => ("update", Color::Yellow),
            }
        } else {
            ("unavailable", Color::Red)
        };

        if self.supports_color() {
            Cell::new(label).fg(color)
        } else {
            Cell::new(label)
        }
    }

    /// Render installed titles and running pipelines
    fn render_status(&self, report: &StatusReport) -> io::Result<()> {
        if report.installed.is_empty() {
            self.term.write_line("No titles installed.")?;
        } else {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec![
                Cell::new("Installed").add_attribute(Attribute::Bold),
                Cell::new("Version").add_attribute(Attribute::Bold),
            ]);
            for marker in &report.installed {
                table.add_row(vec![Cell::new(&marker.id), Cell::new(&marker.version)]);
            }
            self.term.write_line(&table.to_string())?;
        }

        if report.active.is_empty() {
            return self.term.write_line("Idle.");
        }
        for active in &report.active {
            self.term.write_line(&format!(
                "{} {} ({})",
                self.style_bold("Running:"),
                active.title,
                active.phase
            ))?;
        }
        Ok(())
    }

    fn render_play(&self, outcome: &PlayOutcome) -> io::Result<()> {
        match outcome {
            PlayOutcome::Started { pipeline_id } => self
                .term
                .write_line(&format!("Started pipeline {pipeline_id}")),
            PlayOutcome::Busy { active } => self
                .term
                .write_line(&format!("Busy: {active} is still running")),
        }
    }

    fn render_success_message(&self, message: &str) -> io::Result<()> {
        if self.supports_color() {
            let style = Style::new().green().bold();
            self.term.write_line(&style.apply_to(message).to_string())
        } else {
            self.term.write_line(message)
        }
    }

    fn style_bold(&self, text: &str) -> String {
        if self.supports_color() {
            Style::new().bold().apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Check if color output is supported
    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}
