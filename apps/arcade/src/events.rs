//! Event handling and progress display
//!
//! The terminal stands in for the launcher's windows: the progress window is
//! a single redrawn status line, the main window is a pair of messages
//! around the game session.

use crate::logging::log_event_with_tracing;
use arcade_events::{
    AppEvent, CatalogEvent, EventMessage, GeneralEvent, PipelineEvent, PipelineOutcome,
    ProgressEvent, ProgressPhase, WindowEvent,
};
use arcade_types::{Decision, PipelineId, TitleId};
use console::{style, Term};

const BAR_WIDTH: usize = 30;

/// A pipeline reported its final outcome
#[derive(Debug, Clone)]
pub struct Finished {
    pub pipeline_id: PipelineId,
    pub title: TitleId,
    pub outcome: PipelineOutcome,
}

/// Event handler for progress display and user feedback
pub struct EventHandler {
    term: Term,
    colors_enabled: bool,
    debug_enabled: bool,
    /// Suppresses all terminal output; events are still logged
    quiet: bool,
    progress_visible: bool,
}

impl EventHandler {
    pub fn new(colors_enabled: bool, debug_enabled: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            colors_enabled,
            debug_enabled,
            quiet,
            progress_visible: false,
        }
    }

    /// Handle incoming event, returning the outcome when a pipeline finished
    pub fn handle_event(&mut self, message: EventMessage) -> Option<Finished> {
        log_event_with_tracing(&message);

        match message.event {
            AppEvent::General(event) => {
                self.handle_general(event);
                None
            }
            AppEvent::Catalog(event) => {
                self.handle_catalog(&event);
                None
            }
            AppEvent::Progress(progress) => {
                self.draw_progress(&progress);
                None
            }
            AppEvent::Window(window) => {
                self.handle_window(window);
                None
            }
            AppEvent::Pipeline(event) => self.handle_pipeline(event),
        }
    }

    fn handle_general(&mut self, event: GeneralEvent) {
        match event {
            GeneralEvent::Warning { message, context } => match context {
                Some(context) => self.show_warning(&format!("{message} ({context})")),
                None => self.show_warning(&message),
            },
            GeneralEvent::Error { message, details } => match details {
                Some(details) => self.show_error(&format!("{message}: {details}")),
                None => self.show_error(&message),
            },
            GeneralEvent::DebugLog { message, .. } => {
                if self.debug_enabled {
                    self.show_status(&format!("debug: {message}"));
                }
            }
            GeneralEvent::OperationStarted { .. }
            | GeneralEvent::OperationCompleted { .. }
            | GeneralEvent::OperationFailed { .. } => {}
        }
    }

    fn handle_catalog(&mut self, event: &CatalogEvent) {
        match event {
            CatalogEvent::Updated { title_count } => {
                if self.debug_enabled {
                    self.show_status(&format!("Catalog updated: {title_count} titles"));
                }
            }
            CatalogEvent::Unavailable { failure, retained } => {
                let suffix = if *retained {
                    "using the last known catalog"
                } else {
                    "catalog cleared"
                };
                self.show_warning(&format!("Catalog unavailable: {} ({suffix})", failure.message));
            }
        }
    }

    fn handle_window(&mut self, window: WindowEvent) {
        match window {
            WindowEvent::ShowProgress => self.progress_visible = true,
            WindowEvent::HideProgress => {
                self.clear_progress();
                self.progress_visible = false;
            }
            WindowEvent::HideMain => self.show_status("Game running. Close it to return here."),
            WindowEvent::ShowMain => self.show_status("Game closed."),
        }
    }

    fn handle_pipeline(&mut self, event: PipelineEvent) -> Option<Finished> {
        match event {
            PipelineEvent::Accepted { title, .. } => {
                self.show_status(&format!("Preparing {title}"));
                None
            }
            PipelineEvent::Rejected { title, active } => {
                self.show_warning(&format!("Cannot start {title}: {active} is still running"));
                None
            }
            PipelineEvent::Decided {
                title, decision, ..
            } => {
                let action = match decision {
                    Decision::Launch => "up to date",
                    Decision::Install => "not installed, downloading",
                    Decision::Update => "update available, downloading",
                };
                self.show_status(&format!("{title}: {action}"));
                None
            }
            PipelineEvent::PhaseChanged { .. } => None,
            PipelineEvent::Finished {
                pipeline_id,
                title,
                outcome,
            } => {
                self.clear_progress();
                match &outcome {
                    PipelineOutcome::Exited { code: Some(code) } if *code != 0 => {
                        self.show_warning(&format!("{title} exited with code {code}"));
                    }
                    PipelineOutcome::Exited { .. } => {}
                    PipelineOutcome::NotFound => {
                        self.show_error(&format!("{title} is not available for this platform"));
                    }
                    PipelineOutcome::Cancelled => self.show_status(&format!("{title} stopped")),
                    PipelineOutcome::Failed { failure } => {
                        self.show_error(&format!("{title}: {}", failure.message));
                    }
                }
                Some(Finished {
                    pipeline_id,
                    title,
                    outcome,
                })
            }
        }
    }

    /// Redraw the progress line in place
    fn draw_progress(&mut self, progress: &ProgressEvent) {
        if self.quiet || !self.progress_visible {
            return;
        }
        let line = match progress.phase {
            ProgressPhase::Reset => {
                self.clear_progress();
                return;
            }
            ProgressPhase::Downloading | ProgressPhase::Installing => format!(
                "{} {} [{}] {:>3}% {} / {}",
                self.paint_title(&progress.title),
                progress.filename,
                render_bar(progress.percentage),
                progress.percentage,
                progress.text_received,
                progress.text_total,
            ),
            ProgressPhase::NotFound | ProgressPhase::Error => format!(
                "{} {}",
                self.paint_failure(&progress.title),
                progress.filename
            ),
        };
        let _ = self.term.clear_line();
        let _ = self.term.write_str(&line);
        if progress.is_failure() {
            let _ = self.term.write_line("");
        }
    }

    fn clear_progress(&self) {
        if !self.quiet && self.progress_visible {
            let _ = self.term.clear_line();
        }
    }

    fn paint_title(&self, title: &str) -> String {
        if self.colors_enabled {
            style(title).cyan().bold().to_string()
        } else {
            title.to_string()
        }
    }

    fn paint_failure(&self, title: &str) -> String {
        if self.colors_enabled {
            style(title).red().bold().to_string()
        } else {
            title.to_string()
        }
    }

    fn show_status(&self, message: &str) {
        if !self.quiet {
            self.clear_progress();
            let _ = self.term.write_line(message);
        }
    }

    fn show_warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.clear_progress();
        let line = if self.colors_enabled {
            format!("{} {message}", style("warning:").yellow().bold())
        } else {
            format!("warning: {message}")
        };
        let _ = self.term.write_line(&line);
    }

    fn show_error(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.clear_progress();
        let line = if self.colors_enabled {
            format!("{} {message}", style("error:").red().bold())
        } else {
            format!("error: {message}")
        };
        let _ = self.term.write_line(&line);
    }
}

/// Fixed-width bar for a 0-100 percentage
fn render_bar(percentage: u8) -> String {
    let filled = usize::from(percentage.min(100)) * BAR_WIDTH / 100;
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_types::Uuid;

    #[test]
    fn test_render_bar() {
        assert_eq!(render_bar(0), "-".repeat(BAR_WIDTH));
        assert_eq!(render_bar(100), "#".repeat(BAR_WIDTH));
        assert_eq!(render_bar(50).matches('#').count(), BAR_WIDTH / 2);
        assert_eq!(render_bar(200).len(), BAR_WIDTH);
    }

    #[test]
    fn test_finished_is_reported() {
        let mut handler = EventHandler::new(false, false, true);
        let pipeline_id = Uuid::new_v4();
        let finished = handler.handle_event(EventMessage::from_event(AppEvent::Pipeline(
            PipelineEvent::Finished {
                pipeline_id,
                title: TitleId::from("g1"),
                outcome: PipelineOutcome::Exited { code: Some(0) },
            },
        )));
        let finished = finished.unwrap();
        assert_eq!(finished.pipeline_id, pipeline_id);
        assert_eq!(finished.title, TitleId::from("g1"));
        assert_eq!(finished.outcome, PipelineOutcome::Exited { code: Some(0) });
    }

    #[test]
    fn test_progress_visibility_follows_window_events() {
        let mut handler = EventHandler::new(false, false, true);
        handler.handle_event(EventMessage::from_event(AppEvent::Window(
            WindowEvent::ShowProgress,
        )));
        assert!(handler.progress_visible);
        assert!(handler
            .handle_event(EventMessage::from_event(AppEvent::Progress(
                ProgressEvent::downloading("g1.zip", 10, 100),
            )))
            .is_none());
        handler.handle_event(EventMessage::from_event(AppEvent::Window(
            WindowEvent::HideProgress,
        )));
        assert!(!handler.progress_visible);
    }
}
