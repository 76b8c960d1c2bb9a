use chrono::Local;
use nu_ansi_term::{Color, Style};
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::Targets,
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
    Layer,
};

/// Target used for per-operation outcome lines.
pub const TASK_RESULT_TARGET: &str = "task_result";

/// Installs the console + hourly file logger.
///
/// `app_targets` are the crate targets logged at INFO; everything else is
/// WARN and above. The returned guard flushes the file writer and MUST be
/// kept alive by the caller.
pub fn setup_logger(file_prefix: &str, app_targets: &[&str]) -> Option<WorkerGuard> {
    std::fs::create_dir_all("logs").ok();

    let file_appender = tracing_appender::rolling::hourly("logs", file_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(FileFormatter)
        .with_filter(app_filter(app_targets));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .event_format(TerminalFormatter)
        .with_filter(app_filter(app_targets));

    // A second call (tests, restarts) keeps the first subscriber.
    if tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .is_err()
    {
        return None;
    }

    Some(guard)
}

fn app_filter(app_targets: &[&str]) -> Targets {
    app_targets
        .iter()
        .fold(
            Targets::new().with_target(TASK_RESULT_TARGET, Level::INFO),
            |targets, t| targets.with_target(*t, Level::INFO),
        )
        .with_target("core_logic", Level::INFO)
        .with_default(Level::WARN)
}

// --- Formatters ---

struct MessageVisitor {
    message: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

fn event_message(event: &Event<'_>) -> String {
    let mut visitor = MessageVisitor {
        message: String::new(),
    };
    event.record(&mut visitor);
    visitor.message
}

pub struct TerminalFormatter;

impl TerminalFormatter {
    fn colorize(level: &Level, msg: String) -> String {
        match *level {
            Level::ERROR => Color::LightRed.paint(msg).to_string(),
            Level::WARN => Color::Yellow.paint(msg).to_string(),
            _ => {
                let green = Style::new().fg(Color::LightGreen).bold();
                let red = Style::new().fg(Color::LightRed).bold();
                if msg.contains("Success") {
                    msg.replace("Success", &green.paint("Success").to_string())
                } else if msg.contains("Skipped") {
                    msg.replace("Skipped", &red.paint("Skipped").to_string())
                } else {
                    msg
                }
            }
        }
    }
}

impl<S, N> FormatEvent<S, N> for TerminalFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = Local::now().format("%H:%M:%S");
        let msg = Self::colorize(event.metadata().level(), event_message(event));

        write!(
            writer,
            "{} {}",
            Style::new().dimmed().paint(timestamp.to_string()),
            msg
        )?;
        writeln!(writer)
    }
}

pub struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let level = event.metadata().level();

        write!(writer, "{} [{}] ", timestamp, level)?;
        writeln!(writer, "{}", event_message(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_words_are_highlighted() {
        let red = Style::new().fg(Color::LightRed).bold();
        let line = TerminalFormatter::colorize(
            &Level::INFO,
            "⏭️ [Alice] Skipped 02_swap this round".to_string(),
        );
        assert!(line.contains(&red.paint("Skipped").to_string()));

        let plain = TerminalFormatter::colorize(&Level::INFO, "Loaded 2 accounts".to_string());
        assert_eq!(plain, "Loaded 2 accounts");
    }
}
