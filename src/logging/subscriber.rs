//! Tracing subscriber: component scoping, console formatter and log file.
//!
//! The installer opens a [`component_span`] around each component.  A
//! [`ComponentScope`] layer remembers the span's component name, and both
//! outputs read it back so every line can say which component it belongs to.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::span;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::{LookupSpan, Scope};

use super::utils::{DATETIME, TIME, log_file_path, strip_ansi, utc_now};

/// Target used for stage headers.
pub(super) const STAGE_TARGET: &str = "framework::stage";
/// Target used for dry-run action lines.
pub(super) const DRY_RUN_TARGET: &str = "framework::dry_run";
/// Name of the span opened per component.
const COMPONENT_SPAN: &str = "component";

/// Open the span that scopes log output to component `name`.
///
/// Enter it for as long as the component is being installed.
#[must_use]
pub fn component_span(name: &str) -> tracing::Span {
    tracing::info_span!("component", component = name)
}

/// Component name stored in the extensions of a [`component_span`].
struct ComponentName(String);

/// Reads one named field off an event or span.
struct FieldText {
    field: &'static str,
    value: String,
}

impl FieldText {
    const fn new(field: &'static str) -> Self {
        Self {
            field,
            value: String::new(),
        }
    }
}

impl tracing::field::Visit for FieldText {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == self.field {
            self.value = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == self.field {
            self.value = value.to_string();
        }
    }
}

fn message_of(event: &tracing::Event<'_>) -> String {
    let mut text = FieldText::new("message");
    event.record(&mut text);
    text.value
}

/// Innermost component enclosing an event.
fn component_in<'a, R: LookupSpan<'a>>(scope: Option<Scope<'a, R>>) -> Option<String> {
    scope?.find_map(|span| {
        span.extensions()
            .get::<ComponentName>()
            .map(|component| component.0.clone())
    })
}

/// Tags every [`component_span`] with its component name.
///
/// Must sit in the same registry as the outputs that render the name.
#[derive(Debug)]
pub(super) struct ComponentScope;

impl<S> tracing_subscriber::Layer<S> for ComponentScope
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
        if attrs.metadata().name() != COMPONENT_SPAN {
            return;
        }
        let mut name = FieldText::new("component");
        attrs.record(&mut name);
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(ComponentName(name.value));
        }
    }
}

/// Appends every event to the run's log file, without colour.
///
/// Lines inside a component are prefixed with the component name.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Log file for `command` under the cache directory.
    pub(super) fn new(command: &str) -> Option<Self> {
        Self::at(&log_file_path(command)?)
    }

    /// Truncate `path`, write a run header, and append to it from then on.
    pub(super) fn at(path: &Path) -> Option<Self> {
        let version = option_env!("FRAMEWORK_VERSION")
            .unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let rule = "=".repeat(42);
        fs::write(
            path,
            format!("{rule}\nframework-install {version} {}\n{rule}\n", utc_now(DATETIME)),
        )
        .ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }

    fn line(event: &tracing::Event<'_>, component: Option<&str>) -> String {
        let ts = utc_now(TIME);
        let msg = strip_ansi(&message_of(event));
        let metadata = event.metadata();
        if metadata.target() == STAGE_TARGET {
            return format!("[{ts}] ==> {msg}");
        }
        let tag = match (*metadata.level(), metadata.target()) {
            (_, DRY_RUN_TARGET) => "[dry run] ",
            (tracing::Level::ERROR, _) => "[error] ",
            (tracing::Level::WARN, _) => "[warn] ",
            (tracing::Level::DEBUG | tracing::Level::TRACE, _) => "[debug] ",
            _ => "",
        };
        let scope = component.map_or_else(String::new, |name| format!("{name} | "));
        format!("[{ts}]     {scope}{tag}{msg}")
    }
}

impl<S> tracing_subscriber::Layer<S> for FileLayer
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, ctx: Context<'_, S>) {
        let component = component_in(ctx.event_scope(event));
        let line = Self::line(event, component.as_deref());
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// Console formatter for the installer.
///
/// Warnings and errors raised inside a component name it, since they can
/// scroll far below the component's stage header.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let msg = message_of(event);
        let scope = component_in(ctx.event_scope())
            .map_or_else(String::new, |name| format!("\x1b[1m[{name}]\x1b[0m "));

        match (*metadata.level(), metadata.target()) {
            (tracing::Level::ERROR, _) => writeln!(writer, "\x1b[31mERROR\x1b[0m {scope}{msg}"),
            (tracing::Level::WARN, _) => writeln!(writer, "\x1b[33mWARN\x1b[0m  {scope}{msg}"),
            (_, STAGE_TARGET) => writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            (_, DRY_RUN_TARGET) => writeln!(writer, "  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
            (tracing::Level::INFO, _) => writeln!(writer, "  {msg}"),
            _ => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Install the global subscriber for `command`.
///
/// Warnings and errors go to stderr, everything else to stdout; debug lines
/// reach the console only when `verbose`.  The log file always gets debug
/// and above.  Call once, before anything logs.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    tracing_subscriber::registry()
        .with(ComponentScope)
        .with(
            fmt::layer()
                .event_format(ConsoleFormatter)
                .with_writer(make_writer)
                .with_filter(console_level),
        )
        .with(FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG)))
        .init();
}
