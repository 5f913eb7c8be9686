//! Pretty diagnostic rendering using ariadne.
//!
//! Parse failures on a text input are rendered as ariadne [`Report`]s that
//! point at the offending token. Failures without a usable source location
//! (unit chains, grammar errors) are printed as standalone messages.

use std::io::{self, IsTerminal};
use std::ops::Range;

use argot_core::{ParseError, Token};
use argot_diagnostics::{Diagnostic, Severity};
use ariadne::{Color, Config, Label, Report, ReportKind, Source};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for results and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, or pick pretty for a TTY and JSON for pipes.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Severity mapping ────────────────────────────────────────────────────

fn report_kind(severity: &Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        Severity::Warn => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
        _ => ReportKind::Warning,
    }
}

fn severity_color(severity: &Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warn => Color::Yellow,
        Severity::Info => Color::Blue,
        _ => Color::White,
    }
}

fn context_note(diag: &Diagnostic) -> Option<String> {
    let ctx = diag.context.as_ref().filter(|ctx| !ctx.is_empty())?;
    Some(
        ctx.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

// ── Source locations ────────────────────────────────────────────────────

/// Locate the first unconsumed token of a failed text input.
///
/// The remainder is searched for from the end of the input; an empty
/// remainder points just past the last character.
pub(crate) fn failure_span(source: &str, err: &ParseError, separator: &str) -> Range<usize> {
    let end = source.trim_end().len();
    let Some(Token::Text(rest)) = err.remainder.first() else {
        return end..end;
    };
    let first = rest
        .split(|c: char| separator.contains(c))
        .find(|piece| !piece.is_empty())
        .unwrap_or(rest.as_str());
    match source.rfind(rest.as_str()).or_else(|| source.rfind(first)) {
        Some(start) => start..start + first.len(),
        None => end..end,
    }
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// Render one diagnostic to stderr, annotated against `source` when a span
/// is given.
pub(crate) fn render_diagnostic_pretty(
    source: &str,
    name: &str,
    diag: &Diagnostic,
    span: Option<Range<usize>>,
) {
    let Some(span) = span else {
        render_standalone(diag);
        return;
    };
    let start = span.start.min(source.len());
    let end = span.end.min(source.len()).max(start);
    let mut cache = (name, Source::from(source));

    let label = context_note(diag).unwrap_or_else(|| diag.message.clone());
    let mut builder = Report::build(report_kind(&diag.severity), (name, start..end))
        .with_code(diag.id.as_ref())
        .with_message(&diag.message)
        .with_config(Config::default().with_compact(false))
        .with_label(
            Label::new((name, start..end))
                .with_message(label)
                .with_color(severity_color(&diag.severity)),
        );
    if let Some(explanation) = diag.explain() {
        builder = builder.with_help(explanation);
    }
    builder.finish().eprint(&mut cache).ok();
}

fn render_standalone(diag: &Diagnostic) {
    let kind_str = match diag.severity {
        Severity::Error => "error",
        Severity::Warn => "warning",
        Severity::Info => "info",
        _ => "diagnostic",
    };
    eprintln!("{kind_str}[{}]: {}", diag.id, diag.message);
    if let Some(note) = context_note(diag) {
        eprintln!("  = note: {note}");
    }
    if let Some(explanation) = diag.explain() {
        eprintln!("  = help: {explanation}");
    }
}

// ── Summary line ────────────────────────────────────────────────────────

/// Print a coloured summary line, e.g. `2 matched, 1 failed`.
pub(crate) fn print_summary(matched: usize, failed: usize) {
    use ariadne::Fmt;

    if matched + failed == 0 {
        return;
    }
    let mut parts = Vec::new();
    if matched > 0 {
        parts.push(format!("{}", format!("{matched} matched").fg(Color::Green)));
    }
    if failed > 0 {
        parts.push(format!("{}", format!("{failed} failed").fg(Color::Red)));
    }
    eprintln!("{}", parts.join(", "));
}
