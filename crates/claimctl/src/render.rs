//! Output formatting - ASCII section tags, optional color
//!
//! Every renderer returns a `String` so the layout can be tested without a
//! terminal. Sections appear only when they have content; an error result
//! renders the error and nothing else.

use claimcheck_common::{
    AnalysisReport, AnalysisResult, ClaimCheckConfig, ColorMode, ConfigSource, InputDrafts,
    SubmissionMode, Verdict,
};
use owo_colors::OwoColorize;
use std::fmt::Write;
use std::io::IsTerminal;

const THIN_SEPARATOR: &str = "----------------------------------------";

/// Whether to emit ANSI colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    color: bool,
}

impl Style {
    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn colored() -> Self {
        Self { color: true }
    }

    pub fn from_mode(mode: ColorMode) -> Self {
        let color = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
            }
        };
        Self { color }
    }

    fn ok(&self, s: &str) -> String {
        if self.color {
            s.bright_green().to_string()
        } else {
            s.to_string()
        }
    }

    fn err(&self, s: &str) -> String {
        if self.color {
            s.bright_red().to_string()
        } else {
            s.to_string()
        }
    }

    fn warn(&self, s: &str) -> String {
        if self.color {
            s.yellow().to_string()
        } else {
            s.to_string()
        }
    }

    fn dim(&self, s: &str) -> String {
        if self.color {
            s.dimmed().to_string()
        } else {
            s.to_string()
        }
    }

    fn accent(&self, s: &str) -> String {
        if self.color {
            s.cyan().to_string()
        } else {
            s.to_string()
        }
    }

    fn header(&self, s: &str) -> String {
        if self.color {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }
}

/// Tag and paint for a verdict
fn verdict_tag(verdict: Verdict, style: &Style) -> String {
    match verdict {
        Verdict::True => style.ok("[TRUE]"),
        Verdict::False => style.err("[FALSE]"),
        Verdict::Misleading => style.warn("[MISLEADING]"),
        Verdict::Unknown => style.dim("[UNVERIFIED]"),
    }
}

fn bullet_section(out: &mut String, title: &str, items: &[String], style: &Style) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", style.header(title));
    for item in items {
        let _ = writeln!(out, "  * {}", item);
    }
}

pub fn render_result(result: &AnalysisResult, style: &Style) -> String {
    match result {
        AnalysisResult::Error { message, .. } => render_error(message, style),
        AnalysisResult::Report(report) => render_report(report, style),
    }
}

pub fn render_error(message: &str, style: &Style) -> String {
    format!("\n[ERROR] {}\n", style.err(message))
}

pub fn render_report(report: &AnalysisReport, style: &Style) -> String {
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}  Verdict: {}",
        verdict_tag(report.verdict, style),
        report.verdict_display()
    );
    let score = match report.score {
        Some(_) => format!("{}/100", report.score_display()),
        None => report.score_display(),
    };
    let _ = writeln!(out, "Score: {}", score);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", report.explanation_or_placeholder());

    bullet_section(&mut out, "[SUPPORTING POINTS]", &report.supporting_points, style);
    bullet_section(&mut out, "[REFUTING POINTS]", &report.refuting_points, style);
    bullet_section(
        &mut out,
        "[POSSIBLE CONSEQUENCES]",
        &report.possible_consequences,
        style,
    );

    if report.has_guidance() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", style.header("[GUIDANCE]"));
        for tip in &report.guidance_tips {
            let _ = writeln!(out, "  * {}", tip);
        }
        if let Some(resource) = &report.official_resource {
            if let Some(website) = &resource.website {
                let _ = writeln!(out, "  Official website: {}", style.accent(website));
            }
            if let Some(helpline) = &resource.helpline {
                let _ = writeln!(out, "  Helpline: {}", helpline);
            }
        }
    }

    if !report.external_sources.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", style.header("[SOURCES]"));
        for source in &report.external_sources {
            if source.name == source.url {
                let _ = writeln!(out, "  * {}", style.accent(&source.url));
            } else {
                let _ = writeln!(out, "  * {} - {}", source.name, style.accent(&source.url));
            }
        }
    }

    out
}

pub fn render_replies(replies: &[String], style: &Style) -> String {
    let mut out = String::new();
    if replies.is_empty() {
        return out;
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", style.header("[SUGGESTED REPLIES]"));
    for (i, reply) in replies.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, reply);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", style.dim(THIN_SEPARATOR));
    out
}

/// Hint offered under a false/misleading verdict
pub fn render_reply_hint(hint: &str, style: &Style) -> String {
    format!("\n[NOTE] {}\n", style.warn(hint))
}

/// Drafts as shown by the session's `show` command
pub fn render_drafts(drafts: &InputDrafts, style: &Style) -> String {
    let mut out = String::new();
    let marker = |mode: SubmissionMode| {
        if drafts.mode() == mode {
            style.ok("*")
        } else {
            " ".to_string()
        }
    };
    let or_empty = |s: &str| {
        if s.trim().is_empty() {
            style.dim("(empty)")
        } else {
            s.to_string()
        }
    };

    let _ = writeln!(out, "{} claim: {}", marker(SubmissionMode::Text), or_empty(drafts.claim()));
    let _ = writeln!(out, "{} url:   {}", marker(SubmissionMode::Url), or_empty(drafts.url()));
    let _ = write!(out, "{} files:", marker(SubmissionMode::File));
    if drafts.files().is_empty() {
        let _ = writeln!(out, " {}", style.dim("(none)"));
    } else {
        let _ = writeln!(out);
        for (i, file) in drafts.files().iter().enumerate() {
            let _ = writeln!(
                out,
                "    {}. {} ({}, {} bytes)",
                i + 1,
                file.name,
                file.mime,
                file.bytes.len()
            );
        }
    }
    let _ = writeln!(out, "  mode:  {}", drafts.mode());
    out
}

pub fn render_config(config: &ClaimCheckConfig, source: &ConfigSource) -> String {
    let mut out = String::new();
    let kw = 14;
    let _ = writeln!(out, "{:width$} {}", "source", source, width = kw);
    let _ = writeln!(out, "{:width$} {}", "api.base_url", config.api.base_url, width = kw);
    let _ = writeln!(
        out,
        "{:width$} {}s",
        "api.timeout",
        config.api.timeout_secs,
        width = kw
    );
    let _ = writeln!(
        out,
        "{:width$} {}",
        "replies.lang",
        config.replies.language,
        width = kw
    );
    let _ = writeln!(
        out,
        "{:width$} {:?}",
        "output.color",
        config.output.color,
        width = kw
    );
    out
}
