//! Interactive session
//!
//! Plain input sets the claim draft; slash commands switch modes, stage
//! URLs and files, submit, and draft replies. Drafts for every mode live
//! for the whole session.

use crate::errors::EXIT_SUCCESS;
use crate::render::{self, Style};
use crate::spinner::Spinner;
use anyhow::{Context, Result};
use claimcheck_common::{
    ClaimCheckConfig, FileDraft, HttpTransport, ReplyState, Session, SubmissionMode, Transport,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const HELP: &str = "\
Type a claim to set the claim draft, then /submit.

  /mode text|url|file   switch input mode (drafts are kept)
  /url <address>        set the URL draft
  /attach <path>        stage a file (png, jpg, pdf)
  /detach <n>           remove staged file number n
  /show                 show drafts and the active mode
  /clear                clear all drafts
  /submit               check the active mode's input
  /replies [language]   draft replies for a false or misleading verdict
  /help                 this text
  /quit                 leave the session
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Claim(String),
    Mode(SubmissionMode),
    Url(String),
    Attach(PathBuf),
    Detach(usize),
    Show,
    Clear,
    Submit,
    Replies(Option<String>),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

/// Parse one line of session input
pub fn parse_command(input: &str) -> SessionCommand {
    let input = input.trim();
    if input.is_empty() {
        return SessionCommand::Empty;
    }

    let Some(rest) = input.strip_prefix('/') else {
        return SessionCommand::Claim(input.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match (name.to_lowercase().as_str(), arg) {
        ("mode", "") => SessionCommand::Invalid("Usage: /mode text|url|file".to_string()),
        ("mode", arg) => match arg.parse() {
            Ok(mode) => SessionCommand::Mode(mode),
            Err(e) => SessionCommand::Invalid(e),
        },
        ("url", "") => SessionCommand::Invalid("Usage: /url <address>".to_string()),
        ("url", arg) => SessionCommand::Url(arg.to_string()),
        ("attach", "") => SessionCommand::Invalid("Usage: /attach <path>".to_string()),
        ("attach", arg) => SessionCommand::Attach(PathBuf::from(arg)),
        ("detach", arg) => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => SessionCommand::Detach(n),
            _ => SessionCommand::Invalid("Usage: /detach <n> (see /show)".to_string()),
        },
        ("show", _) => SessionCommand::Show,
        ("clear", _) => SessionCommand::Clear,
        ("submit", _) | ("check", _) => SessionCommand::Submit,
        ("replies", "") => SessionCommand::Replies(None),
        ("replies", arg) => SessionCommand::Replies(Some(arg.to_string())),
        ("help", _) | ("?", _) => SessionCommand::Help,
        ("quit", _) | ("exit", _) | ("q", _) => SessionCommand::Quit,
        (other, _) => SessionCommand::Invalid(format!(
            "Unknown command '/{}'. Type /help for commands.",
            other
        )),
    }
}

/// What one command produced
#[derive(Debug, Default)]
pub struct Step {
    pub output: String,
    pub quit: bool,
}

impl Step {
    fn show(output: String) -> Self {
        Self {
            output,
            quit: false,
        }
    }
}

/// Apply one command to the session
pub async fn execute<T: Transport>(
    session: &mut Session<T>,
    command: SessionCommand,
    style: &Style,
) -> Step {
    match command {
        SessionCommand::Empty => Step::default(),
        SessionCommand::Claim(claim) => {
            session.drafts_mut().set_claim(claim);
            Step::show(format!("Claim draft set ({} mode).\n", session.drafts().mode()))
        }
        SessionCommand::Mode(mode) => {
            session.drafts_mut().select_mode(mode);
            Step::show(format!("Mode: {}\n", mode))
        }
        SessionCommand::Url(url) => {
            session.drafts_mut().set_url(url);
            Step::show("URL draft set.\n".to_string())
        }
        SessionCommand::Attach(path) => match FileDraft::from_path(&path) {
            Ok(file) => {
                let note = if file.is_supported() {
                    String::new()
                } else {
                    " (unsupported type, the service may reject it)".to_string()
                };
                let line = format!("Attached {}{}.\n", file.name, note);
                session.drafts_mut().attach(file);
                Step::show(line)
            }
            Err(e) => Step::show(render::render_error(
                &format!("Failed to read {}: {}", path.display(), e),
                style,
            )),
        },
        SessionCommand::Detach(n) => match session.drafts_mut().remove_file(n - 1) {
            Some(file) => Step::show(format!("Removed {}.\n", file.name)),
            None => Step::show(render::render_error(&format!("No file number {}.", n), style)),
        },
        SessionCommand::Show => Step::show(render::render_drafts(session.drafts(), style)),
        SessionCommand::Clear => {
            session.drafts_mut().clear();
            Step::show("Drafts cleared.\n".to_string())
        }
        SessionCommand::Submit => Step::show(submit(session, style).await),
        SessionCommand::Replies(language) => {
            Step::show(replies(session, language.as_deref(), style).await)
        }
        SessionCommand::Help => Step::show(HELP.to_string()),
        SessionCommand::Quit => Step {
            output: String::new(),
            quit: true,
        },
        SessionCommand::Invalid(message) => Step::show(render::render_error(&message, style)),
    }
}

async fn submit<T: Transport>(session: &mut Session<T>, style: &Style) -> String {
    let pending = match session.begin_submission() {
        Ok(pending) => pending,
        Err(e) => return render::render_error(&e.to_string(), style),
    };

    let spinner = Spinner::new("Analyzing claim...");
    let outcome = session.transport().send(&pending.request).await;
    spinner.stop();

    match session.complete_submission(pending.ticket, outcome) {
        Some(result) => {
            let mut out = render::render_result(result, style);
            if result.allows_replies() {
                out.push_str(&render::render_reply_hint(
                    "Type /replies to draft shareable responses.",
                    style,
                ));
            }
            out
        }
        None => render::render_error("Submission was superseded.", style),
    }
}

async fn replies<T: Transport>(
    session: &mut Session<T>,
    language: Option<&str>,
    style: &Style,
) -> String {
    let pending = match session.begin_replies(language) {
        Ok(pending) => pending,
        Err(e) => return render::render_error(&e.to_string(), style),
    };

    let spinner = Spinner::new("Drafting replies...");
    let outcome = session.transport().send(&pending.request).await;
    spinner.stop();
    session.complete_replies(pending.ticket, outcome);

    match session.reply_state() {
        ReplyState::Done => render::render_replies(session.reply_drafts(), style),
        ReplyState::Failed { message } => render::render_error(
            &format!(
                "Could not generate replies: {}. Type /replies to try again.",
                message
            ),
            style,
        ),
        _ => String::new(),
    }
}

fn print_prompt(mode: SubmissionMode) {
    print!("[{}] > ", mode);
    let _ = io::stdout().flush();
}

/// Run the session until /quit or end of input
pub async fn run(config: &ClaimCheckConfig) -> Result<i32> {
    let transport =
        HttpTransport::from_config(&config.api).context("Failed to set up HTTP client")?;
    let mut session =
        Session::new(transport).with_reply_language(config.replies.language.as_str());
    let style = Style::from_mode(config.output.color);

    println!("Claim Check session ({})", config.api.base_url);
    println!("Type a claim, or /help for commands.");
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_prompt(session.drafts().mode());

        let input = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprint!("{}", render::render_error(&format!("Error reading input: {}", e), &style));
                continue;
            }
            None => break,
        };

        let step = execute(&mut session, parse_command(&input), &style).await;
        print!("{}", step.output);
        if step.quit {
            break;
        }
    }

    println!();
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_claim() {
        assert_eq!(
            parse_command("  Submit your taxes by Friday or be fined  "),
            SessionCommand::Claim("Submit your taxes by Friday or be fined".to_string())
        );
    }

    #[test]
    fn test_slash_commands() {
        assert_eq!(parse_command("/mode URL"), SessionCommand::Mode(SubmissionMode::Url));
        assert_eq!(
            parse_command("/url https://example.com"),
            SessionCommand::Url("https://example.com".to_string())
        );
        assert_eq!(
            parse_command("/attach ./shot one.png"),
            SessionCommand::Attach(PathBuf::from("./shot one.png"))
        );
        assert_eq!(parse_command("/detach 2"), SessionCommand::Detach(2));
        assert_eq!(parse_command("/submit"), SessionCommand::Submit);
        assert_eq!(parse_command("/replies"), SessionCommand::Replies(None));
        assert_eq!(
            parse_command("/replies Tamil"),
            SessionCommand::Replies(Some("Tamil".to_string()))
        );
        assert_eq!(parse_command("/QUIT"), SessionCommand::Quit);
        assert_eq!(parse_command(""), SessionCommand::Empty);
    }

    #[test]
    fn test_invalid_commands() {
        assert!(matches!(parse_command("/mode"), SessionCommand::Invalid(_)));
        assert!(matches!(parse_command("/mode video"), SessionCommand::Invalid(_)));
        assert!(matches!(parse_command("/detach 0"), SessionCommand::Invalid(_)));
        assert!(matches!(parse_command("/detach x"), SessionCommand::Invalid(_)));
        assert!(matches!(parse_command("/frobnicate"), SessionCommand::Invalid(_)));
    }
}
