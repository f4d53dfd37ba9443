//! Command handlers for `check` and `config`

use crate::cli::CheckArgs;
use crate::errors::{exit_code_for, EXIT_SUCCESS, EXIT_VALIDATION};
use crate::render::{self, Style};
use crate::spinner::Spinner;
use anyhow::{Context, Result};
use claimcheck_common::{
    ClaimCheckConfig, ConfigSource, FileDraft, HttpTransport, InputDrafts, ReplyState, Session,
    SubmissionMode, SubmitError, Transport,
};
use serde_json::json;

/// Drafts for a one-shot check. `--url` selects URL mode, `--file` file
/// mode, anything else text mode; the positional claim is kept either way.
pub fn drafts_from_args(args: &CheckArgs) -> Result<InputDrafts> {
    let mut drafts = InputDrafts::new();
    if let Some(claim) = &args.claim {
        drafts.set_claim(claim.as_str());
    }

    if let Some(url) = &args.url {
        drafts.select_mode(SubmissionMode::Url);
        drafts.set_url(url.as_str());
    } else if !args.files.is_empty() {
        drafts.select_mode(SubmissionMode::File);
        for path in &args.files {
            let file = FileDraft::from_path(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            drafts.attach(file);
        }
    }

    Ok(drafts)
}

/// Check one claim against the configured service
pub async fn check(config: &ClaimCheckConfig, args: &CheckArgs) -> Result<i32> {
    let transport =
        HttpTransport::from_config(&config.api).context("Failed to set up HTTP client")?;
    let session = Session::new(transport).with_reply_language(config.replies.language.as_str());
    let style = Style::from_mode(config.output.color);
    let drafts = drafts_from_args(args)?;
    run_check(session, drafts, args, &style).await
}

/// Body of `check`, generic over the transport
pub async fn run_check<T: Transport>(
    mut session: Session<T>,
    drafts: InputDrafts,
    args: &CheckArgs,
    style: &Style,
) -> Result<i32> {
    *session.drafts_mut() = drafts;

    let pending = match session.begin_submission() {
        Ok(pending) => pending,
        Err(SubmitError::Invalid(e)) => {
            eprint!("{}", render::render_error(&e.to_string(), style));
            return Ok(EXIT_VALIDATION);
        }
        Err(e) => return Err(e.into()),
    };

    let spinner = if args.json {
        Spinner::hidden()
    } else {
        Spinner::new("Analyzing claim...")
    };
    let outcome = session.transport().send(&pending.request).await;
    spinner.stop();

    let result = session
        .complete_submission(pending.ticket, outcome)
        .cloned()
        .context("Submission was superseded")?;

    let mut reply_error = None;
    if args.replies && session.can_generate_replies() {
        let spinner = if args.json {
            Spinner::hidden()
        } else {
            Spinner::new("Drafting replies...")
        };
        let outcome = session.generate_replies(args.language.as_deref()).await;
        spinner.stop();
        if let Err(e) = outcome {
            reply_error = Some(e.to_string());
        }
    }

    if args.json {
        let output = json!({
            "result": result,
            "replies": session.reply_drafts(),
            "reply_error": reply_error,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(exit_code_for(&result));
    }

    print!("{}", render::render_result(&result, style));

    if result.allows_replies() {
        if args.replies {
            match (session.reply_state(), reply_error) {
                (ReplyState::Done, _) => {
                    print!("{}", render::render_replies(session.reply_drafts(), style))
                }
                (_, Some(message)) => print!("{}", render::render_error(&message, style)),
                _ => {}
            }
        } else {
            print!(
                "{}",
                render::render_reply_hint(
                    "This claim looks false or misleading. Re-run with --replies to draft shareable responses.",
                    style
                )
            );
        }
    } else if args.replies && !result.is_error() {
        print!(
            "{}",
            render::render_reply_hint(
                "Replies are only drafted for false or misleading claims.",
                style
            )
        );
    }
    println!();

    Ok(exit_code_for(&result))
}

/// Print the effective configuration
pub fn show_config(config: &ClaimCheckConfig, source: &ConfigSource) -> Result<i32> {
    print!("{}", render::render_config(config, source));
    Ok(EXIT_SUCCESS)
}
