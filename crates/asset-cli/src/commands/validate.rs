//! Validate command implementation

use std::time::Duration;

use colored::Colorize;

use asset_core::{Credential, RenderInput, RenderValidator};
use asset_remote::GitLabRenderer;

use crate::cli::ValidateArgs;
use crate::error::{CliError, Result};

/// Run the validate command
///
/// Rendered HTML goes to `--output`, or to stdout when none is given; status
/// lines then go to stderr so the HTML can be piped.
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    let input = match (&args.file, &args.markdown) {
        (Some(path), _) => RenderInput::File(path.clone()),
        (None, Some(text)) => RenderInput::Inline(text.clone()),
        (None, None) => return Err(CliError::user("Pass --file or --markdown")),
    };
    // Checked before the client is built so a missing token always exits 2.
    let credential = Credential::from_token(args.token.as_deref())?;

    let renderer = GitLabRenderer::new(&args.gitlab_url, Duration::from_secs(args.timeout_secs))?;
    let result = RenderValidator::new(renderer).validate(
        Some(&credential),
        &input,
        args.project.as_deref(),
    )?;

    match &args.output {
        Some(path) => {
            result.persist(path)?;
            println!(
                "{} Rendered {} byte(s) of markdown; wrote {}",
                "OK".green().bold(),
                result.input_len,
                path.display().to_string().cyan()
            );
        }
        None => {
            println!("{}", result.rendered_output);
            eprintln!(
                "{} Rendered {} byte(s) of markdown",
                "OK".green().bold(),
                result.input_len
            );
        }
    }
    Ok(())
}
