//! Validation command handler

use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::handlers::utils::{decode_submission, DocumentRef, Loader};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use formwork_schemas::{ValidationErrors, Validator, ValidatorConfig};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Handle the validate command
#[instrument(skip(config, output), fields(schema = %args.schema, mode = ?args.mode))]
pub async fn handle_validate(
    args: ValidateArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details("validate_command", &args.schema);
    let reference = DocumentRef::parse(&args.schema)?;
    let timeout = args
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.validation.timeout());
    let mode = args.mode.map(Into::into).unwrap_or(config.validation.mode);

    output.info(&format!("Validating submission against {}", args.schema))?;
    let schema = Loader::new(config, timeout).schema(&reference).await?;
    let data = decode_submission(&args.submission)?;
    debug!(fields = data.len(), ?mode, "Decoded submission");

    let errors = {
        let _validation_timer = Timer::new("submission_validation");
        Validator::with_config(&schema, ValidatorConfig { mode }).validate(&data)
    };

    report(&errors, output)?;
    if errors.is_empty() {
        info!("Submission is valid");
        Ok(())
    } else {
        warn!(errors = errors.len(), "Submission failed validation");
        Err(Error::ValidationFailed {
            count: errors.len(),
        })
    }
}

fn report(errors: &ValidationErrors, output: &mut OutputWriter) -> Result<()> {
    if !output.is_human() {
        return output.validation_errors(errors);
    }
    if errors.is_empty() {
        output.success("✓ Submission is valid")
    } else {
        output.validation_errors(errors)
    }
}
