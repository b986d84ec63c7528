//! Decode command handler

use crate::cli::DecodeArgs;
use crate::error::{Error, Result};
use crate::handlers::utils::{decode_submission, is_empty_submission};
use crate::output::OutputWriter;
use tracing::instrument;

/// Handle the decode command
#[instrument(skip_all)]
pub fn handle_decode(args: DecodeArgs, output: &mut OutputWriter) -> Result<()> {
    if is_empty_submission(&args.submission) {
        return Err(Error::invalid_args("provide --data or at least one --field"));
    }
    let data = decode_submission(&args.submission)?;
    output.data(&data)
}
