//! Describe command handler

use crate::cli::DescribeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::handlers::utils::{DocumentRef, Loader};
use crate::output::OutputWriter;
use tracing::instrument;

/// Handle the describe command
#[instrument(skip(config, output), fields(schema = %args.schema))]
pub async fn handle_describe(
    args: DescribeArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let reference = DocumentRef::parse(&args.schema)?;
    let metadata = Loader::new(config, config.validation.timeout())
        .metadata(&reference)
        .await?;

    if args.markdown {
        output.write(&metadata.to_markdown())
    } else {
        output.metadata(&metadata)
    }
}
