//! Render command handler

use crate::cli::{RenderArgs, RenderFormat};
use crate::config::Config;
use crate::error::Result;
use crate::handlers::utils::{decode_submission, is_empty_submission, DocumentRef, Loader};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use formwork_schemas::{Renderer, Validator, ValidatorConfig};
use std::fs;
use tracing::{debug, info, instrument};

/// Handle the render command
#[instrument(skip(config, output), fields(schema = %args.schema, ui = %args.ui))]
pub async fn handle_render(
    args: RenderArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details("render_command", &args.ui);
    let schema_ref = DocumentRef::parse(&args.schema)?;
    let ui_ref = DocumentRef::parse(&args.ui)?;

    let loader = Loader::new(config, config.validation.timeout());
    let schema = loader.schema(&schema_ref).await?;
    let ui = loader.ui_schema(&ui_ref).await?;

    let data = if is_empty_submission(&args.submission) {
        None
    } else {
        Some(decode_submission(&args.submission)?)
    };
    let errors = args.with_errors.then(|| {
        let validator_config = ValidatorConfig {
            mode: config.validation.mode,
        };
        Validator::with_config(&schema, validator_config).validate(&data.clone().unwrap_or_default())
    });
    debug!(
        prefilled = data.is_some(),
        errors = errors.as_ref().map_or(0, |e| e.len()),
        "Rendering form"
    );

    let view = Renderer::new(&schema).render(&ui, data.as_ref(), errors.as_ref());
    for scope in view.unresolved() {
        output.warning(&format!("Skipped control with unresolved scope {}", scope))?;
    }

    let rendered = match args.format.unwrap_or(config.render.format) {
        RenderFormat::Html => view.to_html(),
        RenderFormat::Json => serde_json::to_string_pretty(&view)? + "\n",
    };

    match &args.save_to {
        Some(path) => {
            fs::write(path, &rendered)?;
            info!(path = %path.display(), bytes = rendered.len(), "Saved rendered form");
            output.success(&format!("✓ Form written to {}", path.display()))
        }
        None => output.write(&rendered),
    }
}
