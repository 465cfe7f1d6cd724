use crate::args::FindMissingArgs;
use crate::context::RunContext;
use crate::output::ConsoleView;
use crate::types::OutputFormat;
use anyhow::{Context, Result};
use nwbpack_engine::PlanOptions;
use nwbpack_types::{Plan, PlanAction};

/// Read-only reconciliation: prints what still needs packaging and what is
/// orphaned, writes nothing, always exits 0 unless a catalog is unreadable.
pub fn find_missing(args: &FindMissingArgs) -> Result<i32> {
    let ctx = RunContext::from_args(&args.catalog)?;

    let sessions = ctx
        .sessions
        .list_sessions(&ctx.filter)
        .context("failed to enumerate raw sessions")?;
    let artifacts = ctx
        .artifacts
        .list_artifacts()
        .context("failed to enumerate existing artifacts")?;

    let plan = nwbpack_engine::plan(&sessions, &artifacts, &PlanOptions::default());

    match args.catalog.format {
        OutputFormat::Json => {
            let pending = Plan {
                items: plan
                    .items
                    .iter()
                    .filter(|item| item.action != PlanAction::Skip)
                    .cloned()
                    .collect(),
                notes: plan.notes.clone(),
            };
            println!("{}", serde_json::to_string_pretty(&pending)?);
        }
        OutputFormat::Plain => {
            ConsoleView::new().render_pending(&plan);
        }
    }

    Ok(0)
}
