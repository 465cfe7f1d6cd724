use crate::args::PackageArgs;
use crate::context::RunContext;
use crate::output::ConsoleView;
use crate::types::OutputFormat;
use anyhow::{Context, Result};
use nwbpack_engine::PlanOptions;
use nwbpack_runtime::{
    BatchDriver, BatchOptions, BatchProgress, CommandWriter, Executor, ShutdownFlag,
};

/// Full pipeline: catalogs -> plan -> batch execution -> report.
///
/// Returns the process exit code: 0 when everything succeeded or was
/// skipped, 2 when some items failed. Fatal errors (unreadable catalog,
/// bad config) bubble out as `Err` and exit 1 before any table is printed.
pub fn package(args: &PackageArgs) -> Result<i32> {
    let ctx = RunContext::from_args(&args.catalog)?;

    let sessions = ctx
        .sessions
        .list_sessions(&ctx.filter)
        .context("failed to enumerate raw sessions")?;
    let artifacts = ctx
        .artifacts
        .list_artifacts()
        .context("failed to enumerate existing artifacts")?;

    let plan = nwbpack_engine::plan(&sessions, &artifacts, &PlanOptions { force: args.force });

    let view = ConsoleView::new();

    if args.dry_run {
        match args.catalog.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
            OutputFormat::Plain => view.render_plan(&plan),
        }
        return Ok(0);
    }

    let shutdown = ShutdownFlag::new();
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            eprintln!("shutdown requested; letting in-flight sessions finish");
            shutdown.request();
        })
        .context("failed to install shutdown handler")?;
    }

    let writer = CommandWriter::new(ctx.config.writer.command.clone());
    let executor = Executor::new(writer, ctx.artifacts);
    let concurrency = args.concurrency.unwrap_or(ctx.config.concurrency);
    let driver = BatchDriver::new(executor, BatchOptions { concurrency });

    let verbose = !args.quiet && args.catalog.format == OutputFormat::Plain;
    let result = driver.run(&plan, &sessions, &shutdown, |progress| {
        if !verbose {
            return;
        }
        match progress {
            BatchProgress::Started { actionable, total } => {
                println!("{} of {} sessions need packaging", actionable, total);
            }
            BatchProgress::ItemStarted { session_id } => {
                println!("[{}] packaging...", session_id);
            }
            BatchProgress::ItemFinished { session_id, outcome } => {
                view.render_progress_line(&session_id, &outcome);
            }
            BatchProgress::Interrupted { undispatched } => {
                eprintln!("interrupted: {} sessions were not dispatched", undispatched);
            }
            BatchProgress::Completed { .. } => {}
        }
    });

    match args.catalog.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Plain => {
            if verbose {
                println!();
            }
            for note in &plan.notes {
                eprintln!("Warning: {}", note);
            }
            view.render_result(&result);
        }
    }

    Ok(result.exit_code())
}
