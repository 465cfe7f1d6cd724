use is_terminal::IsTerminal;
use nwbpack_types::{BatchResult, ItemOutcome, Plan, PlanAction, PlanItem};
use owo_colors::OwoColorize;

/// Console rendering for plans and batch reports. Color only when stdout
/// is a terminal.
pub struct ConsoleView {
    color: bool,
}

impl Default for ConsoleView {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleView {
    pub fn new() -> Self {
        Self {
            color: std::io::stdout().is_terminal(),
        }
    }

    // Pad before coloring: ANSI escapes would otherwise count toward the
    // column width.
    fn action_cell(&self, action: PlanAction) -> String {
        let text = format!("{:<14}", action.to_string());
        if !self.color {
            return text;
        }
        match action {
            PlanAction::Create => text.green().to_string(),
            PlanAction::Refresh => text.yellow().to_string(),
            PlanAction::ReportOrphan => text.red().to_string(),
            PlanAction::Skip => text.dimmed().to_string(),
        }
    }

    fn outcome_cell(&self, outcome: &ItemOutcome) -> String {
        let text = outcome.to_string();
        if !self.color {
            return text;
        }
        match outcome {
            ItemOutcome::Succeeded { .. } => text.green().to_string(),
            ItemOutcome::Failed { .. } => text.red().to_string(),
            ItemOutcome::Skipped { .. } => text.dimmed().to_string(),
        }
    }

    pub fn render_plan(&self, plan: &Plan) {
        self.render_notes(plan);

        if plan.is_empty() {
            println!("Nothing to do: no sessions and no artifacts found.");
            return;
        }

        println!("{:<28} {:<14} REASON", "SESSION", "ACTION");
        println!("{}", "-".repeat(72));
        for item in &plan.items {
            self.render_plan_row(item);
        }
        println!();
        self.render_plan_summary(plan);
    }

    /// Plan view restricted to items that need attention; used by
    /// find-missing-nwb.
    pub fn render_pending(&self, plan: &Plan) {
        self.render_notes(plan);

        let pending: Vec<&PlanItem> = plan
            .items
            .iter()
            .filter(|item| item.action != PlanAction::Skip)
            .collect();

        if pending.is_empty() {
            println!("All sessions are packaged and up to date.");
            return;
        }

        println!("{:<28} {:<14} REASON", "SESSION", "ACTION");
        println!("{}", "-".repeat(72));
        for item in pending {
            self.render_plan_row(item);
        }
        println!();
        self.render_plan_summary(plan);
    }

    fn render_plan_row(&self, item: &PlanItem) {
        println!(
            "{:<28} {} {}",
            item.session_id,
            self.action_cell(item.action),
            item.reason
        );
    }

    fn render_plan_summary(&self, plan: &Plan) {
        println!(
            "{} sessions: {} create, {} refresh, {} skip, {} orphan",
            plan.len(),
            plan.count(PlanAction::Create),
            plan.count(PlanAction::Refresh),
            plan.count(PlanAction::Skip),
            plan.count(PlanAction::ReportOrphan),
        );
    }

    fn render_notes(&self, plan: &Plan) {
        for note in &plan.notes {
            eprintln!("Warning: {}", note);
        }
    }

    pub fn render_result(&self, result: &BatchResult) {
        if result.rows.is_empty() {
            println!("Nothing to do.");
            return;
        }

        println!("{:<28} {:<14} OUTCOME", "SESSION", "ACTION");
        println!("{}", "-".repeat(72));
        for row in &result.rows {
            println!(
                "{:<28} {} {}",
                row.session_id,
                self.action_cell(row.action),
                self.outcome_cell(&row.outcome)
            );
        }
        println!();

        let summary = format!(
            "{} succeeded, {} failed, {} skipped",
            result.succeeded(),
            result.failed(),
            result.skipped()
        );
        if result.interrupted {
            println!("{} (interrupted)", summary);
        } else {
            println!("{}", summary);
        }
    }

    pub fn render_progress_line(&self, session_id: &nwbpack_types::SessionId, outcome: &ItemOutcome) {
        println!("[{}] {}", session_id, self.outcome_cell(outcome));
    }
}
