use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::cases::{Case, CaseQueue};
use crate::models::{RegistryStatus, RiskLabel};
use crate::risk::Assessment;

fn label_color(label: RiskLabel) -> Color {
    match label {
        RiskLabel::Low => Color::Green,
        RiskLabel::Medium => Color::Yellow,
        RiskLabel::High => Color::Red,
    }
}

fn label_badge(label: RiskLabel) -> ColoredString {
    match label {
        RiskLabel::Low => "LOW".green().bold(),
        RiskLabel::Medium => "MEDIUM".yellow().bold(),
        RiskLabel::High => "HIGH".red().bold(),
    }
}

fn status_color(status: Option<RegistryStatus>) -> Color {
    match status {
        Some(RegistryStatus::Active) => Color::Green,
        Some(RegistryStatus::Inactive) => Color::Yellow,
        Some(RegistryStatus::Dissolved) => Color::Red,
        Some(RegistryStatus::Other) => Color::Magenta,
        Some(RegistryStatus::Unknown) | None => Color::DarkGrey,
    }
}

fn yes_no(value: bool) -> Cell {
    if value {
        Cell::new("yes").fg(Color::Green)
    } else {
        Cell::new("no").fg(Color::DarkGrey)
    }
}

fn bold_header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|n| Cell::new(n).add_attribute(Attribute::Bold))
        .collect()
}

/// Render a single counterparty assessment.
pub fn render_assessment(assessment: &Assessment, verbose: bool, quiet: bool) -> Result<()> {
    let result = assessment.result();

    if quiet {
        println!("{}: {} ({})", assessment.name, result.score, result.label);
        return Ok(());
    }

    println!("\n {} v{}", "kyb-risk".bold(), env!("CARGO_PKG_VERSION"));
    println!(" Counterparty: {}\n", assessment.name);

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "RISK".bold());
    println!(
        " │  {:<48} │",
        format!("Score : {:>3} / 100   {}", result.score, label_badge(result.label))
    );
    if let Some(rule) = assessment.breakdown.override_applied {
        println!(" │  {:<48} │", format!("Override : {}", rule));
    }
    println!(" └────────────────────────────────────────────────────┘\n");

    let registry = &assessment.registry;
    let mut checks = Table::new();
    checks
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(bold_header(&["Check", "Result", "Detail"]));

    let registry_detail = if registry.matched {
        format!(
            "#{} ({}) incorporated {}",
            registry.company_number.as_deref().unwrap_or("?"),
            registry.jurisdiction.as_deref().unwrap_or("?"),
            registry.incorporation_date.as_deref().unwrap_or("?"),
        )
    } else {
        "no registry match".to_string()
    };
    checks.add_row(vec![
        Cell::new("Registry"),
        Cell::new(
            registry
                .status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
        )
        .fg(status_color(registry.status)),
        Cell::new(registry_detail),
    ]);

    let sanctions = &assessment.sanctions;
    let (sanctions_result, sanctions_color) = if sanctions.matched {
        ("✗ match", Color::Red)
    } else {
        ("✓ clear", Color::Green)
    };
    checks.add_row(vec![
        Cell::new("Sanctions"),
        Cell::new(sanctions_result).fg(sanctions_color),
        Cell::new(format!(
            "best score {}{}",
            sanctions.score,
            sanctions
                .matched_name
                .as_deref()
                .map(|n| format!(", {}", n))
                .unwrap_or_default()
        )),
    ]);
    println!("{}", checks);

    if verbose {
        let s = &assessment.signals;
        let mut signals = Table::new();
        signals
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(bold_header(&["Signal", "Value"]));
        signals.add_row(vec![Cell::new("registry_match"), yes_no(s.registry_match)]);
        signals.add_row(vec![Cell::new("is_active"), yes_no(s.is_active)]);
        signals.add_row(vec![Cell::new("age_gte_3"), yes_no(s.age_gte_3)]);
        signals.add_row(vec![
            Cell::new("company_age_actual"),
            Cell::new(format!("{} years", s.company_age_actual)),
        ]);
        signals.add_row(vec![Cell::new("sanctions_match"), yes_no(s.sanctions_match)]);
        signals.add_row(vec![Cell::new("address_mismatch"), yes_no(s.address_mismatch)]);
        signals.add_row(vec![Cell::new("first_time_bank"), yes_no(s.first_time_bank)]);
        println!("\n{}", signals);

        let mut rules = Table::new();
        rules
            .load_preset(UTF8_FULL)
            .set_header(bold_header(&["Rule", "Delta"]));
        for c in &assessment.breakdown.contributions {
            rules.add_row(vec![
                Cell::new(c.rule),
                Cell::new(format!("{:+}", c.delta)).set_alignment(CellAlignment::Right),
            ]);
        }
        rules.add_row(vec![
            Cell::new("base").add_attribute(Attribute::Bold),
            Cell::new(assessment.breakdown.base.to_string()).set_alignment(CellAlignment::Right),
        ]);
        println!("\n{}", rules);
    }

    Ok(())
}

/// Render a summary table for a batch of assessments.
pub fn render_batch(assessments: &[Assessment], quiet: bool) -> Result<()> {
    let count = |label: RiskLabel| {
        assessments
            .iter()
            .filter(|a| a.result().label == label)
            .count()
    };
    let (low, medium, high) = (count(RiskLabel::Low), count(RiskLabel::Medium), count(RiskLabel::High));

    if quiet {
        println!(
            "Total: {}  Low: {}  Medium: {}  High: {}",
            assessments.len(),
            low.to_string().green(),
            medium.to_string().yellow(),
            high.to_string().red(),
        );
        return Ok(());
    }

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Counterparties : {}", assessments.len()));
    println!(" │  {:<48} │", format!("{}  Low          : {:>4}", "✓".green(), low));
    println!(" │  {:<48} │", format!("{}  Medium       : {:>4}", "⚠".yellow(), medium));
    println!(" │  {:<48} │", format!("{}  High         : {:>4}", "✗".red(), high));
    println!(" └────────────────────────────────────────────────────┘\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(bold_header(&[
            "Name", "Registry", "Status", "Age", "Sanctions", "Score", "Label",
        ]));

    for a in assessments {
        let result = a.result();
        table.add_row(vec![
            Cell::new(&a.name),
            yes_no(a.registry.matched),
            Cell::new(
                a.registry
                    .status
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            )
            .fg(status_color(a.registry.status)),
            Cell::new(a.signals.company_age_actual).set_alignment(CellAlignment::Right),
            Cell::new(a.sanctions.matched_name.as_deref().unwrap_or("-")),
            Cell::new(result.score).set_alignment(CellAlignment::Right),
            Cell::new(result.label.to_string())
                .fg(label_color(result.label))
                .set_alignment(CellAlignment::Center),
        ]);
    }

    println!("{}", table);
    Ok(())
}

/// Render the approvals queue: high-priority cases first, then pending.
pub fn render_queue(queue: &CaseQueue) -> Result<()> {
    if queue.high_priority.is_empty() && queue.pending.is_empty() {
        println!(" No cases awaiting review.");
        return Ok(());
    }

    if !queue.high_priority.is_empty() {
        println!(" {} High priority approvals:\n", "[HIGH]".red().bold());
        render_case_table(&queue.high_priority, Color::Red);
        println!();
    }

    if !queue.pending.is_empty() {
        println!(" {} Pending approvals:\n", "[PENDING]".cyan().bold());
        render_case_table(&queue.pending, Color::Cyan);
        println!();
    }

    Ok(())
}

fn render_case_table(cases: &[Case], score_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(bold_header(&[
            "Case ID",
            "Vendor",
            "Risk Score",
            "Last Submission",
            "Assigned To",
            "Status",
        ]));

    for c in cases {
        table.add_row(vec![
            Cell::new(&c.case_id),
            Cell::new(&c.vendor),
            Cell::new(c.risk_score)
                .fg(score_color)
                .set_alignment(CellAlignment::Right),
            Cell::new(&c.last_submission),
            Cell::new(&c.assigned_to),
            Cell::new(&c.status),
        ]);
    }

    println!("{}", table);
}
