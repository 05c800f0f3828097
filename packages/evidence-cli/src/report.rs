//! Terminal output for run summaries and single-post analyses.

use claim_evidence::{EvidenceLevel, ItemAnalysis, ItemOutcome, RunReport};
use colored::{ColoredString, Colorize};

const RULE_WIDTH: usize = 70;
const TOP_TOPICS: usize = 10;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Colour an evidence level by strength.
pub fn level_label(level: EvidenceLevel) -> ColoredString {
    let label = level.as_str();
    match level {
        EvidenceLevel::StrongSupport => label.bright_green().bold(),
        EvidenceLevel::ModerateSupport => label.green(),
        EvidenceLevel::WeakSupport => label.yellow(),
        EvidenceLevel::Mixed => label.bright_yellow(),
        EvidenceLevel::NoClearSupport => label.bright_black(),
        EvidenceLevel::Unknown => label.dimmed(),
        EvidenceLevel::Error => label.red().bold(),
    }
}

/// Print the summary of a batch run.
pub fn print_run_summary(report: &RunReport) {
    let summary = &report.summary;

    println!();
    println!("{}", "Evidence Summary:".bold());
    println!("  Items processed:       {}", report.items_total());
    println!("  Items skipped (empty): {}", report.items_skipped());
    println!("  Total claims analyzed: {}", summary.total);

    println!();
    println!("  Evidence levels:");
    for level in EvidenceLevel::ALL.into_iter().filter(|l| !l.is_error()) {
        let count = summary.count(level);
        if count > 0 {
            println!("    {:<20} {}", level_label(level), count);
        }
    }

    let errors = summary.error_count();
    let rate = format!("{:.1}%", summary.failure_rate() * 100.0);
    if errors > 0 {
        println!(
            "    {:<20} {} ({} of claims)",
            level_label(EvidenceLevel::Error),
            errors,
            rate.red()
        );
    } else {
        println!("    {:<20} 0", "error".dimmed());
    }

    if !summary.topics.is_empty() {
        println!();
        println!(
            "  Topics ({} distinct), most frequent:",
            summary.topics.len()
        );
        for (topic, count) in summary.top_topics(TOP_TOPICS) {
            let topic = if topic.is_empty() {
                "(none)"
            } else {
                topic.as_str()
            };
            println!("    {:<28} {}", topic, count);
        }
    }

    let failed: Vec<_> = report.failed_items().collect();
    if !failed.is_empty() {
        println!();
        let heading = format!("Extraction failed for {} item(s):", failed.len());
        println!("  {}", heading.red());
        for (item_id, cause) in failed {
            println!("    {} {}", item_id.bold(), cause);
        }
    }
}

/// Print a single-post analysis: each claim with its verdict and references.
pub fn print_analysis(title: &str, analysis: &ItemAnalysis) {
    println!("{}", rule());
    println!("{}", "ANALYZING POST".bold());
    println!("{}", rule());
    println!("\nTitle: {}", title);
    println!("{}", "-".repeat(RULE_WIDTH));

    match &analysis.outcome {
        ItemOutcome::Skipped { .. } => {
            println!("\n{}", "Post has no text to analyze".yellow());
            return;
        }
        ItemOutcome::Failed { cause, .. } => {
            println!("\n{} {}", "Claim extraction failed:".red().bold(), cause);
            return;
        }
        ItemOutcome::Processed { claims, .. } if claims.is_empty() => {
            println!(
                "\n{}",
                "No specific longevity claims found in this post".yellow()
            );
            return;
        }
        ItemOutcome::Processed { .. } => {}
    }

    let total = analysis.claims.len();
    for (i, evaluation) in analysis.claims.iter().enumerate() {
        let claim = &evaluation.record.claim;
        let verdict = &evaluation.record.verdict;

        println!();
        let heading = format!("Claim {}/{}:", i + 1, total);
        println!("{} {}", heading.cyan().bold(), claim.text);
        println!(
            "  topic: {}  kind: {}  direction: {}  target: {}",
            claim.topic, claim.kind, claim.direction, claim.target
        );
        println!("  Evidence: {}", level_label(verdict.evidence_level));
        println!("  {}", verdict.explanation);

        if let Some(stage) = evaluation.outcome.failed_stage() {
            println!("  {}", format!("(failed after stage: {})", stage).red());
        }

        if evaluation.references.is_empty() {
            println!("  References: {}", "none found".dimmed());
        } else {
            println!("  References:");
            for reference in &evaluation.references {
                println!(
                    "    - {} ({}, {}) [PMID: {}]",
                    reference.title, reference.venue, reference.publication_date, reference.id
                );
            }
        }
    }
    println!();
}
