//! Saída de terminal do comando `status`.
//!
//! Usa a crate `console` para colorir cada job conforme o status e
//! resume a fila por status ao final.

use std::collections::BTreeMap;

use console::Style;

use crate::queue::is_eligible;
use crate::state_machine::{Job, JobStatus};

/// One printable row of the queue listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRow {
    pub id: String,
    pub status: JobStatus,
    pub attempts: u32,
    pub target: String,
    pub eligible: bool,
}

/// Build the listing rows and per-status counts for a queue snapshot.
pub fn summarize(jobs: &[Job], max_attempts: u32) -> (Vec<JobRow>, BTreeMap<&'static str, usize>) {
    let mut counts = BTreeMap::new();
    let rows = jobs
        .iter()
        .map(|job| {
            *counts.entry(job.status.as_str()).or_insert(0) += 1;
            JobRow {
                id: job.id.clone(),
                status: job.status,
                attempts: job.attempts,
                target: job.job.target.clone(),
                eligible: is_eligible(job, max_attempts),
            }
        })
        .collect();
    (rows, counts)
}

fn status_style(status: JobStatus) -> Style {
    match status {
        JobStatus::Finished => Style::new().green().bold(),
        JobStatus::Crashed => Style::new().red().bold(),
        JobStatus::Error | JobStatus::Failover => Style::new().yellow(),
        JobStatus::Processing => Style::new().cyan(),
        JobStatus::Scheduled => Style::new(),
    }
}

/// Print the queue snapshot to stdout.
pub fn print_status(jobs: &[Job], max_attempts: u32) {
    if jobs.is_empty() {
        println!("  {} queue is empty", Style::new().yellow().apply_to("∅"));
        return;
    }

    let (rows, counts) = summarize(jobs, max_attempts);
    let dim = Style::new().dim();
    let green = Style::new().green();

    for row in &rows {
        let marker = if row.eligible {
            green.apply_to("▶")
        } else if row.status.is_terminal() {
            dim.apply_to("✓")
        } else {
            dim.apply_to("·")
        };
        println!(
            "  {marker} {:<24} {:<12} attempts={:<3} {}",
            row.id,
            status_style(row.status).apply_to(row.status),
            row.attempts,
            dim.apply_to(&row.target)
        );
    }

    let eligible = rows.iter().filter(|r| r.eligible).count();
    println!();
    let summary: Vec<String> = counts
        .iter()
        .map(|(status, n)| format!("{status}={n}"))
        .collect();
    println!("  {} jobs ({eligible} eligible): {}", rows.len(), summary.join(" "));
}
