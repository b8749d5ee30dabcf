//! Report rendering for the table and JSON formats.

use serde_json::{json, Value};
use urbanflux_analysis::DerivationReport;
use urbanflux_core::model::SyncRun;
use urbanflux_sources::{IngestSummary, SyncReport};
use urbanflux_storage::StoreCounts;

use crate::commands::OutputFormat;

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("Error formatting JSON: {e}"),
    }
}

fn sync_report_json(report: &SyncReport) -> Value {
    json!({
        "source": report.source.as_str(),
        "status": report.status().as_str(),
        "pages": report.pages,
        "failed_pages": report.failed_pages,
        "fetched": report.fetched,
        "normalized": report.normalized,
        "rejected": report.rejected,
        "upserted": report.upserted,
        "error": report.error(),
    })
}

pub fn ingest_json(summary: &IngestSummary) -> Value {
    json!({
        "complete": summary.all_complete(),
        "upserted": summary.total_upserted(),
        "sources": summary.reports.iter().map(sync_report_json).collect::<Vec<_>>(),
    })
}

pub fn derive_json(report: &DerivationReport) -> Value {
    json!({
        "computed_at": report.computed_at.to_rfc3339(),
        "processed": report.recompute.processed,
        "written": report.recompute.written,
        "pruned": report.recompute.pruned,
        "batches": report.recompute.batches,
        "failed_locations": report.recompute.failed_location_ids(),
        "cells": report.cells,
    })
}

pub fn status_json(runs: &[SyncRun], counts: &StoreCounts, by_source: &[(String, u64)]) -> Value {
    let runs: Vec<Value> = runs
        .iter()
        .map(|run| {
            json!({
                "id": run.id,
                "source": run.source.as_str(),
                "status": run.status.as_str(),
                "started_at": run.started_at.to_rfc3339(),
                "finished_at": run.finished_at.map(|t| t.to_rfc3339()),
                "since": run.since.map(|t| t.to_rfc3339()),
                "pages": run.pages,
                "upserted": run.upserted,
                "rejected": run.rejected,
                "error": run.error,
            })
        })
        .collect();
    let events: serde_json::Map<String, Value> = by_source
        .iter()
        .map(|(source, n)| (source.clone(), json!(n)))
        .collect();
    json!({
        "counts": {
            "places": counts.places,
            "geocoded_places": counts.geocoded_places,
            "events": counts.events,
            "states": counts.states,
            "heatmap_cells": counts.heatmap_cells,
        },
        "events_by_source": events,
        "runs": runs,
    })
}

pub fn print_ingest(summary: &IngestSummary, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&ingest_json(summary)),
        OutputFormat::Table => {
            println!(
                "{:<18} {:<11} {:>6} {:>9} {:>9} {:>9}",
                "SOURCE", "STATUS", "PAGES", "FETCHED", "REJECTED", "UPSERTED"
            );
            for r in &summary.reports {
                println!(
                    "{:<18} {:<11} {:>6} {:>9} {:>9} {:>9}",
                    r.source.as_str(),
                    r.status().as_str(),
                    r.pages,
                    r.fetched,
                    r.rejected,
                    r.upserted
                );
                if let Some(error) = r.error() {
                    println!("  └ {error}");
                }
            }
        }
    }
}

pub fn print_derive(report: &DerivationReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&derive_json(report)),
        OutputFormat::Table => {
            println!("Derivation at {}", report.computed_at.to_rfc3339());
            println!("  Locations processed: {}", report.recompute.processed);
            println!("  States written:      {}", report.recompute.written);
            println!("  Stale states pruned: {}", report.recompute.pruned);
            println!("  Failed locations:    {}", report.recompute.failed());
            println!("  Heatmap cells:       {}", report.cells);
            for failure in &report.recompute.failures {
                println!("  └ {failure}");
            }
        }
    }
}

pub fn print_status(
    runs: &[SyncRun],
    counts: &StoreCounts,
    by_source: &[(String, u64)],
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => print_json(&status_json(runs, counts, by_source)),
        OutputFormat::Table => {
            println!("Places:        {} ({} geocoded)", counts.places, counts.geocoded_places);
            println!("Events:        {}", counts.events);
            for (source, n) in by_source {
                println!("  {source:<18} {n}");
            }
            println!("States:        {}", counts.states);
            println!("Heatmap cells: {}", counts.heatmap_cells);
            println!();
            println!(
                "{:>5} {:<18} {:<11} {:<25} {:>9}",
                "RUN", "SOURCE", "STATUS", "STARTED", "UPSERTED"
            );
            for run in runs {
                println!(
                    "{:>5} {:<18} {:<11} {:<25} {:>9}",
                    run.id,
                    run.source.as_str(),
                    run.status.as_str(),
                    run.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    run.upserted
                );
            }
        }
    }
}
