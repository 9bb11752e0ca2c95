//! Score command handler
//!
//! Computes per-student GA scores for one assessment and optionally stores
//! them back on each result.

use super::load_store;
use ga_analytics::config::Config;
use ga_analytics::core::engine::{percentage, score_assessment, validate_assessment_weights};
use ga_analytics::core::models::GaScore;
use ga_analytics::{error, info, warn};
use std::fmt::Write;
use std::process::ExitCode;

/// Run the score command
pub fn run(assessment_id: &str, write: bool, config: &Config) -> ExitCode {
    let policy = match config.level_policy() {
        Ok(policy) => policy,
        Err(e) => {
            eprintln!("✗ {e}");
            return ExitCode::FAILURE;
        }
    };
    let Some(mut store) = load_store(config) else {
        return ExitCode::FAILURE;
    };
    let Some(assessment) = store.get_assessment(assessment_id).cloned() else {
        eprintln!("✗ Unknown assessment '{assessment_id}'");
        return ExitCode::FAILURE;
    };

    for warning in validate_assessment_weights(&assessment, config.scoring.weight_tolerance) {
        warn!("{warning}");
    }

    let results: Vec<_> = store
        .results_for_assessment(assessment_id)
        .into_iter()
        .cloned()
        .collect();
    info!(
        "Scoring {} result(s) of {} with {policy} levels",
        results.len(),
        assessment.label()
    );

    let mut scored = Vec::with_capacity(results.len());
    let mut failures = 0usize;
    for result in &results {
        let scored_result = percentage(&assessment, result)
            .and_then(|pct| score_assessment(&assessment, result, policy).map(|scores| (pct, scores)));
        match scored_result {
            Ok((pct, scores)) => {
                println!(
                    "{:<38} {:>6.1}% {}",
                    result.student_id,
                    pct,
                    format_scores(&scores)
                );
                scored.push((result.id.clone(), scores));
            }
            Err(e) => {
                failures += 1;
                error!("Result '{}': {e}", result.id);
                eprintln!("✗ {e}");
            }
        }
    }

    if write && !scored.is_empty() {
        for (id, scores) in scored {
            if let Some(stored) = store.get_result_mut(&id) {
                stored.ga_scores = scores;
            }
        }
        if let Err(e) = store.save(&config.store_path()) {
            eprintln!("✗ {e}");
            return ExitCode::FAILURE;
        }
        println!("✓ Stored GA scores in {}", config.store_path().display());
    }

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn format_scores(scores: &[GaScore]) -> String {
    scores.iter().fold(String::new(), |mut line, s| {
        let _ = write!(line, " {}={}/{} ({})", s.ga_code, s.score, s.weightage, s.level);
        line
    })
}
