use std::{collections::HashMap, path::PathBuf};

use anyhow::{Context as _, bail};
use clusterbench_engine::{EntityId, Position};
use clusterbench_evaluator::cluster_scorer::ClusterScorer;

use crate::{
    schema::record::{BlockPosition, ScoreReport},
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ScoreArg {
    /// Scenario JSON file written by `generate`
    #[arg(long)]
    scenario: PathBuf,
    /// JSON list of `{ "id", "position" }` overriding block positions
    #[arg(long)]
    positions: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ScoreArg) -> anyhow::Result<()> {
    let ScoreArg {
        scenario,
        positions,
        output,
    } = arg;
    let record = util::read_scenario_file(scenario)?;
    let overrides = match positions {
        Some(path) => util::read_positions_file(path)?,
        None => vec![],
    };

    let mut live = record
        .scenario
        .blocks
        .iter()
        .map(|block| (block.id, block.pose.position))
        .collect::<HashMap<EntityId, Position>>();
    apply_overrides(&mut live, &overrides)?;

    // a parsed scenario lists exactly its blocks in the partition
    let lookup = |id: EntityId| live[&id];
    let score = ClusterScorer::new()
        .score(&record.scenario.partition, &lookup)
        .with_context(|| format!("Failed to score {}", scenario.display()))?;

    eprintln!("{} (seed {})", record.env_name, record.seed);
    eprintln!(
        "  Correct: {}/{} ({:.1}%)",
        score.n_correct,
        score.n_blocks,
        score.frac_correct * 100.0
    );
    eprintln!("  Score:   {:.3}", score.score);

    let report = ScoreReport {
        env_name: record.env_name,
        seed: record.seed,
        moved_blocks: overrides.len(),
        score,
    };
    Output::save_json(&report, output.clone())?;

    Ok(())
}

fn apply_overrides(
    live: &mut HashMap<EntityId, Position>,
    overrides: &[BlockPosition],
) -> anyhow::Result<()> {
    for BlockPosition { id, position } in overrides {
        let Some(slot) = live.get_mut(id) else {
            bail!("Block {id} is not part of the scenario");
        };
        *slot = *position;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use chrono::Utc;
    use clusterbench_engine::{ClusterEpisode, Preset, ScenarioSeed, TaskVariant};

    use super::*;
    use crate::schema::record::ScenarioRecord;

    fn temp_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!(
            "clusterbench_score_{label}_{}_{nanos}.json",
            std::process::id()
        ))
    }

    fn write_demo_record(label: &str) -> (PathBuf, ScenarioRecord) {
        let variant = TaskVariant::Colour;
        let config = Preset::Demo.config(variant);
        let seed = ScenarioSeed::from_bytes([0; 16]);
        let episode = ClusterEpisode::reset(variant, config, seed).unwrap();
        let initial_score = ClusterScorer::new()
            .score(&episode.scenario().partition, episode.world())
            .unwrap();
        let record = ScenarioRecord {
            generated_at: Utc::now(),
            env_name: variant.env_name(Some(Preset::Demo.suffix())),
            variant,
            seed,
            config,
            scenario: episode.scenario().clone(),
            initial_score,
        };
        let path = temp_path(label);
        Output::save_json(&record, Some(path.clone())).unwrap();
        (path, record)
    }

    #[test]
    fn test_run_rescores_recorded_scenario() {
        let (scenario, record) = write_demo_record("plain");
        let output = temp_path("plain_report");
        let arg = ScoreArg {
            scenario: scenario.clone(),
            positions: None,
            output: Some(output.clone()),
        };
        run(&arg).unwrap();

        let report: ScoreReport = util::read_json_file("score report", &output).unwrap();
        assert_eq!(report.moved_blocks, 0);
        assert_eq!(report.score, record.initial_score);
        assert_eq!((report.score.n_correct, report.score.n_blocks), (4, 8));

        // pile each colour into its own corner
        let corners = [(-0.7, -0.7), (-0.7, 0.7), (0.7, -0.7), (0.7, 0.7)];
        let moved = record
            .scenario
            .partition
            .blocks()
            .map(|(bucket_idx, id)| {
                let (x, y) = corners[bucket_idx];
                BlockPosition {
                    id,
                    position: Position::new(x, y),
                }
            })
            .collect::<Vec<_>>();
        let positions = temp_path("positions");
        Output::save_json(&moved, Some(positions.clone())).unwrap();
        let arg = ScoreArg {
            positions: Some(positions.clone()),
            ..arg
        };
        run(&arg).unwrap();

        let report: ScoreReport = util::read_json_file("score report", &output).unwrap();
        assert_eq!(report.moved_blocks, 8);
        assert_eq!(report.score.score, 1.0);

        for path in [scenario, output, positions] {
            let _ = std::fs::remove_file(path);
        }
    }

    #[test]
    fn test_run_rejects_partition_that_disagrees_with_blocks() {
        let (scenario, _) = write_demo_record("tampered");
        let mut json: serde_json::Value = util::read_json_file("scenario", &scenario).unwrap();
        json["scenario"]["partition"]["buckets"][0]["blocks"] = serde_json::json!([99]);
        json["scenario"]["partition"]["buckets"][1]["blocks"] = serde_json::json!([]);
        Output::save_json(&json, Some(scenario.clone())).unwrap();

        let arg = ScoreArg {
            scenario: scenario.clone(),
            positions: None,
            output: Some(temp_path("tampered_report")),
        };
        let err = run(&arg).unwrap_err();
        assert!(format!("{err:#}").contains("not listed in any bucket"), "{err:#}");

        let _ = std::fs::remove_file(scenario);
    }

    #[test]
    fn test_overrides_replace_known_blocks() {
        let mut live = HashMap::from([
            (EntityId::new(1), Position::new(0.1, 0.1)),
            (EntityId::new(2), Position::new(0.2, 0.2)),
        ]);
        let moved = BlockPosition {
            id: EntityId::new(2),
            position: Position::new(-0.5, 0.5),
        };
        apply_overrides(&mut live, &[moved]).unwrap();
        assert_eq!(live[&EntityId::new(2)], Position::new(-0.5, 0.5));
        assert_eq!(live[&EntityId::new(1)], Position::new(0.1, 0.1));
    }

    #[test]
    fn test_overrides_reject_unknown_blocks() {
        let mut live = HashMap::from([(EntityId::new(1), Position::ORIGIN)]);
        let stray = BlockPosition {
            id: EntityId::new(0),
            position: Position::ORIGIN,
        };
        let err = apply_overrides(&mut live, &[stray]).unwrap_err();
        assert!(err.to_string().contains("#0"), "{err}");
    }

    #[test]
    fn test_positions_file_format() {
        let json = r#"[{"id": 3, "position": {"x": 0.25, "y": -0.5}}]"#;
        let parsed: Vec<BlockPosition> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed[0].id, EntityId::new(3));
        assert_eq!(parsed[0].position, Position::new(0.25, -0.5));
    }
}
