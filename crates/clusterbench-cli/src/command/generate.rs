use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use clusterbench_engine::{ClusterEpisode, ScenarioSeed};
use clusterbench_evaluator::cluster_scorer::ClusterScorer;
use rand::Rng as _;

use crate::{command::TaskArg, schema::record::ScenarioRecord, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GenerateArg {
    #[clap(flatten)]
    task: TaskArg,
    /// 32-digit hex seed; drawn at random when omitted
    #[arg(long)]
    seed: Option<ScenarioSeed>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateArg) -> anyhow::Result<()> {
    let GenerateArg { task, seed, output } = arg;
    let task = task.resolve()?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());

    let episode = ClusterEpisode::reset(task.variant, task.config, seed)
        .with_context(|| format!("Failed to reset {} with seed {seed}", task.env_name))?;
    let initial_score = ClusterScorer::new()
        .score(&episode.scenario().partition, episode.world())
        .context("Failed to score initial layout")?;
    tracing::debug!(
        env_name = %task.env_name,
        frac_correct = initial_score.frac_correct,
        score = initial_score.score,
        "initial score"
    );

    let scenario = episode.scenario();
    eprintln!("Generated {}", task.env_name);
    eprintln!("  Seed:     {seed}");
    eprintln!("  Blocks:   {}", scenario.blocks.len());
    eprintln!("  Clusters: {}", scenario.partition.num_values());
    for bucket in scenario.partition.buckets() {
        eprintln!("    {:>8}: {} blocks", bucket.value.to_string(), bucket.blocks.len());
    }
    eprintln!(
        "  Initial:  {}/{} correct (score {:.3})",
        initial_score.n_correct, initial_score.n_blocks, initial_score.score
    );

    let record = ScenarioRecord {
        generated_at: Utc::now(),
        env_name: task.env_name,
        variant: task.variant,
        seed,
        config: task.config,
        scenario: scenario.clone(),
        initial_score,
    };
    Output::save_json(&record, output.clone())?;

    Ok(())
}
