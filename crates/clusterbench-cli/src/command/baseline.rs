use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use clusterbench_engine::ScenarioSeed;
use clusterbench_evaluator::baseline;
use clusterbench_stats::{descriptive::DescriptiveStats, histogram::Histogram, percentiles::Percentiles};
use rand::RngCore;

use crate::{
    command::TaskArg,
    schema::record::BaselineReport,
    util::{self, Output},
};

const PERCENTILE_POINTS: [f64; 5] = [5.0, 25.0, 50.0, 75.0, 95.0];

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct BaselineArg {
    #[clap(flatten)]
    task: TaskArg,
    /// Number of episodes to reset and score
    #[arg(long, default_value_t = 1000)]
    episodes: usize,
    /// Number of histogram bins over [0, 1]
    #[arg(long, default_value_t = 10)]
    bins: usize,
    /// Seed for the sequence of episode seeds; drawn at random when omitted
    #[arg(long)]
    seed: Option<ScenarioSeed>,
    /// Output file path for the per-episode report
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &BaselineArg) -> anyhow::Result<()> {
    let BaselineArg {
        task,
        episodes,
        bins,
        seed,
        output,
    } = arg;
    let task = task.resolve()?;

    let mut rng: Box<dyn RngCore> = match seed {
        Some(seed) => Box::new(seed.rng()),
        None => Box::new(rand::rng()),
    };

    eprintln!("Scoring {episodes} initial layouts of {}...", task.env_name);
    let results = baseline::run(task.variant, task.config, *episodes, &mut *rng)
        .with_context(|| format!("Baseline run of {} failed", task.env_name))?;

    let frac_correct = results
        .iter()
        .map(|r| r.score.frac_correct)
        .collect::<Vec<_>>();
    let scores = results.iter().map(|r| r.score.score).collect::<Vec<_>>();
    let frac_stats = DescriptiveStats::new(frac_correct.iter().copied());
    let score_stats = DescriptiveStats::new(scores.iter().copied());

    if let Some(stats) = &frac_stats {
        eprintln!("Fraction correct:");
        print_stats(stats);
        let percentiles = Percentiles::new(&frac_correct, &PERCENTILE_POINTS);
        for (p, value) in percentiles.iter() {
            eprintln!("    P{p:<3} {value:.3}");
        }
        eprintln!();
        eprintln!("Fraction correct histogram:");
        let histogram = Histogram::new(frac_correct.iter().copied(), *bins, 0.0..=1.0);
        util::print_histogram(histogram.bins.iter().map(|bin| {
            (
                format!("{:.2}-{:.2}", bin.range.start, bin.range.end),
                bin.count,
            )
        }));
    }
    if let Some(stats) = &score_stats {
        eprintln!();
        eprintln!("Score:");
        print_stats(stats);
        let solved = scores.iter().filter(|&&s| s > 0.0).count();
        eprintln!("    Nonzero: {solved}/{}", scores.len());
    }

    if output.is_some() {
        let report = BaselineReport {
            created_at: Utc::now(),
            env_name: task.env_name,
            config: task.config,
            frac_correct: frac_stats,
            score: score_stats,
            episodes: results,
        };
        Output::save_json(&report, output.clone())?;
    }

    Ok(())
}

fn print_stats(stats: &DescriptiveStats) {
    eprintln!("    Min:     {:.3}", stats.min);
    eprintln!("    Max:     {:.3}", stats.max);
    eprintln!("    Mean:    {:.3}", stats.mean);
    eprintln!("    Std dev: {:.3}", stats.std_dev);
}
