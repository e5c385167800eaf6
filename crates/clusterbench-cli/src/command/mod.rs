use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use clusterbench_engine::{Preset, RandomizationConfig, TaskVariant};

use self::{baseline::BaselineArg, generate::GenerateArg, score::ScoreArg};
use crate::util;

mod baseline;
mod generate;
mod score;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Generate the initial world of an episode
    Generate(#[clap(flatten)] GenerateArg),
    /// Score a generated scenario, optionally with moved blocks
    Score(#[clap(flatten)] ScoreArg),
    /// Score many freshly reset episodes to calibrate a task
    Baseline(#[clap(flatten)] BaselineArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Generate(arg) => generate::run(&arg)?,
        Mode::Score(arg) => score::run(&arg)?,
        Mode::Baseline(arg) => baseline::run(&arg)?,
    }
    Ok(())
}

/// Task selection shared by the commands that reset episodes.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TaskArg {
    /// Characteristic the blocks are clustered by (colour or shape)
    #[arg(long, default_value_t)]
    variant: TaskVariant,
    /// Named randomization level [default: Demo]
    #[arg(long, conflicts_with = "config")]
    preset: Option<Preset>,
    /// Randomization config JSON file, instead of a preset
    #[arg(long)]
    config: Option<PathBuf>,
}

/// A resolved task: variant, validated config and registered name.
#[derive(Debug, Clone)]
pub(crate) struct Task {
    pub variant: TaskVariant,
    pub config: RandomizationConfig,
    pub env_name: String,
}

impl TaskArg {
    pub fn resolve(&self) -> anyhow::Result<Task> {
        let Self {
            variant,
            preset,
            config,
        } = self;
        let variant = *variant;

        if let Some(path) = config {
            let config = util::read_config_file(path)?;
            variant.check_config(&config).with_context(|| {
                format!("Config file {} does not fit the task", path.display())
            })?;
            return Ok(Task {
                variant,
                config,
                env_name: variant.env_name(None),
            });
        }

        let preset = preset.unwrap_or_default();
        Ok(Task {
            variant,
            config: preset.config(variant),
            env_name: variant.env_name(Some(preset.suffix())),
        })
    }
}
