//! RRT* Viz - Motion Planning Run Planner & Interactive Plot Viewer
//!
//! Plans RRT* runs over rectangular scenarios, writes their CSV run files
//! and shows sampled nodes, tree, obstacles and the optimal path in a plot
//! window (or exports them as an image).

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use eframe::egui;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rrtstar_viz::charts::{PlotLayers, RenderOptions, SceneRenderer};
use rrtstar_viz::config::{Dynamics, ScenarioConfig};
use rrtstar_viz::data::{RunData, RunLoader, RunWriter};
use rrtstar_viz::gui::RunViewerApp;
use rrtstar_viz::planner::{DynamicPoint, Environment, PlannerError, RrtStar, State};
use rrtstar_viz::scene::{Anchor, SceneBuilder};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// RRT* planner and run viewer
#[derive(Parser)]
#[command(name = "rrtstar-viz")]
#[command(about = "Plan RRT* runs and plot their CSV output", long_about = None)]
#[command(version)]
struct Cli {
    /// Log per-file and per-phase detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the planner on a scenario and write its run files
    Plan {
        /// Scenario JSON; the built-in three-wall scenario when omitted
        #[arg(long)]
        scenario: Option<PathBuf>,

        /// Directory that receives the CSV run files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Override the number of nodes to add
        #[arg(long)]
        samples: Option<usize>,

        /// Override the random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Also export the run to this image (.png or .svg)
        #[arg(long)]
        plot: Option<PathBuf>,

        /// Open the plot window on the finished run
        #[arg(long)]
        view: bool,
    },

    /// Show the run files in a directory in a plot window
    Plot {
        /// Directory holding the CSV run files
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Export to this image (.png or .svg) instead of opening the window
        #[arg(long)]
        output: Option<PathBuf>,

        /// Corner named by the (x, y) of obstacle and goal rows
        #[arg(long, value_enum, default_value_t = Anchor::TopLeft)]
        anchor: Anchor,

        #[command(flatten)]
        render: RenderArgs,

        /// Open the exported image in the default viewer afterwards
        #[arg(long, requires = "output")]
        open: bool,
    },

    /// Write the built-in scenario as a JSON template
    Scenario {
        #[arg(long, default_value = "scenario.json")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// Draw the path in one color instead of by speed
    #[arg(long)]
    no_speed_color: bool,

    /// Skip the axis mesh and tick labels of exported images
    #[arg(long)]
    no_labels: bool,

    /// Exported image width in pixels
    #[arg(long, default_value_t = 1600)]
    width: u32,

    /// Exported image height in pixels
    #[arg(long, default_value_t = 1600)]
    height: u32,
}

impl RenderArgs {
    fn options(&self) -> RenderOptions {
        RenderOptions {
            width: self.width,
            height: self.height,
            axis_labels: !self.no_labels,
            color_by_speed: !self.no_speed_color,
        }
    }

    fn layers(&self) -> PlotLayers {
        PlotLayers {
            color_by_speed: !self.no_speed_color,
            ..PlotLayers::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Plan {
            scenario,
            out_dir,
            samples,
            seed,
            plot,
            view,
        } => {
            let run = plan(scenario.as_deref(), &out_dir, samples, seed)?;
            if let Some(output) = plot {
                export(&run, &output, Anchor::TopLeft, &RenderOptions::default())?;
            }
            if view {
                show_window(run, Some(out_dir), Anchor::TopLeft, PlotLayers::default())?;
            }
            Ok(())
        }
        Commands::Plot {
            dir,
            output,
            anchor,
            render,
            open,
        } => {
            let run = RunLoader::load_run(&dir)
                .with_context(|| format!("loading run files from {}", dir.display()))?;
            match output {
                Some(output) => {
                    export(&run, &output, anchor, &render.options())?;
                    if open {
                        SceneRenderer::show(&output)
                            .with_context(|| format!("opening {}", output.display()))?;
                    }
                    Ok(())
                }
                None => show_window(run, Some(dir), anchor, render.layers()),
            }
        }
        Commands::Scenario { output } => {
            ScenarioConfig::default()
                .save(&output)
                .with_context(|| format!("writing scenario template {}", output.display()))?;
            tracing::info!(output = %output.display(), "wrote scenario template");
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Plan a scenario and write its run files. When no node reaches the goal
/// the sampled tree is still written, with an empty path, before the error
/// is returned.
fn plan(
    scenario: Option<&Path>,
    out_dir: &Path,
    samples: Option<usize>,
    seed: Option<u64>,
) -> Result<RunData> {
    let mut config = match scenario {
        Some(path) => ScenarioConfig::load(path)?,
        None => ScenarioConfig::default(),
    };
    if let Some(samples) = samples {
        config.planner.samples = samples;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let env = config.environment(&mut rng);

    let (run, outcome) = match config.dynamics {
        Dynamics::Point => plan_run(&env, &config, config.start, &mut rng)?,
        Dynamics::Dynamic { limits } => plan_run(
            &env,
            &config,
            DynamicPoint::at_rest(config.start, limits),
            &mut rng,
        )?,
    };

    RunWriter::write_run(out_dir, &run)
        .with_context(|| format!("writing run files to {}", out_dir.display()))?;
    outcome?;
    Ok(run)
}

fn plan_run<S: State>(
    env: &Environment,
    config: &ScenarioConfig,
    start: S,
    rng: &mut StdRng,
) -> Result<(RunData, Result<(), PlannerError>)> {
    let mut planner = RrtStar::new(env, config.goal, start, config.planner)?;
    planner.run(rng);

    match planner.best_path() {
        Ok(path) => {
            tracing::info!(waypoints = path.len(), "optimal path found");
            Ok((planner.export(&path), Ok(())))
        }
        Err(err) => {
            tracing::warn!(error = %err, "writing the sampled tree without a path");
            Ok((planner.export(&[]), Err(err)))
        }
    }
}

fn export(run: &RunData, output: &Path, anchor: Anchor, options: &RenderOptions) -> Result<()> {
    let scene = SceneBuilder::build(run, anchor);
    SceneRenderer::render_to_file(&scene, output, options)
        .with_context(|| format!("rendering {}", output.display()))
}

fn show_window(
    run: RunData,
    source: Option<PathBuf>,
    anchor: Anchor,
    layers: PlotLayers,
) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0])
            .with_title("RRT* Viz"),
        ..Default::default()
    };

    eframe::run_native(
        "RRT* Viz",
        options,
        Box::new(move |_cc| Ok(Box::new(RunViewerApp::new(run, source, anchor, layers)))),
    )
    .map_err(|err| anyhow::anyhow!("plot window failed: {err}"))
}
