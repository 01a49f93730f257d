//! Tilt Maze entry point
//!
//! Native: headless driver that runs a stage (or a campaign of stages) at a
//! fixed timestep and prints the final snapshot as JSON.
//! Web: the entry point lives in `platform::web`.
//!
//! Example:
//!   cargo run -- --stage stages/corner.txt --width 6 --height 6 --ax 3 --ay 5
//!   cargo run -- --campaign stages/campaign.json --wander 7

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::{fs, path::PathBuf};

    use anyhow::{Context, Result};
    use clap::Parser;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use tilt_maze::consts::{MAX_SUBSTEPS, SIM_DT};
    use tilt_maze::{Advance, Campaign, Game, Stage, Tuning};

    /// Built-in stage used when no stage file is given
    const DEMO_STAGE: &str = "
W__B__
W_____
W__H__
W_____
W_____
WWWWWW
";

    #[derive(Parser, Debug)]
    #[command(author, version, about = "Headless tilt-maze simulation driver", long_about = None)]
    pub struct Args {
        /// Stage text file (rows of W / H / B / _)
        #[arg(long, conflicts_with = "campaign")]
        stage: Option<PathBuf>,
        /// Campaign JSON: [{ "width", "height", "layout" }, ...]
        #[arg(long)]
        campaign: Option<PathBuf>,
        #[arg(long, default_value_t = 6)]
        width: u32,
        #[arg(long, default_value_t = 6)]
        height: u32,
        /// Physics tuning JSON (partial files allowed)
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Simulated seconds to run
        #[arg(long, default_value_t = 10.0)]
        seconds: f64,
        /// Simulation timestep
        #[arg(long, default_value_t = SIM_DT)]
        dt: f64,
        /// Host frame interval fed to the accumulator
        #[arg(long, default_value_t = 1.0 / 60.0)]
        frame_dt: f64,
        /// Held tilt
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        ax: f64,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        ay: f64,
        /// Random tilt from this seed instead of a fixed one
        #[arg(long)]
        wander: Option<u64>,
        /// Ticks between random tilt changes
        #[arg(long, default_value_t = 50)]
        wander_every: u64,
        /// Largest random tilt component
        #[arg(long, default_value_t = 5.0)]
        wander_strength: f64,
        #[arg(long)]
        pretty: bool,
    }

    /// What the driver is playing
    enum Session {
        Single(Game),
        Campaign(Campaign),
    }

    impl Session {
        fn change_control(&mut self, ax: f64, ay: f64) {
            match self {
                Session::Single(game) => game.change_control(ax, ay),
                Session::Campaign(campaign) => campaign.change_control(ax, ay),
            }
        }

        fn update(&mut self, dt: f64) {
            match self {
                Session::Single(game) => game.update(dt),
                Session::Campaign(campaign) => campaign.update(dt),
            }
        }

        /// True once nothing is left to simulate
        fn finished(&mut self) -> bool {
            match self {
                Session::Single(game) => game.ended(),
                Session::Campaign(campaign) => match campaign.advance() {
                    Advance::Playing => false,
                    Advance::NextStage(index) => {
                        log::info!("Now playing stage {index}");
                        false
                    }
                    Advance::Retry(index) => {
                        log::info!("Retrying stage {index}");
                        false
                    }
                    Advance::Completed => true,
                },
            }
        }

        fn snapshot_json(&self, pretty: bool) -> Result<String> {
            let json = match (self, pretty) {
                (Session::Single(game), false) => serde_json::to_string(&game.snapshot()),
                (Session::Single(game), true) => serde_json::to_string_pretty(&game.snapshot()),
                (Session::Campaign(c), false) => serde_json::to_string(&c.snapshot()),
                (Session::Campaign(c), true) => serde_json::to_string_pretty(&c.snapshot()),
            };
            json.context("serialize snapshot")
        }
    }

    /// Deterministic tilt input, like the idle/demo mode of the web build
    struct Wander {
        rng: Pcg32,
        every: u64,
        strength: f64,
    }

    impl Wander {
        fn next_control(&mut self) -> (f64, f64) {
            let s = self.strength;
            (self.rng.random_range(-s..=s), self.rng.random_range(-s..=s))
        }
    }

    fn load_session(args: &Args, tuning: Tuning) -> Result<Session> {
        if let Some(path) = &args.campaign {
            let json = fs::read_to_string(path)
                .with_context(|| format!("read campaign {path:?}"))?;
            let campaign = Campaign::from_json(&json, tuning).context("load campaign")?;
            return Ok(Session::Campaign(campaign));
        }

        let layout = match &args.stage {
            Some(path) => {
                fs::read_to_string(path).with_context(|| format!("read stage {path:?}"))?
            }
            None => DEMO_STAGE.to_string(),
        };
        let stage = Stage::parse(args.width, args.height, &layout).context("parse stage")?;
        log::info!("Stage:\n{}", stage.to_layout());
        Ok(Session::Single(Game::from_stage(&stage, tuning)))
    }

    /// Reject values the loop or the tilt sampler cannot work with
    fn check_args(args: &Args) -> Result<()> {
        if !(args.dt > 0.0 && args.frame_dt > 0.0) {
            anyhow::bail!("--dt and --frame-dt must be positive");
        }
        if !(args.wander_strength.is_finite() && args.wander_strength >= 0.0) {
            anyhow::bail!(
                "--wander-strength must be a non-negative number, got {}",
                args.wander_strength
            );
        }
        Ok(())
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();
        check_args(&args)?;

        let tuning = match &args.tuning {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("read tuning {path:?}"))?;
                Tuning::from_json(&json).context("load tuning")?
            }
            None => Tuning::default(),
        };

        let mut session = load_session(&args, tuning)?;
        session.change_control(args.ax, args.ay);

        let mut wander = args.wander.map(|seed| Wander {
            rng: Pcg32::seed_from_u64(seed),
            every: args.wander_every.max(1),
            strength: args.wander_strength,
        });

        let frames = (args.seconds / args.frame_dt).ceil() as u64;
        let mut accumulator = 0.0;
        let mut ticks: u64 = 0;

        'frames: for _ in 0..frames {
            accumulator += args.frame_dt;
            let mut substeps = 0;
            while accumulator >= args.dt && substeps < MAX_SUBSTEPS {
                if let Some(w) = wander.as_mut() {
                    if ticks % w.every == 0 {
                        let (ax, ay) = w.next_control();
                        log::debug!("Tick {ticks}: tilt ({ax:.2}, {ay:.2})");
                        session.change_control(ax, ay);
                    }
                }
                session.update(args.dt);
                accumulator -= args.dt;
                substeps += 1;
                ticks += 1;

                if session.finished() {
                    break 'frames;
                }
            }
        }

        log::info!("Ran {ticks} ticks");
        println!("{}", session.snapshot_json(args.pretty)?);
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
