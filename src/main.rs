//! Flappy Sim entry point
//!
//! Plays headless runs through a `Session` with a simple autopilot, then
//! verifies the best replay by re-simulating it from its seed.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use anyhow::{Result, bail};
    use clap::Parser;

    use flappy_sim::mode::{self, SeedSpec};
    use flappy_sim::persistence::ProgressStore;
    use flappy_sim::sim::GameState;
    use flappy_sim::{Difficulty, RenderView, RunResult, Session, verify_replay};

    /// Simulated time after which the autopilot stops flapping
    const MAX_RUN_MS: f64 = 10.0 * 60.0 * 1000.0;

    /// Headless flappy runs with replay verification
    #[derive(Debug, Parser)]
    #[command(author, version, about, long_about = None)]
    struct CliArgs {
        /// Fixed seed: a number, or any text which is hashed
        #[arg(long, value_name = "SEED", conflicts_with = "daily")]
        seed: Option<String>,
        /// Daily challenge for a date (YYYY-MM-DD) or "today"
        #[arg(long, value_name = "DATE")]
        daily: Option<String>,
        /// Difficulty preset: easy, normal or hard
        #[arg(
            long,
            value_name = "PRESET",
            default_value = "normal",
            value_parser = parse_difficulty
        )]
        difficulty: Difficulty,
        /// Number of runs to play
        #[arg(
            long,
            value_name = "COUNT",
            default_value_t = 3,
            value_parser = clap::value_parser!(u32).range(1..=1000)
        )]
        runs: u32,
        /// The autopilot stops flapping once a run reaches this score
        #[arg(long, value_name = "SCORE", default_value_t = 30)]
        give_up_at: u32,
        /// Host frame length fed to the session, in milliseconds
        #[arg(long, value_name = "MILLISECONDS", default_value_t = 16.7)]
        frame_ms: f64,
        /// Print the best replay as JSON when done
        #[arg(long)]
        dump_replay: bool,
    }

    fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
        Difficulty::from_str(value).ok_or_else(|| format!("unknown difficulty '{}'", value))
    }

    fn seed_spec(args: &CliArgs) -> Result<SeedSpec> {
        if let Some(seed) = &args.seed {
            return match mode::parse_seed_param(seed) {
                Some(seed) => Ok(SeedSpec::Fixed(seed)),
                None => bail!("--seed must not be blank"),
            };
        }
        match args.daily.as_deref() {
            Some("today") => Ok(SeedSpec::today()),
            Some(date) if is_date_key(date) => Ok(SeedSpec::Daily(date.to_string())),
            Some(date) => bail!("--daily expects YYYY-MM-DD or 'today', got '{}'", date),
            None => Ok(SeedSpec::Random),
        }
    }

    fn is_date_key(date: &str) -> bool {
        let parts: Vec<&str> = date.split('-').collect();
        parts.len() == 3
            && [4, 2, 2]
                .iter()
                .zip(&parts)
                .all(|(len, part)| part.len() == *len && part.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Flaps while the bird is below the lower part of the next gap
    struct Autopilot {
        give_up_at: u32,
        rest_y: f32,
    }

    impl Autopilot {
        fn wants_flap(&self, view: &RenderView, elapsed_ms: f64) -> bool {
            if view.score >= self.give_up_at || elapsed_ms > MAX_RUN_MS {
                return false;
            }
            let bird = view.bird;
            let target = view
                .pipes
                .iter()
                .find(|p| p.x + p.width + bird.radius >= bird.x)
                .map(|p| p.top_height + (p.bottom_y - p.top_height) * 0.65)
                .unwrap_or(self.rest_y);
            bird.y > target && bird.velocity > -50.0
        }
    }

    fn play_run(session: &mut Session, autopilot: &Autopilot, frame_ms: f64) -> Result<RunResult> {
        session.request_flap();
        session.frame(frame_ms);
        while session.state() == GameState::Playing {
            if autopilot.wants_flap(&session.render_view(), session.world().elapsed_ms()) {
                session.request_flap();
            }
            session.frame(frame_ms);
        }
        match session.last_result() {
            Some(result) => Ok(result.clone()),
            None => bail!("run ended without a result"),
        }
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let args = CliArgs::parse();
        if !(args.frame_ms.is_finite() && args.frame_ms > 0.0) {
            bail!("--frame-ms must be positive");
        }

        let seeds = seed_spec(&args)?;
        log::info!(
            "Flappy Sim: {} runs, {} ({}), difficulty {}",
            args.runs,
            seeds.mode().as_str(),
            seeds.label(),
            args.difficulty.as_str()
        );

        let mut session = Session::new(args.difficulty, seeds, ProgressStore::open());
        session.boot();
        let autopilot = Autopilot {
            give_up_at: args.give_up_at,
            rest_y: session.config().bird.start_y,
        };

        for run in 1..=args.runs {
            let result = play_run(&mut session, &autopilot, args.frame_ms)?;
            println!(
                "run {:>3}: seed {:>10}  score {:>4}  coins +{:<4}{}",
                run,
                result.seed,
                result.score,
                result.coins,
                if result.new_best { "  new best" } else { "" }
            );
            session.restart();
        }

        let snapshot = session.snapshot();
        println!(
            "best {}  coins {}  lifetime runs {}  flaps {}",
            session.best_score(),
            snapshot.coins,
            snapshot.lifetime.runs,
            snapshot.lifetime.total_flaps
        );

        let Some(best) = session.best_replay() else {
            bail!("no replay was recorded");
        };
        let verification = verify_replay(best, session.config());
        if !verification.matches(best) {
            bail!(
                "best replay claims score {} but re-simulation gives {}",
                best.score,
                verification.score
            );
        }
        println!(
            "best replay verified: score {} over {} steps",
            verification.score, verification.steps
        );
        if args.dump_replay {
            println!("{}", best.to_json()?);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    cli::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on the web
}
