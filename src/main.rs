//! forge - WOD generator, class board and interval timer

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use forge::audio::{AudioSink, CuePlayer, SilentAudio, TerminalAudio};
use forge::class::{ClassQueue, INITIAL_PROGRAMS};
use forge::profile::{Benchmark, Lift, MaxReps};
use forge::settings::{SettingsStore, SqliteSettings, prefs};
use forge::timer::runner::{self, LineDisplay, RunOutcome};
use forge::timer::{IntervalTimer, PRESETS, TimerMode, find_preset};
use forge::tui::{App, Theme};
use forge::wod::{Focus, Level, SessionPhase, Shape, WodRequest, generate};

const DB_PATH: &str = "forge.db";

#[derive(Parser)]
#[command(name = "forge")]
#[command(author, version, about = "WOD generator, class board and interval timer")]
struct Cli {
    /// Settings database
    #[arg(long, env = "FORGE_DB", default_value = DB_PATH, global = true)]
    db: PathBuf,

    /// Append logs to this file (the dashboard logs nowhere else)
    #[arg(long, env = "FORGE_LOG", global = true)]
    log: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Tui,

    /// Generate a workout
    Wod {
        #[arg(short, long, value_enum, default_value_t)]
        shape: Shape,

        #[arg(short, long, value_enum, default_value_t)]
        focus: Focus,

        #[arg(short, long, value_enum, default_value_t)]
        level: Level,

        /// Strength or skill session instead of a metcon
        #[arg(short, long, value_enum, default_value_t)]
        phase: SessionPhase,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Random metcon: any shape, balanced, RX
    Random {
        #[arg(long)]
        json: bool,
    },

    /// Build class programs
    Class {
        /// Number of programs to print
        #[arg(short, long, default_value_t = INITIAL_PROGRAMS)]
        count: usize,
    },

    /// Run the interval timer in the terminal
    Timer {
        #[arg(short, long, value_enum)]
        mode: Option<TimerMode>,

        /// Work seconds
        #[arg(short, long)]
        work: Option<u32>,

        /// Rest seconds
        #[arg(short, long)]
        rest: Option<u32>,

        /// Rounds (0 = default for the mode)
        #[arg(short = 'n', long)]
        rounds: Option<u32>,

        /// Preset key (see `forge presets`)
        #[arg(short, long)]
        preset: Option<String>,

        /// Load the last generated workout
        #[arg(long)]
        last: bool,

        /// No beeps or speech
        #[arg(short, long)]
        quiet: bool,

        /// Program that speaks its first argument (e.g. espeak)
        #[arg(long, env = "FORGE_SPEECH")]
        speech: Option<String>,
    },

    /// List timer presets
    Presets,

    /// Athlete profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },

    /// Benchmark scores
    Bench {
        #[command(subcommand)]
        action: Option<BenchAction>,
    },

    /// Show or set the dashboard theme
    Theme {
        /// ember, neon or ice
        name: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,

    /// Set one-rep-max (kg) and max-rep values; 0 clears a value
    Set {
        #[arg(long)]
        clean: Option<f64>,
        #[arg(long)]
        snatch: Option<f64>,
        #[arg(long)]
        deadlift: Option<f64>,
        #[arg(long)]
        squat: Option<f64>,
        #[arg(long)]
        press: Option<f64>,
        #[arg(long)]
        hspu: Option<u32>,
        #[arg(long)]
        pullups: Option<u32>,
    },

    /// Forget every profile value
    Clear,
}

#[derive(Subcommand)]
enum BenchAction {
    Show,

    /// Record a score, e.g. `forge bench set fran 3:45`
    Set {
        benchmark: String,
        score: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let dashboard = matches!(cli.command, Some(Commands::Tui) | None);
    let (writer, ansi) = log_writer(cli.log.as_deref(), dashboard)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(writer)
        .with_ansi(ansi)
        .init();
    let mut store = SqliteSettings::open(&cli.db)?;

    match cli.command {
        Some(Commands::Tui) | None => {
            let speech = std::env::var("FORGE_SPEECH").ok();
            let mut app = App::new(store, TerminalAudio::new(speech));
            app.run()?;
        }

        Some(Commands::Wod { shape, focus, level, phase, json }) => {
            let request = WodRequest { phase, shape, focus, level };
            generate_and_print(&mut store, request, json)?;
        }

        Some(Commands::Random { json }) => {
            let request = WodRequest::quick(&mut rand::thread_rng());
            generate_and_print(&mut store, request, json)?;
        }

        Some(Commands::Class { count }) => {
            let queue = ClassQueue::seeded(count.max(1), &mut rand::thread_rng());
            for (i, program) in queue.iter().enumerate() {
                println!("Class {}/{}", i + 1, queue.len());
                println!("{:=<40}", "");
                for (title, body) in program.blocks() {
                    println!("[{}]", title);
                    println!("{}\n", body);
                }
            }
            if let Some(head) = queue.current() {
                prefs::save_workout(&mut store, prefs::CLASS_METCON, &head.metcon)?;
            }
        }

        Some(Commands::Timer { mode, work, rest, rounds, preset, last, quiet, speech }) => {
            let mut rng = rand::thread_rng();
            let mut timer = IntervalTimer::new(prefs::load_timer_config(&store));

            if let Some(key) = preset {
                let preset = find_preset(&key)
                    .ok_or_else(|| anyhow!("Unknown preset '{}' (see `forge presets`)", key))?;
                timer.apply_preset(preset, &mut rng);
                store.delete(prefs::TIMER_WORKOUT)?;
            } else if last {
                let workout = prefs::load_workout(&store, prefs::LAST_WOD)
                    .ok_or_else(|| anyhow!("No workout generated yet (run `forge wod`)"))?;
                prefs::save_workout(&mut store, prefs::TIMER_WORKOUT, &workout)?;
                timer.load_workout(workout, &mut rng);
            } else {
                timer.set_workout(prefs::load_workout(&store, prefs::TIMER_WORKOUT), &mut rng);
            }

            let mut config = timer.config();
            if let Some(mode) = mode {
                config.mode = mode;
            }
            if let Some(work) = work {
                config.work_secs = work;
            }
            if let Some(rest) = rest {
                config.rest_secs = rest;
            }
            if let Some(rounds) = rounds {
                config.rounds = rounds;
            }
            timer.configure(config);
            timer.reset();

            let view = timer.view();
            println!("{} ({}) - Ctrl-C to stop", view.title, view.mode_label);

            let outcome = if quiet {
                run_timer(&mut timer, SilentAudio).await
            } else {
                run_timer(&mut timer, TerminalAudio::new(speech)).await
            };
            prefs::save_timer_config(&mut store, &timer.config())?;

            match outcome {
                RunOutcome::Finished => println!("Done."),
                RunOutcome::Interrupted => println!("Stopped."),
            }
        }

        Some(Commands::Presets) => {
            for p in PRESETS {
                let c = p.config;
                println!(
                    "{:10} {:24} {:10} work {:>4}s  rest {:>3}s  rounds {}",
                    p.key,
                    p.title,
                    c.mode.label(),
                    c.work_secs,
                    c.rest_secs,
                    c.rounds
                );
            }
        }

        Some(Commands::Profile { action }) => match action.unwrap_or(ProfileAction::Show) {
            ProfileAction::Show => print_profile(&store),
            ProfileAction::Set { clean, snatch, deadlift, squat, press, hspu, pullups } => {
                let lifts = [
                    (Lift::Clean, clean),
                    (Lift::Snatch, snatch),
                    (Lift::Deadlift, deadlift),
                    (Lift::Squat, squat),
                    (Lift::PressJerk, press),
                ];
                for (lift, value) in lifts {
                    if let Some(kg) = value {
                        prefs::save_one_rep_max(&mut store, lift, (kg > 0.0).then_some(kg))?;
                    }
                }
                for (movement, value) in [(MaxReps::Hspu, hspu), (MaxReps::PullUps, pullups)] {
                    if let Some(reps) = value {
                        prefs::save_max_reps(&mut store, movement, (reps > 0).then_some(reps))?;
                    }
                }
                print_profile(&store);
            }
            ProfileAction::Clear => {
                prefs::clear_profile(&mut store)?;
                println!("Profile cleared.");
            }
        },

        Some(Commands::Bench { action }) => match action.unwrap_or(BenchAction::Show) {
            BenchAction::Show => print_benchmarks(&store),
            BenchAction::Set { benchmark, score } => {
                let bm = Benchmark::all()
                    .iter()
                    .find(|b| b.key().eq_ignore_ascii_case(&benchmark))
                    .copied()
                    .ok_or_else(|| anyhow!("Unknown benchmark '{}' (fran, grace, murph)", benchmark))?;
                prefs::save_benchmark(&mut store, bm, Some(&score))?;
                print_benchmarks(&store);
            }
        },

        Some(Commands::Theme { name }) => match name {
            Some(name) => {
                let theme: Theme = name.parse()?;
                prefs::save_theme(&mut store, theme)?;
                println!("Theme: {}", theme);
            }
            None => println!("Theme: {}", prefs::load_theme(&store)),
        },
    }

    Ok(())
}

/// Log destination. Stderr would draw over the dashboard, so there logs go
/// to the file or nowhere.
fn log_writer(path: Option<&Path>, dashboard: bool) -> Result<(BoxMakeWriter, bool)> {
    Ok(match path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None if dashboard => (BoxMakeWriter::new(std::io::sink), false),
        None => (BoxMakeWriter::new(std::io::stderr), true),
    })
}

fn generate_and_print(store: &mut dyn SettingsStore, request: WodRequest, json: bool) -> Result<()> {
    let profile = prefs::load_profile(store);
    let workout = generate(&request, &profile, &mut rand::thread_rng());
    prefs::save_workout(store, prefs::LAST_WOD, &workout)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&workout)?);
    } else {
        println!("{}", workout);
    }
    Ok(())
}

async fn run_timer<A: AudioSink>(timer: &mut IntervalTimer, audio: A) -> RunOutcome {
    let mut player = CuePlayer::new(audio);
    let mut display = LineDisplay::new(std::io::stdout());
    runner::run(timer, &mut player, &mut display).await
}

fn print_profile(store: &dyn SettingsStore) {
    let profile = prefs::load_profile(store);
    println!("Athlete profile");
    println!("{:-<40}", "");
    for lift in Lift::all() {
        match profile.one_rep_max(*lift) {
            Some(kg) => println!("{:14} {}kg", lift.label(), kg),
            None => println!("{:14} -", lift.label()),
        }
    }
    for movement in MaxReps::all() {
        match profile.max_reps.get(movement) {
            Some(reps) => println!("{:14} {} reps", movement.label(), reps),
            None => println!("{:14} -", movement.label()),
        }
    }
}

fn print_benchmarks(store: &dyn SettingsStore) {
    let profile = prefs::load_profile(store);
    println!("Benchmarks");
    println!("{:-<40}", "");
    for bm in Benchmark::all() {
        println!(
            "{:8} {}",
            bm.label(),
            profile.benchmarks.get(bm).map(String::as_str).unwrap_or("-")
        );
    }
}
