use clap::{Parser, Subcommand};
use heartless_king::card::CardId;
use heartless_king::cli::run_play;
use heartless_king::config::RulesConfig;
use heartless_king::rng::GameRng;
use heartless_king::session::SessionRegistry;
use heartless_king::simulation::{simulate_with, DiscardPolicy, Outcome, SimulationSummary};
use heartless_king::solver::{validate, Solver, SolverValue};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "heartless-king")]
#[command(about = "Heartless King arithmetic card game", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game at the terminal
    Play {
        /// Seed for the deal (for reproducibility)
        #[arg(short, long)]
        seed: Option<u64>,

        /// JSON rules file
        #[arg(short, long)]
        rules: Option<String>,

        /// Print every state and answer as a JSON line
        #[arg(long)]
        json: bool,
    },

    /// Autoplay a batch of games and report statistics
    Simulate {
        /// Number of games to simulate
        #[arg(short, long, default_value = "1000")]
        num_games: usize,

        /// Base seed for the batch
        #[arg(short, long)]
        seed: Option<u64>,

        /// Which card to give up after each win
        #[arg(short, long, value_enum, default_value_t = DiscardPolicy::Lowest)]
        discard: DiscardPolicy,

        /// JSON rules file
        #[arg(short, long)]
        rules: Option<String>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find an expression over some values that reaches a target
    Solve {
        #[arg(short, long, allow_negative_numbers = true)]
        target: f64,

        /// Optional value the expression may leave out
        #[arg(short, long)]
        exempt: Option<f64>,

        /// Values every expression must use
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },

    /// Check an expression against a target and the values it must use
    Validate {
        #[arg(short, long, allow_negative_numbers = true)]
        target: f64,

        /// Comma-separated values the expression must use, e.g. 5,3,2
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        required: Vec<f64>,

        /// Optional extra value the expression may use
        #[arg(short, long)]
        exempt: Option<f64>,

        #[arg(allow_hyphen_values = true)]
        expression: String,
    },
}

fn load_rules(path: Option<&str>) -> RulesConfig {
    let Some(path) = path else {
        return RulesConfig::default();
    };
    match RulesConfig::from_file(path) {
        Ok(rules) => {
            eprintln!("✓ Loaded rules from {}", path);
            rules
        }
        Err(e) => {
            eprintln!("✗ Failed to load rules '{}': {}", path, e);
            std::process::exit(1);
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heartless_king=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play { seed, rules, json } => {
            play(seed, load_rules(rules.as_deref()), json);
        }
        Commands::Simulate {
            num_games,
            seed,
            discard,
            rules,
            json,
        } => {
            run_simulation(num_games, seed, discard, load_rules(rules.as_deref()), json);
        }
        Commands::Solve { target, exempt, values } => {
            solve(target, exempt, &values);
        }
        Commands::Validate {
            target,
            required,
            exempt,
            expression,
        } => {
            check_expression(target, &required, exempt, &expression);
        }
    }
}

fn play(seed: Option<u64>, rules: RulesConfig, json: bool) {
    let mut registry = SessionRegistry::new(rules);
    let (id, _) = registry.new_session(seed);
    if let Ok(meta) = registry.meta(id) {
        if !json {
            println!("\n=== Heartless King ===\n");
            println!("Seed: {}\n", meta.seed);
        }
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    if let Err(e) = run_play(&mut registry, id, stdin.lock(), &mut stdout, json) {
        eprintln!("✗ Terminal error: {}", e);
        std::process::exit(1);
    }
}

fn run_simulation(num_games: usize, seed: Option<u64>, policy: DiscardPolicy, rules: RulesConfig, json: bool) {
    let seed = seed.unwrap_or_else(|| GameRng::new(None).seed());

    if !json {
        println!("\n=== Heartless King Simulator ===\n");
        println!("Games: {}", num_games);
        println!("Seed: {}", seed);
        println!("Discard policy: {}", policy);
        println!("Kings to win: {}", rules.kings_to_win);
        println!();
    }

    let bar = ProgressBar::new(num_games as u64);
    if let Ok(style) = ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} games ({per_sec})") {
        bar.set_style(style);
    }
    if json {
        bar.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    let start = std::time::Instant::now();
    let reports = simulate_with(num_games, seed, rules, policy, |_| bar.inc(1));
    bar.finish_and_clear();
    let elapsed = start.elapsed();

    let summary = SimulationSummary::from_reports(&reports);

    if json {
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("✗ Failed to encode summary: {}", e),
        }
        return;
    }

    println!("=== Results ===\n");
    println!(
        "Win rate: {:.1}% ({}/{})",
        summary.win_rate * 100.0,
        summary.count(Outcome::Victory),
        summary.games
    );
    println!("Average attacks per game: {:.2}", summary.avg_turns);
    println!("Average attacks per win: {:.2}", summary.avg_win_turns);
    println!("Average kings defeated: {:.2}", summary.avg_kings);
    println!("Average anchor uses: {:.2}", summary.avg_anchor_uses);
    println!();

    println!("Outcomes:");
    for outcome in [Outcome::Victory, Outcome::Stalemate, Outcome::Stuck] {
        let count = summary.count(outcome);
        let pct = count as f64 / summary.games.max(1) as f64 * 100.0;
        let bar = "█".repeat((pct / 2.0) as usize);
        println!("  {:<10} {:5.1}% {} ({})", outcome.to_string(), pct, bar, count);
    }

    if !summary.win_turns.is_empty() {
        println!();
        println!("Attacks needed to win:");
        for (turns, count) in &summary.win_turns {
            let pct = *count as f64 / summary.games as f64 * 100.0;
            let bar = "█".repeat((pct / 2.0) as usize);
            println!("  {:3}: {:5.1}% {} ({})", turns, pct, bar, count);
        }
    }

    println!();
    println!(
        "Simulation completed in {:.2?} ({:.0} games/sec)",
        elapsed,
        num_games as f64 / elapsed.as_secs_f64()
    );
}

fn solve(target: f64, exempt: Option<f64>, values: &[f64]) {
    let mut inputs: Vec<SolverValue> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| SolverValue::new(v, CardId(i as u8)))
        .collect();
    let exempt_id = exempt.map(|v| {
        let id = CardId(inputs.len() as u8);
        inputs.push(SolverValue::new(v, id));
        id
    });

    match Solver::default().solve(&inputs, target, exempt_id) {
        Some(solution) => {
            let note = if solution.used_exempt { " (uses the exempt value)" } else { "" };
            println!("✓ {} = {}{}", solution.expression, solution.result, note);
        }
        None if inputs.len() > Solver::default().value_limit() => {
            println!("✗ At most {} values can be searched", Solver::default().value_limit());
            std::process::exit(1);
        }
        None => {
            println!("✗ No expression reaches {}", target);
            std::process::exit(1);
        }
    }
}

fn check_expression(target: f64, required: &[f64], exempt: Option<f64>, expression: &str) {
    let mut available = required.to_vec();
    available.extend(exempt);
    match validate(expression, required, &available, target) {
        Ok(result) => println!("✓ Valid: {} = {}", expression.trim(), result),
        Err(e) => {
            println!("✗ {}", e);
            std::process::exit(1);
        }
    }
}
