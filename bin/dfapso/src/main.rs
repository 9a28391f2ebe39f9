use std::{path::PathBuf, process::ExitCode, time::Duration};

use automata_pso::prelude::*;
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, error, info, trace};
use tracing_subscriber::{filter, prelude::*};

/// Learns a deterministic finite automaton from the words of a reference automaton with
/// particle swarm optimization.
#[derive(Debug, Clone, clap::Parser)]
#[clap(name = "dfapso")]
struct Cli {
    /// File that holds the description of the reference automaton.
    automaton: PathBuf,
    /// Maximal length of the words in the training sample.
    #[clap(short = 'l', long, default_value = "6")]
    length: usize,
    /// Maximal number of words in the training sample.
    #[clap(short = 'c', long)]
    cap: Option<usize>,
    #[clap(short = 'i', long, default_value = "40000")]
    iterations: usize,
    #[clap(short = 'p', long, default_value = "50")]
    particles: usize,
    /// Time budget of the search in seconds.
    #[clap(short = 't', long, default_value = "180")]
    time_budget: u64,
    #[clap(short = 's', long)]
    seed: Option<u64>,
    #[clap(long, default_value = "2")]
    velocity_weight: f64,
    #[clap(long, default_value = "10")]
    personal_weight: f64,
    #[clap(long, default_value = "2")]
    global_weight: f64,
    /// Upper bound on the number of states of the initial candidates.
    #[clap(short = 'm', long, default_value = "20")]
    max_states: usize,
    /// Number of random words, longer than the training words, on which the learned
    /// automaton is tested.
    #[clap(short = 'w', long, default_value = "0")]
    test_words: usize,
    #[clap(
        short = 'v',
        long,
        num_args = 0..=1,
        require_equals = true,
        value_parser = ["info", "debug", "trace"],
        default_missing_value = "info"
    )]
    verbosity: Option<String>,
}

impl Cli {
    fn params(&self) -> PsoParams {
        let params = PsoParams::default()
            .with_max_iterations(self.iterations)
            .with_particles_count(self.particles)
            .with_time_budget(Duration::from_secs(self.time_budget))
            .with_weights(
                self.velocity_weight,
                self.personal_weight,
                self.global_weight,
            )
            .with_max_states(self.max_states);
        match self.seed {
            Some(seed) => params.with_seed(seed),
            None => params,
        }
    }
}

fn setup_logging(cli: &Cli) {
    let level = match cli.verbosity.as_deref() {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let reference = parse::load_dfa(&cli.automaton)?;
    println!("Reference automaton\n{reference}");

    let generator = SampleGenerator::new(&reference);
    let sample = generator.exhaustive_capped(cli.length, cli.cap);
    println!("{}", sample.show());
    debug!("training words\n{}", sample.show_words());

    let params = cli.params();
    let mut swarm = Swarm::new(params).with_listener(TracingListener);
    let results = swarm.search(reference.alphabet(), &sample)?;
    if let Some(termination) = swarm.termination() {
        println!(
            "Search stopped after {} generations: {termination}",
            swarm.iterations()
        );
    }
    println!("{results}");

    let Some(best) = results.best() else {
        println!("No solution found");
        return Ok(());
    };
    let learned = best.decode();
    println!("Best automaton: {}\n{learned}", parse::to_description(&learned));

    let misclassified = Evaluator::new(&sample).misclassified(&learned)?;
    if misclassified.is_empty() {
        println!("The best automaton classifies every training word correctly");
    } else {
        println!("Misclassified training words:");
        for word in &misclassified {
            println!("  {}", word.show());
        }
    }

    if cli.test_words > 0 {
        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        let test = generator.random(cli.test_words, cli.length + 1, 2 * cli.length + 1, &mut rng);
        let accuracy = 1.0 - Evaluator::new(&test).fitness(&learned)?;
        info!("tested on {}", test.show());
        println!(
            "Accuracy on {} test words: {:.2}%",
            test.len(),
            100.0 * accuracy
        );
    }
    Ok(())
}

pub fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("dfapso: {e}");
            ExitCode::FAILURE
        }
    }
}
