mod app;
mod config;
mod generator;
mod session;
mod store;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use app::{App, AppScreen};
use config::Config;
use generator::{Generator, GeneratorConfig, QuestionItem, QuestionSource};
use session::quiz::QuizMode;

#[derive(Parser)]
#[command(
    name = "quizdr",
    version,
    about = "Terminal quiz trainer that builds multiple-choice questions from your documents"
)]
struct Cli {
    #[arg(help = "Path to a plain-text document to quiz on")]
    document: PathBuf,

    #[arg(short = 'n', long, help = "Number of questions (5-30)")]
    count: Option<usize>,

    #[arg(short, long, help = "Feedback mode (immediate, end)")]
    mode: Option<String>,

    #[arg(long, help = "Balance strategy (first-n, difficulty-quota)")]
    strategy: Option<String>,

    #[arg(long, help = "Question provider (local, openai, anthropic, gemini)")]
    provider: Option<String>,

    #[arg(long, help = "Seed for reproducible question generation")]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(count) = cli.count {
        config.question_count = count;
    }
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    if let Some(provider) = cli.provider {
        config.provider = provider;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    config.validate();

    let text = fs::read_to_string(&cli.document)
        .with_context(|| format!("failed to read {}", cli.document.display()))?;

    let mut app = App::new(config);
    run(&mut app, &text)
}

fn run(app: &mut App, text: &str) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut display_rng = SmallRng::from_entropy();

    loop {
        match app.screen {
            AppScreen::Upload => {
                let questions = generate(app, text)?;
                app.start_quiz(questions);
            }
            AppScreen::Quiz => run_question(app, &mut input, &mut display_rng)?,
            AppScreen::Results => {
                print_results(app);
                print!("[r] new quiz  [q] quit > ");
                io::stdout().flush()?;
                let choice = read_line(&mut input)?;
                match choice.as_str() {
                    "r" => app.restart(),
                    _ => return Ok(()),
                }
            }
        }
    }
}

fn generate(app: &mut App, text: &str) -> Result<Vec<QuestionItem>> {
    if !app.begin_processing() {
        bail!("a generation request is already in flight");
    }

    let generator_config = GeneratorConfig {
        provider: app.config.provider(),
        api_key: app.config.api_key.clone(),
        strategy: app.config.balance_strategy(),
        seed: app.config.seed,
    };
    let mut generator = Generator::new(generator_config);

    println!(
        "Generating {} questions from the document...",
        app.settings.question_count
    );
    // Remote failures are recovered inside the Generator, so the only errors
    // that surface here are the too-short and no-questions cases.
    match generator.generate(text, app.settings.question_count) {
        Ok(questions) => Ok(questions),
        Err(err) => {
            app.cancel_processing();
            bail!("{err}");
        }
    }
}

fn run_question(
    app: &mut App,
    input: &mut impl BufRead,
    display_rng: &mut SmallRng,
) -> Result<()> {
    let Some(quiz) = app.quiz.as_ref() else {
        return Ok(());
    };
    let item = quiz.current_question();
    let number = quiz.current + 1;
    let total = quiz.len();
    let question = item.question.clone();
    let difficulty = item.difficulty.as_str();
    let displayed = shuffle_options(item, display_rng);

    println!();
    println!("Question {number}/{total} [{difficulty}]");
    println!("{question}");
    for (i, option) in displayed.options.iter().enumerate() {
        println!("  {}) {option}", i + 1);
    }

    let choice = loop {
        print!("Your answer (1-{}) > ", displayed.options.len());
        io::stdout().flush()?;
        let line = read_line(input)?;
        match line.parse::<usize>() {
            Ok(n) if (1..=displayed.options.len()).contains(&n) => break n - 1,
            _ => println!("Enter a number between 1 and {}.", displayed.options.len()),
        }
    };

    // Map the displayed position back to the pipeline's option order before
    // recording; the session never sees the shuffle.
    let option = displayed.order[choice];
    let immediate = app.settings.mode == QuizMode::Immediate;
    let event = app.answer(option);

    if immediate {
        if let (Some(event), Some(quiz)) = (event, app.quiz.as_ref()) {
            let item = &quiz.questions[event.index];
            if event.correct {
                println!("Correct!");
            } else {
                println!("Not quite. The answer was: {}", item.correct_option());
            }
            println!("{}", item.explanation);
        }
        print!("[Enter] to continue > ");
        io::stdout().flush()?;
        read_line(input)?;
        app.confirm();
    }

    Ok(())
}

struct DisplayedOptions {
    options: Vec<String>,
    // order[display_position] = original option index
    order: Vec<usize>,
}

/// Presentation-boundary shuffle. The pipeline always puts the correct
/// option first; displaying it unshuffled would give the quiz away.
fn shuffle_options(item: &QuestionItem, rng: &mut SmallRng) -> DisplayedOptions {
    let mut order: Vec<usize> = (0..item.options.len()).collect();
    order.shuffle(rng);
    let options = order.iter().map(|&i| item.options[i].clone()).collect();
    DisplayedOptions { options, order }
}

fn print_results(app: &App) {
    let Some(ref result) = app.last_result else {
        return;
    };

    println!();
    println!("=== Results ===");
    println!(
        "Score: {}/{} ({:.0}%) in {:.0}s",
        result.correct, result.total, result.score_percent, result.elapsed_secs
    );
    for tally in &result.by_difficulty {
        println!(
            "  {}: {}/{}",
            tally.difficulty.as_str(),
            tally.correct,
            tally.total
        );
    }

    // End mode defers all feedback to this review.
    if result.mode == "end" {
        if let Some(ref quiz) = app.quiz {
            println!();
            for (index, item) in quiz.questions.iter().enumerate() {
                let chosen = quiz.answer_for(index);
                let verdict = if chosen == Some(item.correct_answer) {
                    "correct"
                } else {
                    "wrong"
                };
                println!("{}. {} [{verdict}]", index + 1, item.question);
                if chosen != Some(item.correct_answer) {
                    println!("   Answer: {}", item.correct_option());
                    println!("   {}", item.explanation);
                }
            }
        }
    }
}

fn read_line(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
