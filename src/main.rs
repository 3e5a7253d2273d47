use std::path::PathBuf;
use clap::Parser;
use log::info;
use rustyline::error::ReadlineError;

use verity::{Cfg, Mutator};
use verity::capability::Capabilities;
use verity::condition::eval;
use verity::reader::Reader;
use verity::truth::evaluate_truth;

#[derive(Parser)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
struct Args {
    /// Also print the type of each value and the slot that decided its truth
    #[arg(long)]
    debug: bool,

    #[arg(long, default_value = ".verity-history.txt")]
    history: PathBuf
}

const PROMPT: &str = "verity> ";

fn rep(mt: &mut Mutator, line: &str) {
    let mut reader = Reader::new(line);

    while let Some(res) = reader.next(mt) {
        let expr = match res {
            Ok(expr) => expr,
            Err(err) => {
                println!("SyntaxError: {}", err);
                break;
            }
        };

        let res = eval(mt, &expr.v)
            .and_then(|v| evaluate_truth(mt, v).map(|truth| (v, truth)));

        match res {
            Ok((v, truth)) => {
                println!("{}", v.to_doc(mt).pretty(80));

                if mt.cfg().debug {
                    let slot = Capabilities::of(v).select()
                        .map_or("-".to_string(), |slot| slot.protocol().to_string());
                    println!("  type: {}, slot: {}", v.r#type().within(mt), slot);
                }

                println!("  bool: {}", if truth { "True" } else { "False" });
            },

            Err(err) => {
                println!("EvaluationError: {}", err);
                if let Some(exn) = mt.take_exception() {
                    println!("  caused by {}", exn);
                }
                break;
            }
        }
    }
}

fn main() -> Result<(), ReadlineError> {
    pretty_env_logger::init();

    let args = Args::parse();

    let mut rl = rustyline::Editor::<()>::new()?;

    if rl.load_history(&args.history).is_err() {
        println!("No previous history.");
    }

    let mut mt = Mutator::new(Cfg {debug: args.debug});

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                rl.add_history_entry(line.as_str());
                rep(&mut mt, &line);
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    info!("{} objects allocated", mt.heap().len());

    rl.save_history(&args.history)
}
