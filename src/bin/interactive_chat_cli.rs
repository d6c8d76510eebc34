use std::io;
use std::process;

use clap::{App, Arg, ArgMatches};
use failure::ResultExt;
use intent_chatbot_lib::{Chatbot, ChatbotConfiguration, Result};

fn main() {
    env_logger::Builder::from_default_env()
        .default_format_timestamp_nanos(true)
        .init();

    let matches = App::new("intent-chatbot")
        .about("Interactive intent classification chatbot")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .takes_value(true)
                .help("path to a json configuration file"),
        )
        .arg(
            Arg::with_name("corpus")
                .long("corpus")
                .takes_value(true)
                .help("path to the intents json corpus"),
        )
        .arg(
            Arg::with_name("artifacts")
                .long("artifacts")
                .takes_value(true)
                .help("path to the cached training data"),
        )
        .arg(
            Arg::with_name("model")
                .long("model")
                .takes_value(true)
                .help("path to the persisted model"),
        )
        .arg(
            Arg::with_name("stem_overrides")
                .long("stem-overrides")
                .takes_value(true)
                .help("csv table of `word,stem` lines applied before the Lancaster stemmer"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .help("seed of the response selection"),
        )
        .get_matches();

    if let Err(error) = run(&matches) {
        for cause in error.iter_chain() {
            eprintln!("{}", cause);
        }
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let mut config = match matches.value_of("config") {
        Some(path) => ChatbotConfiguration::from_path(path)?,
        None => ChatbotConfiguration::default(),
    };
    if let Some(corpus) = matches.value_of("corpus") {
        config.corpus_path = corpus.into();
    }
    if let Some(artifacts) = matches.value_of("artifacts") {
        config.artifacts_path = artifacts.into();
    }
    if let Some(model) = matches.value_of("model") {
        config.model_path = model.into();
    }
    if let Some(overrides) = matches.value_of("stem_overrides") {
        config.stem_overrides_path = Some(overrides.into());
    }
    if let Some(seed) = matches.value_of("seed") {
        config.reproducibility.response_seed = seed
            .parse::<u64>()
            .with_context(|_| format!("Invalid seed '{}'", seed))?;
    }

    let mut chatbot = Chatbot::from_configuration(&config)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    chatbot.chat(stdin.lock(), stdout.lock())
}
