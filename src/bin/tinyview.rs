//! Command-line interface for tinyview
//!
//! Usage:
//!   tinyview render `<template>` [--model `<json>`] [--config `<json>`] [--max-depth `<n>`]
//!   tinyview tokens `<template>`   - Print the token stream
//!   tinyview ast `<template>`      - Print the parsed tree
//!
//! Set `RUST_LOG=tinyview=debug` (or `trace`) for diagnostics on stderr.

use clap::{value_parser, Arg, ArgMatches, Command};
use std::process;
use tinyview::{tokenize, tokens_to_string, Engine, EngineConfig, Value};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let template_arg = || {
        Arg::new("template")
            .help("Path to the template file")
            .required(true)
            .index(1)
    };

    let matches = Command::new("tinyview")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render and inspect tinyview templates")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("render")
                .about("Render a template against a JSON model")
                .arg(template_arg())
                .arg(
                    Arg::new("model")
                        .long("model")
                        .short('m')
                        .help("JSON file bound as `model` (defaults to null)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("JSON engine configuration file"),
                )
                .arg(
                    Arg::new("max-depth")
                        .long("max-depth")
                        .help("Maximum if/foreach nesting depth")
                        .value_parser(value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the tokens of a template")
                .arg(template_arg()),
        )
        .subcommand(
            Command::new("ast")
                .about("Print the parsed tree of a template")
                .arg(template_arg()),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("render", sub)) => handle_render_command(sub),
        Some(("tokens", sub)) => handle_tokens_command(&template_path(sub)),
        Some(("ast", sub)) => handle_ast_command(&template_path(sub)),
        _ => unreachable!(),
    }
}

fn template_path(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("template")
        .cloned()
        .unwrap_or_default()
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn read_source(path: &str) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("reading {}: {}", path, e)))
}

/// Handle the render command
fn handle_render_command(matches: &ArgMatches) {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => EngineConfig::load(path).unwrap_or_else(|e| fail(e)),
        None => EngineConfig::default(),
    };
    if let Some(depth) = matches.get_one::<usize>("max-depth") {
        config.max_nesting_depth = *depth;
    }

    let model = match matches.get_one::<String>("model") {
        Some(path) => {
            let json: serde_json::Value = serde_json::from_str(&read_source(path))
                .unwrap_or_else(|e| fail(format!("invalid model {}: {}", path, e)));
            Value::from(json)
        }
        None => Value::Null,
    };

    let source = read_source(&template_path(matches));
    let output = Engine::with_config(config)
        .render(&source, &model)
        .unwrap_or_else(|e| fail(format!("parse error: {}", e)));

    print!("{}", output);
}

/// Handle the tokens command
fn handle_tokens_command(path: &str) {
    let source = read_source(path);
    print!("{}", tokens_to_string(&tokenize(&source)));
}

/// Handle the ast command
fn handle_ast_command(path: &str) {
    let source = read_source(path);
    let template = Engine::new()
        .compile(&source)
        .unwrap_or_else(|e| fail(format!("parse error: {}", e)));
    print!("{}", template.pretty_print(""));
}
