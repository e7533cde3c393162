use anyhow::{Context, Result};
use exam_markup_config::Config;
use exam_markup_engine::{
    MarkupOptions, PlainTextSink, normalize_with, plain_text, render_with, write_blocks,
};
use std::io::Read;
use std::{env, fs, process};

struct Cli {
    command: Command,
    input: String,
    json: bool,
    config_path: Option<String>,
}

enum Command {
    Normalize,
    Render,
    Plain,
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} <normalize|render|plain> <file|-> [--json] [--config <path>]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  normalize   Repair raw annotation text into canonical markup");
    eprintln!("  render      Parse markup and print the block structure");
    eprintln!("  plain       Strip markup down to searchable plain text");
    eprintln!();
    eprintln!("Pass '-' as the file to read from stdin.");
    process::exit(1);
}

fn parse_args() -> Result<Cli> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("exam-markup");

    if args.len() < 3 {
        usage(program);
    }

    let command = match args[1].as_str() {
        "normalize" => Command::Normalize,
        "render" => Command::Render,
        "plain" => Command::Plain,
        other => {
            eprintln!("Error: unknown command '{other}'");
            usage(program);
        }
    };

    let mut cli = Cli {
        command,
        input: args[2].clone(),
        json: false,
        config_path: None,
    };

    let mut rest = args[3..].iter();
    while let Some(flag) = rest.next() {
        match flag.as_str() {
            "--json" => cli.json = true,
            "--config" => match rest.next() {
                Some(path) => cli.config_path = Some(path.clone()),
                None => {
                    eprintln!("Error: --config requires a path");
                    usage(program);
                }
            },
            other => {
                eprintln!("Error: unknown flag '{other}'");
                usage(program);
            }
        }
    }

    Ok(cli)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read '{input}'"))
    }
}

fn load_options(config_path: Option<&str>) -> Result<MarkupOptions> {
    let config = match config_path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from '{path}'"))?,
        None => Config::load().context("Failed to load config")?,
    };
    let options = match config {
        Some(config) => config.into_options()?,
        None => MarkupOptions::default(),
    };
    Ok(options)
}

fn main() -> Result<()> {
    let cli = parse_args()?;
    let raw = read_input(&cli.input)?;
    let options = load_options(cli.config_path.as_deref())?;

    match cli.command {
        Command::Normalize => {
            println!("{}", normalize_with(&raw, &options));
        }
        Command::Render => {
            let markup = normalize_with(&raw, &options);
            let blocks = render_with(&markup, &options);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&blocks)?);
            } else {
                let mut sink = PlainTextSink::new();
                write_blocks(&mut sink, &blocks);
                println!("{}", sink.finish());
            }
        }
        Command::Plain => {
            let markup = normalize_with(&raw, &options);
            println!("{}", plain_text(&markup));
        }
    }

    Ok(())
}
