use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};

use pn_token_game::net::io as net_io;
use pn_token_game::options::Options;
use pn_token_game::repl::{self, Command};
use pn_token_game::{GameConfig, Session, SessionEvent};

fn main() {
    if std::env::var("PN_LOG").is_ok() {
        let e = env_logger::Env::new()
            .filter("PN_LOG")
            .write_style("PN_LOG_STYLE");
        env_logger::init_from_env(e);
    }

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let options = match Options::parse_from_args(&args) {
        Ok(options) => options,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                clap_err.exit();
            }
            eprintln!("{err}");
            std::process::exit(2);
        }
    };
    log::debug!("pn-game options: {:?}", options);

    if let Err(err) = run(options) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(options: Options) -> Result<()> {
    let config = GameConfig::load_from_file(&options.config)?;
    let graph = net_io::read_graph(&options.graph)
        .with_context(|| format!("Failed to load graph: {}", options.graph))?;

    let mut session = Session::new(config.clone());
    session.handle(SessionEvent::LoadGraph(graph))?;
    session.handle(SessionEvent::StartGame)?;

    if options.steps.len() > config.max_steps {
        bail!(
            "{} fire steps requested, max_steps is {}",
            options.steps.len(),
            config.max_steps
        );
    }
    for step in &options.steps {
        let command = Command::Fire {
            transition: step.transition.clone(),
            output: step.output.clone(),
        };
        let text = repl::execute(&mut session, command)
            .with_context(|| format!("step {:?} failed", step.transition))?;
        println!("{}: {}", step.transition, text);
    }

    if options.interactive {
        interact(&mut session)?;
    }

    let marking = session.marking().unwrap_or_default();
    let format = options.format.unwrap_or(config.output_format);
    match &options.output {
        Some(path) => {
            net_io::write_value(path, &marking, format)
                .with_context(|| format!("Failed to write marking: {path}"))?;
            log::info!("final marking written to {path}");
        }
        None if options.steps.is_empty() && !options.interactive => {
            println!("{}", net_io::to_string(&marking, format)?);
            println!("enabled: {}", session.enabled_transitions().join(", "));
        }
        None => println!("{}", net_io::to_string(&marking, format)?),
    }
    Ok(())
}

fn interact(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    println!("{}", repl::HELP);

    loop {
        write!(stdout, "pn> ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        match repl::execute(session, command) {
            Ok(text) => println!("{text}"),
            Err(err) => println!("error: {err}"),
        }
    }
    Ok(())
}
