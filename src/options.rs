//! Parsing Options.
//! `pn-game <GRAPH> [-f t[:output]]... [-i] [-o FILE] [-c FILE]`

use clap::{Arg, ArgAction, Command};
use std::error::Error;
use std::str::FromStr;

use crate::net::io::Format;

/// One scripted firing: `transition` or `transition:output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FireStep {
    pub transition: String,
    pub output: Option<String>,
}

impl FromStr for FireStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (transition, output) = match s.split_once(':') {
            Some((transition, output)) => (transition, Some(output)),
            None => (s, None),
        };
        if transition.is_empty() || output.is_some_and(str::is_empty) {
            return Err(format!("malformed fire step {s:?}, expected t or t:output"));
        }
        Ok(FireStep {
            transition: transition.to_owned(),
            output: output.map(str::to_owned),
        })
    }
}

fn make_options_parser() -> clap::Command {
    let parser = Command::new("pn-game")
        .no_binary_name(true)
        .version("v0.1.0")
        .about("Plays the token game on a workflow Petri net")
        .arg(
            Arg::new("graph")
                .value_name("GRAPH")
                .help("Net definition (.json or .ron)")
                .required(true),
        )
        .arg(
            Arg::new("fire")
                .short('f')
                .long("fire")
                .value_name("STEP")
                .help("Fire a transition, `t` or `t:output`; may be repeated")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Read commands from stdin after the scripted steps")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write the final marking to FILE instead of stdout"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Encoding of the written marking")
                .value_parser(["json", "ron"]),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .default_value("pn-game.toml"),
        );
    parser
}

#[derive(Debug)]
pub struct Options {
    pub graph: String,
    pub steps: Vec<FireStep>,
    pub interactive: bool,
    pub output: Option<String>,
    pub format: Option<Format>,
    pub config: String,
}

impl Options {
    pub fn parse_from_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let flags = shellwords::split(s)?;
        Self::parse_from_args(&flags)
    }

    pub fn parse_from_args(flags: &[String]) -> Result<Self, Box<dyn Error>> {
        let app = make_options_parser();
        let matches = app.try_get_matches_from(flags.iter())?;

        let graph = matches
            .get_one::<String>("graph")
            .cloned()
            .ok_or("missing graph file")?;
        let steps = matches
            .get_many::<String>("fire")
            .into_iter()
            .flatten()
            .map(|step| step.parse::<FireStep>())
            .collect::<Result<Vec<_>, _>>()?;
        let format = match matches.get_one::<String>("format").map(String::as_str) {
            Some("json") => Some(Format::Json),
            Some("ron") => Some(Format::Ron),
            Some(other) => return Err(format!("unsupported format {other:?}").into()),
            None => None,
        };
        let config = matches
            .get_one::<String>("config")
            .cloned()
            .unwrap_or_default();

        Ok(Options {
            graph,
            steps,
            interactive: matches.get_flag("interactive"),
            output: matches.get_one::<String>("output").cloned(),
            format,
            config,
        })
    }
}
