//! 命令行交互：解析一行命令并作用于 [`Session`]。
use std::fmt::Write as _;

use itertools::Itertools;
use thiserror::Error;

use crate::game::FireOutcome;
use crate::session::{Session, SessionError, SessionEvent, SessionState};

pub const HELP: &str = "\
commands:
  enabled              list enabled transitions
  options <t>          show output choices of <t>
  fire <t> [output]    select <t> and fire it
  select <t>           select <t> without supplying an output yet
  choose <output>      fire the selected transition into <output>
  marking              print the current marking
  reset                restore the initial marking
  end                  stop the game (marking is reset)
  start                start a new game
  help | quit";

#[derive(Debug, Error)]
pub enum ReplError {
    #[error("cannot split command line: {0}")]
    Split(#[from] shellwords::MismatchedQuotes),
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Enabled,
    Options(String),
    Fire {
        transition: String,
        output: Option<String>,
    },
    Select(String),
    Choose(String),
    Marking,
    Reset,
    End,
    Start,
    Help,
    Quit,
}

impl Command {
    /// `Ok(None)` for blank lines and `#` comments.
    pub fn parse(line: &str) -> Result<Option<Command>, ReplError> {
        let words = shellwords::split(line)?;
        let Some((head, args)) = words.split_first() else {
            return Ok(None);
        };
        if head.starts_with('#') {
            return Ok(None);
        }

        let command = match (head.as_str(), args) {
            ("enabled" | "ls", []) => Command::Enabled,
            ("options", [t]) => Command::Options(t.clone()),
            ("fire", [t]) => Command::Fire {
                transition: t.clone(),
                output: None,
            },
            ("fire", [t, output]) => Command::Fire {
                transition: t.clone(),
                output: Some(output.clone()),
            },
            ("select", [t]) => Command::Select(t.clone()),
            ("choose", [output]) => Command::Choose(output.clone()),
            ("marking" | "m", []) => Command::Marking,
            ("reset", []) => Command::Reset,
            ("end", []) => Command::End,
            ("start", []) => Command::Start,
            ("help" | "?", []) => Command::Help,
            ("quit" | "exit" | "q", []) => Command::Quit,
            (head, _) => {
                return Err(ReplError::Usage(format!(
                    "unrecognised command {head:?}, try `help`"
                )));
            }
        };
        Ok(Some(command))
    }
}

/// Runs `command` and renders its result as text.
pub fn execute(session: &mut Session, command: Command) -> Result<String, ReplError> {
    let mut out = String::new();
    match command {
        Command::Enabled => {
            let _ = write!(out, "enabled: {}", session.enabled_transitions().iter().join(", "));
        }
        Command::Options(transition) => {
            let game = session
                .game()
                .ok_or_else(|| ReplError::Usage("no graph loaded".into()))?;
            let options = game.transition_options(&transition);
            match options.available_outputs {
                Some(outputs) if options.requires_selection => {
                    let _ = write!(out, "{transition} needs an output:");
                    for output in outputs {
                        let _ = write!(out, "\n  {} ({})", output.id, output.label);
                    }
                }
                _ => {
                    let _ = write!(out, "{transition} needs no output choice");
                }
            }
        }
        Command::Fire { transition, output } => {
            let update = session.handle(SessionEvent::SelectTransition(transition))?;
            let update = match update.state {
                SessionState::TransitionSelected { .. } => {
                    session.handle(SessionEvent::FireTransition { output })?
                }
                _ => update,
            };
            let _ = write!(out, "{}", describe(session, update.fired.as_ref()));
        }
        Command::Select(transition) => {
            let update = session.handle(SessionEvent::SelectTransition(transition))?;
            let _ = write!(out, "{}", update.state);
            if update.fired.is_some() {
                let _ = write!(out, "\n{}", describe(session, update.fired.as_ref()));
            }
        }
        Command::Choose(output) => {
            let update = session.handle(SessionEvent::FireTransition {
                output: Some(output),
            })?;
            let _ = write!(out, "{}", describe(session, update.fired.as_ref()));
        }
        Command::Marking => {
            let marking = session
                .marking()
                .ok_or_else(|| ReplError::Usage("no graph loaded".into()))?;
            let _ = write!(out, "{marking}");
        }
        Command::Reset => {
            session.handle(SessionEvent::ResetGame)?;
            let _ = write!(out, "reset: {}", session.marking().unwrap_or_default());
        }
        Command::End => {
            let update = session.handle(SessionEvent::EndGame)?;
            let _ = write!(out, "{}", update.state);
        }
        Command::Start => {
            let update = session.handle(SessionEvent::StartGame)?;
            let _ = write!(out, "{}; enabled: {}", update.state, update.enabled.iter().join(", "));
        }
        Command::Help => out.push_str(HELP),
        Command::Quit => {}
    }
    Ok(out)
}

fn describe(session: &Session, fired: Option<&FireOutcome>) -> String {
    match fired {
        Some(FireOutcome::Fired(marking)) => format!("fired: {marking}"),
        Some(FireOutcome::NotFired(reason)) => format!("not fired: {reason:?}"),
        None => format!("waiting in {}", session.state()),
    }
}
