//! Interactive terminal game over a session registry.

use crate::error::GameError;
use crate::game::{AttackMode, Snapshot};
use crate::session::{SessionId, SessionRegistry};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}' (type 'help')")]
    Unknown(String),
    #[error("'{0}' needs a card number")]
    MissingIndex(&'static str),
    #[error("'{0}' is not a card number (numbers start at 1)")]
    BadIndex(String),
    #[error("'manual' needs an expression after the enemy number")]
    MissingExpression,
}

/// One line typed at the prompt. Indices are already 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayCommand {
    Check(usize),
    Auto(usize),
    Manual(usize, String),
    Discard(usize),
    Values,
    Help,
    Quit,
}

fn parse_index(word: Option<&str>, command: &'static str) -> Result<usize, CommandError> {
    let word = word.ok_or(CommandError::MissingIndex(command))?;
    match word.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandError::BadIndex(word.to_string())),
    }
}

impl PlayCommand {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        let mut words = rest.split_whitespace();

        match head.to_lowercase().as_str() {
            "check" | "c" => Ok(PlayCommand::Check(parse_index(words.next(), "check")?)),
            "auto" | "a" => Ok(PlayCommand::Auto(parse_index(words.next(), "auto")?)),
            "discard" | "d" => Ok(PlayCommand::Discard(parse_index(words.next(), "discard")?)),
            "manual" | "m" => {
                let index = parse_index(words.next(), "manual")?;
                let expression = rest
                    .split_once(char::is_whitespace)
                    .map(|(_, expr)| expr.trim())
                    .unwrap_or("");
                if expression.is_empty() {
                    return Err(CommandError::MissingExpression);
                }
                Ok(PlayCommand::Manual(index, expression.to_string()))
            }
            "values" | "v" => Ok(PlayCommand::Values),
            "help" | "h" | "?" => Ok(PlayCommand::Help),
            "quit" | "q" | "exit" => Ok(PlayCommand::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

const HELP: &str = "\
Commands (card numbers start at 1):
  check N          can the hand defeat enemy N?
  auto N           attack enemy N with a solver-found expression
  manual N EXPR    attack enemy N with your own expression
  discard N        discard hand card N after a win
  values           show hand card values
  help             show this help
  quit             leave the game";

/// Render a snapshot the way the prompt shows it
pub fn render(snapshot: &Snapshot, kings_to_win: u8) -> String {
    let mut out = String::new();
    out.push_str("Enemies:\n");
    for (i, card) in snapshot.enemy_row.iter().enumerate() {
        let king = if card.is_any_king { "  (king)" } else { "" };
        out.push_str(&format!("  {}) {:<12} value {}{}\n", i + 1, card.label, card.value, king));
    }
    out.push_str("Hand:\n");
    for (i, card) in snapshot.hand.iter().enumerate() {
        let anchor = if card.is_anchor { "  (anchor, optional)" } else { "" };
        out.push_str(&format!("  {}) {:<12} value {}{}\n", i + 1, card.label, card.value, anchor));
    }
    out.push_str(&format!(
        "Kings defeated: {}/{}   Deck: {} cards\n",
        snapshot.kings_defeated, kings_to_win, snapshot.deck_size
    ));
    if snapshot.over {
        out.push_str(if snapshot.victory {
            "*** Victory! Every king has fallen. ***\n"
        } else {
            "*** No enemies remain. The game is lost. ***\n"
        });
    } else if snapshot.discard_pending {
        out.push_str("Choose a hand card to discard (discard N).\n");
    }
    out
}

struct Prompt<'a, W: Write> {
    out: &'a mut W,
    json: bool,
    kings_to_win: u8,
}

impl<W: Write> Prompt<'_, W> {
    fn show<T: Serialize>(&mut self, value: &T, text: impl FnOnce() -> String) -> io::Result<()> {
        if self.json {
            let line = serde_json::to_string(value).map_err(io::Error::other)?;
            writeln!(self.out, "{}", line)
        } else {
            write!(self.out, "{}", text())
        }
    }

    fn state(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        let kings = self.kings_to_win;
        self.show(snapshot, || render(snapshot, kings))
    }

    fn command_error(&mut self, err: &CommandError) -> io::Result<()> {
        if self.json {
            let body = serde_json::json!({ "error": err.to_string(), "kind": "InvalidCommand" });
            writeln!(self.out, "{}", body)
        } else {
            writeln!(self.out, "✗ {}", err)
        }
    }

    fn help(&mut self) -> io::Result<()> {
        if self.json {
            writeln!(self.out, "{}", serde_json::json!({ "help": HELP }))
        } else {
            writeln!(self.out, "{}", HELP)
        }
    }

    fn error(&mut self, err: &GameError) -> io::Result<()> {
        if self.json {
            let body = serde_json::json!({ "error": err.to_string(), "kind": err.kind() });
            writeln!(self.out, "{}", body)
        } else {
            writeln!(self.out, "✗ {}", err)
        }
    }
}

/// Run the prompt loop until `quit`, end of input, or the game ends
pub fn run_play<R: BufRead, W: Write>(
    registry: &mut SessionRegistry,
    id: SessionId,
    input: R,
    out: &mut W,
    json: bool,
) -> io::Result<()> {
    let kings_to_win = registry.rules().kings_to_win;
    let mut prompt = Prompt { out, json, kings_to_win };

    match registry.get_state(id) {
        Ok(snapshot) => prompt.state(&snapshot)?,
        Err(err) => return prompt.error(&err),
    }
    if !json {
        writeln!(prompt.out, "Type 'help' for commands.")?;
    }

    let mut lines = input.lines();
    loop {
        if !json {
            write!(prompt.out, "> ")?;
            prompt.out.flush()?;
        }
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match PlayCommand::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                prompt.command_error(&err)?;
                continue;
            }
        };

        let outcome = match command {
            PlayCommand::Quit => return Ok(()),
            PlayCommand::Help => {
                prompt.help()?;
                continue;
            }
            PlayCommand::Values => registry.hand_values(id).map(|values| {
                prompt.show(&values, || {
                    values
                        .iter()
                        .enumerate()
                        .map(|(i, v)| format!("  {}) {} = {}\n", i + 1, v.label, v.value))
                        .collect()
                })
            }),
            PlayCommand::Check(index) => registry.check_enemy(id, index).map(|report| {
                prompt.show(&report, || match &report.expression {
                    Some(expr) => format!("✓ Enemy {} (value {}) falls to {}\n", index + 1, report.target, expr),
                    None => format!("✗ Enemy {} (value {}) cannot be defeated yet\n", index + 1, report.target),
                })
            }),
            PlayCommand::Auto(index) => registry
                .attack(id, index, AttackMode::Auto)
                .map(|snapshot| prompt.state(&snapshot)),
            PlayCommand::Manual(index, expr) => registry
                .attack(id, index, AttackMode::Manual(expr))
                .map(|snapshot| prompt.state(&snapshot)),
            PlayCommand::Discard(index) => registry.discard(id, index).map(|snapshot| prompt.state(&snapshot)),
        };

        match outcome {
            Ok(written) => written?,
            Err(err) => prompt.error(&err)?,
        }

        if registry.get_state(id).map(|s| s.over).unwrap_or(true) {
            return Ok(());
        }
    }
}
