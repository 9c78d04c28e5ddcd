// src/shell.rs
//! Line-oriented commands over a [`Session`].
//!
//! Shared by the interactive `audio-cutter` binary and the scripted
//! `audio-cut` tool.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::edit::ArtifactSummary;
use crate::error::{AudioError, Result};
use crate::session::Session;

/// Errors from parsing a command line
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{0}' is not a number of seconds")]
    InvalidNumber(String),

    #[error("'{0}' takes no arguments")]
    UnexpectedArgument(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Load(PathBuf),
    Select { start: f64, end: f64 },
    Cut,
    Remove,
    Undo,
    Redo,
    Export {
        format: Option<String>,
        dir: Option<PathBuf>,
    },
    Info,
    Close,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  load <path>              open an audio file
  select <start> <end>     select a range in seconds
  cut                      keep only the selection
  remove                   delete the selection
  undo / redo              step through edit history
  export [format] [dir]    save the current audio (default dir: .)
  info                     show file and selection details
  close                    close the current file
  quit                     leave";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default().to_ascii_lowercase();
        let rest: Vec<&str> = words.collect();

        let no_args = |command: &'static str, value: Command| {
            if rest.is_empty() {
                Ok(value)
            } else {
                Err(CommandError::UnexpectedArgument(command))
            }
        };

        match name.as_str() {
            "load" | "open" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "load",
                        argument: "a file path",
                    });
                }
                // Paths may contain spaces
                Ok(Command::Load(PathBuf::from(rest.join(" "))))
            }
            "select" | "sel" => match rest.as_slice() {
                [start, end] => Ok(Command::Select {
                    start: parse_seconds(start)?,
                    end: parse_seconds(end)?,
                }),
                _ => Err(CommandError::MissingArgument {
                    command: "select",
                    argument: "a start and an end time",
                }),
            },
            "cut" => no_args("cut", Command::Cut),
            "remove" | "rm" => no_args("remove", Command::Remove),
            "undo" => no_args("undo", Command::Undo),
            "redo" => no_args("redo", Command::Redo),
            "export" | "save" => Ok(Command::Export {
                format: rest.first().map(|s| s.to_string()),
                dir: rest.get(1).map(PathBuf::from),
            }),
            "info" => no_args("info", Command::Info),
            "close" => no_args("close", Command::Close),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(line.trim().to_string())),
        }
    }
}

fn parse_seconds(value: &str) -> std::result::Result<f64, CommandError> {
    value
        .trim_end_matches('s')
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidNumber(value.to_string()))
}

/// Render a summary the way both binaries print it
pub fn describe(summary: &ArtifactSummary) -> String {
    let (start_min, end_min) = summary.selection.as_minutes();
    format!(
        "duration {:.2}s, selection {:.2}s - {:.2}s ({:.2} - {:.2} min)",
        summary.duration_seconds, summary.selection.start, summary.selection.end, start_min, end_min
    )
}

/// Run one command and return the text to show for it
pub async fn execute(session: &Session, command: Command) -> Result<String> {
    match command {
        Command::Load(path) => {
            let duration = session.load_file(&path).await?;
            Ok(format!("loaded {} ({:.2}s)", path.display(), duration))
        }
        Command::Select { start, end } => session.with_engine(|engine| {
            engine.set_selection(start, end)?;
            let summary = engine.summary().ok_or(AudioError::NotLoaded)?;
            Ok(describe(&summary))
        }),
        Command::Cut => Ok(format!("cut: {}", describe(&session.cut()?))),
        Command::Remove => Ok(format!("removed: {}", describe(&session.remove()?))),
        Command::Undo => Ok(format!("undo: {}", describe(&session.undo()?))),
        Command::Redo => Ok(format!("redo: {}", describe(&session.redo()?))),
        Command::Export { format, dir } => {
            let export = session.export(format.as_deref())?;
            let path = export.save(dir.unwrap_or_else(|| PathBuf::from(".")))?;
            Ok(format!("saved {} ({})", path.display(), export.mime_type))
        }
        // One lock for the whole snapshot
        Command::Info => session.with_engine(|engine| {
            let info = engine.info().ok_or(AudioError::NotLoaded)?;
            let summary = engine.summary().ok_or(AudioError::NotLoaded)?;
            let original = engine.source_duration().ok_or(AudioError::NotLoaded)?;
            Ok(format!(
                "{} | {} Hz, {} ch | {} | original {:.2}s | undo {} / redo {}",
                info.format,
                info.sample_rate,
                info.channels,
                describe(&summary),
                original,
                engine.undo_depth(),
                engine.redo_depth()
            ))
        }),
        Command::Close => {
            session.close();
            Ok("closed".to_string())
        }
        Command::Help => Ok(HELP.to_string()),
        Command::Quit => Ok(String::new()),
    }
}

/// Read commands line by line until input ends or `quit`
///
/// Command failures are reported on `output` and do not stop the loop.
pub async fn run<R: BufRead, W: Write>(session: &Session, input: R, mut output: W) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "error: {}", e)?;
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }

        match execute(session, command).await {
            Ok(text) => writeln!(output, "{}", text)?,
            Err(e) => writeln!(output, "error: {}", e)?,
        }
        output.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::encoder::test_wav_bytes;
    use std::io::Cursor;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "select 2 4.5".parse::<Command>(),
            Ok(Command::Select { start: 2.0, end: 4.5 })
        );
        assert_eq!(
            "SEL 1s 3s".parse::<Command>(),
            Ok(Command::Select { start: 1.0, end: 3.0 })
        );
        assert_eq!("cut".parse::<Command>(), Ok(Command::Cut));
        assert_eq!(
            "load my song.wav".parse::<Command>(),
            Ok(Command::Load(PathBuf::from("my song.wav")))
        );
        assert_eq!(
            "export wav /tmp".parse::<Command>(),
            Ok(Command::Export {
                format: Some("wav".into()),
                dir: Some(PathBuf::from("/tmp"))
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("select 2".parse::<Command>(), Err(CommandError::MissingArgument { .. })));
        assert_eq!(
            "select a b".parse::<Command>(),
            Err(CommandError::InvalidNumber("a".into()))
        );
        assert_eq!("cut now".parse::<Command>(), Err(CommandError::UnexpectedArgument("cut")));
        assert!(matches!("dance".parse::<Command>(), Err(CommandError::Unknown(_))));
        assert!(matches!("load".parse::<Command>(), Err(CommandError::MissingArgument { .. })));
    }

    #[tokio::test]
    async fn test_run_script() {
        let session = Session::default();
        session
            .load_bytes(test_wav_bytes(10.0, 8000, 1), "audio/wav", None)
            .unwrap();

        let script = "select 2 4\ncut\nundo\n# comment\nbogus\nselect 2 4\nremove\nredo\nquit\ninfo\n";
        let mut output = Vec::new();
        run(&session, Cursor::new(script), &mut output).await.unwrap();
        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "duration 10.00s, selection 2.00s - 4.00s (0.03 - 0.07 min)");
        assert_eq!(lines[1], "cut: duration 2.00s, selection 0.00s - 2.00s (0.00 - 0.03 min)");
        assert_eq!(lines[2], "undo: duration 10.00s, selection 2.00s - 4.00s (0.03 - 0.07 min)");
        assert!(lines[3].starts_with("error: Unknown command"));
        assert!(lines[5].starts_with("removed: duration 8.00s"));
        assert_eq!(lines[6], "error: Nothing to redo");
        // Nothing after quit runs
        assert_eq!(lines.len(), 7);
    }

    #[tokio::test]
    async fn test_execute_export_to_dir() {
        let session = Session::default();
        session
            .load_bytes(test_wav_bytes(1.0, 8000, 1), "audio/wav", Some("shell_export_test.wav".into()))
            .unwrap();

        let dir = std::env::temp_dir();
        let text = execute(
            &session,
            Command::Export {
                format: Some("wav".into()),
                dir: Some(dir.clone()),
            },
        )
        .await
        .unwrap();

        let path = dir.join("shell_export_test.wav");
        assert!(text.starts_with("saved"));
        assert!(path.exists());
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_info_reports_one_consistent_snapshot() {
        let session = Session::default();
        session
            .load_bytes(test_wav_bytes(10.0, 8000, 1), "audio/wav", None)
            .unwrap();
        execute(&session, Command::Select { start: 0.0, end: 2.0 }).await.unwrap();
        execute(&session, Command::Remove).await.unwrap();
        execute(&session, Command::Undo).await.unwrap();

        let text = execute(&session, Command::Info).await.unwrap();
        assert_eq!(
            text,
            "WAV PCM int16 | 8000 Hz, 1 ch | duration 10.00s, selection 0.00s - 2.00s \
             (0.00 - 0.03 min) | original 10.00s | undo 0 / redo 1"
        );
    }

    #[tokio::test]
    async fn test_select_rejected_without_file() {
        let session = Session::default();
        let result = execute(&session, Command::Select { start: 0.0, end: 1.0 }).await;
        assert!(matches!(result, Err(AudioError::NotLoaded)));
    }

    #[tokio::test]
    async fn test_info_requires_file() {
        let session = Session::default();
        let result = execute(&session, Command::Info).await;
        assert!(matches!(result, Err(AudioError::NotLoaded)));
    }
}
