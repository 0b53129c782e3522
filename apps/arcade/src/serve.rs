//! Line commands accepted by `arcade serve`

use arcade_types::TitleKey;
use std::str::FromStr;

/// A request read from stdin while serving
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServeCommand {
    /// `play <id>` or `play #<index>`
    Play(TitleKey),
    /// Cancel every running pipeline
    Stop,
    Status,
    Quit,
}

impl FromStr for ServeCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let command = parts.next().ok_or_else(|| "empty command".to_string())?;
        let argument = parts.next();
        if parts.next().is_some() {
            return Err(format!("too many arguments to '{command}'"));
        }

        match (command.to_ascii_lowercase().as_str(), argument) {
            ("play", Some(title)) => parse_key(title).map(Self::Play),
            ("play", None) => Err("usage: play <id> | play #<index>".to_string()),
            ("stop", None) => Ok(Self::Stop),
            ("status", None) => Ok(Self::Status),
            ("quit" | "exit", None) => Ok(Self::Quit),
            ("stop" | "status" | "quit" | "exit", Some(_)) => {
                Err(format!("'{command}' takes no arguments"))
            }
            _ => Err(format!("unknown command '{command}'")),
        }
    }
}

fn parse_key(title: &str) -> Result<TitleKey, String> {
    match title.strip_prefix('#') {
        Some(position) => position
            .parse::<usize>()
            .map(TitleKey::Index)
            .map_err(|_| format!("'{position}' is not a catalog position")),
        None => Ok(TitleKey::Id(title.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_play() {
        assert_eq!(
            "play g1".parse::<ServeCommand>(),
            Ok(ServeCommand::Play(TitleKey::Id("g1".into())))
        );
        assert_eq!(
            "  PLAY   #2 ".parse::<ServeCommand>(),
            Ok(ServeCommand::Play(TitleKey::Index(2)))
        );
        assert!("play #x".parse::<ServeCommand>().is_err());
        assert!("play".parse::<ServeCommand>().is_err());
    }

    #[test]
    fn test_parse_control_commands() {
        assert_eq!("stop".parse::<ServeCommand>(), Ok(ServeCommand::Stop));
        assert_eq!("status".parse::<ServeCommand>(), Ok(ServeCommand::Status));
        assert_eq!("quit".parse::<ServeCommand>(), Ok(ServeCommand::Quit));
        assert_eq!("exit".parse::<ServeCommand>(), Ok(ServeCommand::Quit));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<ServeCommand>().is_err());
        assert!("dance".parse::<ServeCommand>().is_err());
        assert!("stop now".parse::<ServeCommand>().is_err());
        assert!("play g1 g2".parse::<ServeCommand>().is_err());
    }
}
