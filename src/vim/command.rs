use thiserror::Error;

/// Commands accepted on the `:` line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Back,
    Reset,
    Help,
    Download,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),
}

pub fn parse_command(input: &str) -> Result<Command, CommandError> {
    let input = input.trim().to_lowercase();
    let cmd = input.split_whitespace().next().unwrap_or("");

    match cmd {
        "q" | "quit" | "exit" => Ok(Command::Quit),
        "back" | "b" => Ok(Command::Back),
        "reset" | "new" => Ok(Command::Reset),
        "help" | "h" | "?" => Ok(Command::Help),
        "download" | "d" | "w" => Ok(Command::Download),
        "" => Err(CommandError::Unknown("empty command".to_string())),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}
