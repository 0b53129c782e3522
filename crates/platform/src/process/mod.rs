//! Native command construction

use arcade_types::Platform;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Platform-specific command builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl PlatformCommand {
    /// Create a new platform command
    #[must_use]
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Invocation that starts `executable` (a file name inside `install_dir`)
    ///
    /// - Windows: `cmd /C start "" <exe> <arg>`
    /// - macOS: `open -a <exe> --args <arg>`
    /// - Linux: `sh <exe> <arg>`
    #[must_use]
    pub fn launch(platform: Platform, install_dir: &Path, executable: &str, argument: &str) -> Self {
        let mut command = match platform {
            Platform::Windows => {
                let mut command = Self::new("cmd");
                command.args(["/C", "start", "", executable]);
                command
            }
            Platform::MacOs => {
                let mut command = Self::new("open");
                command.args(["-a", executable, "--args"]);
                command
            }
            Platform::Linux => {
                let mut command = Self::new("sh");
                command.arg(executable);
                command
            }
        };
        if !argument.is_empty() {
            command.arg(argument);
        }
        command.current_dir(install_dir);
        command
    }

    /// Add an argument to the command
    pub fn arg<S: AsRef<str>>(&mut self, arg: S) -> &mut Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    /// Add multiple arguments to the command
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string());
        }
        self
    }

    /// Set the working directory for the command
    pub fn current_dir<P: Into<PathBuf>>(&mut self, dir: P) -> &mut Self {
        self.current_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Build the tokio command, killed if its handle is dropped
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).kill_on_drop(true);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        command
    }
}

impl std::fmt::Display for PlatformCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_invocation() {
        let cmd = PlatformCommand::launch(
            Platform::Windows,
            Path::new("C:/Apps/g1"),
            "Game.bat",
            "-AppCommandLineArg",
        );
        assert_eq!(cmd.program(), "cmd");
        assert_eq!(
            cmd.get_args(),
            ["/C", "start", "", "Game.bat", "-AppCommandLineArg"]
        );
        assert_eq!(cmd.get_current_dir(), Some(Path::new("C:/Apps/g1")));
    }

    #[test]
    fn test_macos_invocation() {
        let cmd = PlatformCommand::launch(
            Platform::MacOs,
            Path::new("/Apps/g1"),
            "Game.app",
            "-AppCommandLineArg",
        );
        assert_eq!(cmd.to_string(), "open -a Game.app --args -AppCommandLineArg");
    }

    #[test]
    fn test_empty_argument_omitted() {
        let cmd = PlatformCommand::launch(Platform::Linux, Path::new("/Apps/g1"), "run.sh", "");
        assert_eq!(cmd.get_args(), ["run.sh"]);
    }
}
