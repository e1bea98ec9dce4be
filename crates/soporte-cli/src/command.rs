//! Management command framework for soporte.
//!
//! This module provides the [`ManagementCommand`] trait for defining CLI
//! commands and [`CommandRegistry`] for registering and dispatching them.
//!
//! ## Defining a Custom Command
//!
//! ```rust,no_run
//! use soporte_cli::command::ManagementCommand;
//! use soporte_core::{Settings, SoporteError};
//!
//! struct GreetCommand;
//!
//! impl ManagementCommand for GreetCommand {
//!     fn name(&self) -> &str { "greet" }
//!     fn help(&self) -> &str { "Say hello" }
//!
//!     fn handle(
//!         &self,
//!         _matches: &clap::ArgMatches,
//!         _settings: &Settings,
//!     ) -> Result<(), SoporteError> {
//!         println!("Hello from soporte!");
//!         Ok(())
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::ffi::OsString;

use soporte_core::{Settings, SoporteError, SoporteResult};

/// A management command that can be registered and invoked through the CLI.
///
/// Implementations define a name, help text, optional arguments, and a
/// handler. Commands run synchronously: every operation in this system is
/// a fast, sequential transformation (see the migration engine's
/// execution model).
pub trait ManagementCommand: Send + Sync {
    /// Returns the name of this command (used to invoke it from the CLI).
    fn name(&self) -> &str;

    /// Returns a short help description for this command.
    fn help(&self) -> &str;

    /// Adds custom arguments to the clap command.
    ///
    /// The default implementation returns the command unchanged.
    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Executes the command with the given argument matches and settings.
    fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> Result<(), SoporteError>;
}

/// A registry of management commands.
///
/// Commands are registered by name and can be looked up, listed, or
/// dispatched via [`run`].
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn ManagementCommand>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Creates a new empty command registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Registers a management command.
    ///
    /// If a command with the same name already exists, it is replaced.
    pub fn register(&mut self, command: Box<dyn ManagementCommand>) {
        let name = command.name().to_string();
        self.commands.insert(name, command);
    }

    /// Returns a reference to the command with the given name, if registered.
    pub fn get(&self, name: &str) -> Option<&dyn ManagementCommand> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Returns a sorted list of all registered command names.
    pub fn list_commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Parses `args` and dispatches to the matching registered command.
///
/// `--help`/`--version` print and return `Ok`; parse failures surface as
/// [`SoporteError::Configuration`].
pub fn run<I, T>(registry: &CommandRegistry, settings: &Settings, args: I) -> SoporteResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut cli = clap::Command::new("soporte")
        .about("Management commands for the soporte platform")
        .subcommand_required(true)
        .arg_required_else_help(true);

    for name in registry.list_commands() {
        let command = registry.get(name).expect("listed command");
        cli = cli.subcommand(
            command.add_arguments(
                clap::Command::new(name.to_string()).about(command.help().to_string()),
            ),
        );
    }

    let matches = match cli.try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(err)
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            err.print().ok();
            return Ok(());
        }
        Err(err) => return Err(SoporteError::Configuration(err.to_string())),
    };

    let (name, sub_matches) = matches.subcommand().expect("subcommand required");
    let command = registry
        .get(name)
        .ok_or_else(|| SoporteError::Configuration(format!("Unknown command '{name}'")))?;
    command.handle(sub_matches, settings)
}
