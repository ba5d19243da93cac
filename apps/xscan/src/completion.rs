//! Shell completion commands
//!
//! Generators are registered by name and exposed as `xscan completion <shell>`.
//! Building the registry performs no I/O; each action writes its script to the
//! writer it is handed.

use clap::{ArgMatches, Command};
use clap_complete::{generate, Shell};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::{self, Write};

/// Writes a completion script
pub type CompletionAction = fn(&mut dyn Write) -> io::Result<()>;

/// A named completion generator before registration
#[derive(Clone, Copy)]
pub struct CompletionGenerator {
    pub description: &'static str,
    pub usage: &'static [&'static str],
    pub action: CompletionAction,
}

/// A completion sub-command ready to be attached to the CLI
#[derive(Clone)]
pub struct RegisteredCommand {
    pub name: &'static str,
    pub description: &'static str,
    pub help_name: String,
    pub action: CompletionAction,
}

impl std::fmt::Debug for RegisteredCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredCommand")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Render the help name of a command
#[must_use]
pub fn create_usage(command_path: &str, description: &str, usages: &[&str]) -> String {
    let mut help = format!("Name:\n  xscan {command_path} - {description}\n\nUsage:");
    for usage in usages {
        let _ = write!(help, "\n  {usage}");
    }
    help
}

/// Register generators as commands, sorted by name
#[must_use]
pub fn build_commands(generators: HashMap<&'static str, CompletionGenerator>) -> Vec<RegisteredCommand> {
    let mut commands: Vec<RegisteredCommand> = generators
        .into_iter()
        .map(|(name, generator)| RegisteredCommand {
            name,
            description: generator.description,
            help_name: create_usage(
                &format!("completion {name}"),
                generator.description,
                generator.usage,
            ),
            action: generator.action,
        })
        .collect();
    commands.sort_unstable_by_key(|c| c.name);
    commands
}

fn write_script(shell: Shell, out: &mut dyn Write) -> io::Result<()> {
    let mut cmd = crate::cli::command();
    generate(shell, &mut cmd, "xscan", out);
    out.flush()
}

fn write_bash(out: &mut dyn Write) -> io::Result<()> {
    write_script(Shell::Bash, out)
}

fn write_zsh(out: &mut dyn Write) -> io::Result<()> {
    write_script(Shell::Zsh, out)
}

/// Generators shipped with xscan
#[must_use]
pub fn generators() -> HashMap<&'static str, CompletionGenerator> {
    HashMap::from([
        (
            "bash",
            CompletionGenerator {
                description: "Generate bash completion script.",
                usage: &[
                    "xscan completion bash",
                    "xscan completion bash > /etc/bash_completion.d/xscan",
                ],
                action: write_bash,
            },
        ),
        (
            "zsh",
            CompletionGenerator {
                description: "Generate zsh completion script.",
                usage: &[
                    "xscan completion zsh",
                    "xscan completion zsh > \"${fpath[1]}/_xscan\"",
                ],
                action: write_zsh,
            },
        ),
    ])
}

/// The `completion` sub-command tree
#[must_use]
pub fn completion_command() -> Command {
    let subcommands = build_commands(generators()).into_iter().map(|registered| {
        Command::new(registered.name)
            .about(registered.description)
            .before_long_help(registered.help_name)
    });

    Command::new("completion")
        .about("Generate shell completion scripts")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommands(subcommands)
}

/// Run the completion sub-command selected in `matches`
///
/// # Errors
///
/// Returns an I/O error if the script cannot be written.
pub fn run(matches: &ArgMatches, out: &mut dyn Write) -> io::Result<()> {
    let Some(name) = matches.subcommand_name() else {
        return Ok(());
    };
    match build_commands(generators())
        .into_iter()
        .find(|registered| registered.name == name)
    {
        Some(registered) => (registered.action)(out),
        None => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unknown shell: {name}"),
        )),
    }
}
