//! Line-oriented shell over a [`TodoStore`].
//!
//! Generic over the reader and writer so it runs the same against stdin or
//! an in-memory script.

use crate::command::{Command, CommandError};
use crate::config::ShellConfig;
use crate::store::TodoStore;
use crate::types::TodoRejection;
use std::io::{self, BufRead, Write};

/// Reads commands from `input` until `exit` or end of input
///
/// # Errors
///
/// Returns any I/O error from reading `input` or writing `output`.
pub fn run_shell<R, W>(
    store: &mut TodoStore,
    config: &ShellConfig,
    input: R,
    mut output: W,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "Todo shell. Type 'help' for commands.")?;

    let mut lines = input.lines();
    loop {
        write!(output, "{}", config.prompt)?;
        output.flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        if config.echo {
            writeln!(output, "{line}")?;
        }

        match Command::parse(&line) {
            Ok(Command::Exit) => break,
            Ok(command) => execute(store, command, &mut output)?,
            Err(CommandError::Empty) => {},
            Err(error) => {
                tracing::debug!(%error, "Unparsable shell input");
                writeln!(output, "{error}")?;
            },
        }
    }

    writeln!(output, "Goodbye!")?;
    Ok(())
}

fn execute<W: Write>(store: &mut TodoStore, command: Command, output: &mut W) -> io::Result<()> {
    match command {
        Command::Add(title) => match store.add(&title) {
            Some(item) => writeln!(output, "Added {} {}", item.id, item.title),
            None => match store.last_rejection() {
                Some(TodoRejection::IdsExhausted) => {
                    writeln!(output, "{}.", TodoRejection::IdsExhausted)
                },
                _ => writeln!(output, "Title cannot be empty."),
            },
        },
        Command::Toggle(id) => match store.toggle(id) {
            Some(item) => writeln!(output, "{} {item}", item.id),
            None => writeln!(output, "Task {id} not found."),
        },
        Command::Remove(id) => {
            if store.get(id).is_none() {
                return writeln!(output, "Task {id} not found.");
            }
            store.remove(id);
            writeln!(output, "Removed {id}.")
        },
        Command::List => {
            let items = store.list();
            if items.is_empty() {
                return writeln!(output, "No tasks yet.");
            }
            for item in &items {
                writeln!(output, "{} {item}", item.id)?;
            }
            writeln!(
                output,
                "({} of {} completed)",
                store.completed_count(),
                items.len()
            )
        },
        Command::Clear => {
            store.clear();
            writeln!(output, "Cleared all tasks.")
        },
        Command::Help => writeln!(output, "{}", Command::USAGE),
        // Handled by the read loop
        Command::Exit => Ok(()),
    }
}
