//! Read-eval loop.

use crate::command::Flow;
use crate::manager::Manager;
use std::io::{self, BufRead, Write};
use tracing::{error, info, warn};

/// Run the session until `quit` or end of input.
///
/// A failing command is reported and the loop moves on to the next line.
pub fn run<R: BufRead, W: Write>(manager: &mut Manager<R, W>) -> io::Result<()> {
    let console = manager.console_mut();
    writeln!(console, "Welcome to the Birthday Book Manager")?;
    writeln!(console, "Type 'help' for available commands")?;

    let prompt = manager.config().prompt.clone();

    loop {
        manager.console_mut().prompt(&prompt)?;

        let line = match manager.console_mut().read_line() {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("End of input, leaving session");
                break;
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                warn!("Discarded input line: {}", e);
                writeln!(manager.console_mut(), "Error: {}", e)?;
                continue;
            }
            Err(e) => {
                error!("Read error: {}", e);
                return Err(e);
            }
        };
        let line = line.trim();

        if manager.echo_enabled() {
            writeln!(manager.console_mut(), "You entered: \"{}\"", line)?;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match manager.dispatch(&tokens) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => {
                if let Err(report_err) = manager.report(&e) {
                    error!("Failed to report error: {}", report_err);
                }
            }
        }
    }

    Ok(())
}
