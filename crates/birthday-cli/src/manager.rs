//! The birthday book manager.
//!
//! Owns the book and the console, routes tokenized commands to operations
//! and prints every result for the operator.

use crate::command::{Command, Flow, UnknownCommand};
use crate::console::Console;
use birthday_core::{
    storage, Book, BookConfig, BookError, BookStats, PendingChange, Record, Result,
};
use chrono::NaiveDate;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, info};

/// Interactive manager for one birthday book session.
pub struct Manager<R, W> {
    book: Book,
    echo: bool,
    config: BookConfig,
    console: Console<R, W>,
    clock: Box<dyn Fn() -> NaiveDate>,
}

impl<R: BufRead, W: Write> Manager<R, W> {
    /// Create a manager with an empty book.
    pub fn new(config: BookConfig, console: Console<R, W>) -> Self {
        Self {
            book: Book::new(),
            echo: config.echo,
            config,
            console,
            clock: Box::new(birthday_core::record::today),
        }
    }

    /// Pin "today" to a fixed date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.clock = Box::new(move || today);
        self
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    pub fn echo_enabled(&self) -> bool {
        self.echo
    }

    pub fn console_mut(&mut self) -> &mut Console<R, W> {
        &mut self.console
    }

    /// Give back the console, e.g. to inspect the transcript.
    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Report a failed command and carry on.
    pub fn report(&mut self, err: &BookError) -> Result<()> {
        writeln!(self.console, "Error: {}", err)?;
        Ok(())
    }

    /// Route a tokenized input line to its operation.
    pub fn dispatch(&mut self, tokens: &[&str]) -> Result<Flow> {
        let Some((first, args)) = tokens.split_first() else {
            writeln!(
                self.console,
                "No command entered. Please enter a command, or type 'help' for a list."
            )?;
            return Ok(Flow::Continue);
        };

        let command = match first.parse::<Command>() {
            Ok(command) => command,
            Err(UnknownCommand(name)) => {
                debug!(command = %name, "Unknown command");
                writeln!(self.console, "I am sorry, but '{}' is not a recognized command.", name)?;
                writeln!(self.console, "You may enter 'help' to see a list of commands.")?;
                return Ok(Flow::Continue);
            }
        };

        debug!(%command, args = args.len(), "Dispatching command");

        match command {
            Command::Add => self.add(args)?,
            Command::Update => self.update(args)?,
            Command::List => self.list()?,
            Command::Delete => self.delete(args)?,
            Command::Search => self.search(args)?,
            Command::Save => self.save(args)?,
            Command::Load => self.load(args)?,
            Command::Stats => self.stats()?,
            Command::Echo => self.set_echo(args)?,
            Command::Help => self.help()?,
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// `add first last month day year`
    pub fn add(&mut self, args: &[&str]) -> Result<()> {
        let [first, last, month, day, year] = args else {
            return Err(BookError::ArgumentCount {
                command: "add",
                expected: "firstname, lastname, month, day, year",
            });
        };

        let record = build_record(first, last, month, day, year)?;
        let today = (self.clock)();
        let days = record.days_until_next_birthday_on(today);

        writeln!(self.console, "Added \"{}\" to birthday book.", record)?;
        if days <= self.config.upcoming_window_days {
            writeln!(self.console, "Upcoming birthday in {} days!", days)?;
        }

        self.book.insert(record);
        Ok(())
    }

    /// `list`
    pub fn list(&mut self) -> Result<()> {
        if self.book.is_empty() {
            writeln!(self.console, "The birthday book is empty.")?;
            return Ok(());
        }

        let today = (self.clock)();
        for (position, record) in self.book.numbered() {
            writeln!(
                self.console,
                "{}. {} (Age: {}, Next birthday in: {} days)",
                position,
                record,
                record.age_on(today),
                record.days_until_next_birthday_on(today)
            )?;
        }
        Ok(())
    }

    /// `search term`
    pub fn search(&mut self, args: &[&str]) -> Result<()> {
        let [term, ..] = args else {
            return Err(BookError::ArgumentCount {
                command: "search",
                expected: "a search term",
            });
        };

        let today = (self.clock)();
        let matches = self.book.search(term);
        if matches.is_empty() {
            writeln!(self.console, "No entries found matching '{}'", term)?;
            return Ok(());
        }

        writeln!(self.console, "Entries matching \"{}\":", term)?;
        for (_, record) in matches {
            writeln!(
                self.console,
                "{} (Age: {}, Next birthday in: {} days)",
                record,
                record.age_on(today),
                record.days_until_next_birthday_on(today)
            )?;
        }
        Ok(())
    }

    /// `delete position`
    pub fn delete(&mut self, args: &[&str]) -> Result<()> {
        let [token] = args else {
            return Err(BookError::ArgumentCount {
                command: "delete",
                expected: "an entry number",
            });
        };

        let position = self.book.resolve(token)?;
        let change = self.book.propose_removal(position)?;

        let question = format!(
            "Really delete {} from the birthday book? (y/n) ",
            change.current().full_name()
        );
        if !self.console.confirm(&question)? {
            writeln!(self.console, "Delete cancelled")?;
            return Ok(());
        }

        self.book.commit(change)?;
        info!(position, "Entry deleted");
        writeln!(self.console, "Entry deleted. Updated birthday book:")?;
        self.list()
    }

    /// `update position first last month day year`
    pub fn update(&mut self, args: &[&str]) -> Result<()> {
        let [token, first, last, month, day, year] = args else {
            return Err(BookError::ArgumentCount {
                command: "update",
                expected: "entryNumber newFirstName newLastName newMonth newDay newYear",
            });
        };

        let position = self.book.resolve(token)?;
        let record = build_record(first, last, month, day, year)?;

        let change = self.book.propose_replacement(position, record)?;
        if let PendingChange::Replacement { old, new, .. } = &change {
            writeln!(self.console, "Current entry: {}", old)?;
            writeln!(self.console, "New entry will be: {}", new)?;
        }

        if !self.console.confirm("Do you want to update this entry? (y/n) ")? {
            writeln!(self.console, "Update cancelled")?;
            return Ok(());
        }

        let position = self.book.commit(change)?;
        info!(position, "Entry updated");
        writeln!(self.console, "Updated entry {}", position)?;
        self.list()
    }

    /// `save filename`
    pub fn save(&mut self, args: &[&str]) -> Result<()> {
        let [filename] = args else {
            return Err(BookError::ArgumentCount {
                command: "save",
                expected: "a filename",
            });
        };

        match storage::save(Path::new(filename), self.book.records()) {
            Ok(()) => writeln!(self.console, "Saved birthdays to \"{}\"", filename)?,
            Err(e) => writeln!(self.console, "Error saving file: {}", e)?,
        }
        Ok(())
    }

    /// `load filename`
    pub fn load(&mut self, args: &[&str]) -> Result<()> {
        let [filename] = args else {
            return Err(BookError::ArgumentCount {
                command: "load",
                expected: "a filename",
            });
        };

        self.load_file(Path::new(filename))
    }

    /// Append every valid row of a birthday file, then re-sort.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let report = storage::load(path)?;

        for warning in &report.warnings {
            writeln!(self.console, "Warning: Skipping invalid line: {}", warning.line)?;
        }

        let loaded = self.book.extend(report.records);
        info!(path = ?path, loaded, skipped = report.warnings.len(), "Birthday file loaded");
        writeln!(
            self.console,
            "Successfully loaded {} birthdays from {}",
            loaded,
            path.display()
        )?;
        Ok(())
    }

    /// `stats`
    pub fn stats(&mut self) -> Result<()> {
        let today = (self.clock)();
        let window = self.config.upcoming_window_days;
        let Some(stats) = BookStats::compute(&self.book, today, window) else {
            writeln!(self.console, "No entries in birthday book")?;
            return Ok(());
        };

        writeln!(self.console, "Total entries: {}", stats.total)?;
        writeln!(self.console, "Average age: {:.1} years", stats.average_age)?;
        writeln!(
            self.console,
            "Upcoming birthdays (next {} days): {}",
            window,
            stats.upcoming.len()
        )?;

        if !stats.upcoming.is_empty() {
            writeln!(self.console, "\nUpcoming birthdays:")?;
            for upcoming in &stats.upcoming {
                writeln!(self.console, "- {}: {} days", upcoming.name, upcoming.days)?;
            }
        }
        Ok(())
    }

    /// `echo on|off`
    pub fn set_echo(&mut self, args: &[&str]) -> Result<()> {
        let setting = match args {
            [arg] => arg.to_ascii_lowercase(),
            _ => String::new(),
        };

        match setting.as_str() {
            "on" => {
                self.echo = true;
                writeln!(self.console, "Echo turned on.")?;
            }
            "off" => {
                self.echo = false;
                writeln!(self.console, "Echo turned off.")?;
            }
            _ => {
                return Err(BookError::ArgumentCount {
                    command: "echo",
                    expected: "'on' or 'off'",
                })
            }
        }
        Ok(())
    }

    /// `help`
    pub fn help(&mut self) -> Result<()> {
        writeln!(self.console, "Allowed commands:")?;
        for command in Command::ALL {
            writeln!(self.console, "{}", command.usage())?;
        }
        Ok(())
    }
}

fn build_record(first: &str, last: &str, month: &str, day: &str, year: &str) -> Result<Record> {
    Record::new(
        first,
        last,
        parse_number("month", month)?,
        parse_number("day", day)?,
        parse_number("year", year)?,
    )
}

fn parse_number(field: &'static str, value: &str) -> Result<i64> {
    value.parse().map_err(|_| BookError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    type TestManager = Manager<Cursor<String>, Vec<u8>>;

    fn manager(input: &str) -> TestManager {
        let console = Console::new(Cursor::new(input.to_string()), Vec::new());
        Manager::new(BookConfig::default(), console)
            .with_today(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap())
    }

    fn transcript(manager: TestManager) -> String {
        String::from_utf8(manager.into_console().into_output()).unwrap()
    }

    fn run(manager: &mut TestManager, line: &str) -> Result<Flow> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        manager.dispatch(&tokens)
    }

    fn rendered(manager: &TestManager) -> Vec<String> {
        manager.book().records().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_add_prints_confirmation() {
        let mut m = manager("");
        run(&mut m, "add John Smith 3 15 1990").unwrap();
        assert_eq!(transcript(m), "Added \"John Smith, 3/15/1990\" to birthday book.\n");
    }

    #[test]
    fn test_add_announces_upcoming_birthday() {
        let mut m = manager("");
        run(&mut m, "add Jane Doe 11 16 1990").unwrap();
        let out = transcript(m);
        assert!(out.contains("Upcoming birthday in 30 days!"));
    }

    #[test]
    fn test_add_outside_window_is_quiet() {
        let mut m = manager("");
        run(&mut m, "add Jane Doe 11 17 1990").unwrap();
        assert!(!transcript(m).contains("Upcoming"));
    }

    #[test]
    fn test_add_argument_count() {
        let mut m = manager("");
        let err = run(&mut m, "add John Smith 3 15").unwrap_err();
        assert!(matches!(err, BookError::ArgumentCount { command: "add", .. }));
        let err = run(&mut m, "add John Smith 3 15 1990 extra").unwrap_err();
        assert!(matches!(err, BookError::ArgumentCount { .. }));
        assert!(m.book().is_empty());
    }

    #[test]
    fn test_add_invalid_date_and_number() {
        let mut m = manager("");
        assert!(matches!(
            run(&mut m, "add John Smith 4 31 1990"),
            Err(BookError::InvalidDate { .. })
        ));
        assert!(matches!(
            run(&mut m, "add John Smith March 15 1990"),
            Err(BookError::InvalidNumber { field: "month", .. })
        ));
        assert!(m.book().is_empty());
    }

    #[test]
    fn test_add_resorts() {
        let mut m = manager("");
        run(&mut m, "add Carol Jones 7 4 1985").unwrap();
        run(&mut m, "add John Smith 3 15 1990").unwrap();
        assert_eq!(rendered(&m), vec!["John Smith, 3/15/1990", "Carol Jones, 7/4/1985"]);
    }

    #[test]
    fn test_list_empty_and_populated() {
        let mut m = manager("");
        run(&mut m, "list").unwrap();
        run(&mut m, "add John Smith 3 15 1990").unwrap();
        run(&mut m, "list").unwrap();
        let out = transcript(m);
        assert!(out.starts_with("The birthday book is empty.\n"));
        assert!(out.contains("1. John Smith, 3/15/1990 (Age: 36, Next birthday in: 149 days)"));
    }

    #[test]
    fn test_search() {
        let mut m = manager("");
        run(&mut m, "add John Smith 3 15 1990").unwrap();
        run(&mut m, "search smi").unwrap();
        run(&mut m, "search zz").unwrap();
        let out = transcript(m);
        assert!(out.contains("Entries matching \"smi\":\nJohn Smith, 3/15/1990 (Age: 36"));
        assert!(out.contains("No entries found matching 'zz'"));
    }

    #[test]
    fn test_search_requires_term() {
        let mut m = manager("");
        assert!(matches!(
            run(&mut m, "search"),
            Err(BookError::ArgumentCount { command: "search", .. })
        ));
    }

    #[test]
    fn test_delete_confirmed() {
        let mut m = manager("y\n");
        run(&mut m, "add John Smith 3 15 1990").unwrap();
        run(&mut m, "add Carol Jones 7 4 1985").unwrap();
        run(&mut m, "delete 1").unwrap();
        assert_eq!(rendered(&m), vec!["Carol Jones, 7/4/1985"]);
        let out = transcript(m);
        assert!(out.contains("Really delete John Smith from the birthday book? (y/n) "));
        assert!(out.contains("Entry deleted. Updated birthday book:\n1. Carol Jones"));
    }

    #[test]
    fn test_delete_declined_after_reprompt() {
        let mut m = manager("sure\nn\n");
        run(&mut m, "add John Smith 3 15 1990").unwrap();
        run(&mut m, "delete 1").unwrap();
        assert_eq!(m.book().len(), 1);
        let out = transcript(m);
        assert!(out.contains("Please enter \"y\" or \"n\" (y/n): "));
        assert!(out.contains("Delete cancelled"));
    }

    #[test]
    fn test_delete_invalid_index() {
        let mut m = manager("");
        run(&mut m, "add John Smith 3 15 1990").unwrap();
        for line in ["delete 0", "delete 2", "delete one"] {
            assert!(matches!(run(&mut m, line), Err(BookError::InvalidIndex(_))), "{line}");
        }
        assert!(matches!(run(&mut m, "delete"), Err(BookError::ArgumentCount { .. })));
        assert_eq!(m.book().len(), 1);
    }

    #[test]
    fn test_update_confirmed_does_not_resort() {
        let mut m = manager("Y\n");
        run(&mut m, "add John Smith 3 15 1990").unwrap();
        run(&mut m, "add Carol Jones 7 4 1985").unwrap();
        run(&mut m, "update 1 Zoe Last 12 31 2001").unwrap();
        assert_eq!(rendered(&m), vec!["Zoe Last, 12/31/2001", "Carol Jones, 7/4/1985"]);
        let out = transcript(m);
        assert!(out.contains("Current entry: John Smith, 3/15/1990\n"));
        assert!(out.contains("New entry will be: Zoe Last, 12/31/2001\n"));
        assert!(out.contains("Updated entry 1\n"));
    }

    #[test]
    fn test_update_cancelled() {
        let mut m = manager("n\n");
        run(&mut m, "add John Smith 3 15 1990").unwrap();
        run(&mut m, "update 1 Zoe Last 12 31 2001").unwrap();
        assert_eq!(rendered(&m), vec!["John Smith, 3/15/1990"]);
        assert!(transcript(m).contains("Update cancelled"));
    }

    #[test]
    fn test_update_errors() {
        let mut m = manager("");
        run(&mut m, "add John Smith 3 15 1990").unwrap();
        assert!(matches!(
            run(&mut m, "update 1 Zoe Last 12 31"),
            Err(BookError::ArgumentCount { command: "update", .. })
        ));
        assert!(matches!(
            run(&mut m, "update 5 Zoe Last 12 31 2001"),
            Err(BookError::InvalidIndex(_))
        ));
        assert!(matches!(
            run(&mut m, "update 1 Zoe Last 2 30 2001"),
            Err(BookError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_stats() {
        let mut m = manager("");
        run(&mut m, "stats").unwrap();
        run(&mut m, "add John Smith 3 15 1990").unwrap();
        run(&mut m, "add Jane Doe 10 20 2000").unwrap();
        run(&mut m, "stats").unwrap();
        let out = transcript(m);
        assert!(out.contains("No entries in birthday book\n"));
        assert!(out.contains("Total entries: 2\n"));
        assert!(out.contains("Average age: 30.5 years\n"));
        assert!(out.contains("Upcoming birthdays (next 30 days): 1\n"));
        assert!(out.contains("\nUpcoming birthdays:\n- Jane Doe: 3 days\n"));
    }

    #[test]
    fn test_echo_toggle() {
        let mut m = manager("");
        run(&mut m, "echo on").unwrap();
        assert!(m.echo_enabled());
        run(&mut m, "ECHO OFF").unwrap();
        assert!(!m.echo_enabled());
        assert!(run(&mut m, "echo loud").is_err());
        assert!(run(&mut m, "echo").is_err());
    }

    #[test]
    fn test_dispatch_flow() {
        let mut m = manager("");
        assert_eq!(run(&mut m, "").unwrap(), Flow::Continue);
        assert_eq!(run(&mut m, "frobnicate").unwrap(), Flow::Continue);
        assert_eq!(run(&mut m, "HELP").unwrap(), Flow::Continue);
        assert_eq!(run(&mut m, "quit").unwrap(), Flow::Quit);
        let out = transcript(m);
        assert!(out.contains("No command entered."));
        assert!(out.contains("'frobnicate' is not a recognized command"));
        assert!(out.contains("help"));
        assert!(out.contains("update entryNumber newFirstName newLastName newMonth newDay newYear"));
    }
}
