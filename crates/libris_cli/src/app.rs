//! Interactive menu loop and per-command handlers.
//!
//! # Invariants
//! - All input of an action is read and parsed before any service call, so
//!   malformed input never mutates the catalog.
//! - Each service call owns its own transaction.
//! - Action errors are printed and the loop continues; only quit, end of
//!   input or a terminal I/O failure stops it.

use crate::menu::{render_menu, Command, MenuChoice};
use crate::prompt::{Line, Prompter};
use libris_core::{
    CatalogService, Clock, Database, LibraryError, LoanService, NewBook, NewMember,
    ReportService,
};
use log::{debug, error, warn};
use std::io::{self, BufRead, Write};

enum ActionError {
    Library(LibraryError),
    Io(io::Error),
    NotUtf8 { field: &'static str },
    EndOfInput,
}

impl From<LibraryError> for ActionError {
    fn from(value: LibraryError) -> Self {
        Self::Library(value)
    }
}

impl From<io::Error> for ActionError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

type ActionResult = Result<(), ActionError>;

/// Menu-driven front end over one open catalog.
pub struct App<R, W, C> {
    db: Database,
    prompter: Prompter<R, W>,
    clock: C,
}

impl<R: BufRead, W: Write, C: Clock> App<R, W, C> {
    pub fn new(db: Database, input: R, output: W, clock: C) -> Self {
        Self {
            db,
            prompter: Prompter::new(input, output),
            clock,
        }
    }

    /// Runs the menu until the user quits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.prompter.output(), "{}", render_menu())?;
            let choice = match self.prompter.line("Choose an option: ")? {
                Line::Text(choice) => MenuChoice::parse(&choice),
                Line::NotUtf8 => None,
                Line::End => {
                    writeln!(self.prompter.output())?;
                    return Ok(());
                }
            };

            let command = match choice {
                Some(MenuChoice::Quit) => return Ok(()),
                Some(MenuChoice::Run(command)) => command,
                None => {
                    writeln!(self.prompter.output(), "Invalid option.")?;
                    continue;
                }
            };

            match self.dispatch(command) {
                Ok(()) => {}
                Err(ActionError::Library(err)) => {
                    if err.is_user_error() {
                        warn!(
                            "event=menu_action module=cli status=rejected action={} error_code={}",
                            command.event_name(),
                            err.code()
                        );
                    } else {
                        error!(
                            "event=menu_action module=cli status=error action={} error_code={} error={}",
                            command.event_name(),
                            err.code(),
                            err
                        );
                    }
                    writeln!(self.prompter.output(), "Error: {err}")?;
                }
                Err(ActionError::NotUtf8 { field }) => {
                    warn!(
                        "event=menu_action module=cli status=rejected action={} error_code=not_utf8",
                        command.event_name()
                    );
                    writeln!(self.prompter.output(), "Error: {field} is not valid UTF-8 text.")?;
                }
                Err(ActionError::EndOfInput) => {
                    writeln!(self.prompter.output())?;
                    return Ok(());
                }
                Err(ActionError::Io(err)) => return Err(err),
            }
        }
    }

    fn dispatch(&mut self, command: Command) -> ActionResult {
        debug!(
            "event=menu_action module=cli status=start action={}",
            command.event_name()
        );
        match command {
            Command::ShowBooks => self.show_books(),
            Command::AddBook => self.add_book(),
            Command::AddMember => self.add_member(),
            Command::Borrow => self.borrow(),
            Command::Return => self.return_book(),
            Command::ListLoans => self.list_loans(),
            Command::ListOverdue => self.list_overdue(),
        }
    }

    fn show_books(&mut self) -> ActionResult {
        let books = CatalogService::new(&mut self.db).list_books()?;

        let out = self.prompter.output();
        writeln!(out, "Books:")?;
        if books.is_empty() {
            writeln!(out, "No books found.")?;
        }
        for book in books {
            writeln!(
                out,
                "[{}] {} by {} (Genre: {}, ISBN: {}, {}/{} available)",
                book.id,
                book.title,
                book.author,
                book.genre.as_deref().unwrap_or("No genre"),
                book.isbn.as_deref().unwrap_or("-"),
                book.copies_available,
                book.copies_total
            )?;
        }
        Ok(())
    }

    fn add_book(&mut self) -> ActionResult {
        let title = self.ask("Title", "Title: ")?;
        let author = self.ask("Author", "Author: ")?;
        let genre = self.ask("Genre", "Genre (optional): ")?;
        let isbn = self.ask("ISBN", "ISBN (optional): ")?;
        let copies = self.ask("Number of copies", "Number of copies (default 1): ")?;
        let copies_total = if copies.is_empty() {
            1
        } else {
            parse_number("Number of copies", &copies)?
        };

        let book = NewBook {
            title,
            author,
            genre: Some(genre),
            isbn: Some(isbn),
            copies_total,
        };
        let book_id = CatalogService::new(&mut self.db).add_book(&book)?;
        writeln!(self.prompter.output(), "Book added with ID {book_id}")?;
        Ok(())
    }

    fn add_member(&mut self) -> ActionResult {
        let full_name = self.ask("Member name", "Member name: ")?;
        let email = self.ask("Email", "Email (optional): ")?;

        let member = NewMember {
            full_name,
            email: Some(email),
        };
        let member_id = CatalogService::new(&mut self.db).add_member(&member)?;
        writeln!(self.prompter.output(), "Member added with ID {member_id}")?;
        Ok(())
    }

    fn borrow(&mut self) -> ActionResult {
        let (members, books) = {
            let mut catalog = CatalogService::new(&mut self.db);
            (catalog.list_members()?, catalog.list_books()?)
        };

        let out = self.prompter.output();
        writeln!(out, "Members:")?;
        for member in &members {
            writeln!(out, "{} - {}", member.id, member.full_name)?;
        }
        writeln!(out, "Books:")?;
        for book in &books {
            writeln!(
                out,
                "{} - {} ({} available)",
                book.id, book.title, book.copies_available
            )?;
        }

        let member_id = self.ask_number("Member ID", "Enter Member ID: ")?;
        let book_id = self.ask_number("Book ID", "Enter Book ID: ")?;

        let receipt =
            LoanService::with_clock(&mut self.db, &self.clock).borrow(member_id, book_id)?;
        writeln!(
            self.prompter.output(),
            "Loan created! Loan ID = {}. Due date: {}",
            receipt.loan_id,
            receipt.due_date
        )?;
        Ok(())
    }

    fn return_book(&mut self) -> ActionResult {
        let loan_id = self.ask_number("Loan ID", "Enter Loan ID: ")?;

        LoanService::with_clock(&mut self.db, &self.clock).return_book(loan_id)?;
        writeln!(self.prompter.output(), "Book returned.")?;
        Ok(())
    }

    fn list_loans(&mut self) -> ActionResult {
        let loans = ReportService::with_clock(&mut self.db, &self.clock).list_loans()?;

        let out = self.prompter.output();
        writeln!(out, "Loans:")?;
        if loans.is_empty() {
            writeln!(out, "No loans found.")?;
        }
        for loan in loans {
            let status = match loan.return_date {
                Some(returned) => format!("Returned {returned}"),
                None => format!("Due {}", loan.due_date),
            };
            writeln!(
                out,
                "[{}] {}, {} (Loaned {}, {})",
                loan.loan_id, loan.member_name, loan.book_title, loan.loan_date, status
            )?;
        }
        Ok(())
    }

    fn list_overdue(&mut self) -> ActionResult {
        let overdue = ReportService::with_clock(&mut self.db, &self.clock).list_overdue()?;

        let out = self.prompter.output();
        writeln!(out, "Overdue books:")?;
        if overdue.is_empty() {
            writeln!(out, "None")?;
        }
        for loan in overdue {
            writeln!(
                out,
                "[{}] {} - {} (Due {})",
                loan.loan_id, loan.member_name, loan.book_title, loan.due_date
            )?;
        }
        Ok(())
    }

    fn ask(&mut self, field: &'static str, prompt: &str) -> Result<String, ActionError> {
        match self.prompter.line(prompt)? {
            Line::Text(text) => Ok(text),
            Line::NotUtf8 => Err(ActionError::NotUtf8 { field }),
            Line::End => Err(ActionError::EndOfInput),
        }
    }

    fn ask_number(&mut self, field: &'static str, prompt: &str) -> Result<i64, ActionError> {
        let text = self.ask(field, prompt)?;
        Ok(parse_number(field, &text)?)
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.prompter.into_output()
    }
}

fn parse_number(field: &'static str, text: &str) -> Result<i64, LibraryError> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| LibraryError::MalformedInput {
            field,
            input: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::{parse_number, App};
    use chrono::NaiveDate;
    use libris_core::{
        open_db_in_memory, CatalogService, Database, FixedClock, LibraryError, LoanService,
        NewBook, NewMember,
    };
    use std::io::Cursor;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn run_bytes(db: Database, today: NaiveDate, script: Vec<u8>) -> String {
        let mut app = App::new(db, Cursor::new(script), Vec::new(), FixedClock::new(today));
        app.run().unwrap();
        String::from_utf8(app.into_output()).unwrap()
    }

    fn run_with(db: Database, today: NaiveDate, script: &str) -> String {
        run_bytes(db, today, script.as_bytes().to_vec())
    }

    fn run_script(script: &str) -> String {
        run_with(open_db_in_memory().unwrap(), date(2024, 3, 1), script)
    }

    #[test]
    fn parse_number_reports_field_and_input() {
        assert_eq!(parse_number("Book ID", " 12 ").unwrap(), 12);
        let err = parse_number("Book ID", "twelve").unwrap_err();
        assert!(matches!(err, LibraryError::MalformedInput { field: "Book ID", .. }));
        assert_eq!(err.to_string(), "Book ID must be a number, got `twelve`.");
    }

    #[test]
    fn add_book_add_member_and_borrow_session() {
        let output = run_script(
            "2\nDune\nFrank Herbert\nSci-fi\n\n\n\
             3\nAlice\n\n\
             4\n1\n1\n\
             1\n\
             0\n",
        );

        assert!(output.contains("Book added with ID 1"));
        assert!(output.contains("Member added with ID 1"));
        assert!(output.contains("1 - Alice"));
        assert!(output.contains("Loan created! Loan ID = 1. Due date: 2024-03-22"));
        assert!(output.contains(
            "[1] Dune by Frank Herbert (Genre: Sci-fi, ISBN: -, 0/1 available)"
        ));
    }

    #[test]
    fn empty_listings_are_reported_not_errors() {
        let output = run_script("1\n6\n7\n0\n");
        assert!(output.contains("No books found."));
        assert!(output.contains("No loans found."));
        assert!(output.contains("Overdue books:\nNone"));
        assert!(!output.contains("Error:"));
    }

    #[test]
    fn malformed_id_aborts_borrow_without_a_loan() {
        let mut db = open_db_in_memory().unwrap();
        {
            let mut catalog = CatalogService::new(&mut db);
            catalog.add_book(&NewBook::new("Dune", "Herbert")).unwrap();
            catalog.add_member(&NewMember::new("Alice")).unwrap();
        }

        let output = run_with(db, date(2024, 3, 1), "4\nabc\n6\n0\n");

        assert!(output.contains("Error: Member ID must be a number, got `abc`."));
        assert!(output.contains("No loans found."));
    }

    #[test]
    fn negative_copies_are_rejected_with_message() {
        let output = run_script("2\nDune\nHerbert\n\n\n-3\n1\n0\n");
        assert!(output.contains("Error: Invalid input: number of copies cannot be negative"));
        assert!(output.contains("No books found."));
    }

    #[test]
    fn double_return_prints_already_returned() {
        let output = run_script(
            "2\nDune\nHerbert\n\n\n\n\
             3\nAlice\n\n\
             4\n1\n1\n\
             5\n1\n\
             5\n1\n\
             0\n",
        );

        assert!(output.contains("Book returned."));
        assert!(output.contains("Error: Loan 1 was already returned on 2024-03-01."));
    }

    #[test]
    fn non_utf8_loan_id_is_reported_and_menu_continues() {
        let mut script = b"5\n".to_vec();
        script.extend_from_slice(&[0xFF, 0xFE, b'\n']);
        script.extend_from_slice(b"1\n0\n");

        let output = run_bytes(open_db_in_memory().unwrap(), date(2024, 3, 1), script);

        assert!(output.contains("Error: Loan ID is not valid UTF-8 text."));
        assert!(output.contains("No books found."));
    }

    #[test]
    fn non_utf8_menu_choice_is_an_invalid_option() {
        let mut script = vec![0xC3, 0x28, b'\n'];
        script.extend_from_slice(b"1\n0\n");

        let output = run_bytes(open_db_in_memory().unwrap(), date(2024, 3, 1), script);

        assert!(output.contains("Invalid option."));
        assert!(output.contains("No books found."));
    }

    #[test]
    fn non_utf8_title_adds_no_book() {
        let mut script = b"2\n".to_vec();
        script.extend_from_slice(&[b'D', 0xFF, b'\n']);
        script.extend_from_slice(b"1\n0\n");

        let output = run_bytes(open_db_in_memory().unwrap(), date(2024, 3, 1), script);

        assert!(output.contains("Error: Title is not valid UTF-8 text."));
        assert!(!output.contains("Author: "));
        assert!(output.contains("No books found."));
    }

    #[test]
    fn unknown_option_is_reported_and_menu_continues() {
        let output = run_script("9\n1\n0\n");
        assert!(output.contains("Invalid option."));
        assert!(output.contains("No books found."));
    }

    #[test]
    fn end_of_input_mid_action_exits_cleanly() {
        let output = run_script("2\nDune\n");
        assert!(output.contains("Author: "));
        assert!(!output.contains("Book added"));
    }

    #[test]
    fn overdue_listing_uses_the_app_clock() {
        let mut db = open_db_in_memory().unwrap();
        {
            let mut catalog = CatalogService::new(&mut db);
            let book = catalog.add_book(&NewBook::new("Dune", "Herbert")).unwrap();
            let member = catalog.add_member(&NewMember::new("Alice")).unwrap();
            LoanService::with_clock(&mut db, FixedClock::new(date(2024, 1, 1)))
                .borrow(member, book)
                .unwrap();
        }

        let output = run_with(db, date(2024, 3, 1), "7\n6\n0\n");

        assert!(output.contains("[1] Alice - Dune (Due 2024-01-22)"));
        assert!(output.contains("[1] Alice, Dune (Loaned 2024-01-01, Due 2024-01-22)"));
    }
}
