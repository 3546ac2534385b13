//! Menu choices and their rendering.

/// One catalog action reachable from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ShowBooks,
    AddBook,
    AddMember,
    Borrow,
    Return,
    ListLoans,
    ListOverdue,
}

impl Command {
    pub const ALL: [Command; 7] = [
        Command::ShowBooks,
        Command::AddBook,
        Command::AddMember,
        Command::Borrow,
        Command::Return,
        Command::ListLoans,
        Command::ListOverdue,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::ShowBooks => "1",
            Self::AddBook => "2",
            Self::AddMember => "3",
            Self::Borrow => "4",
            Self::Return => "5",
            Self::ListLoans => "6",
            Self::ListOverdue => "7",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ShowBooks => "Show all books",
            Self::AddBook => "Add a new book",
            Self::AddMember => "Add a new member",
            Self::Borrow => "Borrow a book",
            Self::Return => "Return a book",
            Self::ListLoans => "List all loaned out books",
            Self::ListOverdue => "List overdue books",
        }
    }

    /// Name used in log events.
    pub fn event_name(self) -> &'static str {
        match self {
            Self::ShowBooks => "show_books",
            Self::AddBook => "add_book",
            Self::AddMember => "add_member",
            Self::Borrow => "borrow",
            Self::Return => "return",
            Self::ListLoans => "list_loans",
            Self::ListOverdue => "list_overdue",
        }
    }
}

pub const QUIT_KEY: &str = "0";

/// Parsed menu input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Run(Command),
    Quit,
}

impl MenuChoice {
    /// Maps trimmed user input to a choice; `None` for unknown input.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input == QUIT_KEY {
            return Some(Self::Quit);
        }
        Command::ALL
            .into_iter()
            .find(|command| command.key() == input)
            .map(Self::Run)
    }
}

pub fn render_menu() -> String {
    let mut menu = String::from("\n==== Library ====\n");
    for command in Command::ALL {
        menu.push_str(&format!("{}) {}\n", command.key(), command.label()));
    }
    menu.push_str(&format!("{QUIT_KEY}) Quit\n"));
    menu
}

#[cfg(test)]
mod tests {
    use super::{render_menu, Command, MenuChoice};

    #[test]
    fn every_command_key_round_trips_through_parse() {
        for command in Command::ALL {
            assert_eq!(
                MenuChoice::parse(command.key()),
                Some(MenuChoice::Run(command))
            );
        }
    }

    #[test]
    fn parse_trims_and_rejects_unknown_input() {
        assert_eq!(MenuChoice::parse(" 0 \n"), Some(MenuChoice::Quit));
        assert_eq!(
            MenuChoice::parse("4\n"),
            Some(MenuChoice::Run(Command::Borrow))
        );
        assert_eq!(MenuChoice::parse("8"), None);
        assert_eq!(MenuChoice::parse("borrow"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[test]
    fn rendered_menu_lists_all_actions_and_quit() {
        let menu = render_menu();
        assert!(menu.contains("1) Show all books"));
        assert!(menu.contains("7) List overdue books"));
        assert!(menu.trim_end().ends_with("0) Quit"));
    }
}
