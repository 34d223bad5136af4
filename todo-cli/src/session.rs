//! Interactive login and todo menus.

use std::io::{self, BufRead, IsTerminal, Write};

use tracing::warn;

use crate::config::AppConfig;
use crate::manager::{TodoManager, TodoUpdate};
use crate::todo::{Priority, TodoItem};
use crate::user::{SignupError, User, UserStore};

/// Line-based input. `Ok(None)` means input has ended.
pub trait Prompt {
    fn line(&mut self, label: &str) -> io::Result<Option<String>>;
    fn password(&mut self, label: &str) -> io::Result<Option<String>>;
}

/// Reads from stdin; passwords are masked when stdin is a terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    fn read_line(label: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{label}: ")?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl Prompt for TerminalPrompt {
    fn line(&mut self, label: &str) -> io::Result<Option<String>> {
        Self::read_line(label)
    }

    fn password(&mut self, label: &str) -> io::Result<Option<String>> {
        if !io::stdin().is_terminal() {
            return Self::read_line(label);
        }
        dialoguer::Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()
            .map(Some)
            .map_err(|err| io::Error::other(err.to_string()))
    }
}

/// Whether the outer loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct Session {
    users: UserStore,
    todos: TodoManager,
}

impl Session {
    pub fn new(users: UserStore, todos: TodoManager) -> Self {
        Self { users, todos }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            UserStore::new(config.users_file()),
            TodoManager::new(config.todos_file()),
        )
    }

    /// Runs the pre-login menu until the user exits or input ends.
    pub fn run<P: Prompt, W: Write>(&mut self, prompt: &mut P, out: &mut W) -> io::Result<()> {
        loop {
            writeln!(out, "\nPre-Login Menu:\n1) Login\n2) Sign Up\n3) Exit\n")?;
            let Some(choice) = prompt.line("Select an option")? else {
                break;
            };

            let flow = match choice.trim() {
                "1" => self.login(prompt, out)?,
                "2" => self.signup(prompt, out)?,
                "3" => break,
                _ => {
                    writeln!(out, "Invalid choice. Enter 1, 2, or 3.")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                break;
            }
        }

        writeln!(out, "Goodbye.")
    }

    fn signup<P: Prompt, W: Write>(&mut self, prompt: &mut P, out: &mut W) -> io::Result<Flow> {
        writeln!(out, "== Sign Up ==")?;
        let Some(username) = prompt.line("Username")? else {
            return Ok(Flow::Exit);
        };
        let username = username.trim();
        if username.is_empty() {
            writeln!(out, "{}", SignupError::EmptyUsername)?;
            return Ok(Flow::Continue);
        }
        if UserStore::find(&self.users.load(), username).is_some() {
            writeln!(out, "{}", SignupError::UserAlreadyExists)?;
            return Ok(Flow::Continue);
        }

        let Some(password) = prompt.password("Password")? else {
            return Ok(Flow::Exit);
        };
        match self.users.signup(username, &password) {
            Ok(_) => writeln!(out, "Sign up successful. You can now log in.")?,
            Err(SignupError::Storage(err)) => {
                warn!(error = ?err, "signup not saved");
                writeln!(out, "Error: {err}")?;
            }
            Err(err) => writeln!(out, "{err}")?,
        }
        Ok(Flow::Continue)
    }

    fn login<P: Prompt, W: Write>(&mut self, prompt: &mut P, out: &mut W) -> io::Result<Flow> {
        writeln!(out, "== Login ==")?;
        let Some(username) = prompt.line("Username")? else {
            return Ok(Flow::Exit);
        };
        let Some(password) = prompt.password("Password")? else {
            return Ok(Flow::Exit);
        };

        match self.users.login(username.trim(), &password) {
            Some(user) => {
                writeln!(out, "Welcome, {}!", user.username)?;
                self.todo_menu(&user, prompt, out)
            }
            None => {
                writeln!(out, "Invalid credentials.")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn todo_menu<P: Prompt, W: Write>(
        &mut self,
        user: &User,
        prompt: &mut P,
        out: &mut W,
    ) -> io::Result<Flow> {
        loop {
            writeln!(out, "\nTodo Menu ({}):", user.username)?;
            writeln!(out, "1) List todos\n2) Add todo\n3) Edit todo")?;
            writeln!(out, "4) Mark todo completed\n5) Delete todo\n6) Logout\n")?;
            let Some(choice) = prompt.line("Select an option")? else {
                return Ok(Flow::Exit);
            };

            let flow = match choice.trim() {
                "1" => {
                    self.list(user, out)?;
                    Flow::Continue
                }
                "2" => self.add(user, prompt, out)?,
                "3" => self.edit(user, prompt, out)?,
                "4" => self.complete(user, prompt, out)?,
                "5" => self.delete(user, prompt, out)?,
                "6" => {
                    writeln!(out, "Logged out.")?;
                    return Ok(Flow::Continue);
                }
                _ => {
                    writeln!(out, "Invalid choice. Enter a number from 1 to 6.")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
    }

    fn list<W: Write>(&self, user: &User, out: &mut W) -> io::Result<()> {
        let todos = self.todos.list_by_owner(&user.username);
        if todos.is_empty() {
            return writeln!(out, "No todos yet.");
        }
        for (index, todo) in todos.iter().enumerate() {
            write_todo(out, index + 1, todo)?;
        }
        Ok(())
    }

    fn add<P: Prompt, W: Write>(
        &mut self,
        user: &User,
        prompt: &mut P,
        out: &mut W,
    ) -> io::Result<Flow> {
        let Some(title) = prompt.line("Title")? else {
            return Ok(Flow::Exit);
        };
        let title = title.trim();
        if title.is_empty() {
            writeln!(out, "Title cannot be empty.")?;
            return Ok(Flow::Continue);
        }
        let Some(details) = prompt.line("Details")? else {
            return Ok(Flow::Exit);
        };
        let Some(priority) = prompt.line("Priority (HIGH/MID/LOW)")? else {
            return Ok(Flow::Exit);
        };

        match self.todos.create(
            title,
            details.trim(),
            Priority::from(priority.trim().to_uppercase().as_str()),
            &user.username,
        ) {
            Ok(item) => writeln!(out, "Added \"{}\" [{}].", item.title, item.priority)?,
            Err(err) => writeln!(out, "Error: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn edit<P: Prompt, W: Write>(
        &mut self,
        user: &User,
        prompt: &mut P,
        out: &mut W,
    ) -> io::Result<Flow> {
        let id = match self.select(user, prompt, out)? {
            Selection::Picked(id) => id,
            Selection::Skipped => return Ok(Flow::Continue),
            Selection::Eof => return Ok(Flow::Exit),
        };

        let mut update = TodoUpdate::default();
        let Some(title) = prompt.line("New title (blank to keep)")? else {
            return Ok(Flow::Exit);
        };
        if !title.trim().is_empty() {
            update = update.title(title.trim());
        }
        let Some(details) = prompt.line("New details (blank to keep)")? else {
            return Ok(Flow::Exit);
        };
        if !details.trim().is_empty() {
            update = update.details(details.trim());
        }
        let Some(priority) = prompt.line("New priority HIGH/MID/LOW (blank to keep)")? else {
            return Ok(Flow::Exit);
        };
        if !priority.trim().is_empty() {
            update = update.priority(priority.trim().to_uppercase().as_str());
        }

        self.apply(&id, update, "Todo updated.", out)?;
        Ok(Flow::Continue)
    }

    fn complete<P: Prompt, W: Write>(
        &mut self,
        user: &User,
        prompt: &mut P,
        out: &mut W,
    ) -> io::Result<Flow> {
        match self.select(user, prompt, out)? {
            Selection::Picked(id) => {
                match self.todos.complete(&id) {
                    Ok(true) => writeln!(out, "Todo marked as completed.")?,
                    Ok(false) => writeln!(out, "Todo not found.")?,
                    Err(err) => writeln!(out, "Error: {err}")?,
                }
                Ok(Flow::Continue)
            }
            Selection::Skipped => Ok(Flow::Continue),
            Selection::Eof => Ok(Flow::Exit),
        }
    }

    fn delete<P: Prompt, W: Write>(
        &mut self,
        user: &User,
        prompt: &mut P,
        out: &mut W,
    ) -> io::Result<Flow> {
        let id = match self.select(user, prompt, out)? {
            Selection::Picked(id) => id,
            Selection::Skipped => return Ok(Flow::Continue),
            Selection::Eof => return Ok(Flow::Exit),
        };
        match self.todos.delete(&id) {
            Ok(true) => writeln!(out, "Todo deleted.")?,
            Ok(false) => writeln!(out, "Todo not found.")?,
            Err(err) => writeln!(out, "Error: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn apply<W: Write>(
        &mut self,
        id: &str,
        update: TodoUpdate,
        done: &str,
        out: &mut W,
    ) -> io::Result<()> {
        match self.todos.update(id, update) {
            Ok(true) => writeln!(out, "{done}"),
            Ok(false) => writeln!(out, "Todo not found."),
            Err(err) => writeln!(out, "Error: {err}"),
        }
    }

    /// Lists the user's todos and asks for a 1-based index.
    fn select<P: Prompt, W: Write>(
        &self,
        user: &User,
        prompt: &mut P,
        out: &mut W,
    ) -> io::Result<Selection> {
        let todos = self.todos.list_by_owner(&user.username);
        if todos.is_empty() {
            writeln!(out, "No todos yet.")?;
            return Ok(Selection::Skipped);
        }
        for (index, todo) in todos.iter().enumerate() {
            write_todo(out, index + 1, todo)?;
        }

        let Some(answer) = prompt.line("Select a todo number")? else {
            return Ok(Selection::Eof);
        };
        let picked = answer
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| todos.get(index));
        match picked {
            Some(todo) => Ok(Selection::Picked(todo.id.clone())),
            None => {
                writeln!(out, "Invalid selection. Enter a number from the list.")?;
                Ok(Selection::Skipped)
            }
        }
    }
}

enum Selection {
    Picked(String),
    Skipped,
    Eof,
}

fn write_todo<W: Write>(out: &mut W, number: usize, todo: &TodoItem) -> io::Result<()> {
    writeln!(
        out,
        "{number}) [{}] {} - {}",
        todo.priority, todo.title, todo.status
    )?;
    if !todo.details.is_empty() {
        writeln!(out, "   {}", todo.details)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use crate::todo::Status;
    use assert_fs::prelude::*;
    use std::collections::VecDeque;

    /// Replays canned answers; runs out like a closed stdin.
    struct ScriptedPrompt {
        answers: VecDeque<String>,
    }

    impl ScriptedPrompt {
        fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn line(&mut self, _label: &str) -> io::Result<Option<String>> {
            Ok(self.answers.pop_front())
        }

        fn password(&mut self, _label: &str) -> io::Result<Option<String>> {
            Ok(self.answers.pop_front())
        }
    }

    fn session(dir: &TempDir) -> Session {
        Session::new(
            UserStore::new(dir.child("users.json").path()),
            TodoManager::new(dir.child("todos.json").path()),
        )
    }

    fn run(dir: &TempDir, answers: &[&str]) -> String {
        let mut out = Vec::new();
        session(dir)
            .run(&mut ScriptedPrompt::new(answers), &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn exit_option_says_goodbye() {
        let dir = TempDir::new().unwrap();
        let out = run(&dir, &["3"]);

        assert!(out.contains("Pre-Login Menu:"));
        assert!(out.ends_with("Goodbye.\n"));
    }

    #[test]
    fn end_of_input_ends_session() {
        let dir = TempDir::new().unwrap();
        let out = run(&dir, &[]);

        assert!(out.ends_with("Goodbye.\n"));
    }

    #[test]
    fn invalid_menu_choice_is_reported() {
        let dir = TempDir::new().unwrap();
        let out = run(&dir, &["9", "3"]);

        assert!(out.contains("Invalid choice. Enter 1, 2, or 3."));
    }

    #[test]
    fn signup_then_login_welcomes_user() {
        let dir = TempDir::new().unwrap();
        let out = run(&dir, &["2", "alice", "pw", "1", "alice", "pw", "6", "3"]);

        assert!(out.contains("Sign up successful. You can now log in."));
        assert!(out.contains("Welcome, alice!"));
        assert!(out.contains("Logged out."));
    }

    #[test]
    fn signup_rejects_empty_and_duplicate_usernames() {
        let dir = TempDir::new().unwrap();
        let out = run(&dir, &["2", "  ", "2", "bob", "pw", "2", "bob", "3"]);

        assert!(out.contains("Username cannot be empty."));
        assert!(out.contains("User already exists."));
        assert_eq!(UserStore::new(dir.child("users.json").path()).load().len(), 1);
    }

    #[test]
    fn bad_login_attempts_share_one_message() {
        let dir = TempDir::new().unwrap();
        let answers = ["2", "alice", "pw", "1", "alice", "nope", "1", "ghost", "pw", "3"];
        let out = run(&dir, &answers);

        assert_eq!(out.matches("Invalid credentials.").count(), 2);
        assert!(!out.contains("Welcome"));
    }

    #[test]
    fn can_add_list_complete_and_delete_todos() {
        let dir = TempDir::new().unwrap();
        #[rustfmt::skip]
        let answers = [
            "2", "alice", "pw", "1", "alice", "pw",
            "2", "Buy milk", "2 litres", "high",
            "2", "Walk dog", "", "whenever",
            "4", "1",
            "1",
            "5", "2",
            "6", "3",
        ];
        let out = run(&dir, &answers);

        assert!(out.contains("Added \"Buy milk\" [HIGH]."));
        assert!(out.contains("Added \"Walk dog\" [MID]."));
        assert!(out.contains("Todo marked as completed."));
        assert!(out.contains("1) [HIGH] Buy milk - COMPLETED"));
        assert!(out.contains("   2 litres"));
        assert!(out.contains("Todo deleted."));

        let todos = TodoManager::new(dir.child("todos.json").path());
        let remaining = todos.list_by_owner("alice");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "Buy milk");
        assert_eq!(remaining[0].status, Status::Completed);
    }

    #[test]
    fn edit_keeps_blank_fields() {
        let dir = TempDir::new().unwrap();
        #[rustfmt::skip]
        let answers = [
            "2", "alice", "pw", "1", "alice", "pw",
            "2", "Draft", "notes", "LOW",
            "3", "1", "Final", "", "",
            "6", "3",
        ];
        run(&dir, &answers);

        let todos = TodoManager::new(dir.child("todos.json").path());
        let item = todos.list_by_owner("alice")[0];
        assert_eq!(item.title, "Final");
        assert_eq!(item.details, "notes");
        assert_eq!(item.priority, Priority::Low);
    }

    #[test]
    fn empty_title_is_rejected() {
        let dir = TempDir::new().unwrap();
        let out = run(&dir, &["2", "alice", "pw", "1", "alice", "pw", "2", "   ", "6", "3"]);

        assert!(out.contains("Title cannot be empty."));
        assert!(TodoManager::new(dir.child("todos.json").path()).is_empty());
    }

    #[test]
    fn invalid_selection_changes_nothing() {
        let dir = TempDir::new().unwrap();
        #[rustfmt::skip]
        let answers = [
            "2", "alice", "pw", "1", "alice", "pw",
            "2", "Only", "", "",
            "5", "abc",
            "5", "7",
            "6", "3",
        ];
        let out = run(&dir, &answers);

        assert_eq!(
            out.matches("Invalid selection. Enter a number from the list.").count(),
            2
        );
        assert_eq!(TodoManager::new(dir.child("todos.json").path()).len(), 1);
    }

    #[test]
    fn users_only_see_their_own_todos() {
        let dir = TempDir::new().unwrap();
        #[rustfmt::skip]
        let answers = [
            "2", "alice", "pw", "1", "alice", "pw",
            "2", "Secret", "", "",
            "6", "3",
        ];
        run(&dir, &answers);

        let out = run(&dir, &["2", "bob", "pw", "1", "bob", "pw", "1", "6", "3"]);

        assert!(out.contains("No todos yet."));
        assert!(!out.contains("Secret"));
    }
}
