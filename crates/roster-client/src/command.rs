//! Line commands accepted by the `roster` terminal.

use crate::api::StudentsApi;
use crate::form::FormField;
use crate::render::render_details;
use crate::view::{StudentListView, PAGE_SIZES};
use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  search <text>        filter the current page by name or email
  page <n> | next | prev
  size <5|10|15>       rows per page
  show <id>            record with its marks
  add                  open an empty form
  edit <id>            open the form for a row on this page
  set <field> <value>  field is name, email or age
  save | close         submit or hide the form
  delete <id>          ask to delete a record
  yes | no             answer the delete confirmation
  refresh | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Page(u32),
    Next,
    Prev,
    Size(u32),
    Show(i64),
    Add,
    Edit(i64),
    Set(FormField, String),
    Save,
    Close,
    Delete(i64),
    Yes,
    No,
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("not a number: {0}")]
    InvalidNumber(String),
    #[error("{0}")]
    Field(String),
}

fn number<T: FromStr>(arg: &str, usage: &'static str) -> Result<T, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    arg.parse()
        .map_err(|_| CommandError::InvalidNumber(arg.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            // An empty search clears the filter.
            "search" | "/" => Command::Search(rest.to_string()),
            "page" => Command::Page(number(rest, "page <n>")?),
            "next" | "n" => Command::Next,
            "prev" | "p" => Command::Prev,
            "size" => Command::Size(number(rest, "size <5|10|15>")?),
            "show" => Command::Show(number(rest, "show <id>")?),
            "add" => Command::Add,
            "edit" => Command::Edit(number(rest, "edit <id>")?),
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .map(|(f, v)| (f, v.trim()))
                    .unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err(CommandError::Usage("set <name|email|age> <value>"));
                }
                let field = field.parse::<FormField>().map_err(CommandError::Field)?;
                Command::Set(field, value.to_string())
            }
            "save" => Command::Save,
            "close" => Command::Close,
            "delete" | "rm" => Command::Delete(number(rest, "delete <id>")?),
            "yes" | "y" => Command::Yes,
            "no" => Command::No,
            "refresh" | "r" => Command::Refresh,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

/// What the terminal should do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Redraw the screen.
    Render,
    /// Print this text instead of redrawing.
    Print(String),
    Quit,
}

pub async fn execute<A: StudentsApi>(view: &mut StudentListView<A>, command: Command) -> Outcome {
    tracing::debug!(?command, "executing command");
    match command {
        Command::Search(text) => view.set_search(text),
        Command::Page(page) => {
            if !view.go_to_page(page).await && page != view.page() {
                return Outcome::Print(format!(
                    "page {page} is out of range (1..={})",
                    view.page_count()
                ));
            }
        }
        Command::Next => {
            view.next_page().await;
        }
        Command::Prev => {
            view.prev_page().await;
        }
        Command::Size(size) => {
            if !PAGE_SIZES.contains(&size) {
                return Outcome::Print(format!("page size must be one of {PAGE_SIZES:?}"));
            }
            view.set_page_size(size).await;
        }
        Command::Show(id) => {
            if let Some(details) = view.details(id).await {
                return Outcome::Print(render_details(&details));
            }
        }
        Command::Add => view.open_add(),
        Command::Edit(id) => {
            if !view.open_edit(id) {
                return Outcome::Print(format!("student {id} is not on this page"));
            }
        }
        Command::Set(field, value) => {
            if !view.is_form_open() {
                return Outcome::Print("no form is open (use `add` or `edit <id>`)".to_string());
            }
            view.set_field(field, value);
        }
        Command::Save => {
            if !view.is_form_open() {
                return Outcome::Print("no form is open (use `add` or `edit <id>`)".to_string());
            }
            view.submit().await;
        }
        Command::Close => view.close_form(),
        Command::Delete(id) => view.request_delete(id),
        Command::Yes => {
            if view.pending_delete().is_none() {
                return Outcome::Print("nothing to confirm".to_string());
            }
            view.confirm_delete().await;
        }
        Command::No => view.cancel_delete(),
        Command::Refresh => view.load().await,
        Command::Help => return Outcome::Print(HELP.to_string()),
        Command::Quit => return Outcome::Quit,
    }
    Outcome::Render
}
