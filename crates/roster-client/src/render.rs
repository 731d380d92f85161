//! Plain-text rendering of a [`StudentListView`].

use crate::api::StudentsApi;
use crate::view::{NoticeKind, PageControls, StudentListView, PAGE_SIZES};
use roster_types::StudentWithMarks;
use serde_json::Value;
use std::fmt;

pub const CONFIRM_TITLE: &str = "Are you sure?";
pub const CONFIRM_TEXT: &str = "This student will be deleted permanently.";

/// Renders the whole screen: notice, list, pager and any open dialog.
pub fn render<A: StudentsApi>(view: &StudentListView<A>) -> String {
    Screen(view).to_string()
}

struct Screen<'a, A: StudentsApi>(&'a StudentListView<A>);

impl<A: StudentsApi> fmt::Display for Screen<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;

        if let Some(notice) = view.notice() {
            let marker = match notice.kind {
                NoticeKind::Success => "[ok]",
                NoticeKind::Error => "[!!]",
            };
            writeln!(f, "{marker} {}: {}", notice.title, notice.text)?;
            writeln!(f)?;
        }

        writeln!(f, "Student List")?;
        writeln!(f, "Search: {}", view.search())?;
        write_table(f, view)?;
        writeln!(f, "{}", render_pager(&view.controls()))?;
        writeln!(f, "{}", render_page_sizes(view.limit()))?;

        if view.is_form_open() {
            writeln!(f)?;
            write_form(f, view)?;
        }

        if let Some(id) = view.pending_delete() {
            writeln!(f)?;
            writeln!(f, "{CONFIRM_TITLE} (student {id})")?;
            writeln!(f, "{CONFIRM_TEXT}")?;
            writeln!(f, "[yes] Yes, delete it   [no] Cancel")?;
        }
        Ok(())
    }
}

fn write_table<A: StudentsApi>(out: &mut impl fmt::Write, view: &StudentListView<A>) -> fmt::Result {
    let rows = view.visible_students();
    writeln!(out, "{:<6} {:<24} {:<30} {:>4}", "ID", "Name", "Email", "Age")?;
    if rows.is_empty() {
        return writeln!(out, "No students found");
    }
    for s in rows {
        writeln!(out, "{:<6} {:<24} {:<30} {:>4}", s.id, s.name, s.email, s.age)?;
    }
    Ok(())
}

/// `< Prev  [1] 2 3  Next >`, with disabled directions in parentheses.
pub fn render_pager(controls: &PageControls) -> String {
    let prev = if controls.prev_enabled { "< Prev" } else { "(< Prev)" };
    let next = if controls.next_enabled { "Next >" } else { "(Next >)" };
    let pages: Vec<String> = controls
        .pages
        .iter()
        .map(|b| {
            if b.current {
                format!("[{}]", b.number)
            } else {
                b.number.to_string()
            }
        })
        .collect();
    if pages.is_empty() {
        format!("{prev}  {next}")
    } else {
        format!("{prev}  {}  {next}", pages.join(" "))
    }
}

fn render_page_sizes(current: u32) -> String {
    let sizes: Vec<String> = PAGE_SIZES
        .iter()
        .map(|&size| {
            if size == current {
                format!("[{size}]")
            } else {
                size.to_string()
            }
        })
        .collect();
    format!("Per page: {}", sizes.join(" "))
}

fn write_form<A: StudentsApi>(out: &mut impl fmt::Write, view: &StudentListView<A>) -> fmt::Result {
    let (title, action) = match view.editing_id() {
        Some(_) => ("Edit Student", "Update"),
        None => ("Add Student", "Add"),
    };
    let form = view.form();
    writeln!(out, "{title}")?;
    writeln!(out, "  Name:  {}", form.name)?;
    writeln!(out, "  Email: {}", form.email)?;
    writeln!(out, "  Age:   {}", form.age)?;
    writeln!(out, "[save] {action}   [close] Cancel")
}

/// One record followed by its marks, each mark's extra columns as `key=value`.
pub fn render_details(details: &StudentWithMarks) -> String {
    Details(details).to_string()
}

struct Details<'a>(&'a StudentWithMarks);

impl fmt::Display for Details<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.0.student;
        writeln!(f, "#{} {} <{}>, age {}", s.id, s.name, s.email, s.age)?;
        if self.0.marks.is_empty() {
            return writeln!(f, "  no marks");
        }
        for mark in &self.0.marks {
            write!(f, "  mark {}:", mark.id)?;
            for (key, value) in &mark.fields {
                match value {
                    Value::String(text) => write!(f, " {key}={text}")?,
                    other => write!(f, " {key}={other}")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
