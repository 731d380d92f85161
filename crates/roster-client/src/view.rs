//! State of the student list screen.
//!
//! The view holds everything the screen shows: the fetched page, the search
//! text, paging position, the add/edit form and the delete confirmation.
//! Dialog visibility is plain state (`form_open`, `pending_delete`); a
//! front end renders whatever the view says.

use crate::api::StudentsApi;
use crate::error::ClientError;
use crate::form::{FormField, StudentForm};
use roster_types::{
    page_count, page_numbers, Student, StudentWithMarks, DEFAULT_LIMIT, DEFAULT_PAGE,
};

/// Page sizes offered to the user.
pub const PAGE_SIZES: [u32; 3] = [5, 10, 15];

/// Shown when a failure carries no server message.
pub const FALLBACK_ERROR: &str = "Something went wrong";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub text: String,
}

impl Notice {
    fn success(title: &str, text: &str) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.to_string(),
            text: text.to_string(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: "Error".to_string(),
            text: text.into(),
        }
    }

    fn from_client_error(err: &ClientError) -> Self {
        Self::error(err.server_message().unwrap_or(FALLBACK_ERROR))
    }
}

/// One numbered page button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButton {
    pub number: u32,
    pub current: bool,
}

/// Previous/next state plus a button for every page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControls {
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub pages: Vec<PageButton>,
}

pub struct StudentListView<A> {
    api: A,
    students: Vec<Student>,
    total: i64,
    page: u32,
    limit: u32,
    search: String,
    form: StudentForm,
    editing_id: Option<i64>,
    form_open: bool,
    pending_delete: Option<i64>,
    notice: Option<Notice>,
}

impl<A: StudentsApi> StudentListView<A> {
    /// A view on page 1 with the default page size. Nothing is fetched
    /// until [`load`](Self::load) is called.
    pub fn new(api: A) -> Self {
        Self {
            api,
            students: Vec::new(),
            total: 0,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: String::new(),
            form: StudentForm::default(),
            editing_id: None,
            form_open: false,
            pending_delete: None,
            notice: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetches the current page. On failure the previous rows stay.
    pub async fn load(&mut self) {
        match self.api.list(self.page, self.limit).await {
            Ok(page) => {
                tracing::debug!(page = self.page, limit = self.limit, total = page.total, "page loaded");
                self.students = page.students;
                self.total = page.total;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load students");
                self.notice = Some(Notice::from_client_error(&e));
            }
        }
    }

    /// Every row of the fetched page.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Rows of the fetched page whose name or email contains the search
    /// text, ignoring case. Other pages are not searched.
    pub fn visible_students(&self) -> Vec<&Student> {
        let needle = self.search.to_lowercase();
        self.students
            .iter()
            .filter(|s| {
                s.name.to_lowercase().contains(&needle) || s.email.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn form(&self) -> &StudentForm {
        &self.form
    }

    pub fn editing_id(&self) -> Option<i64> {
        self.editing_id
    }

    pub fn is_form_open(&self) -> bool {
        self.form_open
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Clears the current notice, returning it.
    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn page_count(&self) -> u32 {
        page_count(self.total, self.limit)
    }

    pub fn controls(&self) -> PageControls {
        PageControls {
            prev_enabled: self.page > 1,
            next_enabled: self.page < self.page_count(),
            pages: page_numbers(self.total, self.limit)
                .map(|number| PageButton {
                    number,
                    current: number == self.page,
                })
                .collect(),
        }
    }

    /// Moves to `page` and re-fetches. Pages outside `1..=page_count` are
    /// ignored, as are moves to the current page. Returns whether the page
    /// changed.
    pub async fn go_to_page(&mut self, page: u32) -> bool {
        if page == self.page || page == 0 || page > self.page_count() {
            return false;
        }
        self.page = page;
        self.load().await;
        true
    }

    pub async fn next_page(&mut self) -> bool {
        if !self.controls().next_enabled {
            return false;
        }
        self.go_to_page(self.page + 1).await
    }

    pub async fn prev_page(&mut self) -> bool {
        if !self.controls().prev_enabled {
            return false;
        }
        self.go_to_page(self.page - 1).await
    }

    /// Changes the page size and returns to page 1, re-fetching when
    /// either actually changed.
    pub async fn set_page_size(&mut self, limit: u32) {
        if limit == 0 {
            return;
        }
        let changed = limit != self.limit || self.page != DEFAULT_PAGE;
        self.limit = limit;
        self.page = DEFAULT_PAGE;
        if changed {
            self.load().await;
        }
    }

    /// Opens an empty form for a new record.
    pub fn open_add(&mut self) {
        self.form = StudentForm::default();
        self.editing_id = None;
        self.form_open = true;
    }

    /// Opens the form pre-filled with a row of the current page. Returns
    /// `false` if no such row is shown.
    pub fn open_edit(&mut self, id: i64) -> bool {
        let Some(student) = self.students.iter().find(|s| s.id == id) else {
            return false;
        };
        self.form = StudentForm::from_student(student);
        self.editing_id = Some(id);
        self.form_open = true;
        true
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Hides the form without discarding what was typed.
    pub fn close_form(&mut self) {
        self.form_open = false;
    }

    /// Creates or updates depending on whether a record is being edited,
    /// then re-fetches the current page.
    pub async fn submit(&mut self) {
        let input = match self.form.to_input() {
            Ok(input) => input,
            Err(e) => {
                self.notice = Some(Notice::error(e.to_string()));
                return;
            }
        };

        let result = match self.editing_id {
            Some(id) => self
                .api
                .update(id, &input)
                .await
                .map(|_| Notice::success("Updated", "Student updated successfully")),
            None => self
                .api
                .create(&input)
                .await
                .map(|_| Notice::success("Created", "Student added successfully")),
        };

        match result {
            Ok(notice) => {
                self.editing_id = None;
                self.form = StudentForm::default();
                self.form_open = false;
                self.notice = Some(notice);
                self.load().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to save student");
                self.notice = Some(Notice::from_client_error(&e));
            }
        }
    }

    /// Fetches one record with its marks. Failures become a notice.
    pub async fn details(&mut self, id: i64) -> Option<StudentWithMarks> {
        match self.api.get(id).await {
            Ok(student) => Some(student),
            Err(e) => {
                tracing::warn!(error = %e, student_id = id, "failed to fetch student");
                self.notice = Some(Notice::from_client_error(&e));
                None
            }
        }
    }

    /// Asks for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: i64) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Deletes the record awaiting confirmation, then re-fetches.
    pub async fn confirm_delete(&mut self) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };

        match self.api.delete(id).await {
            Ok(_) => {
                self.notice = Some(Notice::success("Deleted!", "Student has been deleted."));
                self.load().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, student_id = id, "failed to delete student");
                self.notice = Some(Notice::from_client_error(&e));
            }
        }
    }
}
