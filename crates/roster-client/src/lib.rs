//! Terminal client for the Roster student-record service.
//!
//! [`HttpStudentsApi`] talks to the `/students` endpoints. [`StudentListView`]
//! holds the screen state (current page, search, form, delete confirmation,
//! notices) and drives the API through the [`StudentsApi`] trait, so it can
//! be exercised without a server. [`render`] turns a view into text and
//! [`command`] maps typed lines onto view operations.

pub mod api;
pub mod command;
pub mod error;
pub mod form;
pub mod render;
pub mod view;

pub use api::{HttpStudentsApi, StudentsApi};
pub use command::{execute, Command, CommandError, Outcome};
pub use error::ClientError;
pub use form::{FormError, FormField, StudentForm};
pub use render::{render, render_details};
pub use view::{Notice, NoticeKind, PageButton, PageControls, StudentListView, PAGE_SIZES};
