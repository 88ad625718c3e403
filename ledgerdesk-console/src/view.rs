//! The surface page controllers draw on
//!
//! Controllers never produce output directly. They hand rendered fragments,
//! alerts and modal transitions to a [`View`], which a front end (the CLI, or
//! a recorder in tests) turns into something visible.

use maud::Markup;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Danger,
    Info,
}

impl AlertKind {
    /// Bootstrap-style class suffix
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Success => "success",
            AlertKind::Danger => "danger",
            AlertKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub text: String,
}

impl Alert {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            text: text.into(),
        }
    }

    pub fn danger(text: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Danger,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Info,
            text: text.into(),
        }
    }
}

/// Named page areas a fragment can be rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Header,
    PendingTotal,
    EntityTable,
    Stats,
    RecentUsers,
    RecentClients,
    Records,
    Panel,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Header => "header",
            Region::PendingTotal => "pending-total",
            Region::EntityTable => "entity-table",
            Region::Stats => "stats",
            Region::RecentUsers => "recent-users",
            Region::RecentClients => "recent-clients",
            Region::Records => "records",
            Region::Panel => "panel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modal {
    AddRecord,
    AddTransaction,
    UpdateRecord,
    RecordDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthForm {
    Login,
    Register,
}

pub trait View: Send + Sync {
    fn show_alert(&self, alert: Alert);

    /// Replace the contents of `region` with `markup`.
    fn render(&self, region: Region, markup: Markup);

    fn open_modal(&self, modal: Modal);

    fn close_modal(&self, modal: Modal);

    /// Ask the operator a yes/no question.
    fn confirm(&self, prompt: &str) -> bool;

    fn show_form(&self, form: AuthForm);
}

/// Everything a [`RecordingView`] was asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Alert(Alert),
    Render(Region, String),
    OpenModal(Modal),
    CloseModal(Modal),
    Confirm(String),
    ShowForm(AuthForm),
}

/// View that keeps an event log and answers confirmations with a fixed value.
#[derive(Debug)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
    confirm_answer: bool,
}

impl Default for RecordingView {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingView {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            confirm_answer: true,
        }
    }

    pub fn declining() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            confirm_answer: false,
        }
    }

    fn push(&self, event: ViewEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Alert(alert) => Some(alert),
                _ => None,
            })
            .collect()
    }

    /// Every fragment rendered into `region`, oldest first.
    pub fn renders(&self, region: Region) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Render(r, html) if r == region => Some(html),
                _ => None,
            })
            .collect()
    }

    pub fn last_render(&self, region: Region) -> Option<String> {
        self.renders(region).pop()
    }
}

impl View for RecordingView {
    fn show_alert(&self, alert: Alert) {
        self.push(ViewEvent::Alert(alert));
    }

    fn render(&self, region: Region, markup: Markup) {
        self.push(ViewEvent::Render(region, markup.into_string()));
    }

    fn open_modal(&self, modal: Modal) {
        self.push(ViewEvent::OpenModal(modal));
    }

    fn close_modal(&self, modal: Modal) {
        self.push(ViewEvent::CloseModal(modal));
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.push(ViewEvent::Confirm(prompt.to_string()));
        self.confirm_answer
    }

    fn show_form(&self, form: AuthForm) {
        self.push(ViewEvent::ShowForm(form));
    }
}
