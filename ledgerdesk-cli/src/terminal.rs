//! Terminal presentation of the console
//!
//! Alerts and prompts go to stderr. Rendered regions are collected and
//! written out as one HTML page once the command is done.

use ledgerdesk_console::{render, Alert, AlertKind, AuthForm, Modal, Region, View};
use maud::Markup;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

pub struct TerminalView {
    regions: Mutex<Vec<(Region, Markup)>>,
    alerts: Mutex<Vec<Alert>>,
    assume_yes: bool,
}

impl TerminalView {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            regions: Mutex::new(Vec::new()),
            alerts: Mutex::new(Vec::new()),
            assume_yes,
        }
    }

    pub fn has_regions(&self) -> bool {
        self.regions.lock().map(|r| !r.is_empty()).unwrap_or(false)
    }

    /// Drop alerts that have not been written to a page yet.
    pub fn clear_alerts(&self) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.clear();
        }
    }

    /// The page as rendered so far.
    pub fn document(&self, title: &str) -> Markup {
        let regions = self.regions.lock().map(|r| r.clone()).unwrap_or_default();
        let alerts = self.alerts.lock().map(|a| a.clone()).unwrap_or_default();
        render::document(title, &alerts, &regions)
    }

    /// Write the page to `output`, or stdout when unset.
    ///
    /// Alerts are shown on exactly one page; regions stay until replaced.
    pub fn write_page(&self, title: &str, output: Option<&Path>) -> std::io::Result<()> {
        let page = self.document(title).into_string();
        match output {
            Some(path) => {
                std::fs::write(path, page)?;
                eprintln!("📄 Page written to {}", path.display());
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", page)?;
            }
        }
        self.clear_alerts();
        Ok(())
    }
}

impl View for TerminalView {
    fn show_alert(&self, alert: Alert) {
        let icon = match alert.kind {
            AlertKind::Success => "✅",
            AlertKind::Danger => "❌",
            AlertKind::Info => "ℹ️",
        };
        eprintln!("{} {}", icon, alert.text);
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push(alert);
        }
    }

    fn render(&self, region: Region, markup: Markup) {
        if let Ok(mut regions) = self.regions.lock() {
            match regions.iter_mut().find(|(r, _)| *r == region) {
                Some(slot) => slot.1 = markup,
                None => regions.push((region, markup)),
            }
        }
    }

    fn open_modal(&self, modal: Modal) {
        debug!(?modal, "Modal opened");
    }

    fn close_modal(&self, modal: Modal) {
        debug!(?modal, "Modal closed");
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{} [y/N] ", prompt);
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }

    fn show_form(&self, form: AuthForm) {
        match form {
            AuthForm::Login => {
                eprintln!("🔑 Sign in with: ledgerdesk login --name <NAME> --password <PASSWORD>")
            }
            AuthForm::Register => eprintln!(
                "📝 Register with: ledgerdesk register --name <NAME> --password <PASSWORD> --confirm-password <PASSWORD>"
            ),
        }
    }
}
