//! Render layer: pure functions from backend DTOs to HTML fragments
//!
//! Markup is built with `maud`, so every backend string is escaped on the
//! way out. Amounts follow the `en-IN` rupee convention.

use crate::enrich::Enriched;
use crate::view::{Alert, Region};
use chrono::NaiveDateTime;
use ledgerdesk_client::{Clients, EntityResource, Users};
use ledgerdesk_core::{
    AdminInfo, Client, ClientLedgerEntry, ClientPanelEntry, ClientRecordDetails,
    DashboardSummary, User, UserPanelEntry, UserRecordDetails,
};
use maud::{html, Markup, DOCTYPE};

/// Format an amount as Indian rupees, e.g. `₹1,23,456.00` or `-₹40.50`.
pub fn format_inr(amount: f64) -> String {
    let paise = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && paise > 0 { "-" } else { "" };
    format!(
        "{}₹{}.{:02}",
        sign,
        group_indian(paise / 100),
        paise % 100
    )
}

/// Lakh/crore grouping: the last three digits, then pairs.
fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (mut head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while head.len() > 2 {
        let (rest, pair) = head.split_at(head.len() - 2);
        groups.push(pair);
        head = rest;
    }
    groups.push(head);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// `16 Oct 2026`
pub fn format_date(date: &NaiveDateTime) -> String {
    date.format("%-d %b %Y").to_string()
}

fn active_class(is_active: bool) -> &'static str {
    if is_active {
        "text-success"
    } else {
        "text-danger"
    }
}

fn active_label(is_active: bool) -> &'static str {
    if is_active {
        "Active"
    } else {
        "Inactive"
    }
}

fn profit_loss_class(total: f64) -> &'static str {
    if total > 0.0 {
        "text-success"
    } else if total < 0.0 {
        "text-danger"
    } else {
        "text-muted"
    }
}

fn empty_row(colspan: usize, text: &str) -> Markup {
    html! {
        tr {
            td colspan=(colspan) class="text-center text-muted" { (text) }
        }
    }
}

/// Rendering hooks for an entity type's list page.
pub trait RenderEntity: EntityResource + Sized {
    /// Table headings, the actions column included
    const COLUMNS: &'static [&'static str];

    fn render_row(row: &Enriched<Self>) -> Markup;

    fn render_record_details(details: &Self::RecordDetails) -> Markup;

    fn render_panel_entry(entry: &Self::PanelEntry) -> Markup;
}

/// Table body for a list page. An empty list renders a single placeholder row.
pub fn render_table<R: RenderEntity>(rows: &[Enriched<R>]) -> Markup {
    html! {
        table class="table" data-entity=(R::PLURAL) {
            thead {
                tr {
                    @for column in R::COLUMNS {
                        th { (column) }
                    }
                }
            }
            tbody {
                @if rows.is_empty() {
                    (empty_row(R::COLUMNS.len(), &format!("No {} found", R::PLURAL)))
                } @else {
                    @for row in rows {
                        (R::render_row(row))
                    }
                }
            }
        }
    }
}

pub fn render_panel<R: RenderEntity>(entries: &[R::PanelEntry]) -> Markup {
    html! {
        ul class="list-group" data-entity=(R::PLURAL) {
            @if entries.is_empty() {
                li class="list-group-item text-muted" { "No " (R::PLURAL) " found" }
            }
            @for entry in entries {
                (R::render_panel_entry(entry))
            }
        }
    }
}

pub fn render_welcome(admin: &AdminInfo) -> Markup {
    html! {
        span #adminName { "Welcome, " (admin.name) }
    }
}

pub fn render_pending_total(total: f64) -> Markup {
    html! {
        span #totalPendingAmount class="text-warning" { (format_inr(total)) }
    }
}

pub fn render_alert(alert: &Alert) -> Markup {
    html! {
        div class={ "alert alert-" (alert.kind.as_str()) } role="alert" { (alert.text) }
    }
}

fn action_button(class: &str, action: &str, id: i64, label: &str) -> Markup {
    html! {
        button type="button" class={ "btn btn-sm " (class) } data-action=(action) data-id=(id) { (label) }
    }
}

fn records_card(title: &str, count: usize, headings: &[&str], body: Markup) -> Markup {
    html! {
        div class="card mb-3" {
            div class="card-header" { (title) " (" (count) ")" }
            div class="table-container" {
                table class="table" {
                    thead {
                        tr {
                            @for heading in headings {
                                th { (heading) }
                            }
                        }
                    }
                    tbody { (body) }
                }
            }
        }
    }
}

impl RenderEntity for Users {
    const COLUMNS: &'static [&'static str] =
        &["Name", "Mobile", "Location", "Status", "Balance", "Actions"];

    fn render_row(row: &Enriched<Self>) -> Markup {
        let user = &row.record;
        let calc = &row.metrics;
        let balance_class = if calc.sum_deficit > 0.0 {
            "text-warning"
        } else {
            "text-success"
        };
        let (toggle_class, toggle_action, toggle_label) = if user.is_active {
            ("btn-warning", "disable", "Disable")
        } else {
            ("btn-success", "enable", "Enable")
        };

        html! {
            tr data-id=(user.id) {
                td { (user.full_name()) }
                td { (user.mobile) }
                td { (user.location) }
                td { span class=(active_class(user.is_active)) { (active_label(user.is_active)) } }
                td {
                    span class=(balance_class) {
                        (format_inr(calc.sum_deficit.abs())) " " (calc.status)
                    }
                }
                td {
                    (action_button("btn-info", "add-transaction", user.id, "Add Transaction"))
                    " "
                    (action_button("btn-secondary", "view-records", user.id, "View Records"))
                    " "
                    (action_button(toggle_class, toggle_action, user.id, toggle_label))
                }
            }
        }
    }

    fn render_record_details(details: &UserRecordDetails) -> Markup {
        let credits = html! {
            @if details.credit_records.is_empty() {
                (empty_row(3, "No credit records"))
            }
            @for record in &details.credit_records {
                tr {
                    td { (format_date(&record.date)) }
                    td { (format_inr(record.amount.unwrap_or_default())) }
                    td { (format_inr(record.round_off.unwrap_or_default())) }
                }
            }
        };
        let debits = html! {
            @if details.debit_records.is_empty() {
                (empty_row(5, "No debit records"))
            }
            @for record in &details.debit_records {
                tr {
                    td { (format_date(&record.date)) }
                    td { (record.product_type.as_deref().unwrap_or("-")) }
                    td { (record.bags.unwrap_or_default()) }
                    td { (record.net_weight.unwrap_or_default()) " kg" }
                    td { (format_inr(record.net_amount.unwrap_or_default())) }
                }
            }
        };

        html! {
            h3 { (details.user_name) " - Transaction Records" }
            (records_card("Credit Records", details.total_credits, &["Date", "Amount", "Round Off"], credits))
            (records_card(
                "Debit Records",
                details.total_debits,
                &["Date", "Product", "Bags", "Net Weight", "Net Amount"],
                debits
            ))
        }
    }

    fn render_panel_entry(entry: &UserPanelEntry) -> Markup {
        html! {
            li class="list-group-item" data-id=(entry.id) {
                (entry.name)
                " "
                span class=(active_class(entry.is_active)) { (active_label(entry.is_active)) }
            }
        }
    }
}

fn ledger_rows(entries: &[ClientLedgerEntry], empty: &str) -> Markup {
    html! {
        @if entries.is_empty() {
            (empty_row(2, empty))
        }
        @for record in entries {
            tr {
                td { (format_date(&record.date)) }
                td { (format_inr(record.amount)) }
            }
        }
    }
}

impl RenderEntity for Clients {
    const COLUMNS: &'static [&'static str] = &[
        "Name",
        "Username",
        "Location",
        "Phone",
        "Profit/Loss",
        "Pending",
        "Actions",
    ];

    fn render_row(row: &Enriched<Self>) -> Markup {
        let client = &row.record;
        let calc = &row.metrics;

        html! {
            tr data-id=(client.id) {
                td { (client.name) }
                td { (client.username) }
                td { (client.location) }
                td { (client.phone_number) }
                td {
                    span class=(profit_loss_class(calc.profit_loss_total)) {
                        (format_inr(calc.profit_loss_total.abs())) " " (calc.status)
                    }
                }
                td { span class="text-warning" { (format_inr(calc.pending_amount.abs())) } }
                td {
                    (action_button("btn-info", "add-transaction", client.id, "Add Transaction"))
                    " "
                    (action_button("btn-secondary", "view-records", client.id, "View Records"))
                    " "
                    (action_button("btn-warning", "update", client.id, "Update"))
                }
            }
        }
    }

    fn render_record_details(details: &ClientRecordDetails) -> Markup {
        let profit_loss = html! {
            @if details.profit_loss_records.is_empty() {
                (empty_row(3, "No profit/loss records"))
            }
            @for record in &details.profit_loss_records {
                tr {
                    td { (format_date(&record.date)) }
                    td class=(if record.kind == "Profit" { "text-success" } else { "text-danger" }) {
                        (record.kind)
                    }
                    td { (format_inr(record.amount.abs())) }
                }
            }
        };

        html! {
            h3 { (details.client_name) " - Transaction Records" }
            (records_card(
                "Credit Records",
                details.total_credits,
                &["Date", "Amount"],
                ledger_rows(&details.credit_records, "No credit records")
            ))
            (records_card(
                "Debit Records",
                details.total_debits,
                &["Date", "Amount"],
                ledger_rows(&details.debit_records, "No debit records")
            ))
            (records_card(
                "Profit/Loss Records",
                details.total_profit_loss_entries,
                &["Date", "Type", "Amount"],
                profit_loss
            ))
        }
    }

    fn render_panel_entry(entry: &ClientPanelEntry) -> Markup {
        html! {
            li class="list-group-item" data-id=(entry.id) {
                (entry.name) " (" (entry.username) ") "
                span class="text-warning" { (format_inr(entry.pending_amount)) }
            }
        }
    }
}

pub fn render_dashboard_stats(summary: &DashboardSummary) -> Markup {
    let stats = [
        ("totalUsers", "Total Users", summary.total_users.to_string()),
        ("activeUsers", "Active Users", summary.active_users.to_string()),
        ("totalClients", "Total Clients", summary.total_clients.to_string()),
        ("usersPending", "Users Pending", format_inr(summary.users_pending_amount)),
        ("clientsPending", "Clients Pending", format_inr(summary.clients_pending_amount)),
    ];

    html! {
        div class="stats-grid" {
            @for (id, label, value) in &stats {
                div class="stat-card" {
                    div class="stat-label" { (label) }
                    div class="stat-value" id=(id) { (value) }
                }
            }
        }
    }
}

pub fn render_recent_users(users: &[User]) -> Markup {
    html! {
        @if users.is_empty() {
            (empty_row(5, "No users found"))
        }
        @for user in users {
            tr {
                td { (user.full_name()) }
                td { (user.mobile) }
                td { (user.location) }
                td { span class=(active_class(user.is_active)) { (active_label(user.is_active)) } }
                td { (format_date(&user.created_date)) }
            }
        }
    }
}

pub fn render_recent_clients(clients: &[Client]) -> Markup {
    html! {
        @if clients.is_empty() {
            (empty_row(5, "No clients found"))
        }
        @for client in clients {
            tr {
                td { (client.name) }
                td { (client.username) }
                td { (client.location) }
                td { (client.phone_number) }
                td { (format_date(&client.created_date)) }
            }
        }
    }
}

/// Assemble a standalone page from rendered regions, in the given order.
pub fn document(title: &str, alerts: &[Alert], regions: &[(Region, Markup)]) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "ledgerdesk - " (title) }
            }
            body {
                div #alertContainer {
                    @for alert in alerts {
                        (render_alert(alert))
                    }
                }
                @for (region, markup) in regions {
                    section id=(region.as_str()) { (markup) }
                }
            }
        }
    }
}
