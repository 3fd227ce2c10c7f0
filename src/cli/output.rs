use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{IsTerminal, Write};
use std::process::{Command, Stdio};
use tracing::debug;

use crate::api::{Account, Cluster, ObjectRef, Subscription};

/// Print `text`, through the configured pager when stdout is a terminal
pub fn emit(text: &str, pager: Option<&str>) -> Result<()> {
    if let Some(pager) = pager.filter(|_| std::io::stdout().is_terminal()) {
        if let Some((program, args)) = pager_command(pager) {
            return page(text, program, &args);
        }
    }

    println!("{}", text);
    Ok(())
}

/// Split a pager command, keeping it only when the program exists
fn pager_command(pager: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = pager.split_whitespace();
    let program = parts.next()?;

    if which::which(program).is_err() {
        debug!("Pager '{}' not found, printing directly", program);
        return None;
    }

    Some((program, parts.collect()))
}

fn page(text: &str, program: &str, args: &[&str]) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to start pager '{}'", program))?;

    if let Some(mut stdin) = child.stdin.take() {
        // The user may quit the pager before reading everything
        if let Err(e) = writeln!(stdin, "{}", text) {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e).context("Failed to write to pager");
            }
        }
    }

    child.wait().context("Pager exited abnormally")?;
    Ok(())
}

fn field(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        let label = format!("{:<16}", format!("{}:", label));
        out.push_str(&format!("{}{}\n", label.bold(), value));
    }
}

fn ref_id(reference: &Option<ObjectRef>) -> Option<&str> {
    reference.as_ref().and_then(|r| r.id.as_deref())
}

pub fn render_cluster(cluster: &Cluster) -> String {
    let mut out = String::new();
    field(&mut out, "ID", Some(cluster.id.as_str()));
    field(&mut out, "Name", cluster.name.as_deref());
    field(&mut out, "External ID", cluster.external_id.as_deref());
    field(&mut out, "State", cluster.state.as_deref());
    field(&mut out, "API URL", cluster.api.as_ref().and_then(|a| a.url.as_deref()));
    field(
        &mut out,
        "Console URL",
        cluster.console.as_ref().and_then(|c| c.url.as_deref()),
    );
    field(&mut out, "Cloud Provider", ref_id(&cluster.cloud_provider));
    field(&mut out, "Region", ref_id(&cluster.region));
    field(&mut out, "CCS", Some(if cluster.is_ccs() { "yes" } else { "no" }));
    out.trim_end().to_string()
}

pub fn render_subscription(subscription: &Subscription) -> String {
    let mut out = String::new();
    field(&mut out, "ID", Some(subscription.id.as_str()));
    field(&mut out, "Display Name", subscription.display_name.as_deref());
    field(&mut out, "Cluster ID", subscription.cluster_id());
    field(
        &mut out,
        "External ID",
        subscription.external_cluster_id.as_deref(),
    );
    field(&mut out, "Status", subscription.status.as_deref());
    field(&mut out, "Plan", ref_id(&subscription.plan));
    field(&mut out, "Creator", ref_id(&subscription.creator));
    field(&mut out, "Organization", subscription.organization_id.as_deref());
    out.trim_end().to_string()
}

pub fn render_account(account: &Account) -> String {
    let mut out = String::new();
    field(&mut out, "ID", Some(account.id.as_str()));
    field(&mut out, "Username", account.username.as_deref());
    field(&mut out, "Email", account.email.as_deref());

    let full_name = [account.first_name.as_deref(), account.last_name.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    field(&mut out, "Name", Some(full_name.as_str()));
    field(&mut out, "Organization", ref_id(&account.organization));
    out.trim_end().to_string()
}
