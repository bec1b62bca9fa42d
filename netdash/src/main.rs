//! Entry point for netdash. Parses args, resolves the server profile and runs
//! the terminal dashboard (or one of the one-shot modes).

use std::env;
use std::io::{self, Write};

use netdash::app::App;
use netdash::fetch::{fetch_tasks, TaskSource};
use netdash::html::HtmlTable;
use netdash::logging;
use netdash::profiles::{Profile, ProfileRequest, ProfileStore, Resolved};
use netdash::state::Dashboard;
use tracing::warn;

const USAGE: &str = "[--tls-ca CERT_PEM|-t CERT_PEM] [--profile NAME|-P NAME] [--save] \
[--query TEXT|-q TEXT] [--alerts-only] [--agent NAME --target NAME] [--html] [--dry-run] \
[http://HOST:PORT]";

#[derive(Debug, Default)]
struct ParsedArgs {
    url: Option<String>,
    tls_ca: Option<String>,
    profile: Option<String>,
    save: bool,
    query: Option<String>,
    alerts_only: bool,
    agent: Option<String>,
    target: Option<String>,
    html: bool,
    dry_run: bool,
}

// `--flag=value` form; empty values are ignored
fn inline_value(arg: &str) -> Option<String> {
    arg.split_once('=')
        .map(|(_, v)| v)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "netdash".into());
    let mut p = ParsedArgs::default();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(format!("Usage: {prog} {USAGE}")),
            "--tls-ca" | "-t" => p.tls_ca = it.next(),
            "--profile" | "-P" => p.profile = it.next(),
            "--query" | "-q" => p.query = it.next(),
            "--agent" => p.agent = it.next(),
            "--target" => p.target = it.next(),
            "--save" => p.save = true,
            "--alerts-only" => p.alerts_only = true,
            "--html" => p.html = true,
            "--dry-run" => p.dry_run = true,
            _ if arg.starts_with("--tls-ca=") => p.tls_ca = inline_value(&arg),
            _ if arg.starts_with("--profile=") => p.profile = inline_value(&arg),
            _ if arg.starts_with("--query=") => p.query = inline_value(&arg),
            _ if arg.starts_with("--agent=") => p.agent = inline_value(&arg),
            _ if arg.starts_with("--target=") => p.target = inline_value(&arg),
            _ if arg.starts_with('-') => {
                return Err(format!("Unknown option '{arg}'. Usage: {prog} {USAGE}"));
            }
            _ => {
                if p.url.is_some() {
                    return Err(format!("Unexpected argument. Usage: {prog} {USAGE}"));
                }
                p.url = Some(arg);
            }
        }
    }
    Ok(p)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    // The dashboard owns the terminal; only one-shot modes may log to stderr.
    let interactive = !(parsed.html || parsed.dry_run);
    if interactive {
        let path = logging::log_path();
        if let Err(e) = logging::init_file(&path) {
            eprintln!("logging disabled: cannot open {}: {e}", path.display());
        }
    } else {
        logging::init_stderr();
    }

    let Some((url, tls_ca)) = resolve_server(&parsed)? else {
        return Ok(());
    };

    let mut source = TaskSource::new(&url)?
        .alerts_only(parsed.alerts_only)
        .tls_ca(tls_ca.as_deref());
    match (&parsed.agent, &parsed.target) {
        (Some(agent), Some(target)) => source = source.agent_target(agent, target),
        (None, None) => {}
        _ => warn!("--agent and --target only apply together; ignoring"),
    }
    let query = parsed.query.unwrap_or_default();

    if parsed.dry_run {
        println!("{}", source.tasks_url()?);
        return Ok(());
    }

    if parsed.html {
        let mut dashboard = Dashboard::with_query(HtmlTable::new(), query);
        dashboard.load(fetch_tasks(&source).await);
        let page = dashboard.into_target().to_document(&format!("netdash - {url}"));
        io::stdout().write_all(page.as_bytes())?;
        return Ok(());
    }

    let mut app = App::new(url).with_query(&query);
    app.run(source).await
}

/// Work out which server to talk to, creating or updating the named profile
/// along the way. `None` means the user aborted or nothing was given.
fn resolve_server(parsed: &ParsedArgs) -> anyhow::Result<Option<(String, Option<String>)>> {
    let mut store = ProfileStore::load();
    let req = ProfileRequest {
        profile_name: parsed.profile.clone(),
        url: parsed.url.clone(),
        tls_ca: parsed.tls_ca.clone(),
    };

    match req.resolve(&store) {
        Resolved::Direct(url, tls_ca) => {
            if let Some(name) = parsed.profile.as_deref() {
                let entry = Profile {
                    url: url.clone(),
                    tls_ca: tls_ca.clone(),
                };
                let exists = store.profiles.contains_key(name);
                let write = match store.profiles.get(name) {
                    Some(old) if *old == entry => false,
                    Some(_) => {
                        parsed.save || prompt_yes_no(&format!("Overwrite existing profile '{name}'? [y/N]: "))
                    }
                    None => true,
                };
                if write && store.upsert(name, entry) {
                    store.save()?;
                    if exists {
                        tracing::info!(profile = name, "profile updated");
                    }
                }
            }
            Ok(Some((url, tls_ca)))
        }
        Resolved::Loaded(url, tls_ca) => Ok(Some((url, tls_ca))),
        Resolved::PromptSelect(names) => {
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            let picked = line
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| idx.checked_sub(1))
                .and_then(|idx| names.get(idx))
                .and_then(|name| store.profiles.get(name));
            Ok(picked.map(|p| (p.url.clone(), p.tls_ca.clone())))
        }
        Resolved::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter server URL (http://HOST:PORT): ")?;
            let url = url.trim();
            if url.is_empty() {
                return Ok(None);
            }
            let ca = prompt_string("Enter TLS CA path (or leave blank): ")?;
            let ca = Some(ca.trim().to_string()).filter(|c| !c.is_empty());
            store.upsert(
                &name,
                Profile {
                    url: url.to_string(),
                    tls_ca: ca.clone(),
                },
            );
            store.save()?;
            Ok(Some((url.to_string(), ca)))
        }
        Resolved::None => {
            eprintln!("No URL provided and no profiles to select.");
            Ok(None)
        }
    }
}

fn prompt_yes_no(prompt: &str) -> bool {
    prompt_string(prompt)
        .map(|line| matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
        .unwrap_or(false)
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        std::iter::once("netdash")
            .chain(v.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn long_short_and_inline_flags() {
        let p = parse_args(args(&[
            "-t",
            "/tmp/ca.pem",
            "--profile=lab",
            "-q",
            "A1",
            "--alerts-only",
            "--agent",
            "r1",
            "--target=r2",
            "http://10.0.0.1:8000",
        ]))
        .unwrap();
        assert_eq!(p.tls_ca.as_deref(), Some("/tmp/ca.pem"));
        assert_eq!(p.profile.as_deref(), Some("lab"));
        assert_eq!(p.query.as_deref(), Some("A1"));
        assert!(p.alerts_only);
        assert_eq!(p.agent.as_deref(), Some("r1"));
        assert_eq!(p.target.as_deref(), Some("r2"));
        assert_eq!(p.url.as_deref(), Some("http://10.0.0.1:8000"));
        assert!(!p.html && !p.dry_run);
    }

    #[test]
    fn rejects_second_url_and_unknown_flags() {
        assert!(parse_args(args(&["http://a", "http://b"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
        let help = parse_args(args(&["--help"])).unwrap_err();
        assert!(help.starts_with("Usage:"));
    }
}
