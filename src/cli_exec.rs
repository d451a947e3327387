use std::time::Duration;

use anyhow::{Context, Result};

use default_dashboard::helpers::user_suffix;
use default_dashboard::host::{HassClient, Host};
use default_dashboard::model::{AgentConfig, User};
use default_dashboard::orchestrator::{RetryPolicy, RunOutcome, run_once, wait_until_ready};
use default_dashboard::pin::{PinFile, pin_dashboard};
use default_dashboard::provision::ensure_user_helpers;
use default_dashboard::resolve::{missing_helper_guidance, resolve};
use default_dashboard::session::Session;
use default_dashboard::store::ProfileStore;
use default_dashboard::sync::refresh_pending;

use crate::{Cli, Commands, HelperCommands};

pub(crate) async fn handle_command(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Init {
            url,
            token,
            helper_name,
            create_missing_helpers,
            force,
        } => {
            let mut cfg = AgentConfig::new(url.clone(), token.clone());
            cfg.helper_name = helper_name.clone();
            cfg.create_missing_helpers = *create_missing_helpers;
            let store = ProfileStore::init(&cli.state_dir, &cfg, *force)?;
            println!("Initialized profile at {}", store.root().display());
        }

        Commands::Run { no_wait, json } => {
            let (store, cfg, client) = connect(&cli)?;
            if !*no_wait {
                let policy = RetryPolicy::from(&cfg.readiness);
                wait_until_ready(&client, &policy, async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await?;
            }
            let user = identify(&cli, &client).await?;
            tracing::info!("Module initialized for user: id={}, name={}", user.id, user.name);
            let session = Session::new(client, store, &cfg.helper_name, user)
                .with_helper_creation(cfg.create_missing_helpers);
            let outcome = run_once(&session).await?;
            print_outcome(&outcome, *json)?;
        }

        Commands::Status { json } => {
            let (store, cfg, client) = connect(&cli)?;
            let user = identify(&cli, &client).await?;
            let session = Session::new(client, store, &cfg.helper_name, user);
            let snapshot = session.host.states().await.context("fetch helper states")?;
            let resolution = resolve(&session.ids, &snapshot);
            let pending = refresh_pending(&session.helper_name, &snapshot);
            let managed = session.settings.managed_panel();
            let last_selections = session.settings.last_selections();

            if *json {
                let doc = serde_json::json!({
                    "user": session.user,
                    "helpers": session.ids,
                    "observed": session.ids.observed(&snapshot),
                    "resolution": resolution,
                    "refresh_pending": pending,
                    "managed_panel": managed,
                    "last_selections": last_selections,
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&doc).context("serialize status json")?
                );
                return Ok(());
            }

            println!("user: {} ({})", session.user.name, session.user.id);
            for (id, value) in session.ids.observed(&snapshot) {
                println!("{}: {}", id, value.as_deref().unwrap_or("<missing>"));
            }
            match &resolution.target {
                Some(target) => println!(
                    "resolved: {} from {} (enabled={})",
                    target, resolution.source_helper, resolution.enabled
                ),
                None => {
                    println!("resolved: nothing");
                    for line in missing_helper_guidance(&session.ids, &snapshot) {
                        println!("  {}", line);
                    }
                }
            }
            if !pending.is_empty() {
                println!("refresh pending: {}", pending.join(", "));
            }
            println!(
                "defaultPanel: {}",
                managed.default_panel.as_deref().unwrap_or("<unset>")
            );
            println!(
                "isDefaultPanelManaged: {}",
                managed.is_default_panel_managed.as_deref().unwrap_or("<unset>")
            );
            for (id, value) in last_selections {
                println!("last {}: {}", id, value);
            }
        }

        Commands::Helpers { command } => match command {
            HelperCommands::Create => {
                let (store, cfg, client) = connect(&cli)?;
                let user = identify(&cli, &client).await?;
                let session = Session::new(client, store, &cfg.helper_name, user);
                let snapshot = session.host.states().await.context("fetch helper states")?;
                let report = ensure_user_helpers(&session, &snapshot).await;
                println!(
                    "{}: {}",
                    session.ids.user_selector,
                    created_label(
                        snapshot.contains(&session.ids.user_selector),
                        report.selector_created
                    )
                );
                println!(
                    "{}: {}",
                    session.ids.user_toggle,
                    created_label(
                        snapshot.contains(&session.ids.user_toggle),
                        report.toggle_created
                    )
                );
            }
        },

        Commands::Pin { dashboard, file } => {
            let (store, cfg, client) = connect(&cli)?;
            let user = identify(&cli, &client).await?;
            let url = match (dashboard, file) {
                (Some(url), _) => url.clone(),
                (None, Some(path)) => {
                    let doc = PinFile::load(path)?;
                    doc.pick(&user_suffix(&user))
                        .map(str::to_string)
                        .with_context(|| {
                            format!("{} names no dashboard for {}", path.display(), user.name)
                        })?
                }
                (None, None) => anyhow::bail!("missing required flag: --dashboard or --file"),
            };
            let session = Session::new(client, store, &cfg.helper_name, user);
            let commit = pin_dashboard(&session, &url).await;
            println!("{}: {:?}", url, commit);
        }
    }

    Ok(())
}

fn created_label(existed: bool, created: bool) -> &'static str {
    match (existed, created) {
        (true, _) => "exists",
        (false, true) => "created",
        (false, false) => "missing (create it manually)",
    }
}

fn connect(cli: &Cli) -> Result<(ProfileStore, AgentConfig, HassClient)> {
    let store = ProfileStore::at(&cli.state_dir);
    let mut cfg = match (store.read_config()?, &cli.url) {
        (Some(mut cfg), Some(url)) => {
            cfg.base_url = url.clone();
            cfg
        }
        (Some(cfg), None) => cfg,
        (None, Some(url)) => AgentConfig::new(url.clone(), None),
        (None, None) => anyhow::bail!(
            "no config found in {} (run `default-dashboard init --url ...` or pass --url)",
            cli.state_dir.display()
        ),
    };
    if let Some(token) = &cli.token {
        cfg.token = Some(token.clone());
    }
    let token = cfg
        .token
        .clone()
        .context("no access token configured (set HASS_TOKEN or pass --token)")?;
    let client = HassClient::new(
        &cfg.base_url,
        token,
        Duration::from_secs(cfg.request_timeout_secs),
    )?;
    Ok((store, cfg, client))
}

async fn identify(cli: &Cli, client: &HassClient) -> Result<User> {
    if cli.user_name.is_some() || cli.user_id.is_some() {
        return Ok(User {
            id: cli.user_id.clone().unwrap_or_default(),
            name: cli.user_name.clone().unwrap_or_default(),
            is_admin: false,
        });
    }
    client.current_user().await.context("identify current user")
}

fn print_outcome(outcome: &RunOutcome, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(outcome).context("serialize outcome json")?
        );
        return Ok(());
    }
    match outcome {
        RunOutcome::Refreshed(report) => {
            println!("Refreshed options: [{}]", report.options.join(", "));
            for h in &report.helpers {
                println!("  {} -> {}", h.entity_id, h.selected);
            }
            if report.failures() > 0 {
                println!(
                    "  {} call(s) failed; they will be retried on the next refresh",
                    report.failures()
                );
            }
        }
        RunOutcome::NoTarget { source_helper, .. } => {
            println!("No default dashboard resolved (expected {})", source_helper);
        }
        RunOutcome::Applied {
            target,
            enabled,
            source_helper,
            panel,
        } => {
            println!(
                "{} from {} (enabled={}, panel={:?})",
                target, source_helper, enabled, panel
            );
        }
    }
    Ok(())
}
