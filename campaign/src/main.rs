//! Campaign engine binary entry point

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use campaign::services::{
    HttpCompletionClient, HttpNotifier, JsonlEngagementStore, NullNotifier, RemoteSurface,
    ScriptedSurface,
};
use campaign::traits::ActionSurface;
use campaign::CampaignOrchestrator;
use shared::{logging, CampaignConfig, RunPhase, UNATTENDED_AUTH_TIMEOUT_SECS};

#[derive(Parser)]
#[command(name = "campaign")]
#[command(about = "Automated engagement campaign engine")]
struct Args {
    /// Path to the campaign configuration file
    #[arg(long, default_value = "campaign_config.json")]
    config: PathBuf,

    /// Engagement store location
    #[arg(long, default_value = "engagements.jsonl")]
    store: PathBuf,

    /// Session driver endpoint for live runs
    #[arg(long, default_value = "http://127.0.0.1:4444")]
    driver_url: String,

    /// Dashboard notification endpoint
    #[arg(long)]
    notify_url: Option<String>,

    /// Run against a synthetic surface instead of a live session
    #[arg(long)]
    simulate: bool,

    /// Use the longer unattended authentication timeout
    #[arg(long)]
    unattended: bool,

    /// Write a default configuration file and exit
    #[arg(long)]
    init_config: bool,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    logging::init_tracing(args.log_level.as_deref());

    if args.init_config {
        campaign::config::save(&args.config, &CampaignConfig::default())
            .with_context(|| format!("writing {}", args.config.display()))?;
        println!("Wrote default configuration to {}", args.config.display());
        return Ok(());
    }

    let mut config =
        campaign::config::load(&args.config).with_context(|| "loading campaign configuration")?;
    if args.unattended {
        config.auth_timeout_secs = UNATTENDED_AUTH_TIMEOUT_SECS;
    }

    let api_key = std::env::var("GROQ_API_KEY")
        .or_else(|_| std::env::var("OPENAI_API_KEY"))
        .unwrap_or_default();
    if api_key.is_empty() {
        if args.simulate {
            tracing::warn!("⚠️ No API key set; generation will fall back per policy");
        } else {
            anyhow::bail!("Set GROQ_API_KEY (or OPENAI_API_KEY) to run a live campaign");
        }
    }
    let client = HttpCompletionClient::new(api_key);

    let store = JsonlEngagementStore::open(&args.store)
        .await
        .map_err(|e| anyhow::anyhow!("opening engagement store: {e}"))?;

    logging::log_startup(&format!(
        "campaign: {} sources, quota {}/day, style {}",
        config.sources.len(),
        config.targets.replies_per_day,
        config.style
    ));

    let summary = if args.simulate {
        let surface = ScriptedSurface::synthetic(8).with_humanized_pacing(true);
        run_campaign(config, surface, store, client, args.notify_url).await
    } else {
        let surface = RemoteSurface::new(args.driver_url);
        run_campaign(config, surface, store, client, args.notify_url).await
    };

    logging::log_shutdown(&format!("run finished in phase {}", summary.phase));
    if summary.phase == RunPhase::Aborted {
        anyhow::bail!(
            "campaign aborted: {}",
            summary.abort_reason.unwrap_or_else(|| "unknown".to_string())
        );
    }
    Ok(())
}

async fn run_campaign<S: ActionSurface + 'static>(
    config: CampaignConfig,
    surface: S,
    store: JsonlEngagementStore,
    client: HttpCompletionClient,
    notify_url: Option<String>,
) -> campaign::CampaignSummary {
    match notify_url {
        Some(url) => {
            let mut orchestrator = CampaignOrchestrator::new(
                config,
                surface,
                store,
                client,
                HttpNotifier::new(url, uuid::Uuid::new_v4()),
            );
            install_stop_handler(orchestrator.stop_flag());
            orchestrator.run().await
        }
        None => {
            let mut orchestrator =
                CampaignOrchestrator::new(config, surface, store, client, NullNotifier);
            install_stop_handler(orchestrator.stop_flag());
            orchestrator.run().await
        }
    }
}

/// Ctrl-C flips the cooperative stop flag; the loop finishes the in-flight
/// action and exits through the normal summary path.
fn install_stop_handler(flag: campaign::StopFlag) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("🛑 Stop requested, finishing current action...");
            flag.trigger();
        }
    });
}
