use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::info;

use sitefx_core::page::Diagnostic;
use sitefx_core::surface::{classes, landing_page, selectors};
use sitefx_core::{AppConfig, MemorySurface, Page, PageEvent, PageRuntime, RuntimeEvent, Surface};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Seed for progress increments and particle placement
    #[arg(long)]
    pub seed: Option<u64>,
    /// Smallest progress increment per tick
    #[arg(long)]
    pub increment_min: Option<f64>,
    /// Largest progress increment per tick
    #[arg(long)]
    pub increment_max: Option<f64>,
    /// Viewport width in pixels
    #[arg(long, default_value_t = 1280.0)]
    pub width: f64,
    /// Viewport height in pixels
    #[arg(long, default_value_t = 800.0)]
    pub height: f64,
    /// Scroll offsets to visit once content is revealed, in order
    #[arg(long = "scroll", value_name = "PX", num_args = 1..)]
    pub scroll: Vec<f64>,
    /// Milliseconds between scripted scrolls
    #[arg(long, default_value_t = 500)]
    pub spacing_ms: u64,
    /// Give up after this much page time
    #[arg(long, default_value_t = 60_000)]
    pub duration_ms: u64,
    /// Pace the page with the wall clock instead of jumping between timers
    #[arg(long)]
    pub realtime: bool,
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    seed: Option<u64>,
    realtime: bool,
    progress_ticks: u32,
    loading_complete_ms: Option<u64>,
    content_revealed_ms: Option<u64>,
    settled_ms: Option<u64>,
    scroll_y: f64,
    revealed: usize,
    reveal_total: usize,
    counters: Vec<String>,
    active_section: Option<String>,
    events: Vec<RuntimeEvent>,
    failures: Vec<Diagnostic>,
}

pub async fn run(mut config: AppConfig, args: SimulateArgs) -> Result<()> {
    if let Some(seed) = args.seed {
        config.loader.seed = Some(seed);
    }
    if let Some(min) = args.increment_min {
        config.loader.increment_min = min;
    }
    if let Some(max) = args.increment_max {
        config.loader.increment_max = max;
    }
    config.validate()?;
    if !(args.width > 0.0 && args.height > 0.0) {
        bail!("viewport must be positive, got {}x{}", args.width, args.height);
    }

    let seed = config.loader.seed;
    let page = Page::new(landing_page(args.width, args.height), config)?;
    let script: Vec<PageEvent> = args.scroll.iter().map(|y| PageEvent::ScrollTo(*y)).collect();
    let limit = Duration::from_millis(args.duration_ms);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let runtime = PageRuntime::new(page)
        .with_event_sender(tx)
        .with_script(script, Duration::from_millis(args.spacing_ms));

    info!(?seed, realtime = args.realtime, "Simulating page");
    let page = if args.realtime {
        run_realtime(runtime, limit).await
    } else {
        runtime.run_virtual(limit)
    };

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    let report = build_report(&page, events, seed, args.realtime);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Drive the page with tokio time until it settles, the limit passes or Ctrl-C
async fn run_realtime(runtime: PageRuntime<MemorySurface>, limit: Duration) -> Page<MemorySurface> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    // Input only arrives through the script
    let (_page_tx, page_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = tokio::time::sleep(limit) => {}
        }
        let _ = shutdown_tx.send(true);
    });

    let local = tokio::task::LocalSet::new();
    local
        .run_until(runtime.stop_when_settled(true).run(shutdown_rx, page_rx))
        .await
}

fn build_report(
    page: &Page<MemorySurface>,
    events: Vec<RuntimeEvent>,
    seed: Option<u64>,
    realtime: bool,
) -> SimulationReport {
    let surface = page.surface();
    let at = |want: fn(&RuntimeEvent) -> Option<u64>| events.iter().find_map(want);
    let reveal = surface.query(selectors::REVEAL).unwrap_or_default();
    let counters = surface
        .query(selectors::COUNTERS)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|id| surface.text(id).ok())
        .collect();
    let active_section = surface
        .query(selectors::NAV_LINKS)
        .unwrap_or_default()
        .into_iter()
        .find(|id| surface.has_class(*id, classes::ACTIVE))
        .and_then(|id| surface.attribute(id, "href"));

    SimulationReport {
        seed,
        realtime,
        progress_ticks: page.loader().progress_ticks(),
        loading_complete_ms: at(|e| match e {
            RuntimeEvent::LoadingComplete { at_ms, .. } => Some(*at_ms),
            _ => None,
        }),
        content_revealed_ms: at(|e| match e {
            RuntimeEvent::ContentRevealed { at_ms } => Some(*at_ms),
            _ => None,
        }),
        settled_ms: at(|e| match e {
            RuntimeEvent::Settled { at_ms } => Some(*at_ms),
            _ => None,
        }),
        scroll_y: surface.viewport().scroll_y,
        revealed: reveal.iter().filter(|id| surface.has_class(**id, classes::REVEALED)).count(),
        reveal_total: reveal.len(),
        counters,
        active_section,
        failures: page.diagnostics().to_vec(),
        events,
    }
}

fn print_report(report: &SimulationReport) {
    let ms = |v: Option<u64>| v.map_or_else(|| "-".to_string(), |v| format!("{} ms", v));

    println!("Simulation ({})", if report.realtime { "realtime" } else { "virtual time" });
    if let Some(seed) = report.seed {
        println!("  Seed:              {}", seed);
    }
    println!("  Progress ticks:    {}", report.progress_ticks);
    println!("  Loading complete:  {}", ms(report.loading_complete_ms));
    println!("  Content revealed:  {}", ms(report.content_revealed_ms));
    println!("  Settled:           {}", ms(report.settled_ms));
    println!("  Scroll position:   {:.0}", report.scroll_y);
    println!("  Revealed:          {}/{}", report.revealed, report.reveal_total);
    println!("  Counters:          {}", report.counters.join(", "));
    if let Some(section) = &report.active_section {
        println!("  Active section:    {}", section);
    }

    println!("\nEvents:");
    for event in &report.events {
        match event.to_json() {
            Ok(line) => println!("  {}", line),
            Err(e) => println!("  <unprintable event: {}>", e),
        }
    }

    if report.failures.is_empty() {
        println!("\nNo task failures.");
    } else {
        println!("\nTask failures ({}):", report.failures.len());
        for failure in &report.failures {
            println!("  [{} ms] {}: {}", failure.at_ms, failure.task, failure.error);
        }
    }
}
