//! demo - drive the simulated live monitor from the terminal

use anyhow::{anyhow, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use safety_monitor::alerts::DEMO_DISCLAIMER;
use safety_monitor::config::parse_channels;
use safety_monitor::incidents::{demo_chart, demo_incidents, latest_incidents, IncidentRow};
use safety_monitor::ui::{Ui, UiMode};
use safety_monitor::{
    CategoryCount, LiveMonitor, MonitorConfig, Notification, NotificationSink, OverlayRect,
};

const DEFAULT_ZONE: &str = "Line A";
const POLL_CEILING: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of detections to simulate.
    #[arg(long, default_value_t = 12)]
    ticks: u64,
    /// Wait the configured interval between ticks instead of ticking immediately.
    #[arg(long)]
    realtime: bool,
    /// Deterministic simulator seed.
    #[arg(long, env = "MONITOR_SEED")]
    seed: Option<u64>,
    /// Tick interval in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Enabled alert channels, comma separated (email,slack,whatsapp). Empty disables all.
    #[arg(long)]
    channels: Option<String>,
    /// Camera device URL (stub://NAME, denied://NAME, none://).
    #[arg(long)]
    camera: Option<String>,
    /// Output style: auto, plain, pretty.
    #[arg(long, default_value = "auto")]
    ui: String,
    /// Simulate even when the config file disables simulation.
    #[arg(long)]
    simulate: bool,
    /// Print the final panel snapshot as JSON on stdout.
    #[arg(long)]
    json: bool,
}

/// Logs each notification and counts them.
struct DemoSink {
    sent: Arc<AtomicU64>,
}

impl NotificationSink for DemoSink {
    fn notify(&mut self, notification: &Notification) {
        log::info!("{}", notification);
        self.sent.fetch_add(1, Ordering::Relaxed);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mode: UiMode = args.ui.parse()?;
    let ui = Ui::new(mode, std::io::stderr().is_terminal());

    let cfg = {
        let _stage = ui.stage("load config");
        let mut cfg = MonitorConfig::load()?;
        if let Some(seed) = args.seed {
            cfg.simulation.seed = Some(seed);
        }
        if let Some(ms) = args.interval_ms {
            cfg.simulation.interval = Duration::from_millis(ms);
        }
        if let Some(channels) = args.channels.as_deref() {
            cfg.alerts = parse_channels(channels)?;
        }
        if let Some(url) = args.camera.clone() {
            cfg.camera.url = url;
        }
        if args.simulate {
            cfg.simulation.enabled = true;
        }
        cfg.validate()?;
        cfg
    };
    if !cfg.simulation.enabled {
        log::warn!("simulation disabled by config; pass --simulate to generate detections");
    }

    let sent = Arc::new(AtomicU64::new(0));
    let mut monitor = LiveMonitor::from_config(&cfg)?.with_sink(DemoSink {
        sent: sent.clone(),
    });

    {
        let _stage = ui.stage("activate panel");
        monitor.activate(Instant::now());
        if let Some(placeholder) = monitor.camera_status().placeholder() {
            log::warn!("{}", placeholder);
        }
    }

    {
        let _stage = ui.stage("simulate detections");
        let progress = ui.ticks(args.ticks);
        if args.realtime {
            let running = Arc::new(AtomicBool::new(true));
            let handler_flag = running.clone();
            ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))
                .map_err(|e| anyhow!("error setting Ctrl-C handler: {}", e))?;

            let mut produced = 0u64;
            while monitor.is_simulating()
                && produced < args.ticks
                && running.load(Ordering::SeqCst)
            {
                let now = Instant::now();
                if let Some(detection) = monitor.poll(now) {
                    produced += 1;
                    progress.tick(detection.category().label());
                    continue;
                }
                let wait = monitor
                    .time_until_next_tick(now)
                    .unwrap_or(POLL_CEILING)
                    .min(POLL_CEILING);
                std::thread::sleep(wait);
            }
            if !running.load(Ordering::SeqCst) {
                log::info!("interrupted after {} ticks", produced);
            }
        } else {
            for _ in 0..args.ticks {
                if let Some(detection) = monitor.tick() {
                    progress.tick(detection.category().label());
                }
            }
        }
        progress.finish();
    }

    let snapshot = monitor.snapshot(cfg.viewport);
    monitor.shutdown();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("live monitor summary:");
    println!("  notifications: {}", sent.load(Ordering::Relaxed));
    println!("  alert channels: {}", snapshot.channel_summary);
    println!(
        "  camera: {}",
        snapshot
            .placeholder
            .as_deref()
            .unwrap_or("live feed available")
    );
    println!("overlays ({}x{}):", cfg.viewport.width, cfg.viewport.height);
    print_overlays(&snapshot.overlay);

    let rows = latest_incidents(monitor.event_log(), DEFAULT_ZONE, 4);
    if rows.is_empty() {
        println!("latest incidents (demo data):");
        print_incidents(&demo_incidents());
        println!("incidents by type (demo data):");
        print_counts(&demo_chart());
    } else {
        println!("latest incidents:");
        print_incidents(&rows);
        println!("incidents by type (last {} events):", monitor.event_log().len());
        print_counts(&snapshot.counts);
    }
    println!("{}", DEMO_DISCLAIMER);
    Ok(())
}

fn print_overlays(rects: &[OverlayRect]) {
    for rect in rects {
        println!(
            "  {:<15} left={:>5.1}% top={:>5.1}% w={:>5.1}% h={:>5.1}% px=({:.0},{:.0} {:.0}x{:.0}){}",
            rect.label,
            rect.percent.left,
            rect.percent.top,
            rect.percent.width,
            rect.percent.height,
            rect.pixels.left,
            rect.pixels.top,
            rect.pixels.width,
            rect.pixels.height,
            if rect.overflows() { " [off-canvas]" } else { "" }
        );
    }
}

fn print_incidents(rows: &[IncidentRow]) {
    println!("  {:<6} {:<15} {:<13} Severity", "Time", "Type", "Zone");
    for row in rows {
        println!(
            "  {:<6} {:<15} {:<13} {}",
            row.time,
            row.label(),
            row.zone,
            row.severity
        );
    }
}

fn print_counts(counts: &[CategoryCount]) {
    for count in counts {
        println!("  {:<7} {}", count.name, count.count);
    }
}
