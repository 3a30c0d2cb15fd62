use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use plugin_sdk::application::{
    CacheInvalidator, ChangeDetector, CommitSerializer, EventSink, PipelineEvent, PipelineKind,
    Pipelines, RemoteSync, Severity, WatchRoute, WatchSession,
};
use plugin_sdk::domain::ports::SystemClock;
use plugin_sdk::infrastructure::{HttpPluginApi, LiveReloadNotifier, RsyncMirror, SvnClient};

use crate::cli::ConfigArgs;
use crate::commands::build::{build_skin, stylesheet_builder};
use crate::commands::project::{display_path, load_project, Project};
use crate::ui::context::UiContext;
use crate::ui::views::watch::{render_pipeline_event, render_watch_header, WatchHeader};

pub fn cmd_watch(args: &ConfigArgs, ui: &UiContext) -> Result<()> {
    let project = load_project(args, ui)?;
    let options = &project.options;

    if !ui.json {
        let plugin_dir = display_path(&project.paths.plugin_dir);
        print!(
            "{}",
            render_watch_header(
                &WatchHeader {
                    config: &options.name,
                    plugin_dir: &plugin_dir,
                    host: options.host.host.as_deref(),
                    auto_commit: options.auto_commit,
                    sync_to_remote: options.sync_to_remote,
                    live_reload: options.live_reload,
                },
                ui.color,
                ui.unicode,
            )
        );
    }

    build_skin(&project, false, ui)?;

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("failed to install the Ctrl+C handler")?;

    let on_event = event_printer(*ui);
    let pipelines = assemble_pipelines(&project, on_event)?;
    let routes = vec![
        WatchRoute::new(
            PipelineKind::Stylesheet,
            &[project.paths.stylesheet_glob()],
            &[],
        )?,
        WatchRoute::new(
            PipelineKind::Asset,
            &project.paths.asset_globs(),
            &project.paths.asset_ignore_globs(),
        )?,
    ];

    WatchSession::new(
        pipelines,
        routes,
        Duration::from_millis(options.debounce_ms),
        vec![project.paths.plugin_dir.clone()],
    )
    .start(running)?;

    Ok(())
}

/// Wire the configured stages into the two pipelines.
fn assemble_pipelines(project: &Project, on_event: EventSink) -> Result<Pipelines> {
    let options = &project.options;
    let paths = &project.paths;

    let plugin_api = HttpPluginApi::new(paths.plugin_reload_url.clone())?;
    let mut pipelines = Pipelines::new(
        options.hostname.clone(),
        CacheInvalidator::new(Arc::new(plugin_api)),
        on_event.clone(),
    )
    .with_stylesheet(stylesheet_builder(project));

    if options.check_file_changed {
        pipelines = pipelines.with_change_detector(ChangeDetector::new(Arc::new(SystemClock)));
    }
    if options.auto_commit {
        let commits =
            CommitSerializer::spawn(Arc::new(SvnClient::default()), options.ticket.clone(), on_event)?;
        pipelines = pipelines.with_commits(commits);
    }
    if options.sync_to_remote {
        pipelines = pipelines.with_remote_sync(RemoteSync::new(
            paths.plugin_segment.clone(),
            paths.server_plugins_custom.clone(),
            options.convert_local_sync_path.clone(),
            Arc::new(RsyncMirror::for_host(&options.host)),
        ));
    }
    if options.live_reload {
        pipelines =
            pipelines.with_live_reload(Arc::new(LiveReloadNotifier::new(options.live_reload_port)?));
    }

    Ok(pipelines)
}

fn event_printer(ui: UiContext) -> EventSink {
    Arc::new(move |event: PipelineEvent| {
        if ui.json {
            println!("{}", event.to_json());
            return;
        }
        if event.severity() == Severity::Debug && ui.verbose == 0 {
            return;
        }

        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        let rendered = render_pipeline_event(&timestamp, &event, ui.color, ui.unicode);
        match event.severity() {
            Severity::Error => eprint!("{rendered}"),
            _ => print!("{rendered}"),
        }
    })
}
