//! Change watcher: drives [`PackageRegistry::reload`] from filesystem
//! modification events on the definition file.

use crate::registry::PackageRegistry;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Delay before re-establishing a broken watch.
const RETRY_DELAY: Duration = Duration::from_secs(2);
/// Buffered filesystem events. Only events touching the watched file are
/// queued, so overflow is harmless: any surviving event triggers a full
/// reload anyway.
const EVENT_BUFFER: usize = 16;

/// Watches the registry's definition file and reloads it on change.
///
/// Runs until the surrounding task is dropped. A failed reload keeps the
/// previous package set serving; a broken watch is re-established after
/// [`RETRY_DELAY`], so a watch failure only delays change pickup and
/// never affects already-loaded data.
pub async fn watch_packages(registry: Arc<PackageRegistry>) {
    loop {
        match watch_session(&registry).await {
            Ok(()) => warn!("Package list watch ended, re-establishing"),
            Err(e) => {
                error!(
                    error = %e,
                    "Package list watch failed, file changes will not be picked up until it recovers"
                );
            }
        }
        tokio::time::sleep(RETRY_DELAY).await;
    }
}

/// Runs one watch session; returns when the event stream breaks.
async fn watch_session(registry: &PackageRegistry) -> Result<(), notify::Error> {
    let file = registry.file().to_path_buf();
    // Watch the parent directory: editors and atomic writers replace the
    // file by rename, which invalidates a watch placed on the file itself.
    let dir = watch_root(&file);

    let (tx, mut rx) = mpsc::channel::<Result<Event, notify::Error>>(EVENT_BUFFER);
    // Filter in the callback: a burst of sibling-file events must not
    // crowd the one event touching the watched file out of the buffer.
    let watched = file.clone();
    let mut watcher = notify::recommended_watcher(move |event| {
        if should_queue(&event, &watched) {
            let _ = tx.try_send(event);
        }
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    info!(file = %file.display(), "Watching package list for changes");

    while let Some(event) = rx.recv().await {
        event?;
        match registry.reload() {
            Ok(count) => info!(packages = count, "Package list reloaded"),
            Err(e) => warn!(error = %e, "Package list reload failed, keeping previous packages"),
        }
    }

    Ok(())
}

fn watch_root(file: &Path) -> PathBuf {
    file.parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

fn should_queue(event: &Result<Event, notify::Error>, file: &Path) -> bool {
    match event {
        Ok(event) => touches_file(event, file),
        // Errors must reach the session loop so the watch is re-established.
        Err(_) => true,
    }
}

fn touches_file(event: &Event, file: &Path) -> bool {
    if !matches!(
        event.kind,
        EventKind::Any | EventKind::Create(_) | EventKind::Modify(_)
    ) {
        return false;
    }
    // Events carry absolute paths even for a relative watch root, so
    // match on the file name within the watched directory.
    event.paths.iter().any(|p| p == file || p.file_name() == file.file_name())
}
