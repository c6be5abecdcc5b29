// filepath: src/image_watch.rs
use calloop::channel::Sender;
use notify::{event::ModifyKind, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;

/// Notify `tx` whenever a file appears in, leaves, or is renamed inside `dir`
pub fn setup_image_watcher(
    dir: &Path,
    tx: Sender<()>,
) -> Result<RecommendedWatcher, notify::Error> {
    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: notify::Result<notify::Event>| {
            if let Ok(event) = res {
                if changes_listing(&event.kind) {
                    let _ = tx.send(());
                }
            }
        },
        notify::Config::default(),
    )?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

fn changes_listing(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(_))
    )
}
