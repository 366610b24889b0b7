//! Watch source files and rebuild on change
//!
//! The parent directory of every watched file is watched, so saves that
//! rename a temporary file over the original keep triggering rebuilds.
//! Rebuilds run as a `build` child process. A [`RebuildGuard`] owned by the
//! watch loop drops events while a build is running and events that arrive
//! within one second of the previous trigger.

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Minimum time between two triggered builds
pub const DEBOUNCE: Duration = Duration::from_secs(1);

/// Busy flag plus debounce window, checked before every build
#[derive(Debug, Clone)]
pub struct RebuildGuard {
    window: Duration,
    building: bool,
    last_trigger: Option<Instant>,
}

impl RebuildGuard {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            building: false,
            last_trigger: None,
        }
    }

    /// Claim a build slot at `now`. Returns false if a build is running or
    /// the previous trigger is less than one window ago.
    pub fn try_start(&mut self, now: Instant) -> bool {
        if self.building {
            return false;
        }
        if let Some(last) = self.last_trigger {
            if now.saturating_duration_since(last) < self.window {
                return false;
            }
        }
        self.building = true;
        self.last_trigger = Some(now);
        true
    }

    /// Mark the running build as done
    pub fn finish(&mut self) {
        self.building = false;
    }

    pub fn is_building(&self) -> bool {
        self.building
    }
}

impl Default for RebuildGuard {
    fn default() -> Self {
        Self::new(DEBOUNCE)
    }
}

/// Runs `<program> --cwd <base_dir> build`
#[derive(Debug, Clone)]
pub struct BuildCommand {
    program: PathBuf,
    base_dir: PathBuf,
}

impl BuildCommand {
    pub fn new<P: AsRef<Path>, B: AsRef<Path>>(program: P, base_dir: B) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Build command that re-runs the current executable
    pub fn current<B: AsRef<Path>>(base_dir: B) -> Result<Self> {
        let program = std::env::current_exe().context("Cannot locate the current executable")?;
        Ok(Self::new(program, base_dir))
    }

    pub async fn run(&self) -> io::Result<ExitStatus> {
        tokio::process::Command::new(&self.program)
            .arg("--cwd")
            .arg(&self.base_dir)
            .arg("build")
            .status()
            .await
    }
}

/// Watch `paths` and run `build` when any of them changes
pub async fn watch_and_rebuild(paths: Vec<PathBuf>, build: BuildCommand) -> Result<()> {
    // The watcher stops delivering events once dropped
    let (_watcher, rx) = watch_directories(&paths)?;
    tracing::info!("Watching {} files for changes", paths.len());

    let build = Arc::new(build);
    rebuild_loop(rx, paths, RebuildGuard::default(), move || {
        let build = Arc::clone(&build);
        async move { build.run().await }
    })
    .await;

    Ok(())
}

/// Watch the existing parent directories of `paths`, forwarding every event
pub fn watch_directories(
    paths: &[PathBuf],
) -> Result<(RecommendedWatcher, mpsc::UnboundedReceiver<Event>)> {
    let (tx, rx) = mpsc::unbounded_channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            let _ = tx.send(event);
        }
        Err(e) => tracing::error!("Watch error: {:?}", e),
    })?;

    for dir in parent_dirs(paths) {
        if dir.is_dir() {
            watcher
                .watch(&dir, RecursiveMode::NonRecursive)
                .with_context(|| format!("Failed to watch {:?}", dir))?;
            tracing::debug!("Watching: {:?}", dir);
        } else {
            tracing::debug!("Not watching missing directory {:?}", dir);
        }
    }

    Ok((watcher, rx))
}

/// Parent directories of `paths`, deduplicated in first-seen order
fn parent_dirs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    for path in paths {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    dirs
}

/// Consume change events until the channel closes, starting builds the guard
/// allows for events that touch one of `targets`. Returns the number of
/// builds started.
pub async fn rebuild_loop<F, Fut>(
    mut events: mpsc::UnboundedReceiver<Event>,
    targets: Vec<PathBuf>,
    mut guard: RebuildGuard,
    build: F,
) -> usize
where
    F: Fn() -> Fut,
    Fut: Future<Output = io::Result<ExitStatus>> + Send + 'static,
{
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    let mut started = 0;

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                if !is_change(&event, &targets) {
                    continue;
                }

                for path in event.paths.iter().filter(|p| targets.contains(p)) {
                    println!("📝 File changed: {}", path.display());
                }

                if !guard.try_start(Instant::now()) {
                    tracing::debug!("Build running or debounced, ignoring change");
                    continue;
                }

                println!("🔄 Rebuilding...");
                started += 1;
                let done_tx = done_tx.clone();
                let fut = build();
                tokio::spawn(async move {
                    let _ = done_tx.send(fut.await);
                });
            }
            Some(result) = done_rx.recv() => {
                guard.finish();
                report(result);
            }
        }
    }

    started
}

/// Only content changes to one of `targets` trigger a rebuild
fn is_change(event: &Event, targets: &[PathBuf]) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|path| targets.contains(path))
}

fn report(result: io::Result<ExitStatus>) {
    match result {
        Ok(status) if status.success() => println!("✅ Rebuilt successfully!"),
        Ok(status) => match status.code() {
            Some(code) => tracing::error!("Build failed with exit code {}", code),
            None => tracing::error!("Build terminated by signal ({})", status),
        },
        Err(e) => tracing::error!("Failed to run build: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, ModifyKind, RenameMode};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_guard_busy_flag() {
        let mut guard = RebuildGuard::new(DEBOUNCE);
        let t0 = Instant::now();

        assert!(guard.try_start(t0));
        assert!(guard.is_building());
        // Second event 200ms later while the first build runs
        assert!(!guard.try_start(t0 + Duration::from_millis(200)));
        // Still building well past the window
        assert!(!guard.try_start(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn test_guard_debounce_window() {
        let mut guard = RebuildGuard::new(DEBOUNCE);
        let t0 = Instant::now();

        assert!(guard.try_start(t0));
        guard.finish();
        assert!(!guard.try_start(t0 + Duration::from_millis(200)));
        assert!(!guard.try_start(t0 + Duration::from_millis(999)));
        assert!(guard.try_start(t0 + Duration::from_millis(1001)));
    }

    #[test]
    fn test_rejected_event_does_not_move_window() {
        let mut guard = RebuildGuard::new(DEBOUNCE);
        let t0 = Instant::now();

        assert!(guard.try_start(t0));
        guard.finish();
        assert!(!guard.try_start(t0 + Duration::from_millis(900)));
        assert!(guard.try_start(t0 + Duration::from_millis(1100)));
    }

    fn targets() -> Vec<PathBuf> {
        vec![PathBuf::from("a/README.md")]
    }

    fn change(path: &str) -> Event {
        Event::new(EventKind::Modify(ModifyKind::Any)).add_path(path.into())
    }

    #[test]
    fn test_is_change() {
        assert!(is_change(&change("a/README.md"), &targets()));
        assert!(!is_change(
            &Event::new(EventKind::Access(AccessKind::Any)).add_path("a/README.md".into()),
            &targets()
        ));
        // Editor temp files next to a watched file
        assert!(!is_change(&change("a/.README.md.swp"), &targets()));
        assert!(!is_change(&change("a/4913"), &targets()));
        // Rename over the watched file reports both paths
        let rename = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path("a/README.md.tmp".into())
            .add_path("a/README.md".into());
        assert!(is_change(&rename, &targets()));
    }

    #[test]
    fn test_parent_dirs() {
        let paths = vec![
            PathBuf::from("/site/_config.yml"),
            PathBuf::from("/site/a/README.md"),
            PathBuf::from("/site/tailwind.config.js"),
            PathBuf::from("notes.md"),
        ];
        assert_eq!(
            parent_dirs(&paths),
            vec![
                PathBuf::from("/site"),
                PathBuf::from("/site/a"),
                PathBuf::from("."),
            ]
        );
    }

    #[cfg(unix)]
    fn success() -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(0)
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_events_during_build_trigger_one_rebuild() {
        let (tx, rx) = mpsc::unbounded_channel();
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&runs);
        let handle = tokio::spawn(rebuild_loop(rx, targets(), RebuildGuard::default(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                Ok::<_, io::Error>(success())
            }
        }));

        tx.send(change("a/README.md")).unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        tx.send(change("a/README.md")).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(tx);

        let started = handle.await.unwrap();
        assert_eq!(started, 1);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_build_keeps_watching() {
        use std::os::unix::process::ExitStatusExt;

        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(rebuild_loop(
            rx,
            targets(),
            RebuildGuard::new(Duration::ZERO),
            || async { Ok::<_, io::Error>(ExitStatus::from_raw(1 << 8)) },
        ));

        tx.send(change("a/README.md")).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(change("a/README.md")).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(tx);

        assert_eq!(handle.await.unwrap(), 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_rename_over_file_keeps_triggering() {
        let tmp = tempfile::tempdir().unwrap();
        let post_dir = tmp.path().canonicalize().unwrap().join("a");
        std::fs::create_dir(&post_dir).unwrap();
        let document = post_dir.join("README.md");
        std::fs::write(&document, "# A\n").unwrap();

        let paths = vec![document.clone()];
        let (watcher, rx) = watch_directories(&paths).unwrap();
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&runs);
        let handle = tokio::spawn(rebuild_loop(
            rx,
            paths,
            RebuildGuard::new(Duration::from_millis(250)),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, io::Error>(success()) }
            },
        ));

        for save in 0..3 {
            tokio::time::sleep(Duration::from_millis(600)).await;
            let temp = post_dir.join("README.md.tmp");
            std::fs::write(&temp, format!("# A\n\nSave {}\n", save)).unwrap();
            std::fs::rename(&temp, &document).unwrap();
        }
        tokio::time::sleep(Duration::from_millis(600)).await;

        handle.abort();
        drop(watcher);
        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }
}
