//! Process-tree discovery and teardown
//!
//! Descendants are found through a process table snapshot rather than the
//! process group, so helpers that moved to their own group (ssh control
//! masters, credential helpers) are still reached.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use sysinfo::{Pid, ProcessStatus, Signal, System};
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Take a fresh snapshot of the process table
pub fn snapshot() -> System {
    let mut system = System::new();
    system.refresh_processes();
    system
}

/// All descendants of `root`, nearest first
pub fn descendants(system: &System, root: u32) -> Vec<u32> {
    let mut children: HashMap<Pid, Vec<Pid>> = HashMap::new();
    for (pid, process) in system.processes() {
        if let Some(parent) = process.parent() {
            children.entry(parent).or_default().push(*pid);
        }
    }

    let root = Pid::from_u32(root);
    let mut seen = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);
    let mut found = Vec::new();

    while let Some(pid) = queue.pop_front() {
        for child in children.get(&pid).into_iter().flatten() {
            if seen.insert(*child) {
                found.push(child.as_u32());
                queue.push_back(*child);
            }
        }
    }

    found
}

/// Whether `pid` names a live (non-zombie) process in the snapshot
pub fn is_alive(system: &System, pid: u32) -> bool {
    system
        .process(Pid::from_u32(pid))
        .map(|process| !matches!(process.status(), ProcessStatus::Zombie | ProcessStatus::Dead))
        .unwrap_or(false)
}

fn send(system: &System, pid: u32, signal: Signal) -> bool {
    match system.process(Pid::from_u32(pid)) {
        // kill_with returns None where the signal does not exist (Windows)
        Some(process) => process.kill_with(signal).unwrap_or_else(|| process.kill()),
        None => false,
    }
}

/// Kill every descendant of `root`, leaving `root` itself alone
///
/// Descendants get a polite signal first. Any still alive after `grace`
/// are force-killed. Returns the pids that had to be force-killed.
pub async fn kill_descendants(root: u32, grace: Duration) -> Vec<u32> {
    let system = snapshot();
    let targets = descendants(&system, root);
    if targets.is_empty() {
        return Vec::new();
    }

    debug!(pid = root, count = targets.len(), "Terminating descendant processes");
    for pid in &targets {
        if !send(&system, *pid, Signal::Term) {
            debug!(pid = *pid, "Descendant already gone");
        }
    }

    let deadline = Instant::now() + grace;
    let mut survivors = targets;
    loop {
        let system = snapshot();
        survivors.retain(|pid| is_alive(&system, *pid));
        if survivors.is_empty() || Instant::now() >= deadline {
            break;
        }
        sleep(POLL_INTERVAL).await;
    }

    if !survivors.is_empty() {
        let system = snapshot();
        for pid in &survivors {
            warn!(pid = *pid, "Descendant ignored termination, force-killing");
            send(&system, *pid, Signal::Kill);
        }
    }

    survivors
}
