use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[derive(Debug, Clone)]
pub struct ProcessStats {
    pub cpu_usage: f32,
    pub memory_usage_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed_time: Duration,
}

/// 追蹤訓練各階段耗時；啟用 cli feature 時一併回報記憶體與 CPU。
pub struct PhaseMonitor {
    enabled: bool,
    start_time: Instant,
    phase_start: Instant,
    phases: Vec<(String, Duration)>,
    #[cfg(feature = "cli")]
    system: System,
    #[cfg(feature = "cli")]
    pid: Option<Pid>,
    peak_memory_mb: u64,
}

impl PhaseMonitor {
    pub fn new(enabled: bool) -> Self {
        let now = Instant::now();
        Self {
            enabled,
            start_time: now,
            phase_start: now,
            phases: Vec::new(),
            #[cfg(feature = "cli")]
            system: System::new_with_specifics(RefreshKind::everything()),
            #[cfg(feature = "cli")]
            pid: sysinfo::get_current_pid().ok(),
            peak_memory_mb: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Closes the running phase and starts timing the next one.
    pub fn finish_phase(&mut self, phase: &str) {
        let elapsed = self.phase_start.elapsed();
        self.phase_start = Instant::now();
        self.phases.push((phase.to_string(), elapsed));

        if !self.enabled {
            return;
        }

        match self.sample() {
            Some(stats) => tracing::info!(
                "📊 {} - {:?} (CPU: {:.1}%, Memory: {}MB, Peak: {}MB)",
                phase,
                elapsed,
                stats.cpu_usage,
                stats.memory_usage_mb,
                stats.peak_memory_mb
            ),
            None => tracing::info!("📊 {} - {:?}", phase, elapsed),
        }
    }

    pub fn phases(&self) -> &[(String, Duration)] {
        &self.phases
    }

    pub fn log_final_stats(&mut self) {
        if !self.enabled {
            return;
        }
        let total = self.start_time.elapsed();
        let _ = self.sample();
        tracing::info!(
            "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
            total,
            self.peak_memory_mb
        );
    }

    #[cfg(feature = "cli")]
    fn sample(&mut self) -> Option<ProcessStats> {
        let pid = self.pid?;
        self.system.refresh_all();
        let process = self.system.process(pid)?;
        let memory_mb = process.memory() / 1024 / 1024;
        self.peak_memory_mb = self.peak_memory_mb.max(memory_mb);

        Some(ProcessStats {
            cpu_usage: process.cpu_usage(),
            memory_usage_mb: memory_mb,
            peak_memory_mb: self.peak_memory_mb,
            elapsed_time: self.start_time.elapsed(),
        })
    }

    #[cfg(not(feature = "cli"))]
    fn sample(&mut self) -> Option<ProcessStats> {
        None
    }
}

impl Default for PhaseMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
