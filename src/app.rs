use std::io::{self, Write};
use std::time::{Duration, Instant};

use tokio::io::AsyncBufRead;

use crate::action::{Action, parse_command};
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::system::collector::{Collector, Sample};
use crate::system::estimator::UtilizationEstimator;
use crate::system::kill::{KillResult, kill_process};
use crate::system::snapshot::{ProcessRow, SystemSnapshot};
use crate::ui::table::rank_rows;
use crate::ui::{self, theme::Theme};

const STATUS_TTL: Duration = Duration::from_secs(3);

pub struct App {
    pub running: bool,
    pub collector: Collector,
    pub estimator: UtilizationEstimator,
    /// Exactly one generation of history, replaced wholesale on refresh.
    pub previous: Sample,
    pub snapshot: SystemSnapshot,
    pub status_message: Option<(String, Instant)>,
    pub max_rows: usize,
    pub kill_grace: Duration,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let collector = Collector::new(&config.general.proc_root);
        Self::with_collector(collector, config)
    }

    /// Takes the baseline sample; the first `refresh_data` measures against it.
    pub fn with_collector(collector: Collector, config: &Config) -> Self {
        let previous = collector.sample();
        let estimator = UtilizationEstimator::new(previous.aggregate.cpu, collector.page_size());

        App {
            running: true,
            collector,
            estimator,
            previous,
            snapshot: SystemSnapshot::default(),
            status_message: None,
            max_rows: config.display.max_rows,
            kill_grace: Duration::from_millis(config.general.kill_grace_ms),
        }
    }

    pub fn refresh_data(&mut self) {
        let current = self.collector.sample();
        let estimate =
            self.estimator
                .estimate(&current.aggregate, &self.previous.processes, &current.processes);

        let rows: Vec<ProcessRow> = estimate
            .processes
            .into_iter()
            .map(|usage| ProcessRow {
                pid: usage.pid,
                name: self.collector.process_name(usage.pid),
                cpu_percent: usage.cpu_percent,
                mem_percent: usage.mem_percent,
            })
            .collect();

        self.snapshot = SystemSnapshot {
            cpu_usage_percent: estimate.cpu_usage_percent,
            memory_total_kb: estimate.memory_total_kb,
            memory_used_kb: estimate.memory_used_kb,
            rows: rank_rows(rows, self.max_rows),
        };
        self.previous = current;

        if let Some((_, created)) = &self.status_message
            && created.elapsed() >= STATUS_TTL
        {
            self.status_message = None;
        }
    }

    /// Apply a command. Returns a pause the caller should honor before the
    /// next sample (only after a successful kill).
    pub fn dispatch(&mut self, action: Action) -> Option<Duration> {
        match action {
            Action::Quit => {
                self.running = false;
                None
            }
            Action::Kill(pid) => {
                let result = kill_process(pid);
                let pause = matches!(result, KillResult::Success(..)).then_some(self.kill_grace);
                self.set_kill_status(result);
                pause
            }
            Action::InvalidPid(arg) => {
                self.set_status(format!("Invalid PID: {arg:?}"));
                None
            }
            Action::Unknown(line) => {
                self.set_status(format!("Unknown command: {line}"));
                None
            }
            Action::Refresh | Action::None => None,
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.status_message.as_ref().map(|(msg, _)| msg.as_str())
    }

    fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    fn set_kill_status(&mut self, result: KillResult) {
        let msg = match result {
            KillResult::Success(pid, signal) => format!("Sent {signal} to PID {pid}"),
            KillResult::Failed(_, err) => err,
        };
        self.set_status(msg);
    }
}

/// Drive the prompt loop until the user quits. The first frame waits one
/// full refresh interval after the baseline sample so its deltas cover a
/// whole interval.
pub async fn run_interactive<R, W>(
    app: &mut App,
    theme: &Theme,
    events: &mut EventHandler<R>,
    out: &mut W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    ui::draw_warmup(out, theme)?;
    tokio::time::sleep(events.tick_rate()).await;

    while app.running {
        app.refresh_data();
        ui::draw(out, &app.snapshot, theme, app.status())?;

        match events.next().await {
            Event::Line(line) => {
                let action = parse_command(&line);
                tracing::debug!(?action, "command");
                if let Some(pause) = app.dispatch(action) {
                    tokio::time::sleep(pause).await;
                }
            }
            Event::Tick => {}
        }
    }

    Ok(())
}
