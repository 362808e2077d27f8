use iced::widget::canvas::Canvas;
use iced::widget::{
    button, column, container, progress_bar, row, scrollable, text, text_input, Column, Row,
    Space,
};
use iced::keyboard;
use iced::{Alignment, Background, Border, Color, Element, Font, Length, Shadow, Subscription, Theme, Vector};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::chart::LineChart;
use crate::connections::{self, ConnectionInfo};
use crate::metrics::{self, status_name, Collector, DiskInfo, PerfSample, ProcessInfo};
use crate::packages::{self, PackageInfo};
use crate::perflog;
use crate::procdetail;
use crate::ringbuf::RingBuffer;
use crate::runner::{CommandRunner, RunnerEvent};
use crate::sensors;
use crate::services::{self, ServiceAction, ServiceUnit};
use crate::settings::Settings;
use crate::theme::{build_palette, Palette, ThemeVariant};

/// Fire-and-forget desktop notification.
fn send_notification(title: &str, body: &str) {
    let _ = notify_rust::Notification::new()
        .summary(title)
        .body(body)
        .appname("Warden")
        .timeout(notify_rust::Timeout::Milliseconds(5000))
        .show();
}

// ─── REFRESH CADENCES ───────────────────────────────────────────
const PERF_TICK_MS: u64 = 1500;
const PROCESS_TICK_SECS: u64 = 3;
const NET_SENSORS_TICK_SECS: u64 = 5;
const DISK_TICK_SECS: u64 = 20;
const SERVICE_TICK_SECS: u64 = 30;
const CONSOLE_POLL_MS: u64 = 100;

const PERF_HISTORY: usize = 50;
/// Service state settles shortly after systemctl is launched; the list is
/// re-read once this delay has elapsed rather than waiting for the command
/// to finish.
const SERVICES_RELOAD_DELAY: Duration = Duration::from_secs(2);

// ─── TABS ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Processes,
    Performance,
    Network,
    Services,
    Hardware,
    Packages,
    Disks,
    About,
}

impl Tab {
    const ALL: &[Tab] = &[
        Tab::Processes,
        Tab::Performance,
        Tab::Network,
        Tab::Services,
        Tab::Hardware,
        Tab::Packages,
        Tab::Disks,
        Tab::About,
    ];

    fn label(&self) -> &'static str {
        match self {
            Tab::Processes => "Processes",
            Tab::Performance => "Performance",
            Tab::Network => "Network",
            Tab::Services => "Services",
            Tab::Hardware => "Hardware",
            Tab::Packages => "Packages",
            Tab::Disks => "Disks",
            Tab::About => "About",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessSort {
    Pid,
    Name,
    User,
    Cpu,
    Memory,
}

// ─── PROCESS SIGNALS ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessSignal {
    Terminate,
    Kill,
    Suspend,
    Resume,
}

impl ProcessSignal {
    const ALL: &[ProcessSignal] = &[
        ProcessSignal::Terminate,
        ProcessSignal::Kill,
        ProcessSignal::Suspend,
        ProcessSignal::Resume,
    ];

    fn label(&self) -> &'static str {
        match self {
            ProcessSignal::Terminate => "Terminate",
            ProcessSignal::Kill => "Kill",
            ProcessSignal::Suspend => "Suspend",
            ProcessSignal::Resume => "Resume",
        }
    }

    fn signal_name(&self) -> &'static str {
        match self {
            ProcessSignal::Terminate => "SIGTERM",
            ProcessSignal::Kill => "SIGKILL",
            ProcessSignal::Suspend => "SIGSTOP",
            ProcessSignal::Resume => "SIGCONT",
        }
    }

    fn signo(&self) -> i32 {
        match self {
            ProcessSignal::Terminate => libc::SIGTERM,
            ProcessSignal::Kill => libc::SIGKILL,
            ProcessSignal::Suspend => libc::SIGSTOP,
            ProcessSignal::Resume => libc::SIGCONT,
        }
    }
}

// ─── CONFIRMATIONS ──────────────────────────────────────────────

/// An action that waits for the user to confirm before it runs.
#[derive(Debug, Clone)]
enum PendingAction {
    Signal {
        pid: u32,
        name: String,
        signal: ProcessSignal,
    },
    Service {
        unit: String,
        action: ServiceAction,
    },
    Upgrade(String),
    Remove(String),
}

impl PendingAction {
    fn prompt(&self) -> String {
        match self {
            PendingAction::Signal { pid, name, signal } => {
                format!("Send {} to '{}' (PID {})?", signal.signal_name(), name, pid)
            }
            PendingAction::Service { unit, action } => {
                format!("Really {} '{}'?", action.verb(), unit)
            }
            PendingAction::Upgrade(package) => {
                format!("Upgrade package '{package}'? This runs apt-get install --only-upgrade.")
            }
            PendingAction::Remove(package) => {
                format!("Remove package '{package}'? This runs apt-get remove.")
            }
        }
    }
}

/// One drill-down view in the process details pane.
enum DetailView {
    None,
    OpenFiles(Result<Vec<procdetail::OpenFile>, String>),
    Syscalls(String),
    Package(String),
}

/// A running (or finished) administrative command whose output streams
/// into the console overlay.
struct Console {
    runner: CommandRunner,
    lines: Vec<String>,
    done: bool,
}

// ─── MESSAGES ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Message {
    PerfTick,
    ProcessTick,
    NetSensorsTick,
    DiskTick,
    ServiceTick,
    ConsolePoll,
    TabSelected(Tab),
    ProcessFilterChanged(String),
    SortBy(ProcessSort),
    ProcessSelected(u32),
    SignalRequested(ProcessSignal),
    ShowOpenFiles,
    ShowSyscalls,
    ShowOwningPackage,
    SaveSnapshot,
    ServiceSelected(String),
    ServiceActionRequested(ServiceAction),
    ReloadServices,
    PackageFilterChanged(String),
    PackageSelected(String),
    UpdatePackageLists,
    UpgradePackage,
    RemovePackage,
    ReloadPackages,
    CloseConsole,
    Confirm,
    CancelPending,
    ToggleSettings,
    SetTheme(ThemeVariant),
    KeyPressed(keyboard::Key, keyboard::Modifiers),
}

// ─── APPLICATION STATE ──────────────────────────────────────────

pub struct Warden {
    collector: Collector,
    settings: Settings,
    pal: Palette,
    tab: Tab,
    is_root: bool,

    processes: Vec<ProcessInfo>,
    process_filter: String,
    process_sort: ProcessSort,
    process_sort_asc: bool,
    selected_pid: Option<u32>,
    detail: DetailView,

    perf: PerfSample,
    cpu_history: RingBuffer<f32>,
    mem_history: RingBuffer<f32>,
    swap_history: RingBuffer<f32>,

    connections: Vec<ConnectionInfo>,
    sensors_text: String,

    services: Vec<ServiceUnit>,
    selected_unit: Option<String>,
    services_reload_at: Option<Instant>,

    packages: Vec<PackageInfo>,
    package_filter: String,
    selected_package: Option<String>,

    disks: Vec<DiskInfo>,

    console: Option<Console>,
    pending: Option<PendingAction>,
    show_settings: bool,
    status_message: Option<String>,
}

impl Warden {
    pub fn new() -> Self {
        let settings = Settings::load();
        let pal = build_palette(settings.theme);

        // SAFETY: geteuid() is a POSIX syscall that reads the effective
        // user ID of this process. It has no side effects and cannot fail.
        let is_root = unsafe { libc::geteuid() } == 0;

        let mut collector = Collector::new();
        let perf = collector.collect_perf();
        let mut cpu_history = RingBuffer::new(PERF_HISTORY);
        let mut mem_history = RingBuffer::new(PERF_HISTORY);
        let mut swap_history = RingBuffer::new(PERF_HISTORY);
        cpu_history.push(perf.cpu_pct);
        mem_history.push(perf.mem_pct);
        swap_history.push(perf.swap_pct);

        let processes = collector.collect_processes();
        let disks = collector.collect_disks();
        let connections = connections::list_connections();
        let sensors_text = sensors::fetch();

        let services = if is_root {
            services::list_services().unwrap_or_else(|e| {
                eprintln!("[warden] Failed to list services: {e}");
                Vec::new()
            })
        } else {
            Vec::new()
        };
        let packages = packages::list_packages().unwrap_or_else(|e| {
            eprintln!("[warden] Failed to list packages: {e}");
            Vec::new()
        });

        let status_message = if is_root {
            None
        } else {
            Some("Running without root: service and package management is disabled.".to_string())
        };

        Self {
            collector,
            settings,
            pal,
            tab: Tab::Processes,
            is_root,
            processes,
            process_filter: String::new(),
            process_sort: ProcessSort::Cpu,
            process_sort_asc: false,
            selected_pid: None,
            detail: DetailView::None,
            perf,
            cpu_history,
            mem_history,
            swap_history,
            connections,
            sensors_text,
            services,
            selected_unit: None,
            services_reload_at: None,
            packages,
            package_filter: String::new(),
            selected_package: None,
            disks,
            console: None,
            pending: None,
            show_settings: false,
            status_message,
        }
    }

    pub fn title(&self) -> String {
        String::from("Warden")
    }

    pub fn theme(&self) -> Theme {
        if self.settings.theme.is_light() { Theme::Light } else { Theme::Dark }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let perf = iced::time::every(Duration::from_millis(PERF_TICK_MS))
            .map(|_| Message::PerfTick);
        let procs = iced::time::every(Duration::from_secs(PROCESS_TICK_SECS))
            .map(|_| Message::ProcessTick);
        let net = iced::time::every(Duration::from_secs(NET_SENSORS_TICK_SECS))
            .map(|_| Message::NetSensorsTick);
        let disks = iced::time::every(Duration::from_secs(DISK_TICK_SECS))
            .map(|_| Message::DiskTick);
        let units = iced::time::every(Duration::from_secs(SERVICE_TICK_SECS))
            .map(|_| Message::ServiceTick);
        let keys = keyboard::on_key_press(|key, modifiers| {
            Some(Message::KeyPressed(key, modifiers))
        });

        let mut subs = vec![perf, procs, net, disks, units, keys];
        if self.console.is_some() || self.services_reload_at.is_some() {
            subs.push(
                iced::time::every(Duration::from_millis(CONSOLE_POLL_MS))
                    .map(|_| Message::ConsolePoll),
            );
        }
        Subscription::batch(subs)
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::PerfTick => {
                let sample = self.collector.collect_perf();
                self.cpu_history.push(sample.cpu_pct);
                self.mem_history.push(sample.mem_pct);
                self.swap_history.push(sample.swap_pct);
                self.perf = sample;
            }
            Message::ProcessTick => {
                self.processes = self.collector.collect_processes();
                // Drop the selection when the process has exited.
                if let Some(pid) = self.selected_pid {
                    if !self.processes.iter().any(|p| p.pid == pid) {
                        self.selected_pid = None;
                        self.detail = DetailView::None;
                    }
                }
            }
            Message::NetSensorsTick => {
                self.connections = connections::list_connections();
                self.sensors_text = sensors::fetch();
            }
            Message::DiskTick => {
                self.disks = self.collector.collect_disks();
            }
            Message::ServiceTick => {
                self.reload_services();
            }
            Message::ConsolePoll => {
                if let Some(console) = &mut self.console {
                    for event in console.runner.poll() {
                        match event {
                            RunnerEvent::Line(line) => console.lines.push(line),
                            RunnerEvent::Finished(code) => {
                                console.done = true;
                                console.lines.push(String::new());
                                console.lines.push(match code {
                                    Some(code) => {
                                        format!("--- command finished (exit code {code}) ---")
                                    }
                                    None => "--- command terminated by a signal ---".to_string(),
                                });
                                send_notification("Warden", "The command has finished.");
                            }
                            RunnerEvent::Failed(err) => {
                                console.done = true;
                                console.lines.push(format!("--- failed to run command: {err} ---"));
                            }
                        }
                    }
                }
                if let Some(at) = self.services_reload_at {
                    if Instant::now() >= at {
                        self.services_reload_at = None;
                        self.reload_services();
                    }
                }
            }
            Message::TabSelected(tab) => {
                self.tab = tab;
            }
            Message::ProcessFilterChanged(filter) => {
                self.process_filter = filter;
            }
            Message::SortBy(col) => {
                if self.process_sort == col {
                    self.process_sort_asc = !self.process_sort_asc;
                } else {
                    self.process_sort = col;
                    self.process_sort_asc = false;
                }
            }
            Message::ProcessSelected(pid) => {
                if self.selected_pid != Some(pid) {
                    self.selected_pid = Some(pid);
                    self.detail = DetailView::None;
                }
            }
            Message::SignalRequested(signal) => {
                let pending = match self.selected_process() {
                    Some(proc) => PendingAction::Signal {
                        pid: proc.pid,
                        name: proc.name.clone(),
                        signal,
                    },
                    None => {
                        self.status_message = Some("Select a process first.".to_string());
                        return;
                    }
                };
                self.pending = Some(pending);
            }
            Message::ShowOpenFiles => {
                let Some(pid) = self.selected_pid else { return };
                self.detail = DetailView::OpenFiles(procdetail::open_files(pid));
            }
            Message::ShowSyscalls => {
                let Some(pid) = self.selected_pid else { return };
                if !self.require_root("Tracing syscalls") {
                    return;
                }
                // Blocks for up to ten seconds while strace samples the
                // target; the window redraws when the summary is back.
                self.detail = DetailView::Syscalls(procdetail::strace_summary(pid));
            }
            Message::ShowOwningPackage => {
                let Some(pid) = self.selected_pid else { return };
                let exe = self.collector.exe_of(pid);
                self.detail =
                    DetailView::Package(procdetail::package_of(exe.as_deref().map(Path::new)));
            }
            Message::SaveSnapshot => {
                self.status_message =
                    Some(match perflog::append_snapshot(self.perf.cpu_pct, self.perf.mem_pct) {
                        Ok(path) => format!("Snapshot appended to {}", path.display()),
                        Err(e) => format!("Could not write performance log: {e}"),
                    });
            }
            Message::ServiceSelected(unit) => {
                self.selected_unit = Some(unit);
            }
            Message::ServiceActionRequested(action) => {
                if !self.require_root("Managing services") {
                    return;
                }
                let Some(unit) = self.selected_unit.clone() else {
                    self.status_message = Some("Select a service first.".to_string());
                    return;
                };
                self.pending = Some(PendingAction::Service { unit, action });
            }
            Message::ReloadServices => {
                self.reload_services();
            }
            Message::PackageFilterChanged(filter) => {
                self.package_filter = filter;
            }
            Message::PackageSelected(name) => {
                self.selected_package = Some(name);
            }
            Message::UpdatePackageLists => {
                if !self.require_root("Updating package lists") {
                    return;
                }
                let (program, args) = packages::update_command();
                self.open_console(program, &args);
            }
            Message::UpgradePackage => {
                if !self.require_root("Upgrading packages") {
                    return;
                }
                let Some(package) = self.selected_package.clone() else {
                    self.status_message = Some("Select a package first.".to_string());
                    return;
                };
                self.pending = Some(PendingAction::Upgrade(package));
            }
            Message::RemovePackage => {
                if !self.require_root("Removing packages") {
                    return;
                }
                let Some(package) = self.selected_package.clone() else {
                    self.status_message = Some("Select a package first.".to_string());
                    return;
                };
                self.pending = Some(PendingAction::Remove(package));
            }
            Message::ReloadPackages => {
                self.reload_packages();
            }
            Message::CloseConsole => {
                if self.console.as_ref().is_some_and(|c| c.done) {
                    self.console = None;
                }
            }
            Message::Confirm => {
                let Some(action) = self.pending.take() else { return };
                match action {
                    PendingAction::Signal { pid, name, signal } => {
                        // SAFETY: kill(2) is a standard POSIX syscall; the
                        // signal number comes from a fixed table and the pid
                        // from the current process list. A stale pid yields
                        // ESRCH, reported below.
                        let rc = unsafe { libc::kill(pid as i32, signal.signo()) };
                        self.status_message = Some(if rc == 0 {
                            format!("Sent {} to '{}' (PID {pid})", signal.signal_name(), name)
                        } else {
                            format!(
                                "Could not signal PID {pid} (it may have exited or belong to another user)"
                            )
                        });
                    }
                    PendingAction::Service { unit, action } => {
                        let (program, args) = services::service_command(action, &unit);
                        self.open_console(program, &args);
                        self.services_reload_at = Some(Instant::now() + SERVICES_RELOAD_DELAY);
                    }
                    PendingAction::Upgrade(package) => {
                        let (program, args) = packages::upgrade_command(&package);
                        self.open_console(program, &args);
                    }
                    PendingAction::Remove(package) => {
                        let (program, args) = packages::remove_command(&package);
                        self.open_console(program, &args);
                    }
                }
            }
            Message::CancelPending => {
                self.pending = None;
            }
            Message::ToggleSettings => {
                self.show_settings = !self.show_settings;
            }
            Message::SetTheme(variant) => {
                self.settings.theme = variant;
                self.pal = build_palette(variant);
                self.settings.save();
            }
            Message::KeyPressed(key, _modifiers) => {
                use keyboard::key::Named;
                match key {
                    keyboard::Key::Named(Named::Escape) => {
                        if self.console.as_ref().is_some_and(|c| c.done) {
                            self.console = None;
                        } else if self.pending.is_some() {
                            self.pending = None;
                        } else if self.show_settings {
                            self.show_settings = false;
                        }
                    }
                    // Tab navigation: 1-8 for tabs, when no overlay is up.
                    keyboard::Key::Character(ref c)
                        if self.console.is_none()
                            && self.pending.is_none()
                            && !self.show_settings =>
                    {
                        match c.as_str() {
                            "1" => self.tab = Tab::Processes,
                            "2" => self.tab = Tab::Performance,
                            "3" => self.tab = Tab::Network,
                            "4" => self.tab = Tab::Services,
                            "5" => self.tab = Tab::Hardware,
                            "6" => self.tab = Tab::Packages,
                            "7" => self.tab = Tab::Disks,
                            "8" => self.tab = Tab::About,
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    /// Checks the effective user before a privileged action; refuses with a
    /// status message instead of letting the command fail downstream.
    fn require_root(&mut self, action: &str) -> bool {
        if self.is_root {
            return true;
        }
        self.status_message = Some(format!("{action} requires root. Restart Warden with sudo."));
        false
    }

    fn selected_process(&self) -> Option<&ProcessInfo> {
        self.selected_pid
            .and_then(|pid| self.processes.iter().find(|p| p.pid == pid))
    }

    fn open_console(&mut self, program: &str, args: &[String]) {
        self.console = Some(Console {
            runner: CommandRunner::spawn(program, args),
            lines: Vec::new(),
            done: false,
        });
    }

    fn reload_services(&mut self) {
        if !self.is_root {
            return;
        }
        match services::list_services() {
            Ok(units) => self.services = units,
            Err(e) => {
                eprintln!("[warden] Failed to list services: {e}");
                self.status_message = Some(format!("Could not list services: {e}"));
            }
        }
    }

    fn reload_packages(&mut self) {
        match packages::list_packages() {
            Ok(list) => self.packages = list,
            Err(e) => {
                eprintln!("[warden] Failed to list packages: {e}");
                self.status_message = Some(format!("Could not list packages: {e}"));
            }
        }
    }

    // ─── MAIN VIEW ──────────────────────────────────────────────

    pub fn view(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let accent = p.accent;
        let label_c = p.label;
        let text_c = p.text;
        let border_c = p.border;

        let mut tabs: Vec<Element<Message>> = Vec::new();
        for &tab in Tab::ALL {
            tabs.push(menu_tab(tab, self.tab, p));
        }

        let settings_btn = button(text("Settings").size(11).color(label_c))
            .on_press(Message::ToggleSettings)
            .style(button::text)
            .padding([2, 4]);

        // Live CPU readout next to the title, tinted by load.
        let cpu_el: Element<Message> = if self.cpu_history.is_empty() {
            Space::new(0, 0).into()
        } else {
            let cpu = self.cpu_history.last().copied().unwrap_or(0.0);
            text(format!("CPU {cpu:.0}%"))
                .size(10)
                .font(Font::MONOSPACE)
                .color(gradient_color(cpu / 100.0, p))
                .into()
        };

        let status_el: Element<Message> = if let Some(msg) = &self.status_message {
            text(msg).size(10).color(p.yellow).into()
        } else {
            Space::new(0, 0).into()
        };

        let menu_bar = row![
            text("Warden").size(15).color(accent),
            Space::with_width(8),
            cpu_el,
            Space::with_width(8),
            settings_btn,
            Space::with_width(8),
            status_el,
            Space::with_width(Length::Fill),
            Row::with_children(tabs).spacing(4),
            Space::with_width(Length::Fill),
            text(chrono::Local::now().format("%H:%M:%S").to_string())
                .size(13)
                .font(Font::MONOSPACE)
                .color(text_c),
        ]
        .align_y(Alignment::Center)
        .padding([6, 12]);

        let content: Element<Message> = if let Some(console) = &self.console {
            self.view_console(console)
        } else if let Some(pending) = &self.pending {
            self.view_confirm(pending)
        } else if self.show_settings {
            self.view_settings()
        } else {
            match self.tab {
                Tab::Processes => self.view_processes(),
                Tab::Performance => self.view_performance(),
                Tab::Network => self.view_network(),
                Tab::Services => self.view_services(),
                Tab::Hardware => self.view_hardware(),
                Tab::Packages => self.view_packages(),
                Tab::Disks => self.view_disks(),
                Tab::About => self.view_about(),
            }
        };

        let bg = p.bg;
        let sidebar_bg = p.sidebar_bg;
        let main = column![
            panel_bg(menu_bar.into(), sidebar_bg, border_c),
            content,
        ]
        .spacing(0)
        .height(Length::Fill);

        container(main)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_: &Theme| container::Style {
                background: Some(Background::Color(bg)),
                ..Default::default()
            })
            .into()
    }

    // ─── PROCESSES TAB ──────────────────────────────────────────

    fn view_processes(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let label_c = p.label;
        let accent = p.accent;
        let panel_bg = p.panel_bg;
        let bg = p.bg;
        let border_c = p.border;
        let sidebar_bg = p.sidebar_bg;

        let filter_lower = self.process_filter.to_lowercase();
        let mut procs: Vec<&ProcessInfo> = self
            .processes
            .iter()
            .filter(|proc| filter_lower.is_empty() || proc.name.to_lowercase().contains(&filter_lower))
            .collect();

        match self.process_sort {
            ProcessSort::Pid => procs.sort_by_key(|proc| proc.pid),
            ProcessSort::Name => {
                procs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            }
            ProcessSort::User => procs.sort_by(|a, b| a.user.cmp(&b.user)),
            ProcessSort::Cpu => procs.sort_by(|a, b| {
                a.cpu_usage
                    .partial_cmp(&b.cpu_usage)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            ProcessSort::Memory => procs.sort_by_key(|proc| proc.memory_bytes),
        }
        if !self.process_sort_asc {
            procs.reverse();
        }

        let filter_row = row![
            text("Filter:").size(11).color(label_c),
            text_input("process name", &self.process_filter)
                .on_input(Message::ProcessFilterChanged)
                .width(220),
            Space::with_width(Length::Fill),
            text(format!("{} processes", procs.len())).size(11).color(label_c),
        ]
        .spacing(8)
        .align_y(Alignment::Center)
        .padding([6, 10]);

        let si = |col: ProcessSort| -> &str {
            if self.process_sort == col {
                if self.process_sort_asc { "\u{25b2}" } else { "\u{25bc}" }
            } else {
                ""
            }
        };

        let header = container(
            row![
                sort_btn(format!("PID {}", si(ProcessSort::Pid)), ProcessSort::Pid, 60, accent),
                sort_btn(format!("Name {}", si(ProcessSort::Name)), ProcessSort::Name, 200, accent),
                sort_btn(format!("User {}", si(ProcessSort::User)), ProcessSort::User, 110, accent),
                sort_btn(format!("CPU% {}", si(ProcessSort::Cpu)), ProcessSort::Cpu, 70, accent),
                sort_btn(format!("Memory {}", si(ProcessSort::Memory)), ProcessSort::Memory, 90, accent),
                text("Read/s").size(11).color(accent).width(90),
                text("Write/s").size(11).color(accent).width(90),
                text("Status").size(11).color(accent).width(80),
            ]
            .spacing(2),
        )
        .padding([4, 10])
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(sidebar_bg)),
            border: Border { color: border_c, width: 0.0, radius: 0.0.into() },
            ..Default::default()
        });

        let mut rows: Vec<Element<Message>> = Vec::new();
        for (i, proc) in procs.iter().enumerate() {
            let row_bg = if i % 2 == 0 { panel_bg } else { bg };
            let selected = self.selected_pid == Some(proc.pid);
            rows.push(process_row(proc, row_bg, selected, p));
        }

        let table = scrollable(Column::with_children(rows).spacing(0)).height(Length::Fill);
        let table_panel = panel_fill(
            column![filter_row, header, table].spacing(0).into(),
            p,
        );

        let details: Element<Message> = match self.selected_process() {
            Some(proc) => self.view_process_details(proc),
            None => panel(
                text("Select a process to inspect or signal it.")
                    .size(11)
                    .color(label_c)
                    .into(),
                p,
            ),
        };

        column![table_panel, details]
            .spacing(8)
            .padding(4)
            .height(Length::Fill)
            .into()
    }

    fn view_process_details(&self, proc: &ProcessInfo) -> Element<'_, Message> {
        let p = &self.pal;
        let label_c = p.label;
        let text_c = p.text;
        let accent = p.accent;
        let red = p.red;

        let parent = proc
            .parent_pid
            .map(|ppid| match self.processes.iter().find(|q| q.pid == ppid) {
                Some(parent) => format!("{} ({ppid})", parent.name),
                None => ppid.to_string(),
            })
            .unwrap_or_else(|| "-".to_string());
        let cmdline = if proc.cmd.is_empty() { "-".to_string() } else { proc.cmd.join(" ") };
        let exe = proc.exe.clone().unwrap_or_else(|| "-".to_string());

        let mut signal_btns: Vec<Element<Message>> = Vec::new();
        for &signal in ProcessSignal::ALL {
            let color = match signal {
                ProcessSignal::Terminate => p.yellow,
                ProcessSignal::Kill => p.red,
                ProcessSignal::Suspend => p.magenta,
                ProcessSignal::Resume => p.green,
            };
            signal_btns.push(
                button(text(signal.label()).size(11).color(color))
                    .on_press(Message::SignalRequested(signal))
                    .style(button::secondary)
                    .padding([3, 10])
                    .into(),
            );
        }

        let inspect_row = row![
            button(text("Open Files").size(11).color(accent))
                .on_press(Message::ShowOpenFiles)
                .style(button::secondary)
                .padding([3, 10]),
            button(text("Syscall Summary").size(11).color(accent))
                .on_press(Message::ShowSyscalls)
                .style(button::secondary)
                .padding([3, 10]),
            button(text("Owning Package").size(11).color(accent))
                .on_press(Message::ShowOwningPackage)
                .style(button::secondary)
                .padding([3, 10]),
        ]
        .spacing(4);

        let info = column![
            info_row("User", &proc.user, p),
            info_row("Status", status_name(proc.status), p),
            info_row("CPU", format!("{:.1}%", proc.cpu_usage), p),
            info_row("Memory", format_mem_mb(proc.memory_bytes), p),
            info_row("Read", format_rate(proc.read_bps), p),
            info_row("Write", format_rate(proc.write_bps), p),
            info_row("Parent", parent, p),
            info_row("Threads", proc.thread_count, p),
            info_row("Executable", exe, p),
            info_row("Command line", cmdline, p),
        ]
        .spacing(2);

        let drill: Element<Message> = match &self.detail {
            DetailView::None => Space::with_height(0).into(),
            DetailView::OpenFiles(Ok(files)) if files.is_empty() => {
                text("No regular files open.").size(11).color(label_c).into()
            }
            DetailView::OpenFiles(Ok(files)) => {
                let mut lines: Vec<Element<Message>> = Vec::new();
                for file in files {
                    lines.push(
                        text(format!("{:>4}  {}", file.fd, file.path))
                            .size(11)
                            .font(Font::MONOSPACE)
                            .color(text_c)
                            .into(),
                    );
                }
                scrollable(Column::with_children(lines).spacing(0)).height(150).into()
            }
            DetailView::OpenFiles(Err(err)) => text(err.clone()).size(11).color(red).into(),
            DetailView::Syscalls(output) => scrollable(
                text(output.clone()).size(10).font(Font::MONOSPACE).color(text_c),
            )
            .height(180)
            .into(),
            DetailView::Package(answer) => text(answer.clone())
                .size(11)
                .font(Font::MONOSPACE)
                .color(text_c)
                .into(),
        };

        panel(
            column![
                row![
                    text(format!("{} (PID {})", proc.name, proc.pid)).size(13).color(accent),
                    Space::with_width(Length::Fill),
                    Row::with_children(signal_btns).spacing(4),
                ]
                .align_y(Alignment::Center),
                info,
                inspect_row,
                drill,
            ]
            .spacing(8)
            .into(),
            p,
        )
    }

    // ─── PERFORMANCE TAB ────────────────────────────────────────

    fn view_performance(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let label_c = p.label;
        let accent = p.accent;

        let bars = panel(
            column![
                labeled_bar("Memory", self.perf.mem_used, self.perf.mem_total, p.green, p),
                labeled_bar("Swap", self.perf.swap_used, self.perf.swap_total, p.magenta, p),
                row![
                    button(text("Save Snapshot").size(11).color(accent))
                        .on_press(Message::SaveSnapshot)
                        .style(button::secondary)
                        .padding([3, 10]),
                    text("Appends the current CPU and memory readings to the performance log.")
                        .size(10)
                        .color(label_c),
                ]
                .spacing(8)
                .align_y(Alignment::Center),
            ]
            .spacing(8)
            .into(),
            p,
        );

        let content = column![
            self.perf_chart("CPU usage", p.accent, &self.cpu_history),
            self.perf_chart("Memory usage", p.green, &self.mem_history),
            self.perf_chart("Swap usage", p.magenta, &self.swap_history),
            bars,
        ]
        .spacing(8);

        scrollable(column![content].padding(4)).into()
    }

    fn perf_chart(&self, title: &str, color: Color, history: &RingBuffer<f32>) -> Element<'_, Message> {
        let chart = LineChart {
            title: title.to_string(),
            color,
            data: history.iter().copied().collect(),
            y_max: 100.0,
            unit: "%".to_string(),
            palette: self.pal,
        };
        Canvas::new(chart)
            .width(Length::Fill)
            .height(Length::Fixed(170.0))
            .into()
    }

    // ─── NETWORK TAB ────────────────────────────────────────────

    fn view_network(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let label_c = p.label;
        let accent = p.accent;
        let text_c = p.text;
        let panel_bg = p.panel_bg;
        let bg = p.bg;
        let border_c = p.border;
        let sidebar_bg = p.sidebar_bg;

        let count_row = row![
            text("TCP and UDP sockets with a known owning process.").size(11).color(label_c),
            Space::with_width(Length::Fill),
            text(format!("{} connections", self.connections.len())).size(11).color(label_c),
        ]
        .align_y(Alignment::Center)
        .padding([6, 10]);

        let header = container(
            row![
                text("Proto").size(11).color(accent).width(60),
                text("Local Address").size(11).color(accent).width(230),
                text("Remote Address").size(11).color(accent).width(230),
                text("State").size(11).color(accent).width(110),
                text("PID").size(11).color(accent).width(70),
                text("Process").size(11).color(accent),
            ]
            .spacing(2),
        )
        .padding([4, 10])
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(sidebar_bg)),
            border: Border { color: border_c, width: 0.0, radius: 0.0.into() },
            ..Default::default()
        });

        let mut rows: Vec<Element<Message>> = Vec::new();
        for (i, conn) in self.connections.iter().enumerate() {
            let row_bg = if i % 2 == 0 { panel_bg } else { bg };
            rows.push(
                container(
                    row![
                        text(conn.protocol).size(11).font(Font::MONOSPACE).color(accent).width(60),
                        text(conn.local.clone()).size(11).font(Font::MONOSPACE).color(text_c).width(230),
                        text(conn.remote.clone()).size(11).font(Font::MONOSPACE).color(text_c).width(230),
                        text(conn.state.clone()).size(11).font(Font::MONOSPACE).color(label_c).width(110),
                        text(conn.pid.to_string()).size(11).font(Font::MONOSPACE).color(label_c).width(70),
                        text(conn.process.clone()).size(11).color(text_c),
                    ]
                    .spacing(2)
                    .align_y(Alignment::Center),
                )
                .padding([2, 10])
                .style(move |_: &Theme| container::Style {
                    background: Some(Background::Color(row_bg)),
                    ..Default::default()
                })
                .into(),
            );
        }

        let table = Column::with_children(rows).spacing(0);
        let content = panel(column![count_row, header, table].spacing(0).into(), p);
        scrollable(column![content].padding(4)).into()
    }

    // ─── SERVICES TAB ───────────────────────────────────────────

    fn view_services(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let label_c = p.label;
        let accent = p.accent;
        let text_c = p.text;
        let panel_bg = p.panel_bg;
        let bg = p.bg;
        let border_c = p.border;
        let sidebar_bg = p.sidebar_bg;

        let mut action_btns: Vec<Element<Message>> = Vec::new();
        for &action in ServiceAction::ALL {
            let (label, color) = match action {
                ServiceAction::Start => ("Start", p.green),
                ServiceAction::Stop => ("Stop", p.red),
                ServiceAction::Restart => ("Restart", p.blue),
            };
            action_btns.push(
                button(text(label).size(11).color(color))
                    .on_press(Message::ServiceActionRequested(action))
                    .style(button::secondary)
                    .padding([3, 10])
                    .into(),
            );
        }

        let selected_label = self.selected_unit.as_deref().unwrap_or("no service selected");
        let toolbar = row![
            Row::with_children(action_btns).spacing(4),
            Space::with_width(8),
            text(selected_label).size(11).font(Font::MONOSPACE).color(accent),
            Space::with_width(Length::Fill),
            text(format!("{} units", self.services.len())).size(11).color(label_c),
            button(text("Reload").size(11).color(label_c))
                .on_press(Message::ReloadServices)
                .style(button::secondary)
                .padding([3, 10]),
        ]
        .spacing(8)
        .align_y(Alignment::Center)
        .padding([6, 10]);

        let header = container(
            row![
                text("Unit").size(11).color(accent).width(280),
                text("Load").size(11).color(accent).width(70),
                text("Active").size(11).color(accent).width(80),
                text("Sub").size(11).color(accent).width(90),
                text("Description").size(11).color(accent),
            ]
            .spacing(2),
        )
        .padding([4, 10])
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(sidebar_bg)),
            border: Border { color: border_c, width: 0.0, radius: 0.0.into() },
            ..Default::default()
        });

        let mut rows: Vec<Element<Message>> = Vec::new();
        if !self.is_root {
            rows.push(
                container(
                    text("Run Warden as root to list and manage services.")
                        .size(11)
                        .color(p.yellow),
                )
                .padding(14)
                .into(),
            );
        }
        for (i, unit) in self.services.iter().enumerate() {
            let stripe = if i % 2 == 0 { panel_bg } else { bg };
            let selected = self.selected_unit.as_deref() == Some(unit.unit.as_str());
            let active_c = match unit.active.as_str() {
                "active" => p.green,
                "failed" => p.red,
                _ => label_c,
            };
            let hover = Color::from_rgba(accent.r, accent.g, accent.b, 0.10);
            let row_bg = if selected {
                Color::from_rgba(accent.r, accent.g, accent.b, 0.18)
            } else {
                stripe
            };
            rows.push(
                button(
                    row![
                        text(unit.unit.clone()).size(11).color(text_c).width(280),
                        text(unit.load.clone()).size(11).font(Font::MONOSPACE).color(label_c).width(70),
                        text(unit.active.clone()).size(11).font(Font::MONOSPACE).color(active_c).width(80),
                        text(unit.sub.clone()).size(11).font(Font::MONOSPACE).color(label_c).width(90),
                        text(unit.description.clone()).size(11).color(label_c),
                    ]
                    .spacing(2)
                    .align_y(Alignment::Center),
                )
                .on_press(Message::ServiceSelected(unit.unit.clone()))
                .width(Length::Fill)
                .padding([2, 10])
                .style(move |_: &Theme, status| {
                    let bg = match status {
                        button::Status::Hovered | button::Status::Pressed => hover,
                        _ => row_bg,
                    };
                    button::Style {
                        background: Some(Background::Color(bg)),
                        text_color: text_c,
                        ..Default::default()
                    }
                })
                .into(),
            );
        }

        let table = Column::with_children(rows).spacing(0);
        let content = panel(column![toolbar, header, table].spacing(0).into(), p);
        scrollable(column![content].padding(4)).into()
    }

    // ─── HARDWARE TAB ───────────────────────────────────────────

    fn view_hardware(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let text_c = p.text;

        let content = panel(
            column![
                section_title("Sensors", p),
                text(self.sensors_text.clone())
                    .size(11)
                    .font(Font::MONOSPACE)
                    .color(text_c),
            ]
            .spacing(8)
            .into(),
            p,
        );
        scrollable(column![content].padding(4)).into()
    }

    // ─── PACKAGES TAB ───────────────────────────────────────────

    fn view_packages(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let label_c = p.label;
        let accent = p.accent;
        let text_c = p.text;
        let panel_bg = p.panel_bg;
        let bg = p.bg;
        let border_c = p.border;
        let sidebar_bg = p.sidebar_bg;

        let filter_lower = self.package_filter.to_lowercase();
        let filtered: Vec<&PackageInfo> = self
            .packages
            .iter()
            .filter(|pkg| pkg.matches(&filter_lower))
            .collect();

        let selected_label = self.selected_package.as_deref().unwrap_or("no package selected");
        let toolbar = row![
            button(text("Update Lists").size(11).color(accent))
                .on_press(Message::UpdatePackageLists)
                .style(button::secondary)
                .padding([3, 10]),
            button(text("Upgrade Selected").size(11).color(p.green))
                .on_press(Message::UpgradePackage)
                .style(button::secondary)
                .padding([3, 10]),
            button(text("Remove Selected").size(11).color(p.red))
                .on_press(Message::RemovePackage)
                .style(button::secondary)
                .padding([3, 10]),
            Space::with_width(8),
            text(selected_label).size(11).font(Font::MONOSPACE).color(accent),
            Space::with_width(Length::Fill),
            button(text("Reload").size(11).color(label_c))
                .on_press(Message::ReloadPackages)
                .style(button::secondary)
                .padding([3, 10]),
        ]
        .spacing(4)
        .align_y(Alignment::Center)
        .padding([6, 10]);

        let filter_row = row![
            text("Filter:").size(11).color(label_c),
            text_input("package name or description", &self.package_filter)
                .on_input(Message::PackageFilterChanged)
                .width(260),
            Space::with_width(Length::Fill),
            text(format!("{} of {} packages", filtered.len(), self.packages.len()))
                .size(11)
                .color(label_c),
        ]
        .spacing(8)
        .align_y(Alignment::Center)
        .padding([6, 10]);

        let header = container(
            row![
                text("Package").size(11).color(accent).width(240),
                text("Version").size(11).color(accent).width(160),
                text("Description").size(11).color(accent),
            ]
            .spacing(2),
        )
        .padding([4, 10])
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(sidebar_bg)),
            border: Border { color: border_c, width: 0.0, radius: 0.0.into() },
            ..Default::default()
        });

        let mut rows: Vec<Element<Message>> = Vec::new();
        for (i, pkg) in filtered.iter().enumerate() {
            let stripe = if i % 2 == 0 { panel_bg } else { bg };
            let selected = self.selected_package.as_deref() == Some(pkg.name.as_str());
            let hover = Color::from_rgba(accent.r, accent.g, accent.b, 0.10);
            let row_bg = if selected {
                Color::from_rgba(accent.r, accent.g, accent.b, 0.18)
            } else {
                stripe
            };
            rows.push(
                button(
                    row![
                        text(pkg.name.clone()).size(11).color(text_c).width(240),
                        text(pkg.version.clone()).size(11).font(Font::MONOSPACE).color(label_c).width(160),
                        text(pkg.description.clone()).size(11).color(label_c),
                    ]
                    .spacing(2)
                    .align_y(Alignment::Center),
                )
                .on_press(Message::PackageSelected(pkg.name.clone()))
                .width(Length::Fill)
                .padding([2, 10])
                .style(move |_: &Theme, status| {
                    let bg = match status {
                        button::Status::Hovered | button::Status::Pressed => hover,
                        _ => row_bg,
                    };
                    button::Style {
                        background: Some(Background::Color(bg)),
                        text_color: text_c,
                        ..Default::default()
                    }
                })
                .into(),
            );
        }

        let table = Column::with_children(rows).spacing(0);
        let content = panel(column![toolbar, filter_row, header, table].spacing(0).into(), p);
        scrollable(column![content].padding(4)).into()
    }

    // ─── DISKS TAB ──────────────────────────────────────────────

    fn view_disks(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let label_c = p.label;
        let accent = p.accent;
        let text_c = p.text;
        let panel_bg = p.panel_bg;
        let bg = p.bg;
        let border_c = p.border;
        let sidebar_bg = p.sidebar_bg;

        let count_row = row![
            text("Mounted filesystems.").size(11).color(label_c),
            Space::with_width(Length::Fill),
            text(format!("{} filesystems", self.disks.len())).size(11).color(label_c),
        ]
        .align_y(Alignment::Center)
        .padding([6, 10]);

        let header = container(
            row![
                text("Device").size(11).color(accent).width(160),
                text("Mount").size(11).color(accent).width(200),
                text("Type").size(11).color(accent).width(80),
                text("Total").size(11).color(accent).width(90),
                text("Used").size(11).color(accent).width(90),
                text("Free").size(11).color(accent).width(90),
                text("Use%").size(11).color(accent).width(60),
            ]
            .spacing(2),
        )
        .padding([4, 10])
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(sidebar_bg)),
            border: Border { color: border_c, width: 0.0, radius: 0.0.into() },
            ..Default::default()
        });

        let mut rows: Vec<Element<Message>> = Vec::new();
        for (i, disk) in self.disks.iter().enumerate() {
            let row_bg = if i % 2 == 0 { panel_bg } else { bg };
            let used = disk.total.saturating_sub(disk.available);
            let pct = if disk.total > 0 {
                used as f32 / disk.total as f32 * 100.0
            } else {
                0.0
            };
            rows.push(
                container(
                    row![
                        text(disk.name.clone()).size(11).font(Font::MONOSPACE).color(text_c).width(160),
                        text(disk.mount.clone()).size(11).color(text_c).width(200),
                        text(disk.fs_type.clone()).size(11).font(Font::MONOSPACE).color(label_c).width(80),
                        text(format_gb(disk.total)).size(11).font(Font::MONOSPACE).color(label_c).width(90),
                        text(format_gb(used)).size(11).font(Font::MONOSPACE).color(label_c).width(90),
                        text(format_gb(disk.available)).size(11).font(Font::MONOSPACE).color(label_c).width(90),
                        text(format!("{pct:.1}%"))
                            .size(11)
                            .font(Font::MONOSPACE)
                            .color(gradient_color(pct / 100.0, p))
                            .width(60),
                    ]
                    .spacing(2)
                    .align_y(Alignment::Center),
                )
                .padding([2, 10])
                .style(move |_: &Theme| container::Style {
                    background: Some(Background::Color(row_bg)),
                    ..Default::default()
                })
                .into(),
            );
        }

        let table = Column::with_children(rows).spacing(0);
        let content = panel(column![count_row, header, table].spacing(0).into(), p);
        scrollable(column![content].padding(4)).into()
    }

    // ─── ABOUT TAB ──────────────────────────────────────────────

    fn view_about(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let label_c = p.label;
        let accent = p.accent;
        let text_c = p.text;

        let si = &self.collector.sys_info;
        let card = column![
            text("Warden").size(28).color(accent),
            text("System monitoring and administration for Debian systems.")
                .size(12)
                .color(text_c),
            text(format!("Version {}", env!("CARGO_PKG_VERSION"))).size(11).color(label_c),
            Space::with_height(12),
            info_row("Hostname", &si.hostname, p),
            info_row("Operating system", format!("{} {}", si.os_name, si.os_version), p),
            info_row("Kernel", &si.kernel_version, p),
            info_row("Uptime", format_duration(metrics::uptime_secs()), p),
            info_row("Performance log", perflog::log_path().display(), p),
        ]
        .spacing(4);

        let content = container(container(panel(card.into(), p)).width(560))
            .center_x(Length::Fill)
            .padding(40);
        scrollable(column![content].padding(4)).into()
    }

    // ─── OVERLAYS ───────────────────────────────────────────────

    fn view_console(&self, console: &Console) -> Element<'_, Message> {
        let p = &self.pal;
        let label_c = p.label;
        let accent = p.accent;
        let text_c = p.text;
        let bg = p.bg;
        let border_c = p.border;

        let state: Element<Message> = if console.done {
            text("finished").size(11).color(p.green).into()
        } else {
            text("running").size(11).color(p.yellow).into()
        };

        let header = row![
            text("Running:").size(11).color(label_c),
            text(console.runner.command_line().to_string())
                .size(11)
                .font(Font::MONOSPACE)
                .color(accent),
            Space::with_width(Length::Fill),
            state,
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let mut lines: Vec<Element<Message>> = Vec::new();
        for line in &console.lines {
            lines.push(
                text(line.clone())
                    .size(11)
                    .font(Font::MONOSPACE)
                    .color(text_c)
                    .into(),
            );
        }

        let output = container(
            scrollable(Column::with_children(lines).spacing(0).padding([4, 8]))
                .width(Length::Fill)
                .height(Length::Fill),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(4)
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(bg)),
            border: Border { color: border_c, width: 1.0, radius: 6.0.into() },
            ..Default::default()
        });

        let close = button(text("Close").size(11).color(text_c))
            .on_press_maybe(console.done.then_some(Message::CloseConsole))
            .style(button::secondary)
            .padding([4, 14]);

        let card = column![
            header,
            output,
            row![Space::with_width(Length::Fill), close],
        ]
        .spacing(8);

        container(panel_fill(card.into(), p))
            .padding(12)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn view_confirm(&self, pending: &PendingAction) -> Element<'_, Message> {
        let p = &self.pal;
        let text_c = p.text;

        let card = column![
            text("Confirm action").size(16).color(p.yellow),
            text(pending.prompt()).size(12).color(text_c),
            Space::with_height(8),
            row![
                button(text("Cancel").size(11).color(text_c))
                    .on_press(Message::CancelPending)
                    .style(button::secondary)
                    .padding([4, 14]),
                button(text("Confirm").size(11))
                    .on_press(Message::Confirm)
                    .style(button::primary)
                    .padding([4, 14]),
            ]
            .spacing(8),
        ]
        .spacing(10);

        container(container(panel(card.into(), p)).width(460))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn view_settings(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let label_c = p.label;
        let accent = p.accent;
        let text_c = p.text;

        let mut theme_btns: Vec<Element<Message>> = Vec::new();
        for &variant in ThemeVariant::ALL {
            let is_active = self.settings.theme == variant;
            let color = if is_active { accent } else { label_c };
            theme_btns.push(
                button(text(variant.name()).size(11).color(color))
                    .on_press(Message::SetTheme(variant))
                    .style(if is_active { button::primary } else { button::secondary })
                    .padding([4, 12])
                    .into(),
            );
        }

        let card = column![
            text("Settings").size(16).color(accent),
            Space::with_height(8),
            row![
                text("Theme:").size(11).color(label_c).width(120),
                Row::with_children(theme_btns).spacing(4),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
            text("Changes are applied and saved immediately.").size(10).color(label_c),
            Space::with_height(12),
            button(text("Close").size(11).color(text_c))
                .on_press(Message::ToggleSettings)
                .style(button::secondary)
                .padding([4, 14]),
        ]
        .spacing(8);

        container(container(panel(card.into(), p)).width(420))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }
}

// ─── WIDGET HELPERS ─────────────────────────────────────────────

fn menu_tab(tab: Tab, current: Tab, p: &Palette) -> Element<'static, Message> {
    let is_active = tab == current;
    let accent = p.accent;
    let label_c = p.label;
    let text_c = p.text;
    let color = if is_active { accent } else { label_c };
    let hover_color = Color::from_rgba(accent.r, accent.g, accent.b, 0.15);
    button(text(tab.label()).size(12).color(color))
        .on_press(Message::TabSelected(tab))
        .padding([4, 14])
        .style(move |_: &Theme, status| {
            let bg = match status {
                button::Status::Hovered => hover_color,
                button::Status::Pressed => Color::from_rgba(accent.r, accent.g, accent.b, 0.25),
                _ => {
                    if is_active {
                        Color::from_rgba(accent.r, accent.g, accent.b, 0.1)
                    } else {
                        Color::TRANSPARENT
                    }
                }
            };
            button::Style {
                background: Some(Background::Color(bg)),
                text_color: text_c,
                border: Border {
                    color: if is_active { accent } else { Color::TRANSPARENT },
                    width: 0.0,
                    radius: 6.0.into(),
                },
                ..Default::default()
            }
        })
        .into()
}

fn panel<'a>(content: Element<'a, Message>, p: &Palette) -> Element<'a, Message> {
    let panel_bg = p.panel_bg;
    let border_c = p.border;
    container(content)
        .width(Length::Fill)
        .padding(10)
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(panel_bg)),
            border: Border {
                color: border_c,
                width: 1.0,
                radius: 8.0.into(),
            },
            shadow: Shadow {
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.15),
                offset: Vector::new(0.0, 2.0),
                blur_radius: 8.0,
            },
            ..Default::default()
        })
        .into()
}

/// Same chrome as [`panel`] but claims the full height it is offered, for
/// layouts with an inner scrollable.
fn panel_fill<'a>(content: Element<'a, Message>, p: &Palette) -> Element<'a, Message> {
    let panel_bg = p.panel_bg;
    let border_c = p.border;
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(10)
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(panel_bg)),
            border: Border {
                color: border_c,
                width: 1.0,
                radius: 8.0.into(),
            },
            shadow: Shadow {
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.15),
                offset: Vector::new(0.0, 2.0),
                blur_radius: 8.0,
            },
            ..Default::default()
        })
        .into()
}

fn panel_bg<'a>(content: Element<'a, Message>, bg: Color, border_c: Color) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(bg)),
            border: Border {
                color: border_c,
                width: 0.0,
                radius: 0.0.into(),
            },
            ..Default::default()
        })
        .into()
}

fn section_title(label: impl ToString, p: &Palette) -> Element<'static, Message> {
    let accent = p.accent;
    text(label.to_string()).size(11).color(accent).into()
}

fn sort_btn(label: String, col: ProcessSort, width: u16, accent: Color) -> Element<'static, Message> {
    button(text(label).size(11).color(accent))
        .on_press(Message::SortBy(col))
        .style(button::text)
        .padding([2, 4])
        .width(width)
        .into()
}

fn info_row<'a>(label: impl ToString, value: impl ToString, p: &Palette) -> Element<'a, Message> {
    let l = format!("{}:", label.to_string());
    let v = value.to_string();
    let label_c = p.label;
    let text_c = p.text;
    row![
        text(l).size(11).color(label_c).width(120),
        text(v).size(11).font(Font::MONOSPACE).color(text_c),
    ]
    .spacing(8)
    .into()
}

fn process_row(proc: &ProcessInfo, stripe: Color, selected: bool, p: &Palette) -> Element<'static, Message> {
    let cpu_color = gradient_color(proc.cpu_usage / 100.0, p);
    let pid = proc.pid;
    let label_c = p.label;
    let text_c = p.text;
    let accent = p.accent;
    let status_c = match proc.status {
        'R' => p.green,
        'Z' => p.red,
        'D' => p.yellow,
        'T' => p.magenta,
        _ => label_c,
    };
    let row_bg = if selected {
        Color::from_rgba(accent.r, accent.g, accent.b, 0.18)
    } else {
        stripe
    };
    let hover = Color::from_rgba(accent.r, accent.g, accent.b, 0.10);

    button(
        row![
            text(pid.to_string()).size(11).font(Font::MONOSPACE).color(label_c).width(60),
            text(proc.name.clone()).size(11).color(text_c).width(200),
            text(proc.user.clone()).size(11).color(label_c).width(110),
            text(format!("{:.1}%", proc.cpu_usage)).size(11).font(Font::MONOSPACE).color(cpu_color).width(70),
            text(format_mem_mb(proc.memory_bytes)).size(11).font(Font::MONOSPACE).color(accent).width(90),
            text(format_rate(proc.read_bps)).size(11).font(Font::MONOSPACE).color(p.cyan).width(90),
            text(format_rate(proc.write_bps)).size(11).font(Font::MONOSPACE).color(p.magenta).width(90),
            text(status_name(proc.status)).size(11).font(Font::MONOSPACE).color(status_c).width(80),
        ]
        .spacing(2)
        .align_y(Alignment::Center),
    )
    .on_press(Message::ProcessSelected(pid))
    .width(Length::Fill)
    .padding([2, 10])
    .style(move |_: &Theme, status| {
        let bg = match status {
            button::Status::Hovered | button::Status::Pressed => hover,
            _ => row_bg,
        };
        button::Style {
            background: Some(Background::Color(bg)),
            text_color: text_c,
            ..Default::default()
        }
    })
    .into()
}

fn labeled_bar(label: &str, used: u64, total: u64, color: Color, p: &Palette) -> Element<'static, Message> {
    if total == 0 {
        return row![].into();
    }
    let pct = used as f32 / total as f32 * 100.0;
    let label_c = p.label;
    let bar_bg = p.bar_bg;
    row![
        text(format!("{label}:")).size(11).color(label_c).width(60),
        themed_bar(pct, color, bar_bg),
        text(format!("{}/{}", format_bytes(used), format_bytes(total)))
            .size(11)
            .font(Font::MONOSPACE)
            .color(color)
            .width(150),
    ]
    .spacing(6)
    .align_y(Alignment::Center)
    .into()
}

fn themed_bar(value: f32, color: Color, bar_bg: Color) -> Element<'static, Message> {
    progress_bar(0.0..=100.0, value)
        .width(Length::Fill)
        .style(move |_: &Theme| progress_bar::Style {
            background: Background::Color(bar_bg),
            bar: Background::Color(color),
            border: Border { color: Color::TRANSPARENT, width: 0.0, radius: 5.0.into() },
        })
        .into()
}

fn gradient_color(t: f32, p: &Palette) -> Color {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        let f = t * 2.0;
        Color::from_rgb(
            p.green.r + (p.yellow.r - p.green.r) * f,
            p.green.g + (p.yellow.g - p.green.g) * f,
            p.green.b + (p.yellow.b - p.green.b) * f,
        )
    } else {
        let f = (t - 0.5) * 2.0;
        Color::from_rgb(
            p.yellow.r + (p.red.r - p.yellow.r) * f,
            p.yellow.g + (p.red.g - p.yellow.g) * f,
            p.yellow.b + (p.red.b - p.yellow.b) * f,
        )
    }
}

// ─── FORMATTERS ─────────────────────────────────────────────────

/// Per-second I/O rate the way the process table shows it.
fn format_rate(bps: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bps > MIB {
        format!("{:.2} MB/s", bps as f64 / MIB as f64)
    } else if bps > 0 {
        format!("{:.1} KB/s", bps as f64 / 1024.0)
    } else {
        "0 B/s".to_string()
    }
}

fn format_gb(bytes: u64) -> String {
    const GB: u64 = 1024 * 1024 * 1024;
    format!("{:.2} GB", bytes as f64 / GB as f64)
}

fn format_mem_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TiB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GiB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MiB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KiB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

fn format_duration(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let mins = (secs % 3600) / 60;
    if days > 0 {
        format!("{}d {}h {}m", days, hours, mins)
    } else if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rate_thresholds() {
        assert_eq!(format_rate(0), "0 B/s");
        assert_eq!(format_rate(512), "0.5 KB/s");
        assert_eq!(format_rate(1024 * 1024), "1024.0 KB/s");
        assert_eq!(format_rate(3 * 1024 * 1024), "3.00 MB/s");
    }

    #[test]
    fn test_format_gb() {
        assert_eq!(format_gb(0), "0.00 GB");
        assert_eq!(format_gb(1024 * 1024 * 1024), "1.00 GB");
        assert_eq!(format_gb(1536 * 1024 * 1024), "1.50 GB");
    }

    #[test]
    fn test_format_mem_mb() {
        assert_eq!(format_mem_mb(1024 * 1024), "1.00 MB");
        assert_eq!(format_mem_mb(2621440), "2.50 MB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(59), "0m");
        assert_eq!(format_duration(3 * 3600 + 120), "3h 2m");
        assert_eq!(format_duration(2 * 86400 + 3600 + 60), "2d 1h 1m");
    }

    #[test]
    fn test_confirmation_prompts_name_the_target() {
        let signal = PendingAction::Signal {
            pid: 4242,
            name: "firefox".to_string(),
            signal: ProcessSignal::Terminate,
        };
        assert_eq!(signal.prompt(), "Send SIGTERM to 'firefox' (PID 4242)?");

        let removal = PendingAction::Remove("htop".to_string());
        assert!(removal.prompt().contains("'htop'"));
        assert!(removal.prompt().contains("apt-get remove"));
    }
}
