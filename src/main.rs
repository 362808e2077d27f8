mod chart;
mod connections;
mod metrics;
mod packages;
mod perflog;
mod procdetail;
mod ringbuf;
mod runner;
mod sensors;
mod services;
mod settings;
mod theme;
mod ui;

use ui::Warden;

fn main() -> iced::Result {
    iced::application(Warden::title, Warden::update, Warden::view)
        .subscription(Warden::subscription)
        .theme(Warden::theme)
        .window(iced::window::Settings {
            size: (1200.0, 850.0).into(),
            #[cfg(target_os = "linux")]
            platform_specific: iced::window::settings::PlatformSpecific {
                application_id: String::from("warden"),
                ..Default::default()
            },
            ..Default::default()
        })
        .run_with(|| (Warden::new(), iced::Task::none()))
}
