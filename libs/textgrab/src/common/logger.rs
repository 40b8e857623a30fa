use log::LevelFilter;
use std::io::Write;

/// Initializes the logger named after the running executable, falling back
/// to the package name when the executable path cannot be resolved.
pub fn init_logger_exe(level: LevelFilter) {
    let name = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    init_logger(name, level);
}

/// Logs always go to stderr so stdout carries recognized text only.
pub fn init_logger(name: impl Into<String>, level: LevelFilter) {
    let crate_name = name.into().replace('-', "_");

    env_logger::builder()
        .target(env_logger::Target::Stderr)
        .filter_level(LevelFilter::Warn)
        .filter(Some(&crate_name), level)
        .filter(Some("textgrab"), level)
        .parse_default_env()
        .format(move |f, rec| {
            let now = humantime::format_rfc3339_millis(std::time::SystemTime::now());
            let module = rec.module_path().unwrap_or("<unknown>");
            let line = rec.line().unwrap_or(u32::MIN);
            let level = rec.level();

            writeln!(
                f,
                "[{} {} {} {}:{}] {}",
                level,
                crate_name,
                now,
                module,
                line,
                rec.args()
            )
        })
        .init();
}
