use crossterm::{
    ExecutableCommand,
    style::{Color, ResetColor, SetForegroundColor},
};
use env_logger::Builder;
use log::{Level, debug, info};
use std::io::Write;

pub const LOG_LEVEL_ENV: &str = "MYTOOLS_LOG_LEVEL";

/// Picks the filter: explicit level, then `--debug`, then `-v` count, then
/// the configured level.
pub fn resolve_level(
    explicit: Option<&str>,
    debug: bool,
    verbosity: u8,
    configured: &str,
) -> &'static str {
    if let Some(level) = explicit {
        return normalize(level);
    }
    if debug {
        return "debug";
    }
    match verbosity {
        0 => normalize(configured),
        1 => "warn",
        2 => "info",
        _ => "debug",
    }
}

fn normalize(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" | "critical" => "error",
        _ => "info",
    }
}

pub fn setup_logger(level: &str) -> Result<(), log::SetLoggerError> {
    let env = env_logger::Env::default().filter_or(LOG_LEVEL_ENV, level);

    Builder::from_env(env)
        .format(|buf, record| {
            let level_color = match record.level() {
                Level::Error => "31", // Red
                Level::Warn => "33",  // Yellow
                Level::Info => "32",  // Green
                Level::Debug => "36", // Cyan
                Level::Trace => "35", // Magenta
            };

            writeln!(
                buf,
                "\x1B[{}m[{}]\x1B[0m [{}] {}",
                level_color,
                record.level(),
                buf.timestamp(),
                record.args()
            )
        })
        .format_timestamp_secs()
        .try_init()?;

    debug!("Logger initialised at level {}", level);
    Ok(())
}

pub fn print_banner(title: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();

    writeln!(stdout)?;
    stdout.execute(SetForegroundColor(Color::Cyan))?;
    writeln!(stdout, "{}", title)?;
    stdout.execute(ResetColor)?;
    writeln!(stdout, "{}", "─".repeat(60))?;

    info!("Running {}", title);
    Ok(())
}

pub fn print_status(color: Color, message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.execute(SetForegroundColor(color))?;
    writeln!(stdout, "{}", message)?;
    stdout.execute(ResetColor)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Once;

    static INIT: Once = Once::new();

    #[test]
    fn test_setup_logger() {
        INIT.call_once(|| {
            assert!(setup_logger("error").is_ok());
        });
    }

    #[test]
    fn test_resolve_level_precedence() {
        assert_eq!(resolve_level(Some("WARNING"), true, 3, "INFO"), "warn");
        assert_eq!(resolve_level(None, true, 0, "ERROR"), "debug");
        assert_eq!(resolve_level(None, false, 1, "DEBUG"), "warn");
        assert_eq!(resolve_level(None, false, 2, "DEBUG"), "info");
        assert_eq!(resolve_level(None, false, 5, "ERROR"), "debug");
        assert_eq!(resolve_level(None, false, 0, "CRITICAL"), "error");
        assert_eq!(resolve_level(None, false, 0, "nonsense"), "info");
    }
}
