use log::{Level, LevelFilter};

/// Installs the browser console logger and the panic hook. Later calls only change the level.
pub fn init(level: &str) {
    console_error_panic_hook::set_once();

    // The logger itself passes everything; the max level does the filtering.
    let _ = console_log::init_with_level(Level::Trace);
    log::set_max_level(parse_level(level));
}

fn parse_level(level: &str) -> LevelFilter {
    level.parse().unwrap_or(LevelFilter::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        assert_eq!(parse_level("chatty"), LevelFilter::Info);
    }
}
