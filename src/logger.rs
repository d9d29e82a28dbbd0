use chrono::Local;
use log::{LevelFilter, Metadata, Record};

static LOGGER: SimpleLogger = SimpleLogger;

/// Writes `<time> <LEVEL> - <message>` lines to stderr, filtered by the global max level.
pub struct SimpleLogger;

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", format_record(record));
        }
    }

    fn flush(&self) {}
}

fn format_record(record: &Record) -> String {
    format!(
        "{} {:<5} - {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        record.level(),
        record.args()
    )
}

pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(level))
}
