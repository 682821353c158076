use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Logs go to stderr at `warn` unless `RUST_LOG` says otherwise.
pub fn init() {
    Builder::new()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .init();
}
