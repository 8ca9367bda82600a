mod lines;
mod products;
mod readings;
mod tallies;

use crate::{lines::lines, products::products, readings::readings, tallies::tallies};
use log::LevelFilter;
use rowmap::Connection;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Every scenario creates (and first drops) the tables it uses, so the suite can
/// run against an existing database.
pub async fn execute_tests<C: Connection + Clone + Sync>(mut connection: C) {
    products(&mut connection).await;
    readings(&mut connection).await;
    lines(&mut connection).await;
    tallies(&mut connection).await;
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
