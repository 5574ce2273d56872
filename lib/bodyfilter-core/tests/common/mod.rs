use rstest::fixture;
use serde_json::Value;
use tracing::info;

pub const JSON: &str = "application/json";

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();

    info!("Tracing initialized");
}

#[fixture]
pub fn student() -> &'static str {
    init_tracing();
    include_str!("../fixtures/student.json")
}

pub fn parse(body: &str) -> anyhow::Result<Value> {
    let value = serde_json::from_str(body)?;
    Ok(value)
}

pub fn without_whitespace(body: &str) -> String {
    body.chars().filter(|ch| !ch.is_whitespace()).collect()
}
