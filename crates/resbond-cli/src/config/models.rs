use resbond::engine::config::{AggregationConfig, OutputConfig};

pub struct AppConfig {
    pub aggregation: AggregationConfig,
    pub output: OutputConfig,
}
