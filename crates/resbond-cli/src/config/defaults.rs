use resbond::engine::config::DEFAULT_CHUNK_SIZE;

pub struct DefaultsConfig {
    pub threshold: u64,
    pub chunk_size: usize,
    pub isolate_records: bool,
    pub outfile: String,
    pub include_order: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            threshold: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
            isolate_records: false,
            outfile: "bonds.json".to_string(),
            include_order: false,
        }
    }
}
