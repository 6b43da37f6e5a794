/// Engine tunables. None of these affect query results.
#[derive(Debug, Clone)]
pub struct Config {
    pub shard_count: usize,      // Buckets in the parallel scoring accumulator
    pub query_cache_size: usize, // Cached (query, status) result lists
}

impl Default for Config {
    fn default() -> Self {
        Config {
            shard_count: num_cpus::get().max(4), // Per-document contention is low
            query_cache_size: 128,
        }
    }
}
