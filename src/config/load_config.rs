use serde::{Serialize, Deserialize};

/// Parsing policy applied when an IDX buffer is turned into a container.
///
/// # Fields
/// - `min_file_size`:        corruption floor in bytes; buffers shorter than
///                            `max(min_file_size, header size)` are rejected
/// - `check_dtype`:          require the reserved bytes to be zero and the
///                            dtype byte to be `0x08` (unsigned byte)
/// - `allow_trailing_bytes`: accept buffers longer than header + payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadConfig {
    pub min_file_size: usize,
    pub check_dtype: bool,
    pub allow_trailing_bytes: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        LoadConfig {
            min_file_size: 100,
            check_dtype: true,
            allow_trailing_bytes: true,
        }
    }
}

impl LoadConfig {
    /// A config with no size floor, for small in-memory buffers.
    pub fn lenient() -> Self {
        LoadConfig { min_file_size: 0, ..LoadConfig::default() }
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a `LoadConfig` from a JSON file.
    pub fn load_json(path: &str) -> std::io::Result<LoadConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}
