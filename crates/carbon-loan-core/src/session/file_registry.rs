//! In-memory registry of files uploaded during a session.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// An uploaded file. The bytes stay in memory and are not serialised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(skip)]
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct FileRegistry {
    files: Vec<StoredFile>,
    next_seq: u64,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, content_type: &str, data: Vec<u8>) -> &StoredFile {
        let uploaded_at = Utc::now();
        self.next_seq += 1;
        self.files.push(StoredFile {
            id: format!("file-{}-{}", uploaded_at.timestamp_millis(), self.next_seq),
            name: name.to_string(),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            uploaded_at,
            data,
        });
        &self.files[self.files.len() - 1]
    }

    /// Files in upload order.
    pub fn list(&self) -> &[StoredFile] {
        &self.files
    }

    pub fn get(&self, id: &str) -> Option<&StoredFile> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn remove(&mut self, id: &str) -> Option<StoredFile> {
        let index = self.files.iter().position(|f| f.id == id)?;
        Some(self.files.remove(index))
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Human-readable size in base-1024 units, two decimals at most:
/// `1536` -> `"1.5 KB"`. Anything past gigabytes stays in GB.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = Decimal::from(bytes);
    let mut unit = 0;
    while value >= Decimal::from(1024) && unit < SIZE_UNITS.len() - 1 {
        value /= Decimal::from(1024);
        unit += 1;
    }
    let value = value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    format!("{} {}", value, SIZE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_get_remove() {
        let mut registry = FileRegistry::new();
        let id = registry.add("fleet.csv", "text/csv", vec![0u8; 300]).id.clone();
        registry.add("invoice.pdf", "application/pdf", vec![1u8; 700]);

        let file = registry.get(&id).unwrap();
        assert_eq!(file.name, "fleet.csv");
        assert_eq!(file.size, 300);
        assert_eq!(registry.total_bytes(), 1000);

        let removed = registry.remove(&id).unwrap();
        assert_eq!(removed.data.len(), 300);
        assert!(registry.get(&id).is_none());
        assert_eq!(registry.len(), 1);
        assert!(registry.remove(&id).is_none());
    }

    #[test]
    fn test_list_keeps_upload_order_and_clear() {
        let mut registry = FileRegistry::new();
        registry.add("a.csv", "text/csv", Vec::new());
        registry.add("b.csv", "text/csv", Vec::new());
        let names: Vec<&str> = registry.list().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
        assert_ne!(registry.list()[0].id, registry.list()[1].id);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_serialised_file_omits_bytes() {
        let mut registry = FileRegistry::new();
        let file = registry.add("a.bin", "application/octet-stream", vec![7u8; 16]);
        let value = serde_json::to_value(file).unwrap();
        assert!(value.get("data").is_none());
        assert_eq!(value["size"], 16);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_048_576), "1 MB");
        assert_eq!(format_size(1_234_567), "1.18 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024 * 1024), "5120 GB");
    }
}
