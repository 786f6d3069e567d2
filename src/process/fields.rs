use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::process::ProcessRecord;

/// The set of ProcessRecord fields a table can show or sort by.
///
/// The string form of each variant is the name accepted on the command line
/// and printed in the table header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Pid,
    Name,
    CreateTime,
    Cores,
    CpuUsage,
    Status,
    Nice,
    MemoryUsage,
    ReadBytes,
    WriteBytes,
    NThreads,
    Username,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::Pid,
        Field::Name,
        Field::CreateTime,
        Field::Cores,
        Field::CpuUsage,
        Field::Status,
        Field::Nice,
        Field::MemoryUsage,
        Field::ReadBytes,
        Field::WriteBytes,
        Field::NThreads,
        Field::Username,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Pid => "pid",
            Field::Name => "name",
            Field::CreateTime => "create_time",
            Field::Cores => "cores",
            Field::CpuUsage => "cpu_usage",
            Field::Status => "status",
            Field::Nice => "nice",
            Field::MemoryUsage => "memory_usage",
            Field::ReadBytes => "read_bytes",
            Field::WriteBytes => "write_bytes",
            Field::NThreads => "n_threads",
            Field::Username => "username",
        }
    }

    //Numeric columns are right-aligned in the rendered grid.
    pub fn is_numeric(self) -> bool {
        !matches!(
            self,
            Field::Name | Field::Status | Field::Username | Field::CreateTime
        )
    }

    /// Orders two records by this field's raw value: numeric fields
    /// numerically, strings lexicographically, timestamps chronologically.
    /// Formatting never participates in the ordering.
    pub fn compare(self, a: &ProcessRecord, b: &ProcessRecord) -> Ordering {
        match self {
            Field::Pid => a.pid.cmp(&b.pid),
            Field::Name => a.name.cmp(&b.name),
            Field::CreateTime => a.create_time.cmp(&b.create_time),
            Field::Cores => a.cores.cmp(&b.cores),
            Field::CpuUsage => a
                .cpu_usage
                .partial_cmp(&b.cpu_usage)
                .unwrap_or(Ordering::Equal),
            Field::Status => a.status.cmp(&b.status),
            Field::Nice => a.nice.unwrap_or(0).cmp(&b.nice.unwrap_or(0)),
            Field::MemoryUsage => a.memory_usage.cmp(&b.memory_usage),
            Field::ReadBytes => a.read_bytes.cmp(&b.read_bytes),
            Field::WriteBytes => a.write_bytes.cmp(&b.write_bytes),
            Field::NThreads => a.n_threads.cmp(&b.n_threads),
            Field::Username => a.username.cmp(&b.username),
        }
    }

    /// Renders this field of a record for display. Byte counts get a
    /// binary-magnitude suffix, timestamps print as `YYYY-MM-DD HH:MM:SS`,
    /// and an unreadable niceness shows as 0.
    pub fn format(self, record: &ProcessRecord) -> String {
        match self {
            Field::Pid => record.pid.to_string(),
            Field::Name => record.name.clone(),
            Field::CreateTime => record.create_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            Field::Cores => record.cores.to_string(),
            Field::CpuUsage => format!("{:.1}", record.cpu_usage),
            Field::Status => record.status.clone(),
            Field::Nice => record.nice.unwrap_or(0).to_string(),
            Field::MemoryUsage => human_size(record.memory_usage),
            Field::ReadBytes => human_size(record.read_bytes),
            Field::WriteBytes => human_size(record.write_bytes),
            Field::NThreads => record.n_threads.to_string(),
            Field::Username => record.username.clone(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or(())
    }
}

/// Renders a byte count with the largest binary unit that keeps the scaled
/// value below 1024, with two decimal places: 1536 becomes "1.50KB".
pub fn human_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in ["B", "KB", "MB", "GB", "TB"] {
        if value < 1024.0 {
            return format!("{:.2}{}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.2}PB", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn record(pid: i32, name: &str, memory_usage: u64) -> ProcessRecord {
        ProcessRecord {
            pid,
            name: name.to_string(),
            create_time: Local.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            cores: 4,
            cpu_usage: 0.0,
            status: "sleeping".to_string(),
            nice: Some(0),
            memory_usage,
            read_bytes: 0,
            write_bytes: 0,
            n_threads: 1,
            username: "root".to_string(),
        }
    }

    #[test]
    fn every_field_name_parses_back() {
        for field in Field::ALL {
            assert_eq!(field.name().parse::<Field>(), Ok(field));
        }
    }

    #[test]
    fn bogus_field_name_is_rejected() {
        assert!("bogus_field".parse::<Field>().is_err());
        assert!("Memory_Usage".parse::<Field>().is_err());
    }

    #[test]
    fn human_size_magnitudes() {
        assert_eq!(human_size(0), "0.00B");
        assert_eq!(human_size(1024), "1.00KB");
        assert_eq!(human_size(1536), "1.50KB");
        assert_eq!(human_size(1_048_576), "1.00MB");
    }

    #[test]
    fn human_size_stays_below_unit_boundary() {
        assert_eq!(human_size(1023), "1023.00B");
        assert_eq!(human_size(1024 * 1024 * 1024), "1.00GB");
    }

    #[test]
    fn create_time_formats_exactly() {
        let r = record(1, "init", 0);
        assert_eq!(Field::CreateTime.format(&r), "2024-01-15 10:30:00");
    }

    #[test]
    fn unreadable_nice_formats_as_zero() {
        let mut r = record(1, "init", 0);
        r.nice = None;
        assert_eq!(Field::Nice.format(&r), "0");
    }

    #[test]
    fn memory_compare_is_numeric() {
        let small = record(1, "a", 500);
        let large = record(2, "b", 1500);
        assert_eq!(Field::MemoryUsage.compare(&small, &large), Ordering::Less);
        assert_eq!(Field::MemoryUsage.compare(&large, &small), Ordering::Greater);
    }

    #[test]
    fn name_compare_is_lexicographic() {
        let a = record(1, "bash", 0);
        let b = record(2, "zsh", 0);
        assert_eq!(Field::Name.compare(&a, &b), Ordering::Less);
    }
}
