use clap::Parser;

/// Tabular process viewer and monitor.
#[derive(Debug, Parser)]
#[command(name = "procview", version, about = "Process viewer & monitor")]
pub struct Args {
    /// Columns to show. Available: pid, name, create_time, cores, cpu_usage,
    /// status, nice, memory_usage, read_bytes, write_bytes, n_threads,
    /// username
    #[arg(
        short,
        long,
        default_value = "pid,name,cpu_usage,memory_usage,read_bytes,write_bytes,status,create_time,nice,n_threads,cores"
    )]
    pub columns: String,

    /// Column to sort by
    #[arg(short, long, default_value = "memory_usage")]
    pub sort_by: String,

    /// Sort in descending order
    #[arg(long)]
    pub descending: bool,

    /// Number of processes to show; 0 shows all
    #[arg(short = 'n', long = "limit", default_value_t = 25)]
    pub limit: usize,

    /// Keep the program on, refreshing the table until interrupted
    #[arg(short = 'u', long)]
    pub live_update: bool,

    /// Seconds between refreshes in live-update mode
    #[arg(short, long, default_value_t = 0.7)]
    pub interval: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_surface() {
        let args = Args::parse_from(["procview"]);
        assert_eq!(args.sort_by, "memory_usage");
        assert_eq!(args.limit, 25);
        assert!(!args.descending);
        assert!(!args.live_update);
        assert_eq!(args.interval, 0.7);
        assert!(args.columns.starts_with("pid,name,"));
    }

    #[test]
    fn flags_parse() {
        let args = Args::parse_from([
            "procview",
            "-c",
            "pid,name",
            "-s",
            "cpu_usage",
            "--descending",
            "-n",
            "0",
            "-u",
            "-i",
            "2.5",
        ]);
        assert_eq!(args.columns, "pid,name");
        assert_eq!(args.sort_by, "cpu_usage");
        assert!(args.descending);
        assert_eq!(args.limit, 0);
        assert!(args.live_update);
        assert_eq!(args.interval, 2.5);
    }
}
