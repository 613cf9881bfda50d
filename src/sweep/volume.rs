use serde::Serialize;

use super::cleaner::{Cleaner, Invocation};

/// Space on one mounted filesystem, as `df` sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeReport {
    pub filesystem: String,
    pub mounted_on: String,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
    pub capacity_percent: u8,
}

/// Parse one POSIX `df -Pk` data row. Mount points containing spaces are
/// rejoined with single spaces.
fn parse_row(line: &str) -> Option<VolumeReport> {
    let cols: Vec<&str> = line.split_whitespace().collect();
    if cols.len() < 6 {
        return None;
    }
    let kib = |s: &str| s.parse::<u64>().ok().and_then(|v| v.checked_mul(1024));

    Some(VolumeReport {
        filesystem: cols[0].to_string(),
        total_bytes: kib(cols[1])?,
        used_bytes: kib(cols[2])?,
        available_bytes: kib(cols[3])?,
        capacity_percent: cols[4].trim_end_matches('%').parse().ok()?,
        mounted_on: cols[5..].join(" "),
    })
}

/// All data rows of a `df -Pk` listing; the header and malformed rows are dropped
pub fn parse_df(listing: &str) -> Vec<VolumeReport> {
    listing.lines().skip(1).filter_map(parse_row).collect()
}

/// Row whose device or mount point is exactly `volume`
pub fn find_volume(listing: &str, volume: &str) -> Option<VolumeReport> {
    parse_df(listing)
        .into_iter()
        .find(|v| v.filesystem == volume || v.mounted_on == volume)
}

/// Free space on `volume` (a device like `/dev/nvme0n1p2` or a mount point).
///
/// The full listing is searched first; a path that is neither falls back to
/// `df -Pk <path>`, which reports the filesystem holding it.
pub fn report(cleaner: &dyn Cleaner, volume: &str) -> Option<VolumeReport> {
    let listing = match cleaner.run(&Invocation::new("df", &["-Pk"])) {
        Ok(listing) => listing,
        Err(e) => {
            tracing::warn!(error = %e, "could not read filesystem table");
            return None;
        }
    };

    if let Some(found) = find_volume(&listing, volume) {
        return Some(found);
    }

    if volume.starts_with('/') {
        if let Ok(listing) = cleaner.run(&Invocation::new("df", &["-Pk", volume])) {
            if let Some(found) = parse_df(&listing).pop() {
                return Some(found);
            }
        }
    }

    tracing::warn!(volume, "volume not found in filesystem table");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const DF: &str = "\
Filesystem     1024-blocks      Used Available Capacity Mounted on
tmpfs              1630108      2364   1627744       1% /run
/dev/nvme0n1p2   490617784 245308892 220297140      53% /
/dev/nvme0n1p1      523248      6220    517028       2% /boot/efi
/dev/sdb1        976284628 100000000 876284628      11% /media/dev/Backup Disk
";

    #[test]
    fn test_find_by_device() {
        let v = find_volume(DF, "/dev/nvme0n1p2").unwrap();
        assert_eq!(v.mounted_on, "/");
        assert_eq!(v.available_bytes, 220297140 * 1024);
        assert_eq!(v.capacity_percent, 53);
    }

    #[test]
    fn test_find_by_mount_point() {
        let v = find_volume(DF, "/boot/efi").unwrap();
        assert_eq!(v.filesystem, "/dev/nvme0n1p1");
    }

    #[test]
    fn test_mount_point_with_spaces() {
        let v = find_volume(DF, "/media/dev/Backup Disk").unwrap();
        assert_eq!(v.filesystem, "/dev/sdb1");
    }

    #[test]
    fn test_unknown_volume() {
        assert!(find_volume(DF, "/dev/sdz9").is_none());
        assert_eq!(parse_df(DF).len(), 4);
        assert!(parse_df("garbage\nnot a row\n").is_empty());
    }

    #[test]
    fn test_oversized_row_dropped() {
        let listing = "\
Filesystem     1024-blocks      Used Available Capacity Mounted on
/dev/bogus   18446744073709551615 1 1 1% /bogus
/dev/nvme0n1p2   490617784 245308892 220297140      53% /
";
        let rows = parse_df(listing);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mounted_on, "/");
        assert!(find_volume(listing, "/bogus").is_none());
    }
}
