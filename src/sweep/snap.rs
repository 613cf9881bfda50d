use super::cleaner::Invocation;

/// A superseded snap revision kept around for rollback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapRevision {
    pub name: String,
    pub revision: String,
}

impl SnapRevision {
    /// Privileged command that drops this revision
    pub fn removal(&self) -> Invocation {
        let revision = format!("--revision={}", self.revision);
        Invocation::privileged("snap", &["remove", self.name.as_str(), revision.as_str()])
    }
}

/// Listing command whose output [`parse_disabled`] reads
pub fn list_all() -> Invocation {
    Invocation::new("snap", &["list", "--all"])
}

/// Pick `(name, rev)` from every row of `snap list --all` that mentions
/// `disabled`. Columns are `Name Version Rev Tracking Publisher Notes`.
pub fn parse_disabled(listing: &str) -> Vec<SnapRevision> {
    listing
        .lines()
        .filter(|line| line.contains("disabled"))
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            match cols.as_slice() {
                [name, _version, revision, ..] if *name != "Name" => Some(SnapRevision {
                    name: name.to_string(),
                    revision: revision.to_string(),
                }),
                _ => None,
            }
        })
        .collect()
}
