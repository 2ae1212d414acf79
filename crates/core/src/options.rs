use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct OrganizeOptions {
    pub dest_dir: Option<PathBuf>,
    pub dry_run: bool,
    pub group_by_date: bool,
    pub group_by_ext: bool,
    pub clean: bool,
}
