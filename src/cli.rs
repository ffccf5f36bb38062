use crate::operations::{MergeSummary, MergeTarget};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "merge-whitelists",
    version,
    about = "Merge two whitelist JSON files, skipping endpoints that only differ by description"
)]
pub struct Args {
    /// Whitelist whose document is kept; new endpoints are appended to it
    pub primary: PathBuf,

    /// Whitelist providing the endpoints to add
    pub secondary: PathBuf,

    /// Output file; when omitted PRIMARY is updated in place
    pub output: Option<PathBuf>,

    /// Do not copy PRIMARY to PRIMARY.bak before updating it in place
    #[arg(long = "no-backup", conflicts_with = "output")]
    pub no_backup: bool,

    /// Compute and report the merge without writing any file
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Verbosity level (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn target(&self) -> MergeTarget {
        match &self.output {
            Some(output) => MergeTarget::NewFile(output.clone()),
            None => MergeTarget::InPlace {
                backup: !self.no_backup,
            },
        }
    }
}

/// Console lines describing the outcome of a merge.
pub fn report(args: &Args, summary: &MergeSummary) -> Vec<String> {
    let destination = args.output.as_ref().unwrap_or(&args.primary);

    if summary.written.is_none() {
        return vec![format!(
            "Would add {} new endpoint(s) to {} (dry run, nothing written)",
            summary.added,
            destination.display()
        )];
    }

    let mut lines = Vec::new();
    match &args.output {
        Some(output) => lines.push(format!("Merged whitelist saved to {}", output.display())),
        None => lines.push(format!(
            "Added {} new endpoint(s) to {}",
            summary.added,
            args.primary.display()
        )),
    }
    if let Some(backup) = &summary.backup {
        lines.push(format!("Backup saved to {}", backup.display()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use std::path::Path;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("merge-whitelists").chain(args.iter().copied()))
    }

    fn summary(written: Option<&str>, backup: Option<&str>) -> MergeSummary {
        MergeSummary {
            added: 3,
            skipped: 1,
            total: 5,
            written: written.map(PathBuf::from),
            backup: backup.map(PathBuf::from),
        }
    }

    #[test]
    fn test_output_argument_selects_new_file() {
        let args = parse(&["a.json", "b.json", "out.json"]).unwrap();
        assert_eq!(args.target(), MergeTarget::NewFile(PathBuf::from("out.json")));
    }

    #[test]
    fn test_in_place_defaults_to_backup() {
        let args = parse(&["a.json", "b.json"]).unwrap();
        assert_eq!(args.target(), MergeTarget::InPlace { backup: true });

        let args = parse(&["a.json", "b.json", "--no-backup"]).unwrap();
        assert_eq!(args.target(), MergeTarget::InPlace { backup: false });
    }

    #[test]
    fn test_verbosity_and_dry_run() {
        let args = parse(&["-vv", "--dry-run", "a.json", "b.json"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(args.dry_run);
        assert_eq!(args.primary, Path::new("a.json"));
    }

    #[test]
    fn test_usage_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["a.json"]).is_err());
        assert_eq!(
            parse(&["a.json", "b.json", "c.json", "d.json"])
                .unwrap_err()
                .kind(),
            ErrorKind::UnknownArgument
        );
        assert_eq!(
            parse(&["a.json", "b.json", "c.json", "--no-backup"])
                .unwrap_err()
                .kind(),
            ErrorKind::ArgumentConflict
        );
    }

    #[test]
    fn test_report_new_file() {
        let args = parse(&["a.json", "b.json", "out.json"]).unwrap();
        assert_eq!(
            report(&args, &summary(Some("out.json"), None)),
            vec!["Merged whitelist saved to out.json".to_string()]
        );
    }

    #[test]
    fn test_report_in_place() {
        let args = parse(&["a.json", "b.json"]).unwrap();
        assert_eq!(
            report(&args, &summary(Some("a.json"), Some("a.json.bak"))),
            vec![
                "Added 3 new endpoint(s) to a.json".to_string(),
                "Backup saved to a.json.bak".to_string()
            ]
        );
    }

    #[test]
    fn test_report_dry_run() {
        let args = parse(&["--dry-run", "a.json", "b.json", "out.json"]).unwrap();
        let lines = report(&args, &summary(None, None));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Would add 3 new endpoint(s) to out.json"));
    }
}
