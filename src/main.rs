use anyhow::{Context, Result};
use clap::Parser;
use whitelist_merge::cli::{report, Args};
use whitelist_merge::logger::init_logger;
use whitelist_merge::operations::merge_files;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let summary = merge_files(&args.primary, &args.secondary, &args.target(), args.dry_run)
        .with_context(|| {
            format!(
                "Failed to merge {} into {}",
                args.secondary.display(),
                args.primary.display()
            )
        })?;

    for line in report(&args, &summary) {
        println!("{}", line);
    }

    Ok(())
}
