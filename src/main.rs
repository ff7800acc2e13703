use anyhow::Result;
use tracing::debug;

use license_level::cli::Args;
use license_level::display::{print_json_output, print_text_output};
use license_level::report::parse;
use license_level::utils::{init_logging, read_report, read_text_file};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let report = read_report(args.input.as_deref())?;
    let errors = args
        .errors
        .as_deref()
        .map(read_text_file)
        .transpose()?;

    let summary = parse(&report, errors.as_deref());
    if summary.is_empty() {
        debug!(bytes = report.len(), "no license table and no diagnostics in input");
    }
    debug!(
        features = summary.features.len(),
        has_error = summary.error.is_some(),
        "report parsed"
    );

    let selection = args.selection();
    if args.json {
        print_json_output(&summary, &selection)?;
    } else {
        print_text_output(&summary, &selection);
    }
    Ok(())
}
