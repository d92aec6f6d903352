use domain::model::vo::{ParameterSet, ParameterValue};

/// Log of the pipeline's combined output, kept inside the output directory.
pub const PROGRESS_FILE: &str = "progress.txt";

/// `python <script> <args...> 2>&1 | tee '<outdir>/progress.txt'`
///
/// The result is later wrapped in double quotes by the submission script, so
/// any double quote in it is turned into a single quote.
pub fn pipeline_command(script: &str, options: &ParameterSet, outdir: &str) -> String {
    let mut args = vec![format!("python {script}")];
    for (key, value) in options.iter() {
        match value {
            ParameterValue::Flag(true) => args.push(format!("--{key}")),
            ParameterValue::Flag(false) => (),
            ParameterValue::Text(value) => args.push(format!("--{key}='{value}'")),
        }
    }
    args.push(format!("2>&1 | tee '{outdir}/{PROGRESS_FILE}'"));

    let command = args.join(" ");
    if command.contains('"') {
        tracing::warn!("Double quotes in the pipeline command will be replaced by single quotes");
        return command.replace('"', "'");
    }
    command
}
