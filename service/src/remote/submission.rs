use typed_builder::TypedBuilder;

/// Audit copy of the launched command, also the script the session runs.
pub const COMMAND_FILE: &str = "command.txt";

/// Everything done on the remote host for one submission, chained with `&&`
/// so the pipeline is never started after a failed step.
#[derive(Debug, Clone, TypedBuilder)]
pub struct SubmitScript<'a> {
    /// Sourced right before the pipeline command so it runs in the user's environment.
    env_file: &'a str,
    command: &'a str,
    outdir: &'a str,
    sample_sheet: &'a str,
}

impl SubmitScript<'_> {
    pub fn job_name(&self) -> String {
        job_name(self.outdir)
    }

    pub fn render(&self) -> String {
        let Self {
            env_file,
            command,
            outdir,
            sample_sheet,
        } = self;
        let script = format!("source {env_file} && {command}");
        let command_file = format!("{outdir}/{COMMAND_FILE}");

        [
            format!(r#"mkdir -p "{outdir}""#),
            format!(r#"cp "{sample_sheet}" "{outdir}/""#),
            format!(r#"echo "{script}" > "{command_file}""#),
            format!(r#"screen -dm -S {} bash "{command_file}""#, self.job_name()),
        ]
        .join(" && ")
    }
}

/// Last path segment of the output directory, spaces replaced by underscores.
pub fn job_name(outdir: &str) -> String {
    let outdir = outdir.trim_end_matches('/');
    outdir.rsplit('/').next().unwrap_or(outdir).replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::{job_name, SubmitScript};

    #[test]
    fn chained_steps() {
        let script = SubmitScript::builder()
            .env_file(".bash_profile")
            .command("python p.py 2>&1 | tee 'runs/out 1/progress.txt'")
            .outdir("runs/out 1")
            .sample_sheet("sheet.csv")
            .build();
        let expected = concat!(
            r#"mkdir -p "runs/out 1" && "#,
            r#"cp "sheet.csv" "runs/out 1/" && "#,
            r#"echo "source .bash_profile && python p.py 2>&1 | tee 'runs/out 1/progress.txt'" > "runs/out 1/command.txt" && "#,
            r#"screen -dm -S out_1 bash "runs/out 1/command.txt""#,
        );
        assert_eq!(script.render(), expected);
    }

    #[test]
    fn job_names() {
        assert_eq!(job_name("output"), "output");
        assert_eq!(job_name("/data/run 2025/out dir"), "out_dir");
        assert_eq!(job_name("runs/outdir/"), "outdir");
        assert_eq!(job_name("/"), "");
    }
}
