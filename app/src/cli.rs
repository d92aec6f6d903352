use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use domain::{
    model::vo::{Mode, ParameterSet, ParameterValue},
    service::ParameterStore,
};

#[derive(Debug, Parser)]
#[command(name = "launcher")]
#[command(about = "Submit and watch Qiime2 pipeline runs on a remote host", long_about = None)]
pub struct Cli {
    /// Extra YAML config, applied over `launcher.yaml`
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the pipeline in a detached session on the remote host
    Submit {
        #[command(flatten)]
        form: FormArgs,
        /// Do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Load a parameter file onto the form and print the result
    Load {
        file: PathBuf,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Write the form to a parameter file (.txt, .tsv, .tab or .csv)
    Save {
        file: PathBuf,
        #[command(flatten)]
        form: FormArgs,
    },
    /// List the jobs running on the remote host
    Dashboard {
        #[command(flatten)]
        form: FormArgs,
        /// Keep refreshing until interrupted
        #[arg(long)]
        watch: bool,
    },
    /// Quit the given jobs, then list what is left
    Kill {
        #[arg(required = true, value_name = "JOB_ID")]
        job_ids: Vec<String>,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Pick actions from a menu
    Menu {
        #[command(flatten)]
        form: FormArgs,
    },
}

/// How the form is filled before the action runs.
#[derive(Debug, Default, Args)]
pub struct FormArgs {
    /// Form layout [default: from config]
    #[arg(long)]
    pub mode: Option<Mode>,

    /// Parameter file loaded onto the form
    #[arg(short, long, value_name = "FILE")]
    pub parameters: Option<PathBuf>,

    /// Set a text option
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub set: Vec<(String, String)>,

    /// Turn a flag on
    #[arg(long = "flag", value_name = "KEY")]
    pub flags: Vec<String>,

    /// Turn a flag off, or drop an option from the command line
    #[arg(long = "unset", value_name = "KEY")]
    pub unset: Vec<String>,
}

impl Command {
    pub fn form(&self) -> &FormArgs {
        match self {
            Self::Submit { form, .. }
            | Self::Load { form, .. }
            | Self::Save { form, .. }
            | Self::Dashboard { form, .. }
            | Self::Kill { form, .. }
            | Self::Menu { form } => form,
        }
    }
}

impl FormArgs {
    /// Template of the mode, then the parameter file, then single edits.
    pub async fn build(
        &self,
        default_mode: Mode,
        store: &impl ParameterStore,
    ) -> anyhow::Result<ParameterSet> {
        let mut form = self.mode.unwrap_or(default_mode).template();
        if let Some(path) = &self.parameters {
            let loaded = store
                .read(path)
                .await
                .with_context(|| format!("Cannot load {}", path.display()))?;
            form.apply(loaded);
        }
        self.edit(&mut form);
        Ok(form)
    }

    fn edit(&self, form: &mut ParameterSet) {
        for (key, value) in &self.set {
            form.insert(key.as_str(), value.as_str());
        }
        for key in &self.flags {
            form.insert(key.as_str(), true);
        }
        for key in &self.unset {
            if matches!(form.get(key), Some(ParameterValue::Flag(_))) {
                form.insert(key.as_str(), false);
            } else {
                form.remove(key);
            }
        }
    }
}

pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in `{s}`"));
    }
    Ok((key.to_owned(), value.trim().to_owned()))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::CommandFactory;
    use domain::model::vo::parameter::HOST;

    use super::*;

    struct OneFile(ParameterSet);

    #[async_trait::async_trait]
    impl ParameterStore for OneFile {
        async fn read(&self, _: &Path) -> anyhow::Result<ParameterSet> {
            Ok(self.0.clone())
        }

        async fn write(&self, _: &ParameterSet, _: &Path) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("launcher").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn key_value() {
        assert_eq!(
            parse_key_value("Qiime2 Pipeline = qiime2_pipeline-2.10.2"),
            Ok(("Qiime2 Pipeline".to_owned(), "qiime2_pipeline-2.10.2".to_owned()))
        );
        assert_eq!(parse_key_value("url=a=b"), Ok(("url".to_owned(), "a=b".to_owned())));
        assert!(parse_key_value("threads").is_err());
        assert!(parse_key_value("=4").is_err());
    }

    #[test]
    fn kill_needs_job_ids() {
        assert!(Cli::try_parse_from(["launcher", "kill"]).is_err());
        let cli = parse(&["kill", "1.a", "2.b", "--set", "User=me"]);
        let Command::Kill { job_ids, form } = cli.command else {
            panic!("expected kill");
        };
        assert_eq!(job_ids, ["1.a", "2.b"]);
        assert_eq!(form.set, [("User".to_owned(), "me".to_owned())]);
    }

    #[tokio::test]
    async fn form_layers() {
        let cli = parse(&[
            "submit",
            "--mode",
            "pacbio",
            "-p",
            "parameters.txt",
            "--set",
            "threads=8",
            "--flag",
            "skip-otu",
            "--unset",
            "run-picrust2",
            "--unset",
            "colormap",
            "-y",
        ]);
        let file: ParameterSet = [
            (HOST, ParameterValue::from("10.0.0.2")),
            ("threads", "4".into()),
            ("run-picrust2", true.into()),
        ]
        .into_iter()
        .collect();

        let form = cli
            .command
            .form()
            .build(Mode::Illumina, &OneFile(file))
            .await
            .unwrap();

        assert_eq!(form.text(HOST), Some("10.0.0.2"));
        assert_eq!(form.text("sequencing-platform"), Some("pacbio"));
        assert_eq!(form.text("threads"), Some("8"));
        assert_eq!(form.get("skip-otu"), Some(&ParameterValue::Flag(true)));
        assert_eq!(form.get("run-picrust2"), Some(&ParameterValue::Flag(false)));
        assert!(form.get("colormap").is_none());
        assert!(matches!(cli.command, Command::Submit { yes: true, .. }));
    }

    #[tokio::test]
    async fn default_mode_from_config() {
        let form = FormArgs::default()
            .build(Mode::PacBio, &OneFile(ParameterSet::new()))
            .await
            .unwrap();
        assert_eq!(form, Mode::PacBio.template());
    }
}
