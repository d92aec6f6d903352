use serde::Deserialize;
use strum::{AsRefStr, EnumString};

use super::parameter::{ParameterSet, ParameterValue, HOST, PIPELINE, PORT, USER};

/// Sequencing platform the form is laid out for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    #[default]
    Illumina,
    PacBio,
}

enum Field {
    Choices(&'static [&'static str]),
    Flag,
}

use Field::{Choices, Flag};

const CONNECTION: &[(&str, Field)] = &[
    (USER, Choices(&[""])),
    (HOST, Choices(&["255.255.255.255"])),
    (PORT, Choices(&["22"])),
    (PIPELINE, Choices(&["qiime2_pipeline-2.10.2"])),
];

const COLORMAPS: &[&str] = &[
    "Set1", "Set2", "Set3", "tab10", "tab20", "tab20b", "tab20c", "Pastel1", "Pastel2", "Paired",
    "Accent", "Dark2",
];

const FEATURE_LEVELS: &[&str] = &[
    "feature", "species", "genus", "family", "order", "class", "phylum",
];

const ILLUMINA: &[(&str, Field)] = &[
    ("sample-sheet", Choices(&["sample-sheet.csv"])),
    ("fq-dir", Choices(&["data"])),
    ("fq1-suffix", Choices(&["_R1.fastq.gz"])),
    ("fq2-suffix", Choices(&["_R2.fastq.gz"])),
    ("outdir", Choices(&["output"])),
    ("feature-classifier", Choices(&["nb", "vsearch"])),
    ("nb-classifier-qza", Choices(&["silva-138-99-nb-classifier.qza"])),
    ("reference-sequence-qza", Choices(&["silva-138-99-seqs.qza"])),
    ("reference-taxonomy-qza", Choices(&["silva-138-99-tax.qza"])),
    ("vsearch-classifier-max-hits", Choices(&["10"])),
    ("sequencing-platform", Choices(&["illumina"])),
    ("threads", Choices(&["1", "4", "8"])),
    ("paired-end-mode", Choices(&["merge", "pool"])),
    ("skip-otu", Flag),
    ("otu-identity", Choices(&["0.97"])),
    ("clip-r1-5-prime", Choices(&["17"])),
    ("clip-r2-5-prime", Choices(&["20"])),
    ("classifier-reads-per-batch", Choices(&["1000"])),
    ("max-expected-error-bases", Choices(&["8.0"])),
    ("alpha-metrics", Choices(&["all"])),
    ("beta-diversity-feature-level", Choices(FEATURE_LEVELS)),
    ("heatmap-read-fraction", Choices(&["0.95"])),
    ("n-taxa-barplot", Choices(&["20"])),
    ("colormap", Choices(COLORMAPS)),
    ("invert-colors", Flag),
    ("publication-figure", Flag),
    ("skip-differential-abundance", Flag),
    ("differential-abundance-p-value", Choices(&["0.05"])),
    ("run-picrust2", Flag),
];

const PACBIO: &[(&str, Field)] = &[
    ("sample-sheet", Choices(&["sample-sheet.csv"])),
    ("fq-dir", Choices(&["data"])),
    ("fq1-suffix", Choices(&[".fastq.gz"])),
    ("outdir", Choices(&["output"])),
    ("feature-classifier", Choices(&["nb", "vsearch"])),
    ("nb-classifier-qza", Choices(&["silva-138-99-nb-classifier.qza"])),
    ("reference-sequence-qza", Choices(&["silva-138-99-seqs.qza"])),
    ("reference-taxonomy-qza", Choices(&["silva-138-99-tax.qza"])),
    ("vsearch-classifier-max-hits", Choices(&["10"])),
    ("sequencing-platform", Choices(&["pacbio"])),
    ("threads", Choices(&["1", "4", "8"])),
    ("skip-otu", Flag),
    ("otu-identity", Choices(&["0.97"])),
    ("classifier-reads-per-batch", Choices(&["1000"])),
    ("max-expected-error-bases", Choices(&["8.0"])),
    ("alpha-metrics", Choices(&["all"])),
    ("beta-diversity-feature-level", Choices(FEATURE_LEVELS)),
    ("heatmap-read-fraction", Choices(&["0.95"])),
    ("n-taxa-barplot", Choices(&["20"])),
    ("colormap", Choices(COLORMAPS)),
    ("invert-colors", Flag),
    ("publication-figure", Flag),
    ("skip-differential-abundance", Flag),
    ("differential-abundance-p-value", Choices(&["0.05"])),
    ("run-picrust2", Flag),
];

impl Mode {
    fn fields(&self) -> &'static [(&'static str, Field)] {
        match self {
            Self::Illumina => ILLUMINA,
            Self::PacBio => PACBIO,
        }
    }

    /// A fresh form: connection keys, then pipeline options in form order.
    pub fn template(&self) -> ParameterSet {
        CONNECTION
            .iter()
            .chain(self.fields())
            .map(|(key, field)| {
                let value = match field {
                    Choices(choices) => ParameterValue::from(choices[0]),
                    Flag => ParameterValue::Flag(false),
                };
                (*key, value)
            })
            .collect()
    }
}
