use serde::Deserialize;

use crate::visuals::VisualizationKind;

/// Immutable description of one pipeline step. Catalog order is pipeline order.
#[derive(Debug, Clone, PartialEq)]
pub struct StepDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub duration_secs: f64,
    pub details: Vec<String>,
    pub logs: Vec<String>,
    pub files: Option<StepFiles>,
    pub visualization: VisualizationKind,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StepFiles {
    #[serde(default)]
    pub input: Vec<String>,
    #[serde(default)]
    pub output: Vec<String>,
    #[serde(default)]
    pub processing: String,
}

impl StepDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration_secs: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            duration_secs,
            details: Vec::new(),
            logs: Vec::new(),
            files: None,
            visualization: VisualizationKind::Terminal,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_details<I, S>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details = details.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_logs<I, S>(mut self, logs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.logs = logs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_files(mut self, input: &[&str], output: &[&str], processing: &str) -> Self {
        self.files = Some(StepFiles {
            input: input.iter().map(|s| s.to_string()).collect(),
            output: output.iter().map(|s| s.to_string()).collect(),
            processing: processing.to_string(),
        });
        self
    }

    pub fn with_visualization(mut self, kind: VisualizationKind) -> Self {
        self.visualization = kind;
        self
    }
}

/// The seven-stage eDNA biodiversity pipeline shown by default.
pub fn builtin_catalog() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new("data-download", "Data Download & Setup", 12.0)
            .with_description("Downloading raw sequencing data from SRA/ENA databases")
            .with_details([
                "Connecting to SRA database",
                "Downloading FASTQ files",
                "Validating file integrity",
                "Setting up workspace directories",
            ])
            .with_logs([
                "prefetch SRR12345678",
                "fastq-dump --split-files SRR12345678",
                "Downloading: SRR12345678_1.fastq.gz (2.1 GB)",
                "Downloading: SRR12345678_2.fastq.gz (2.1 GB)",
                "MD5 checksum validation: PASSED",
                "Files downloaded successfully to /data/raw/",
            ])
            .with_files(
                &[],
                &["SRR12345678_1.fastq.gz", "SRR12345678_2.fastq.gz"],
                "Downloading raw sequencing data...",
            )
            .with_visualization(VisualizationKind::FileProcessing),
        StepDefinition::new("quality-control", "Quality Control & Trimming", 15.0)
            .with_description("Analyzing sequence quality and trimming adapters with fastp")
            .with_details([
                "Running FastQC analysis",
                "Adapter sequence detection",
                "Quality trimming (Q>20)",
                "Generating QC reports",
            ])
            .with_logs([
                "fastp -i SRR12345678_1.fastq.gz -I SRR12345678_2.fastq.gz",
                "Detecting adapter sequences...",
                "Read1 before filtering: 1,234,567 reads",
                "Read2 before filtering: 1,234,567 reads",
                "Quality filtering: Q>20, length>100bp",
                "Reads after filtering: 1,189,432 (96.3%)",
                "HTML report generated: fastp_report.html",
            ])
            .with_files(
                &["SRR12345678_1.fastq.gz", "SRR12345678_2.fastq.gz"],
                &["trimmed_R1.fastq.gz", "trimmed_R2.fastq.gz", "fastp_report.html"],
                "Quality filtering and adapter trimming...",
            )
            .with_visualization(VisualizationKind::QualityMetrics),
        StepDefinition::new("read-merging", "Paired-end Read Merging", 10.0)
            .with_description("Merging overlapping paired-end reads using vsearch")
            .with_details([
                "Detecting read overlaps",
                "Merging paired reads",
                "Quality score adjustment",
                "Filtering merged reads",
            ])
            .with_logs([
                "vsearch --fastq_mergepairs trimmed_R1.fastq.gz",
                "Merging paired-end reads...",
                "Minimum overlap: 15bp",
                "Maximum mismatches: 2",
                "Merged reads: 987,654 (83.0%)",
                "Mean merged length: 253bp",
                "Output: merged_reads.fastq",
            ])
            .with_files(
                &["trimmed_R1.fastq.gz", "trimmed_R2.fastq.gz"],
                &["merged_reads.fastq", "unmerged_R1.fastq", "unmerged_R2.fastq"],
                "Merging overlapping read pairs...",
            )
            .with_visualization(VisualizationKind::ReadMerging),
        StepDefinition::new("asv-inference", "ASV Inference (DADA2)", 20.0)
            .with_description("Denoising sequences and inferring Amplicon Sequence Variants")
            .with_details([
                "Learning error model",
                "Sequence denoising",
                "ASV inference",
                "Chimera detection and removal",
            ])
            .with_logs([
                "dada2 --input merged_reads.fastq",
                "Learning error rates from 987,654 reads...",
                "Error model converged after 7 iterations",
                "Denoising sequences...",
                "Inferred 12,847 unique ASVs",
                "Detecting chimeric sequences...",
                "Removed 1,203 chimeras (9.4%)",
                "Final ASV count: 11,644",
                "Output: asv_table.csv, rep_seqs.fasta",
            ])
            .with_files(
                &["merged_reads.fastq"],
                &["asv_table.csv", "rep_seqs.fasta", "dada2_stats.txt"],
                "Inferring amplicon sequence variants...",
            )
            .with_visualization(VisualizationKind::AsvProcessing),
        StepDefinition::new("taxonomic-classification", "Taxonomic Classification", 18.0)
            .with_description("Assigning taxonomy using MMseqs2 and SILVA database")
            .with_details([
                "Database preparation",
                "MMseqs2 search execution",
                "Confidence scoring",
                "Taxonomic assignment",
            ])
            .with_logs([
                "mmseqs createdb rep_seqs.fasta queryDB",
                "mmseqs search queryDB silva_db resultDB tmp",
                "Searching 11,644 sequences against SILVA database...",
                "Processing: [████████████████████████████████] 100%",
                "Assigned taxonomy: 8,932 sequences (76.7%)",
                "Unassigned sequences: 2,712 (23.3%)",
                "Mean alignment identity: 94.2%",
                "Output: taxonomy_assignments.txt",
            ])
            .with_files(
                &["rep_seqs.fasta", "asv_table.csv"],
                &["taxonomy_assignments.txt", "alignment_results.txt"],
                "Searching against reference databases...",
            )
            .with_visualization(VisualizationKind::BlastResults),
        StepDefinition::new("novelty-detection", "Novel Species Detection", 25.0)
            .with_description("DNABERT embedding analysis for unassigned sequences")
            .with_details([
                "Extracting unassigned sequences",
                "Generating DNABERT embeddings",
                "Clustering analysis",
                "Novel species candidate identification",
            ])
            .with_logs([
                "python dnabert_embeddings.py --input unassigned_seqs.fasta",
                "Loading DNABERT-S model...",
                "Model loaded: 6-mer embeddings, 768 dimensions",
                "Generating embeddings for 2,712 sequences...",
                "GPU acceleration enabled (CUDA)",
                "Embedding generation: [████████████████] 100%",
                "Running HDBSCAN clustering...",
                "Identified 47 potential novel species clusters",
                "Top candidates: 8 clusters with >50 reads each",
                "Output: embeddings.npy, clusters.csv",
            ])
            .with_files(
                &["rep_seqs.fasta", "taxonomy_assignments.txt"],
                &["embeddings.npy", "novel_clusters.csv", "candidate_species.fasta"],
                "Analyzing sequence embeddings for novelty...",
            )
            .with_visualization(VisualizationKind::EmbeddingSpace),
        StepDefinition::new("diversity-analysis", "Biodiversity Analysis", 8.0)
            .with_description("Computing diversity metrics and generating final reports")
            .with_details([
                "Alpha diversity calculation",
                "Beta diversity analysis",
                "Species accumulation curves",
                "Report generation",
            ])
            .with_logs([
                "python diversity_analysis.py --asv_table asv_table.csv",
                "Calculating alpha diversity metrics...",
                "Shannon diversity: 4.23 ± 0.18",
                "Simpson diversity: 0.94 ± 0.02",
                "Observed species: 8,932",
                "Computing beta diversity (Bray-Curtis)...",
                "Generating species accumulation curves...",
                "Creating final biodiversity report...",
                "Report saved: biodiversity_report.html",
            ])
            .with_files(
                &["asv_table.csv", "taxonomy_assignments.txt", "novel_clusters.csv"],
                &["diversity_metrics.csv", "biodiversity_report.html", "ordination_plot.png"],
                "Computing biodiversity metrics and generating reports...",
            )
            .with_visualization(VisualizationKind::DiversityMetrics),
    ]
}
