use crate::storage::{CURRENT_DATASET_KEY, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Project,
    Expedition,
    Sample,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetMetadata {
    pub location: String,
    pub depth: String,
    pub date: String,
    pub platform: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub kind: DatasetKind,
    pub path: String,
    pub size: Option<String>,
    pub file_count: Option<u32>,
    pub metadata: Option<DatasetMetadata>,
    pub children: Vec<Dataset>,
}

impl Dataset {
    fn new(id: &str, name: &str, kind: DatasetKind, path: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            path: path.to_string(),
            size: None,
            file_count: None,
            metadata: None,
            children: Vec::new(),
        }
    }

    fn sized(mut self, size: &str, file_count: Option<u32>) -> Self {
        self.size = Some(size.to_string());
        self.file_count = file_count;
        self
    }

    fn described(
        mut self,
        location: &str,
        depth: &str,
        date: &str,
        platform: &str,
        description: &str,
    ) -> Self {
        self.metadata = Some(DatasetMetadata {
            location: location.to_string(),
            depth: depth.to_string(),
            date: date.to_string(),
            platform: platform.to_string(),
            description: description.to_string(),
        });
        self
    }

    fn with_children(mut self, children: Vec<Dataset>) -> Self {
        self.children = children;
        self
    }
}

/// Read-only tree of datasets available for a run.
#[derive(Debug, Clone)]
pub struct DatasetRepository {
    roots: Vec<Dataset>,
}

impl DatasetRepository {
    pub fn new(roots: Vec<Dataset>) -> Self {
        Self { roots }
    }

    pub fn mock() -> Self {
        use DatasetKind::*;

        let mariana = Dataset::new(
            "mariana-expedition-2024",
            "Mariana Trench Deep Survey 2024",
            Project,
            "/datasets/mariana-expedition-2024",
        )
        .sized("2.8 TB", Some(45))
        .with_children(vec![
            Dataset::new(
                "challenger-deep-samples",
                "Challenger Deep - Hadal Zone",
                Expedition,
                "/datasets/mariana-expedition-2024/challenger-deep",
            )
            .sized("1.2 TB", Some(18))
            .described(
                "Challenger Deep, Mariana Trench",
                "10,000-11,000m",
                "March 2024",
                "Illumina NovaSeq 6000",
                "Deep hadal zone eDNA sampling from the deepest part of Earth's oceans",
            )
            .with_children(vec![
                Dataset::new(
                    "sample-MD24-001",
                    "MD24-001_S1_L001_R1_001.fastq.gz",
                    Sample,
                    "/datasets/mariana-expedition-2024/challenger-deep/MD24-001",
                )
                .sized("1.2 GB", None)
                .described(
                    "11.373°N, 142.591°E",
                    "10,994m",
                    "2024-03-15",
                    "Illumina NovaSeq 6000",
                    "2.45M paired-end reads, 16S rRNA V4 region",
                ),
                Dataset::new(
                    "sample-MD24-002",
                    "MD24-002_S2_L001_R1_001.fastq.gz",
                    Sample,
                    "/datasets/mariana-expedition-2024/challenger-deep/MD24-002",
                )
                .sized("1.1 GB", None),
            ]),
            Dataset::new(
                "sirena-deep-samples",
                "Sirena Deep - Abyssal Transition",
                Expedition,
                "/datasets/mariana-expedition-2024/sirena-deep",
            )
            .sized("0.9 TB", Some(12)),
        ]);

        let pacific = Dataset::new(
            "pacific-deep-survey-2024",
            "Pacific Deep Water Survey 2024",
            Project,
            "/datasets/pacific-deep-survey-2024",
        )
        .sized("4.1 TB", Some(67))
        .with_children(vec![
            Dataset::new(
                "japan-trench",
                "Japan Trench Samples",
                Expedition,
                "/datasets/pacific-deep-survey-2024/japan-trench",
            )
            .sized("1.8 GB", Some(24)),
            Dataset::new(
                "kermadec-trench",
                "Kermadec Trench Samples",
                Expedition,
                "/datasets/pacific-deep-survey-2024/kermadec-trench",
            )
            .sized("1.4 GB", Some(19)),
        ]);

        let atlantic = Dataset::new(
            "atlantic-ridge-survey",
            "Atlantic Ridge Biodiversity Survey",
            Project,
            "/datasets/atlantic-ridge-survey",
        )
        .sized("3.2 TB", Some(52))
        .with_children(vec![
            Dataset::new(
                "puerto-rico-trench",
                "Puerto Rico Trench",
                Expedition,
                "/datasets/atlantic-ridge-survey/puerto-rico-trench",
            )
            .sized("0.6 TB", Some(9)),
        ]);

        Self::new(vec![mariana, pacific, atlantic])
    }

    pub fn roots(&self) -> &[Dataset] {
        &self.roots
    }

    /// Depth-first lookup by id.
    pub fn find(&self, id: &str) -> Option<&Dataset> {
        let mut stack: Vec<&Dataset> = self.roots.iter().rev().collect();

        while let Some(dataset) = stack.pop() {
            if dataset.id == id {
                return Some(dataset);
            }
            stack.extend(dataset.children.iter().rev());
        }

        None
    }

    /// Every dataset in the tree, parents before children.
    pub fn flatten(&self) -> Vec<&Dataset> {
        let mut out = Vec::new();
        let mut stack: Vec<&Dataset> = self.roots.iter().rev().collect();

        while let Some(dataset) = stack.pop() {
            out.push(dataset);
            stack.extend(dataset.children.iter().rev());
        }

        out
    }

    /// Dataset whose id is stored under `currentDataset`, if it still exists.
    pub fn current(&self, store: &impl KeyValueStore) -> Option<&Dataset> {
        store
            .get(CURRENT_DATASET_KEY)
            .and_then(|id| self.find(&id))
    }

    /// Records `id` as the current dataset. Unknown ids leave the store as is.
    pub fn select(&self, store: &mut impl KeyValueStore, id: &str) -> Option<&Dataset> {
        let dataset = self.find(id)?;
        store.set(CURRENT_DATASET_KEY, &dataset.id);
        Some(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn find_reaches_nested_samples() {
        let repo = DatasetRepository::mock();
        let sample = repo.find("sample-MD24-001").unwrap();

        assert_eq!(sample.kind, DatasetKind::Sample);
        assert_eq!(sample.metadata.as_ref().unwrap().depth, "10,994m");
        assert!(repo.find("no-such-dataset").is_none());
    }

    #[test]
    fn flatten_is_preorder() {
        let repo = DatasetRepository::mock();
        let ids: Vec<&str> = repo.flatten().iter().map(|d| d.id.as_str()).collect();

        assert_eq!(
            &ids[..3],
            [
                "mariana-expedition-2024",
                "challenger-deep-samples",
                "sample-MD24-001"
            ]
        );
        assert_eq!(ids.last(), Some(&"puerto-rico-trench"));
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn current_dataset_comes_from_the_store() {
        let repo = DatasetRepository::mock();
        let mut store = MemoryStore::new();
        assert!(repo.current(&store).is_none());

        let selected = repo.select(&mut store, "japan-trench").unwrap();
        assert_eq!(selected.name, repo.current(&store).unwrap().name);

        assert!(repo.select(&mut store, "atlantis").is_none());
        assert_eq!(repo.current(&store).unwrap().id, "japan-trench");

        store.set(CURRENT_DATASET_KEY, "deleted-dataset");
        assert!(repo.current(&store).is_none());
    }
}
