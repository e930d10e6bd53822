//! Location of the ontology and annotation files on disk

use std::path::{Path, PathBuf};

/// Default filename of the ontology
pub const ONTOLOGY_FILENAME: &str = "gene_ontology_edit.obo";

/// Prefix of the annotation filenames, followed by `.<organism>`
pub const ANNOTATION_FILE_PREFIX: &str = "gene_association";

/// The folder that holds the ontology and annotation files
///
/// The paths are resolved once when the `DataDirectory` is built and must be
/// passed explicitly to [`crate::Ontology::from_data_dir`] and
/// [`crate::Annotations::from_data_dir`]. The default is the current
/// working directory with the default filenames.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use goenrich::DataDirectory;
///
/// let config = DataDirectory::new("/data/go");
/// assert_eq!(config.ontology_path(), Path::new("/data/go/gene_ontology_edit.obo"));
/// assert_eq!(config.annotation_path("sgd"), Path::new("/data/go/gene_association.sgd"));
///
/// let config = DataDirectory::new("/data/go").with_ontology_filename("go-basic.obo");
/// assert_eq!(config.ontology_path(), Path::new("/data/go/go-basic.obo"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDirectory {
    root: PathBuf,
    ontology_filename: String,
    annotation_prefix: String,
}

impl Default for DataDirectory {
    fn default() -> Self {
        Self::new(".")
    }
}

impl DataDirectory {
    /// Uses the default filenames inside `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            ontology_filename: ONTOLOGY_FILENAME.to_string(),
            annotation_prefix: ANNOTATION_FILE_PREFIX.to_string(),
        }
    }

    /// Uses a different filename for the ontology
    #[must_use]
    pub fn with_ontology_filename(mut self, filename: &str) -> Self {
        self.ontology_filename = filename.to_string();
        self
    }

    /// Uses a different prefix for annotation files
    #[must_use]
    pub fn with_annotation_prefix(mut self, prefix: &str) -> Self {
        self.annotation_prefix = prefix.to_string();
        self
    }

    /// The folder of the data files
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of the ontology file
    pub fn ontology_path(&self) -> PathBuf {
        self.root.join(&self.ontology_filename)
    }

    /// Full path of the annotation file of `organism`
    pub fn annotation_path(&self, organism: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", self.annotation_prefix, organism))
    }
}
