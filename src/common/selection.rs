use crate::common::error::{VidupError, VidupResult};
use std::path::{Path, PathBuf};
use std::slice::Iter;

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl SelectedFile {
    pub fn new<P: AsRef<Path>>(path: P) -> VidupResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(VidupError::NotAFile(path.display().to_string()));
        }

        let size = path.metadata()?.len();

        let name = match path.file_name() {
            None => String::new(),
            Some(name) => name.to_string_lossy().into_owned(),
        };

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size,
        })
    }
}

/// Ordered set of files; replaced wholesale on every selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection(Vec<SelectedFile>);

impl FileSelection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_paths<I, P>(paths: I) -> VidupResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        paths
            .into_iter()
            .map(SelectedFile::new)
            .collect::<VidupResult<Vec<_>>>()
            .map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, SelectedFile> {
        self.0.iter()
    }

    pub fn total_size(&self) -> u64 {
        self.0.iter().map(|f| f.size).sum()
    }
}

impl<'a> IntoIterator for &'a FileSelection {
    type Item = &'a SelectedFile;
    type IntoIter = Iter<'a, SelectedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Vec<SelectedFile>> for FileSelection {
    fn from(files: Vec<SelectedFile>) -> Self {
        Self(files)
    }
}
