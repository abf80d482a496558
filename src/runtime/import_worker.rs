use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use crate::app::ImportProgress;
use crate::library::Importer;

/// Run one import batch off the UI thread. The receiver yields `Started`
/// (when anything was accepted) and then exactly one `Finished`.
pub fn spawn(importer: Arc<Importer>, inputs: Vec<PathBuf>) -> Receiver<ImportProgress> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let files = importer.candidates(&inputs);
        if !files.is_empty() {
            let _ = tx.send(ImportProgress::Started(files.len()));
        }
        let result = importer.import_batch(&files);
        let _ = tx.send(ImportProgress::Finished(result));
    });
    rx
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use super::*;
    use crate::config::ImportSettings;
    use crate::library::{DurationProbe, ImportError, TagReader, TrackTags};

    struct NoTags;

    impl TagReader for NoTags {
        fn read(&self, _path: &Path) -> Result<TrackTags, ImportError> {
            Ok(TrackTags::default())
        }
    }

    struct NoDuration;

    impl DurationProbe for NoDuration {
        fn probe(&self, _path: &Path) -> Result<Option<Duration>, ImportError> {
            Ok(None)
        }
    }

    fn importer() -> Arc<Importer> {
        Arc::new(Importer::with_backends(
            ImportSettings::default(),
            Arc::new(NoTags),
            Arc::new(NoDuration),
        ))
    }

    #[test]
    fn reports_start_then_result() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("two.mp3"), b"x").unwrap();

        let rx = spawn(importer(), vec![dir.path().to_path_buf()]);
        let msgs: Vec<ImportProgress> = rx.iter().collect();
        assert!(matches!(msgs[0], ImportProgress::Started(2)));
        match &msgs[1] {
            ImportProgress::Finished(Ok(files)) => assert_eq!(files.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_selection_finishes_with_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let rx = spawn(importer(), vec![dir.path().to_path_buf()]);
        let msgs: Vec<ImportProgress> = rx.iter().collect();
        assert_eq!(msgs.len(), 1);
        assert!(matches!(
            msgs[0],
            ImportProgress::Finished(Err(ImportError::NoValidFiles))
        ));
    }
}
