use std::ffi::OsString;
use std::path::PathBuf;

use tracing::info;

use crate::app::App;
use crate::player::MediaBackend;

/// Files and directories named on the command line.
pub fn cli_inputs(args: impl IntoIterator<Item = OsString>) -> Vec<PathBuf> {
    args.into_iter().skip(1).map(PathBuf::from).collect()
}

/// Queue an import of the command-line inputs, if any.
pub fn apply_cli_inputs<B: MediaBackend>(app: &mut App<B>, inputs: Vec<PathBuf>) {
    if inputs.is_empty() {
        return;
    }
    info!(count = inputs.len(), "importing command-line inputs");
    app.request_import(inputs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_name_is_skipped() {
        let args = ["luxe", "/music", "song.mp3"].map(OsString::from);
        assert_eq!(
            cli_inputs(args),
            vec![PathBuf::from("/music"), PathBuf::from("song.mp3")]
        );
    }
}
