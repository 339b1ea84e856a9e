//! Hands a selected file to the viewer or editor.

use burrow_core::config::OpenConfig;
use burrow_core::BurrowError;
use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

/// Command line (program plus leading arguments) that should open `path`.
///
/// Documents go to the viewer, everything else to the editor. The extension
/// check ignores ASCII case.
pub fn command_for<'a>(open: &'a OpenConfig, path: &Path) -> Vec<&'a str> {
    let is_document = path
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(&open.document_extension));

    let line = if is_document { &open.viewer } else { &open.editor };
    line.split_whitespace().collect()
}

/// Replace this process with the opener for `path`.
///
/// Only returns on failure.
pub fn launch(open: &OpenConfig, path: &Path) -> burrow_core::Result<()> {
    let words = command_for(open, path);
    let Some((program, args)) = words.split_first() else {
        return Err(BurrowError::OpenerFailed {
            program: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no opener configured"),
        });
    };

    tracing::info!(program = %program, path = %path.display(), "opening file");
    let mut command = Command::new(program);
    command.args(args).arg(path);

    Err(BurrowError::OpenerFailed {
        program: program.to_string(),
        source: replace_process(&mut command),
    })
}

#[cfg(unix)]
fn replace_process(command: &mut Command) -> std::io::Error {
    use std::os::unix::process::CommandExt;
    command.exec()
}

#[cfg(not(unix))]
fn replace_process(command: &mut Command) -> std::io::Error {
    match command.status() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(e) => e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OpenConfig {
        OpenConfig {
            document_extension: "pdf".to_string(),
            viewer: "zathura --fork".to_string(),
            editor: "vi".to_string(),
        }
    }

    #[test]
    fn test_documents_use_viewer() {
        let open = config();
        assert_eq!(command_for(&open, Path::new("paper.pdf")), vec!["zathura", "--fork"]);
        assert_eq!(command_for(&open, Path::new("/tmp/SCAN.PDF")), vec!["zathura", "--fork"]);
    }

    #[test]
    fn test_other_files_use_editor() {
        let open = config();
        assert_eq!(command_for(&open, Path::new("notes.txt")), vec!["vi"]);
        assert_eq!(command_for(&open, Path::new("Makefile")), vec!["vi"]);
        assert_eq!(command_for(&open, Path::new("pdf")), vec!["vi"]);
    }

    #[test]
    fn test_missing_program_fails() {
        let mut open = config();
        open.editor = "burrow-test-no-such-editor".to_string();
        let err = launch(&open, Path::new("notes.txt")).unwrap_err();
        assert!(matches!(
            err,
            BurrowError::OpenerFailed { ref program, .. } if program == "burrow-test-no-such-editor"
        ));
    }
}
