//! Artifact compilation via the external LaTeX toolchain.
//!
//! Each compile gets a fresh working directory under `Config::work_root`,
//! never the shared output directory, so concurrent requests cannot race on
//! partial files. The directory is a `TempDir`: removal runs on every exit
//! path, early returns included. The subprocess is bounded by
//! `Config::compile_timeout` and killed on drop when the bound is hit.

mod diagnostics;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;

const SOURCE_FILENAME: &str = "resume.tex";
const ARTIFACT_FILENAME: &str = "resume.pdf";
const LOG_FILENAME: &str = "resume.log";
const PDF_MAGIC: &[u8] = b"%PDF-";
const NAME_ATTEMPTS: usize = 8;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("markup toolchain `{command}` not found on PATH")]
    ToolchainMissing { command: String },

    #[error("compilation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("markup syntax error:\n{diagnostic}")]
    Syntax { diagnostic: String },

    #[error("compiler input missing:\n{diagnostic}")]
    MissingInput { diagnostic: String },

    #[error("compiler reported success but produced no usable artifact")]
    ArtifactMissing,

    #[error("io failure during compilation: {0}")]
    Io(#[from] std::io::Error),
}

/// Compiles `markup_source` and returns the durable artifact path.
pub async fn compile(markup_source: &str, config: &Config) -> Result<PathBuf, CompileError> {
    tokio::fs::create_dir_all(&config.output_dir).await?;

    let workdir = tempfile::Builder::new()
        .prefix("tailor-")
        .tempdir_in(&config.work_root)?;

    let artifact_bytes = run_toolchain(workdir.path(), markup_source, config).await?;
    let output_path = persist_artifact(&artifact_bytes, config).await?;

    if config.keep_tex {
        let tex_path = output_path.with_extension("tex");
        tokio::fs::write(&tex_path, markup_source).await?;
        info!(path = %tex_path.display(), "rendered source kept");
    }

    if let Err(e) = workdir.close() {
        warn!(error = %e, "working directory not fully removed");
    }

    info!(path = %output_path.display(), bytes = artifact_bytes.len(), "artifact written");
    Ok(output_path)
}

async fn run_toolchain(
    workdir: &Path,
    markup_source: &str,
    config: &Config,
) -> Result<Vec<u8>, CompileError> {
    let source_path = workdir.join(SOURCE_FILENAME);
    tokio::fs::write(&source_path, markup_source).await?;

    let mut command = Command::new(&config.latex_command);
    command
        .arg("-pdf")
        .arg("-interaction=nonstopmode")
        .arg(format!("-output-directory={}", workdir.display()))
        .arg(SOURCE_FILENAME)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(command = %config.latex_command, dir = %workdir.display(), "invoking toolchain");

    let child = match command.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(CompileError::ToolchainMissing {
                command: config.latex_command.clone(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let output = match tokio::time::timeout(config.compile_timeout, child.wait_with_output()).await
    {
        Ok(result) => result?,
        Err(_) => {
            // Dropping the elapsed future drops the child, which kills it.
            return Err(CompileError::Timeout {
                seconds: config.compile_timeout.as_secs(),
            });
        }
    };

    let log = tokio::fs::read_to_string(workdir.join(LOG_FILENAME))
        .await
        .unwrap_or_default();

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(status = %output.status, "toolchain exited with failure");
        return Err(diagnostics::classify_failure(&stdout, &stderr, &log));
    }

    let artifact_path = workdir.join(ARTIFACT_FILENAME);
    let bytes = match tokio::fs::read(&artifact_path).await {
        Ok(bytes) => bytes,
        Err(_) => return Err(CompileError::ArtifactMissing),
    };
    if bytes.len() <= PDF_MAGIC.len() || !bytes.starts_with(PDF_MAGIC) {
        return Err(CompileError::ArtifactMissing);
    }
    Ok(bytes)
}

/// Writes the artifact under a fresh unique name. `create_new` makes the
/// no-overwrite discipline collision-proof rather than probabilistic.
async fn persist_artifact(bytes: &[u8], config: &Config) -> Result<PathBuf, CompileError> {
    for _ in 0..NAME_ATTEMPTS {
        let unique = Uuid::new_v4().simple().to_string();
        let path = config.output_dir.join(format!("resume_{}.pdf", &unique[..8]));
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(mut file) => {
                file.write_all(bytes).await?;
                file.flush().await?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(CompileError::Io(std::io::Error::new(
        ErrorKind::AlreadyExists,
        "could not allocate a unique artifact name",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(work_root: &Path, output_dir: &Path) -> Config {
        let mut config = Config::test_default();
        config.work_root = work_root.to_path_buf();
        config.output_dir = output_dir.to_path_buf();
        config
    }

    fn assert_no_leftovers(root: &Path) {
        let leftovers: Vec<_> = std::fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert!(leftovers.is_empty(), "leftover files in work root: {leftovers:?}");
    }

    #[tokio::test]
    async fn test_missing_toolchain_is_classified() {
        let work_root = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        let mut config = test_config(work_root.path(), output_dir.path());
        config.latex_command = "definitely-not-a-real-latexmk".to_string();

        let err = compile("\\documentclass{article}", &config).await.unwrap_err();
        match err {
            CompileError::ToolchainMissing { command } => {
                assert_eq!(command, "definitely-not-a-real-latexmk");
            }
            other => panic!("expected ToolchainMissing, got {other:?}"),
        }
        assert_no_leftovers(work_root.path());
    }

    #[cfg(unix)]
    mod with_stub_toolchain {
        use super::*;
        use std::time::Duration;

        fn write_stub(dir: &Path, body: &str) -> PathBuf {
            use std::os::unix::fs::PermissionsExt;
            let path = dir.join("stub-latexmk.sh");
            std::fs::write(&path, body).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[tokio::test]
        async fn test_successful_compile_persists_unique_artifacts() {
            let stub_dir = TempDir::new().unwrap();
            let work_root = TempDir::new().unwrap();
            let output_dir = TempDir::new().unwrap();
            let stub = write_stub(
                stub_dir.path(),
                "#!/bin/sh\nprintf '%%PDF-1.4\\nstub body\\n' > resume.pdf\n",
            );
            let mut config = test_config(work_root.path(), output_dir.path());
            config.latex_command = stub.display().to_string();

            let first = compile("\\documentclass{article}", &config).await.unwrap();
            let second = compile("\\documentclass{article}", &config).await.unwrap();

            assert_ne!(first, second);
            for path in [&first, &second] {
                let name = path.file_name().unwrap().to_string_lossy().into_owned();
                assert!(name.starts_with("resume_") && name.ends_with(".pdf"), "{name}");
                let bytes = std::fs::read(path).unwrap();
                assert!(bytes.starts_with(b"%PDF-"));
            }
            assert_no_leftovers(work_root.path());
        }

        #[tokio::test]
        async fn test_syntax_failure_carries_diagnostic_and_cleans_up() {
            let stub_dir = TempDir::new().unwrap();
            let work_root = TempDir::new().unwrap();
            let output_dir = TempDir::new().unwrap();
            let stub = write_stub(
                stub_dir.path(),
                "#!/bin/sh\n\
                 echo '! Undefined control sequence.' > resume.log\n\
                 echo 'l.5 (context)' >> resume.log\n\
                 exit 1\n",
            );
            let mut config = test_config(work_root.path(), output_dir.path());
            config.latex_command = stub.display().to_string();

            let err = compile("\\documentclass{article}", &config).await.unwrap_err();
            match err {
                CompileError::Syntax { diagnostic } => {
                    assert!(diagnostic.contains("Undefined control sequence"));
                }
                other => panic!("expected Syntax, got {other:?}"),
            }
            assert_no_leftovers(work_root.path());
            assert_eq!(std::fs::read_dir(output_dir.path()).unwrap().count(), 0);
        }

        #[tokio::test]
        async fn test_keep_tex_writes_source_next_to_artifact() {
            let stub_dir = TempDir::new().unwrap();
            let work_root = TempDir::new().unwrap();
            let output_dir = TempDir::new().unwrap();
            let stub = write_stub(
                stub_dir.path(),
                "#!/bin/sh\nprintf '%%PDF-1.4\\nstub body\\n' > resume.pdf\n",
            );
            let mut config = test_config(work_root.path(), output_dir.path());
            config.latex_command = stub.display().to_string();
            config.keep_tex = true;

            let artifact = compile("\\documentclass{article}", &config).await.unwrap();
            let tex = artifact.with_extension("tex");
            assert_eq!(
                std::fs::read_to_string(&tex).unwrap(),
                "\\documentclass{article}"
            );
            assert_no_leftovers(work_root.path());
        }

        #[tokio::test]
        async fn test_clean_exit_without_artifact_is_artifact_missing() {
            let stub_dir = TempDir::new().unwrap();
            let work_root = TempDir::new().unwrap();
            let output_dir = TempDir::new().unwrap();
            let stub = write_stub(stub_dir.path(), "#!/bin/sh\nexit 0\n");
            let mut config = test_config(work_root.path(), output_dir.path());
            config.latex_command = stub.display().to_string();

            let err = compile("\\documentclass{article}", &config).await.unwrap_err();
            assert!(matches!(err, CompileError::ArtifactMissing));
            assert_no_leftovers(work_root.path());
        }

        #[tokio::test]
        async fn test_timeout_kills_and_cleans_up() {
            let stub_dir = TempDir::new().unwrap();
            let work_root = TempDir::new().unwrap();
            let output_dir = TempDir::new().unwrap();
            let stub = write_stub(stub_dir.path(), "#!/bin/sh\nsleep 5\n");
            let mut config = test_config(work_root.path(), output_dir.path());
            config.latex_command = stub.display().to_string();
            config.compile_timeout = Duration::from_millis(200);

            let err = compile("\\documentclass{article}", &config).await.unwrap_err();
            assert!(matches!(err, CompileError::Timeout { .. }));
            assert_no_leftovers(work_root.path());
        }
    }
}
