use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExternalError {
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("renderer reported success but {} is missing", .0.display())]
    MissingImage(PathBuf),
}

/// Image PlantUML writes next to the diagram source
pub fn image_path(diagram: &Path) -> PathBuf {
    diagram.with_extension("png")
}

/// Run `<java> -jar <jar> <diagram>` and return the produced PNG path
pub fn render_image(java: &str, jar: &Path, diagram: &Path) -> Result<PathBuf, ExternalError> {
    tracing::info!(jar = %jar.display(), diagram = %diagram.display(), "rendering diagram");

    let output = Command::new(java)
        .arg("-jar")
        .arg(jar)
        .arg(diagram)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| ExternalError::Spawn {
            program: java.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(ExternalError::Failed {
            program: java.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let image = image_path(diagram);
    if !image.exists() {
        return Err(ExternalError::MissingImage(image));
    }
    Ok(image)
}

fn default_viewer() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Hand the file to an image viewer without waiting for it
pub fn open_in_viewer(viewer: Option<&str>, path: &Path) -> Result<(), ExternalError> {
    let program = viewer.unwrap_or(default_viewer());
    tracing::debug!(program, path = %path.display(), "opening viewer");

    Command::new(program)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|source| ExternalError::Spawn {
            program: program.to_string(),
            source,
        })
}
