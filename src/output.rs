//! Output file management
//!
//! Resolves where the program and preview are written. With overwriting
//! disabled, the next free `<stem>_<NN><ext>` name is chosen by scanning the
//! output directory for earlier numbered runs.

use anyhow::{bail, Context, Result};
use image::{GrayImage, ImageFormat};
use laserburn_settings::OutputSettings;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Paths of the artifacts for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// G-code program
    pub gcode: PathBuf,
    /// Grayscale preview image
    pub preview: PathBuf,
}

impl OutputPaths {
    /// Resolve the artifact paths for `settings`.
    ///
    /// Fails if the output directory does not exist.
    pub fn resolve(settings: &OutputSettings) -> Result<Self> {
        let dir = &settings.directory;
        if !dir.is_dir() {
            bail!("Output directory {} does not exist", dir.display());
        }

        let (stem, ext) = split_filename(&settings.filename);
        let stem = if settings.overwrite {
            stem.to_string()
        } else {
            let next = last_suffix(dir, stem, ext)? + 1;
            format!("{}_{:02}", stem, next)
        };

        let paths = Self {
            gcode: dir.join(format!("{}{}", stem, ext)),
            preview: dir.join(format!("{}_preview.png", stem)),
        };
        debug!("Output paths: {:?}", paths);
        Ok(paths)
    }

    /// Write the program text
    pub fn write_gcode(&self, gcode: &str) -> Result<()> {
        std::fs::write(&self.gcode, gcode)
            .with_context(|| format!("Failed to write {}", self.gcode.display()))?;
        info!("Wrote {} ({} bytes)", self.gcode.display(), gcode.len());
        Ok(())
    }

    /// Write the preview as PNG
    pub fn write_preview(&self, preview: &GrayImage) -> Result<()> {
        preview
            .save_with_format(&self.preview, ImageFormat::Png)
            .with_context(|| format!("Failed to write {}", self.preview.display()))?;
        info!("Wrote {}", self.preview.display());
        Ok(())
    }
}

/// Split a file name at its last dot: `gcode.txt` -> (`gcode`, `.txt`).
///
/// Names without a dot have an empty extension.
pub fn split_filename(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot) => name.split_at(dot),
        None => (name, ""),
    }
}

/// Highest `N` among `<stem>_<N><ext>` entries in `dir`, or 0.
fn last_suffix(dir: &Path, stem: &str, ext: &str) -> Result<u64> {
    let prefix = format!("{}_", stem);
    let mut max = 0;

    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };

        let digits = name
            .strip_prefix(prefix.as_str())
            .and_then(|rest| rest.strip_suffix(ext));
        if let Some(n) = digits
            .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|d| d.parse::<u64>().ok())
        {
            max = max.max(n);
        }
    }

    Ok(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings(dir: &Path, filename: &str, overwrite: bool) -> OutputSettings {
        OutputSettings {
            directory: dir.to_path_buf(),
            filename: filename.to_string(),
            overwrite,
            preview: true,
        }
    }

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn test_split_filename() {
        assert_eq!(split_filename("gcode.txt"), ("gcode", ".txt"));
        assert_eq!(split_filename("job.v2.nc"), ("job.v2", ".nc"));
        assert_eq!(split_filename("program"), ("program", ""));
    }

    #[test]
    fn test_overwrite_uses_plain_name() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "gcode.txt");

        let paths = OutputPaths::resolve(&settings(dir.path(), "gcode.txt", true)).unwrap();
        assert_eq!(paths.gcode, dir.path().join("gcode.txt"));
        assert_eq!(paths.preview, dir.path().join("gcode_preview.png"));
    }

    #[test]
    fn test_numbered_names() {
        let dir = TempDir::new().unwrap();
        let s = settings(dir.path(), "gcode.txt", false);

        let paths = OutputPaths::resolve(&s).unwrap();
        assert_eq!(paths.gcode, dir.path().join("gcode_01.txt"));
        assert_eq!(paths.preview, dir.path().join("gcode_01_preview.png"));

        touch(dir.path(), "gcode_01.txt");
        touch(dir.path(), "gcode_07.txt");
        touch(dir.path(), "gcode_09.nc");
        touch(dir.path(), "gcode_x.txt");
        touch(dir.path(), "other_12.txt");
        let paths = OutputPaths::resolve(&s).unwrap();
        assert_eq!(paths.gcode, dir.path().join("gcode_08.txt"));
    }

    #[test]
    fn test_numbering_past_99() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "gcode_99.txt");
        let s = settings(dir.path(), "gcode.txt", false);
        assert_eq!(
            OutputPaths::resolve(&s).unwrap().gcode,
            dir.path().join("gcode_100.txt")
        );

        touch(dir.path(), "gcode_100.txt");
        assert_eq!(
            OutputPaths::resolve(&s).unwrap().gcode,
            dir.path().join("gcode_101.txt")
        );
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = OutputPaths::resolve(&settings(&missing, "gcode.txt", true)).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_write_artifacts() {
        let dir = TempDir::new().unwrap();
        let paths = OutputPaths::resolve(&settings(dir.path(), "out.nc", true)).unwrap();

        paths.write_gcode("G21\n").unwrap();
        paths
            .write_preview(&GrayImage::from_raw(2, 1, vec![0, 255]).unwrap())
            .unwrap();

        assert_eq!(std::fs::read_to_string(&paths.gcode).unwrap(), "G21\n");
        let preview = image::open(&paths.preview).unwrap().to_luma8();
        assert_eq!(preview.as_raw(), &vec![0, 255]);
    }
}
