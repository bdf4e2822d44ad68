//! Stamp Service - writes rendered pairs and exports to disk.
//!
//! Writes never clobber existing files unless forced, and a pair is written
//! all-or-nothing: if the second half fails, a freshly created first half is
//! removed again. [`StampService::preflight`] extends the no-clobber check to
//! a whole batch before anything is written.

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::RenderedPair,
    error::BuildstampResult,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Overwrite existing files.
    pub force: bool,
    /// Report paths without touching the filesystem.
    pub dry_run: bool,
}

/// Where a pair went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPair {
    pub language: String,
    pub declaration: PathBuf,
    pub definition: PathBuf,
    pub written: bool,
}

/// Where a single export went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub written: bool,
}

pub struct StampService {
    filesystem: Box<dyn Filesystem>,
}

impl StampService {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Refuse up front if any target of a batch already exists.
    ///
    /// Covers both halves of every pair under `out_dir` plus each of
    /// `files`, so a batch is rejected before its first write. A no-op with
    /// `force`.
    #[instrument(skip_all, fields(pairs = pairs.len(), files = files.len()))]
    pub fn preflight(
        &self,
        pairs: &[RenderedPair],
        out_dir: &Path,
        files: &[&Path],
        options: WriteOptions,
    ) -> BuildstampResult<()> {
        if options.force {
            return Ok(());
        }

        let pair_targets = pairs.iter().flat_map(|pair| {
            [
                out_dir.join(&pair.files().declaration),
                out_dir.join(&pair.files().definition),
            ]
        });
        let file_targets = files.iter().map(|path| path.to_path_buf());

        for path in pair_targets.chain(file_targets) {
            if self.filesystem.exists(&path) {
                return Err(ApplicationError::ArtifactExists { path }.into());
            }
        }

        debug!("No target exists yet");
        Ok(())
    }

    /// Write both halves of `pair` under `out_dir`, using its file names.
    #[instrument(
        skip_all,
        fields(language = pair.language(), out_dir = %out_dir.display())
    )]
    pub fn write_pair(
        &self,
        pair: &RenderedPair,
        out_dir: &Path,
        options: WriteOptions,
    ) -> BuildstampResult<WrittenPair> {
        let declaration = out_dir.join(&pair.files().declaration);
        let definition = out_dir.join(&pair.files().definition);

        let mut result = WrittenPair {
            language: pair.language().to_string(),
            declaration,
            definition,
            written: false,
        };

        if !options.force {
            for path in [&result.declaration, &result.definition] {
                if self.filesystem.exists(path) {
                    return Err(ApplicationError::ArtifactExists { path: path.clone() }.into());
                }
            }
        }

        if options.dry_run {
            info!("Dry run, nothing written");
            return Ok(result);
        }

        self.filesystem.create_dir_all(out_dir)?;

        let declaration_existed = self.filesystem.exists(&result.declaration);
        self.filesystem
            .write_file(&result.declaration, pair.declaration())?;

        if let Err(e) = self
            .filesystem
            .write_file(&result.definition, pair.definition())
        {
            warn!("Definition write failed, attempting rollback");
            if !declaration_existed {
                self.rollback(&result.declaration);
            }
            return Err(e);
        }

        info!(
            declaration = %result.declaration.display(),
            definition = %result.definition.display(),
            "Pair written"
        );
        result.written = true;
        Ok(result)
    }

    /// Write a single text export such as a build-info JSON file.
    #[instrument(skip(self, content), fields(path = %path.display()))]
    pub fn write_file(
        &self,
        path: &Path,
        content: &str,
        options: WriteOptions,
    ) -> BuildstampResult<WrittenFile> {
        if !options.force && self.filesystem.exists(path) {
            return Err(ApplicationError::ArtifactExists {
                path: path.to_path_buf(),
            }
            .into());
        }

        if options.dry_run {
            return Ok(WrittenFile {
                path: path.to_path_buf(),
                written: false,
            });
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(path, content)?;

        Ok(WrittenFile {
            path: path.to_path_buf(),
            written: true,
        })
    }

    /// Read a file through the same filesystem port.
    pub fn read(&self, path: &Path) -> BuildstampResult<String> {
        self.filesystem.read_to_string(path)
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, path: &Path) {
        if let Err(e) = self.filesystem.remove_file(path) {
            warn!(
                error = %e,
                path = %path.display(),
                "Rollback failed"
            );
        } else {
            info!("Rollback successful");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use mockall::predicate::{always, eq};

    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::domain::{
        EscapeStyle, LanguageTemplate, MetadataRecord, NamingConvention, NamingRegistry,
        TemplateFiles, render,
    };
    use crate::error::BuildstampError;

    fn pair() -> RenderedPair {
        let template = LanguageTemplate::builder()
            .language("shell")
            .convention(NamingConvention::ScreamingSnake)
            .escape(EscapeStyle::ShellSingle)
            .files(TemplateFiles::new("build_info.sh", "build_info.env"))
            .declaration("export {{Version}} {{CommitHash}} {{CommitDate}} {{CommitDescriptor}} {{BuildDate}}\n")
            .definition(
                "{{Version.name}}='{{Version}}'\n{{CommitHash.name}}='{{CommitHash}}'\n\
{{CommitDate.name}}='{{CommitDate}}'\n{{CommitDescriptor.name}}='{{CommitDescriptor}}'\n\
{{BuildDate.name}}='{{BuildDate}}'\n",
            )
            .build()
            .unwrap();
        render(
            &MetadataRecord::new("1.0", "abc", "d", "s", "b"),
            &template,
            &NamingRegistry::standard(),
        )
        .unwrap()
    }

    fn out() -> PathBuf {
        PathBuf::from("/out")
    }

    #[test]
    fn writes_both_halves() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all().times(1).returning(|_| Ok(()));
        fs.expect_write_file()
            .with(eq(PathBuf::from("/out/build_info.sh")), always())
            .times(1)
            .returning(|_, _| Ok(()));
        fs.expect_write_file()
            .with(eq(PathBuf::from("/out/build_info.env")), always())
            .times(1)
            .returning(|_, _| Ok(()));

        let written = StampService::new(Box::new(fs))
            .write_pair(&pair(), &out(), WriteOptions::default())
            .unwrap();

        assert!(written.written);
        assert_eq!(written.declaration, PathBuf::from("/out/build_info.sh"));
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|p| p.ends_with("build_info.env"));
        fs.expect_write_file().never();

        let err = StampService::new(Box::new(fs))
            .write_pair(&pair(), &out(), WriteOptions::default())
            .unwrap_err();

        assert!(matches!(
            err,
            BuildstampError::Application(ApplicationError::ArtifactExists { .. })
        ));
    }

    #[test]
    fn dry_run_touches_nothing() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all().never();
        fs.expect_write_file().never();

        let written = StampService::new(Box::new(fs))
            .write_pair(
                &pair(),
                &out(),
                WriteOptions {
                    force: false,
                    dry_run: true,
                },
            )
            .unwrap();
        assert!(!written.written);
    }

    #[test]
    fn failed_definition_rolls_back_declaration() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|p, _| {
            if p.ends_with("build_info.env") {
                Err(ApplicationError::FilesystemError {
                    path: p.to_path_buf(),
                    reason: "disk full".into(),
                }
                .into())
            } else {
                Ok(())
            }
        });
        fs.expect_remove_file()
            .with(eq(PathBuf::from("/out/build_info.sh")))
            .times(1)
            .returning(|_| Ok(()));

        let result = StampService::new(Box::new(fs)).write_pair(&pair(), &out(), WriteOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn preflight_rejects_a_later_pair_before_any_write() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(|p| p == Path::new("/out/build_info.env"));
        fs.expect_create_dir_all().never();
        fs.expect_write_file().never();

        let err = StampService::new(Box::new(fs))
            .preflight(&[pair(), pair()], &out(), &[], WriteOptions::default())
            .unwrap_err();

        assert!(matches!(
            err,
            BuildstampError::Application(ApplicationError::ArtifactExists { ref path })
                if path == Path::new("/out/build_info.env")
        ));
    }

    #[test]
    fn preflight_covers_exports() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|p| p == Path::new("build.json"));

        let service = StampService::new(Box::new(fs));
        let err = service
            .preflight(
                &[pair()],
                &out(),
                &[Path::new("VERSION"), Path::new("build.json")],
                WriteOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            BuildstampError::Application(ApplicationError::ArtifactExists { ref path })
                if path == Path::new("build.json")
        ));

        let forced = WriteOptions {
            force: true,
            dry_run: false,
        };
        assert!(
            service
                .preflight(&[pair()], &out(), &[Path::new("build.json")], forced)
                .is_ok()
        );
    }

    #[test]
    fn single_file_creates_parent() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all()
            .with(eq(PathBuf::from("dist")))
            .times(1)
            .returning(|_| Ok(()));
        fs.expect_write_file().times(1).returning(|_, _| Ok(()));

        let written = StampService::new(Box::new(fs))
            .write_file(Path::new("dist/build.json"), "{}", WriteOptions::default())
            .unwrap();
        assert!(written.written);
    }

    #[test]
    fn force_overwrites_existing_file() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_write_file().times(1).returning(|_, _| Ok(()));

        let written = StampService::new(Box::new(fs))
            .write_file(
                Path::new("VERSION"),
                "1.0\n",
                WriteOptions {
                    force: true,
                    dry_run: false,
                },
            )
            .unwrap();
        assert!(written.written);
    }
}
