//! Dart Sass CLI compiler

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::domain::ports::StylesheetCompiler;
use crate::error::{SdkError, SdkResult};

#[derive(Debug, Clone)]
pub struct SassCli {
    program: String,
}

impl Default for SassCli {
    fn default() -> Self {
        Self::new("sass")
    }
}

impl SassCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn args(source: &Path, include_paths: &[PathBuf]) -> Vec<String> {
        let mut args: Vec<String> = include_paths
            .iter()
            .map(|p| format!("--load-path={}", p.display()))
            .collect();
        args.push("--no-source-map".to_string());
        args.push(source.display().to_string());
        args
    }
}

impl StylesheetCompiler for SassCli {
    fn compile(&self, source: &Path, include_paths: &[PathBuf]) -> SdkResult<String> {
        let compile_error = |message: String| SdkError::Compile {
            file: source.to_path_buf(),
            message,
        };

        let output = Command::new(&self.program)
            .args(Self::args(source, include_paths))
            .output()
            .map_err(|e| compile_error(format!("unable to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(compile_error(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        String::from_utf8(output.stdout).map_err(|e| compile_error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_list_load_paths_before_source() {
        let args = SassCli::args(
            Path::new("/p/res/skins/peak/sass/skin.scss"),
            &[PathBuf::from("/p/res/skins"), PathBuf::from("/tmp/core/skins")],
        );
        assert_eq!(
            args,
            vec![
                "--load-path=/p/res/skins",
                "--load-path=/tmp/core/skins",
                "--no-source-map",
                "/p/res/skins/peak/sass/skin.scss",
            ]
        );
    }

    #[test]
    fn missing_compiler_is_a_compile_error() {
        let sass = SassCli::new("definitely-not-sass-binary");
        let err = sass.compile(Path::new("/p/skin.scss"), &[]).unwrap_err();
        assert!(matches!(err, SdkError::Compile { .. }));
        assert!(err.to_string().contains("definitely-not-sass-binary"));
    }
}
