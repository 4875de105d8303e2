use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::shared::error::BimaError;

/// Location of every artifact the module registry reads or writes inside
/// an application directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    go_module: String,
}

impl Workspace {
    /// Open an application directory; its `go.mod` names the import root.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, BimaError> {
        let root = root.as_ref().to_path_buf();
        let go_mod = root.join("go.mod");
        let content =
            fs::read_to_string(&go_mod).map_err(|e| BimaError::io("read", &go_mod, e))?;

        let go_module = parse_module_path(&content).ok_or_else(|| BimaError::Config {
            path: go_mod.clone(),
            message: "missing `module` directive".to_string(),
        })?;

        Ok(Self { root, go_module })
    }

    pub fn new<P: AsRef<Path>>(root: P, go_module: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            go_module: go_module.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn go_module(&self) -> &str {
        &self.go_module
    }

    /// Path relative to the workspace root, for messages.
    pub fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    pub fn modules_yaml(&self) -> PathBuf {
        self.root.join("configs").join("modules.yaml")
    }

    pub fn provider_source(&self) -> PathBuf {
        self.root.join("configs").join("provider.go")
    }

    pub fn swagger_manifest(&self) -> PathBuf {
        self.root.join("swaggers").join("modules.json")
    }

    pub fn swagger_document(&self, snake: &str) -> PathBuf {
        self.root.join("swaggers").join(format!("{}.swagger.json", snake))
    }

    pub fn proto_source(&self, snake: &str) -> PathBuf {
        self.root.join("protos").join(format!("{}.proto", snake))
    }

    /// Files `protoc` generates from a module's proto source.
    pub fn binding_files(&self, snake: &str) -> [PathBuf; 3] {
        let builds = self.root.join("protos").join("builds");
        [
            builds.join(format!("{}_grpc.pb.go", snake)),
            builds.join(format!("{}.pb.go", snake)),
            builds.join(format!("{}.pb.gw.go", snake)),
        ]
    }

    pub fn package_dir(&self, plural_snake: &str) -> PathBuf {
        self.root.join(plural_snake)
    }
}

/// Extract the module path from `go.mod` content.
pub fn parse_module_path(go_mod: &str) -> Option<String> {
    let re = Regex::new(r#"(?m)^\s*module\s+"?([^\s"]+)"?\s*$"#).ok()?;
    re.captures(go_mod).map(|c| c[1].to_string())
}
