use std::fs;
use std::path::{Path, PathBuf};

use askama::Template;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::code_generation::core::naming::to_title_case;
use crate::code_generation::core::template_emitter::with_trailing_newline;
use crate::shared::error::BimaError;
use crate::shared::shell::{quote, ShellRunner};

pub const SKELETON_REPOSITORY: &str = "https://github.com/bimalabs/skeleton.git";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Middleware,
    Driver,
    Adapter,
    Route,
}

impl ComponentKind {
    pub fn dir(self) -> &'static str {
        match self {
            ComponentKind::Middleware => "middlewares",
            ComponentKind::Driver => "drivers",
            ComponentKind::Adapter => "adapters",
            ComponentKind::Route => "routes",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComponentKind::Middleware => "Middleware",
            ComponentKind::Driver => "Driver",
            ComponentKind::Adapter => "Adapter",
            ComponentKind::Route => "Route",
        }
    }

    fn render(self, name: &str, path: &str) -> Result<String, askama::Error> {
        match self {
            ComponentKind::Middleware => MiddlewareTemplate { name }.render(),
            ComponentKind::Driver => DriverTemplate { name }.render(),
            ComponentKind::Adapter => AdapterTemplate { name }.render(),
            ComponentKind::Route => RouteTemplate { name, path }.render(),
        }
    }
}

#[derive(Template)]
#[template(path = "component/middleware.go", escape = "none")]
struct MiddlewareTemplate<'a> {
    name: &'a str,
}

#[derive(Template)]
#[template(path = "component/driver.go", escape = "none")]
struct DriverTemplate<'a> {
    name: &'a str,
}

#[derive(Template)]
#[template(path = "component/adapter.go", escape = "none")]
struct AdapterTemplate<'a> {
    name: &'a str,
}

#[derive(Template)]
#[template(path = "component/route.go", escape = "none")]
struct RouteTemplate<'a> {
    name: &'a str,
    path: &'a str,
}

#[derive(Template)]
#[template(path = "app/env.txt", escape = "none")]
struct EnvTemplate<'a> {
    name: &'a str,
    secret: &'a str,
}

/// `APP_SECRET` value: URL-safe base64 of the SHA-256 of an RFC 3339 timestamp.
pub fn app_secret(now: DateTime<Utc>) -> String {
    let digest = Sha256::digest(now.to_rfc3339_opts(SecondsFormat::Secs, true).as_bytes());
    URL_SAFE.encode(digest)
}

pub fn env_file(app_name: &str, secret: &str) -> Result<String, BimaError> {
    let rendered = EnvTemplate {
        name: app_name,
        secret,
    }
    .render()?;
    Ok(with_trailing_newline(rendered))
}

/// Creates applications from the skeleton repository and single-file components inside them.
pub struct ScaffoldGenerator<'a> {
    shell: &'a dyn ShellRunner,
    workdir: PathBuf,
}

impl<'a> ScaffoldGenerator<'a> {
    pub fn new<P: AsRef<Path>>(shell: &'a dyn ShellRunner, workdir: P) -> Self {
        Self {
            shell,
            workdir: workdir.as_ref().to_path_buf(),
        }
    }

    /// Write `<dir>/<lowercase name>.go` for a component. Existing files are left alone.
    pub fn create_component(&self, kind: ComponentKind, name: &str) -> Result<PathBuf, BimaError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BimaError::Validation(format!(
                "Usage: bima create {} <name>",
                kind.label().to_lowercase()
            )));
        }

        let file_stem = name.to_lowercase();
        let dir = self.workdir.join(kind.dir());
        let path = dir.join(format!("{}.go", file_stem));
        if path.exists() {
            return Err(BimaError::Validation(format!(
                "{} {} already exists",
                kind.label(),
                path.display()
            )));
        }

        let source = kind.render(&to_title_case(name), &file_stem)?;
        fs::create_dir_all(&dir).map_err(|e| BimaError::io("create", &dir, e))?;
        fs::write(&path, with_trailing_newline(source)).map_err(|e| BimaError::io("write", &path, e))?;

        info!(kind = kind.label(), path = %path.display(), "component created");
        Ok(path)
    }

    /// Clone the skeleton into `<workdir>/<name>`, detach it from git and write its `.env`.
    pub fn create_app(&self, name: &str, now: DateTime<Utc>) -> Result<PathBuf, BimaError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BimaError::Validation("Usage: bima create app <name>".to_string()));
        }

        let app_dir = self.workdir.join(name);
        if app_dir.exists() {
            return Err(BimaError::Validation(format!(
                "{} already exists",
                app_dir.display()
            )));
        }

        self.shell.run(
            &format!("git clone --depth 1 {} {}", SKELETON_REPOSITORY, quote(name)),
            &self.workdir,
        )?;

        let git_dir = app_dir.join(".git");
        if git_dir.exists() {
            fs::remove_dir_all(&git_dir).map_err(|e| BimaError::io("remove", &git_dir, e))?;
        }

        let env_path = app_dir.join(".env");
        fs::write(&env_path, env_file(name, &app_secret(now))?)
            .map_err(|e| BimaError::io("write", &env_path, e))?;

        info!(app = name, "application created");
        Ok(app_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::shell::MockShellRunner;
    use chrono::TimeZone;
    use mockall::predicate::{always, eq};
    use tempfile::TempDir;

    #[test]
    fn test_create_component() {
        let temp_dir = TempDir::new().unwrap();
        let shell = MockShellRunner::new();
        let generator = ScaffoldGenerator::new(&shell, temp_dir.path());

        let path = generator.create_component(ComponentKind::Route, "Health").unwrap();

        assert_eq!(path, temp_dir.path().join("routes/health.go"));
        let source = fs::read_to_string(path).unwrap();
        assert!(source.starts_with("package routes\n"));
        assert!(source.contains("type Health struct {"));
        assert!(source.contains("return \"/health\""));
    }

    #[test]
    fn test_existing_component_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("drivers")).unwrap();
        fs::write(temp_dir.path().join("drivers/mongo.go"), "custom").unwrap();
        let shell = MockShellRunner::new();

        let err = ScaffoldGenerator::new(&shell, temp_dir.path())
            .create_component(ComponentKind::Driver, "mongo")
            .unwrap_err();

        assert!(err.is_graceful());
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("drivers/mongo.go")).unwrap(),
            "custom"
        );
    }

    #[test]
    fn test_component_name_is_required() {
        let temp_dir = TempDir::new().unwrap();
        let shell = MockShellRunner::new();

        let err = ScaffoldGenerator::new(&shell, temp_dir.path())
            .create_component(ComponentKind::Middleware, " ")
            .unwrap_err();

        assert_eq!(err.to_string(), "Usage: bima create middleware <name>");
    }

    #[test]
    fn test_env_file() {
        let env = env_file("shop", "c2VjcmV0").unwrap();
        assert_eq!(
            env,
            "APP_DEBUG=true\nAPP_PORT=7777\nGRPC_PORT=1717\nAPP_NAME=shop\nAPP_SECRET=c2VjcmV0\n"
        );
    }

    #[test]
    fn test_app_secret_is_stable_for_a_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let secret = app_secret(now);
        assert_eq!(secret, app_secret(now));
        assert_eq!(secret.len(), 44);
        assert!(!secret.contains('+') && !secret.contains('/'));
    }

    #[test]
    fn test_create_app() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();
        let mut shell = MockShellRunner::new();
        shell
            .expect_run()
            .with(
                eq("git clone --depth 1 https://github.com/bimalabs/skeleton.git shop"),
                always(),
            )
            .times(1)
            .returning(move |_, dir| {
                fs::create_dir_all(dir.join("shop/.git")).unwrap();
                Ok(())
            });
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let app_dir = ScaffoldGenerator::new(&shell, &root).create_app("shop", now).unwrap();

        assert_eq!(app_dir, root.join("shop"));
        assert!(!app_dir.join(".git").exists());
        let env = fs::read_to_string(app_dir.join(".env")).unwrap();
        assert!(env.contains("APP_NAME=shop\n"));
        assert!(env.contains(&format!("APP_SECRET={}\n", app_secret(now))));
    }
}
