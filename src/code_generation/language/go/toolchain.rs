use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{error, info};

use crate::project_management::registry::staged::remove_best_effort;
use crate::shared::error::BimaError;
use crate::shared::shell::{quote, ShellRunner};

pub const CLI_REPOSITORY: &str = "https://github.com/bimalabs/cli.git";
pub const FRAMEWORK_MODULE: &str = "github.com/bimalabs/framework/v4";
pub const DEBUG_LISTEN_ADDR: &str = ":16517";
pub const INSTALL_PATH: &str = "/usr/local/bin/bima";

const PROTOC_PLUGINS: [&str; 4] = [
    "github.com/grpc-ecosystem/grpc-gateway/v2/protoc-gen-grpc-gateway",
    "github.com/grpc-ecosystem/grpc-gateway/v2/protoc-gen-openapiv2",
    "google.golang.org/protobuf/cmd/protoc-gen-go",
    "google.golang.org/grpc/cmd/protoc-gen-go-grpc",
];

/// One invocation of the Go toolchain inside an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Regenerate the dependency injection container.
    Dump,
    /// `go mod tidy`
    Clean,
    GenProto,
    /// `go get`
    Fetch,
    Update,
    InstallPlugins,
    Build { output: String, debug: bool },
    Run { config: String },
    Execute { binary: String, config: String },
    Attach { pid: u32 },
}

impl Step {
    pub fn command_line(&self) -> String {
        match self {
            Step::Dump => "go run dumper/main.go".to_string(),
            Step::Clean => "go mod tidy".to_string(),
            Step::GenProto => "sh proto_gen.sh".to_string(),
            Step::Fetch => "go get".to_string(),
            Step::Update => "go get -u".to_string(),
            Step::InstallPlugins => format!("go install {}", PROTOC_PLUGINS.join(" ")),
            Step::Build { output, debug: false } => {
                format!("go build -o {} cmd/main.go", quote(output))
            }
            Step::Build { output, debug: true } => {
                format!("go build -gcflags \"all=-N -l\" -o {} cmd/main.go", quote(output))
            }
            Step::Run { config } => format!("go run cmd/main.go run {}", quote(config)),
            Step::Execute { binary, config } => {
                format!("./{} run {}", quote(binary), quote(config))
            }
            Step::Attach { pid } => format!(
                "dlv attach {} --listen={} --headless --api-version=2 --log",
                pid, DEBUG_LISTEN_ADDR
            ),
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            Step::Dump => "Error update DI container",
            Step::Clean => "Error cleaning dependencies",
            Step::GenProto => "Error generate code from proto files",
            Step::Fetch => "Error download dependencies",
            Step::Update => "Error update dependencies",
            Step::InstallPlugins => "Error install toolchain",
            Step::Build { .. } => "Error building application",
            Step::Run { .. } | Step::Execute { .. } => "Error running application",
            Step::Attach { .. } => "Error attaching debugger",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum UpgradeOutcome {
    UpToDate(String),
    Upgraded(String),
}

pub struct GoToolchain<'a> {
    shell: &'a dyn ShellRunner,
    dir: PathBuf,
}

impl<'a> GoToolchain<'a> {
    pub fn new<P: AsRef<Path>>(shell: &'a dyn ShellRunner, dir: P) -> Self {
        Self {
            shell,
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Run `steps` in order; the first failure stops the pipeline.
    pub fn run_steps(&self, steps: &[Step]) -> Result<(), BimaError> {
        for step in steps {
            info!(step = ?step, "toolchain");
            if let Err(err) = self.shell.run(&step.command_line(), &self.dir) {
                error!("{}", step.failure_message());
                return Err(err);
            }
        }
        Ok(())
    }

    /// Rebuild the CLI from the latest tag of its repository and install it.
    pub fn upgrade(&self, current_version: &str) -> Result<UpgradeOutcome, BimaError> {
        let checkout = std::env::temp_dir().join("bima");
        if let Some(path) = remove_best_effort(&checkout) {
            return Err(BimaError::Validation(format!(
                "Could not clear {}",
                path.display()
            )));
        }

        self.shell.run(
            &format!(
                "git clone --depth 1 {} {}",
                CLI_REPOSITORY,
                quote(&checkout.to_string_lossy())
            ),
            &self.dir,
        )?;

        let latest = self
            .shell
            .capture(
                "git describe --tags $(git rev-list --tags --max-count=1)",
                &checkout,
            )?
            .trim()
            .to_string();
        if latest.is_empty() || latest == current_version {
            return Ok(UpgradeOutcome::UpToDate(current_version.to_string()));
        }

        for command in [
            "git fetch".to_string(),
            format!("git checkout {}", quote(&latest)),
            Step::Fetch.command_line(),
            Step::Clean.command_line(),
            Step::Dump.command_line(),
            Step::Update.command_line(),
            "go build -o bima".to_string(),
            format!("mv bima {}", INSTALL_PATH),
        ] {
            self.shell.run(&command, &checkout)?;
        }

        Ok(UpgradeOutcome::Upgraded(latest))
    }
}

/// Version of the bima framework required by `go.mod`, if any.
pub fn framework_version(go_mod: &str) -> Option<String> {
    let pattern = format!(r"(?m)^\s*(?:require\s+)?{}\s+(v\S+)", regex::escape(FRAMEWORK_MODULE));
    let re = Regex::new(&pattern).ok()?;
    re.captures(go_mod).map(|c| c[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::shell::MockShellRunner;
    use mockall::predicate::{always, eq};
    use mockall::Sequence;

    #[test]
    fn test_command_lines() {
        assert_eq!(Step::Dump.command_line(), "go run dumper/main.go");
        assert_eq!(
            Step::Build { output: "shop".into(), debug: true }.command_line(),
            "go build -gcflags \"all=-N -l\" -o shop cmd/main.go"
        );
        assert_eq!(
            Step::Run { config: "configs/app.yaml".into() }.command_line(),
            "go run cmd/main.go run configs/app.yaml"
        );
        assert_eq!(
            Step::Attach { pid: 42 }.command_line(),
            "dlv attach 42 --listen=:16517 --headless --api-version=2 --log"
        );
        assert!(Step::InstallPlugins
            .command_line()
            .ends_with("google.golang.org/grpc/cmd/protoc-gen-go-grpc"));
    }

    #[test]
    fn test_pipeline_runs_in_order() {
        let mut shell = MockShellRunner::new();
        let mut seq = Sequence::new();
        for command in ["go run dumper/main.go", "go mod tidy"] {
            shell
                .expect_run()
                .with(eq(command), always())
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Ok(()));
        }

        GoToolchain::new(&shell, "/app")
            .run_steps(&[Step::Dump, Step::Clean])
            .unwrap();
    }

    #[test]
    fn test_failed_step_stops_the_pipeline() {
        let mut shell = MockShellRunner::new();
        shell
            .expect_run()
            .with(eq("sh proto_gen.sh"), always())
            .times(1)
            .returning(|command, _| {
                Err(BimaError::ExternalTool {
                    command: command.to_string(),
                    code: Some(1),
                })
            });
        shell
            .expect_run()
            .with(eq("go mod tidy"), always())
            .never();

        let err = GoToolchain::new(&shell, "/app")
            .run_steps(&[Step::GenProto, Step::Clean])
            .unwrap_err();

        assert!(matches!(err, BimaError::ExternalTool { code: Some(1), .. }));
    }

    #[test]
    fn test_upgrade_stops_when_current() {
        let mut shell = MockShellRunner::new();
        shell.expect_run().times(1).returning(|_, _| Ok(()));
        shell
            .expect_capture()
            .times(1)
            .returning(|_, _| Ok("v1.1.9\n".to_string()));

        let outcome = GoToolchain::new(&shell, "/tmp").upgrade("v1.1.9").unwrap();

        assert_eq!(outcome, UpgradeOutcome::UpToDate("v1.1.9".to_string()));
    }

    #[test]
    fn test_framework_version() {
        let go_mod = "module example.com/shop\n\nrequire (\n\tgithub.com/bimalabs/framework/v4 v4.3.2\n\tgorm.io/gorm v1.25.0\n)\n";
        assert_eq!(framework_version(go_mod).as_deref(), Some("v4.3.2"));
        assert_eq!(
            framework_version("require github.com/bimalabs/framework/v4 v4.0.1\n").as_deref(),
            Some("v4.0.1")
        );
        assert_eq!(framework_version("module example.com/shop\n"), None);
    }
}
