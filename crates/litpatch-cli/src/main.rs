//! `litpatch` command-line runner

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use litpatch_driver::{ExitPolicy, Manifest, Pass, RunDriver, RunOptions};
use litpatch_passes::{PassRegistry, DEFAULT_PROJECT_ROOT};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Exit status for errors that stop a run
const FATAL: u8 = 2;

fn run_args() -> [Arg; 4] {
    [
        Arg::new("root")
            .long("root")
            .value_name("DIR")
            .value_parser(value_parser!(PathBuf))
            .help("Project root that relative targets resolve against"),
        Arg::new("strict")
            .long("strict")
            .action(ArgAction::SetTrue)
            .help("Exit 1 when any fix is not found, needs manual work, or a check fails"),
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Output the run report as JSON"),
        Arg::new("dry-run")
            .long("dry-run")
            .action(ArgAction::SetTrue)
            .help("Report outcomes without writing any file"),
    ]
}

fn cli() -> Command {
    Command::new("litpatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Apply literal source patches with fallback detection")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log strategy decisions to stderr"),
        )
        .subcommand(Command::new("list").about("List built-in passes"))
        .subcommand(
            Command::new("run")
                .about("Run a built-in pass")
                .arg(
                    Arg::new("pass")
                        .required(true)
                        .help("Pass name (see `litpatch list`)"),
                )
                .args(run_args()),
        )
        .subcommand(
            Command::new("apply")
                .about("Run a pass described by a TOML manifest")
                .arg(
                    Arg::new("manifest")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Manifest file"),
                )
                .args(run_args()),
        )
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

fn options(args: &ArgMatches) -> RunOptions {
    let policy = if args.get_flag("strict") {
        ExitPolicy::Strict
    } else {
        ExitPolicy::Advisory
    };
    RunOptions::new()
        .with_policy(policy)
        .with_dry_run(args.get_flag("dry-run"))
}

fn builtin_pass(args: &ArgMatches) -> anyhow::Result<Pass> {
    let name = args
        .get_one::<String>("pass")
        .context("missing pass name")?;
    let root = args
        .get_one::<PathBuf>("root")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT_ROOT));

    let registry = PassRegistry::with_defaults();
    let Some(pass) = registry.build(name, &root) else {
        let known: Vec<_> = registry.list().into_iter().map(|(n, _)| n).collect();
        bail!("unknown pass '{name}' (available: {})", known.join(", "));
    };
    Ok(pass?)
}

fn manifest_pass(args: &ArgMatches) -> anyhow::Result<Pass> {
    let path = args
        .get_one::<PathBuf>("manifest")
        .context("missing manifest path")?;
    let root = match args.get_one::<PathBuf>("root") {
        Some(root) => root.clone(),
        None => manifest_dir(path),
    };

    let manifest = Manifest::from_path(path)
        .with_context(|| format!("loading manifest {}", path.display()))?;
    manifest
        .into_pass(&root)
        .with_context(|| format!("building pass from {}", path.display()))
}

fn manifest_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn execute(pass: &Pass, args: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<u8> {
    let driver = RunDriver::new(options(args));

    let report = if args.get_flag("json") {
        let report = driver.run(pass, &mut io::sink())?;
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        report
    } else {
        driver.run(pass, out)?
    };

    Ok(driver.exit_code(&report))
}

fn dispatch(matches: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<u8> {
    match matches.subcommand() {
        Some(("list", _)) => {
            for (name, title) in PassRegistry::with_defaults().list() {
                writeln!(out, "{name:<16}{title}")?;
            }
            Ok(0)
        }
        Some(("run", args)) => execute(&builtin_pass(args)?, args, out),
        Some(("apply", args)) => execute(&manifest_pass(args)?, args, out),
        _ => unreachable!("subcommand required"),
    }
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    let stdout = io::stdout();
    match dispatch(&matches, &mut stdout.lock()) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("Run aborted: {e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(FATAL)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use litpatch_test_utils::{qa, sidebar_tree, INBOX_LAYOUT, NOTES_ROUTE};
    use pretty_assertions::assert_eq;

    fn dispatch_args(args: &[&str]) -> (anyhow::Result<u8>, String) {
        let matches = cli().try_get_matches_from(args).unwrap();
        let mut out = Vec::new();
        let result = dispatch(&matches, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn command_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn list_prints_builtins() {
        let (code, out) = dispatch_args(&["litpatch", "list"]);
        assert_eq!(code.unwrap(), 0);
        assert!(out.starts_with("sidebar01-qa    SIDEBAR-01 QA fixes\n"));
        assert!(out.contains("sidebar01-ts"));
    }

    #[test]
    fn run_qa_pass_under_root() {
        let tree = sidebar_tree();
        let root = tree.root().to_str().unwrap();

        let (code, out) = dispatch_args(&[
            "litpatch",
            "run",
            "sidebar01-qa",
            "--root",
            root,
            "--strict",
        ]);

        assert_eq!(code.unwrap(), 0);
        assert!(out.contains("Fix 1 (CRITICAL) [route.ts]: APPLIED"));
        assert!(tree.read(NOTES_ROUTE).contains(qa::NEW_DELETE));
    }

    #[test]
    fn strict_run_reports_unresolved() {
        let tree = sidebar_tree();
        tree.write(INBOX_LAYOUT, "export function InboxLayout() {}\n");
        let root = tree.root().to_str().unwrap();

        let (advisory, _) = dispatch_args(&["litpatch", "run", "sidebar01-qa", "--root", root]);
        assert_eq!(advisory.unwrap(), 0);

        let (strict, out) = dispatch_args(&[
            "litpatch",
            "run",
            "sidebar01-qa",
            "--root",
            root,
            "--strict",
        ]);
        assert_eq!(strict.unwrap(), 1);
        assert!(out.contains("Fix 2 (MEDIUM) [inbox-layout.tsx]: NOT FOUND"));
    }

    #[test]
    fn json_output_is_one_document() {
        let tree = sidebar_tree();
        let root = tree.root().to_str().unwrap();

        let (code, out) = dispatch_args(&[
            "litpatch",
            "run",
            "sidebar01-qa",
            "--root",
            root,
            "--json",
        ]);

        assert_eq!(code.unwrap(), 0);
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["summary"]["applied"], 3);
        assert_eq!(json["steps"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn unknown_pass_is_error() {
        let (result, _) = dispatch_args(&["litpatch", "run", "sidebar99"]);
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("unknown pass 'sidebar99'"));
    }

    #[test]
    fn missing_target_is_error() {
        let tree = litpatch_test_utils::ScratchTree::new();
        let root = tree.root().to_str().unwrap();
        let (result, out) =
            dispatch_args(&["litpatch", "run", "sidebar01-ts", "--root", root]);
        assert!(result.is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn apply_resolves_targets_next_to_manifest() {
        let tree = sidebar_tree();
        let manifest = tree.write(
            "fixes.toml",
            &format!(
                "name = \"admin\"\n\n[[step]]\nkind = \"check\"\nid = \"2b\"\n\
                 target = \"{NOTES_ROUTE}\"\nany_of = [\"requireOrgAccess\"]\n"
            ),
        );

        let (code, out) =
            dispatch_args(&["litpatch", "apply", manifest.to_str().unwrap(), "--strict"]);

        assert_eq!(code.unwrap(), 0);
        assert!(out.contains("Fix 2b [route.ts]: PRESENT (\"requireOrgAccess\")"));
        assert!(out.ends_with("1 checks passed, 0 checks failed\n"));
    }

    #[test]
    fn manifest_dir_of_bare_file_is_cwd() {
        assert_eq!(manifest_dir(Path::new("fixes.toml")), PathBuf::from("."));
        assert_eq!(manifest_dir(Path::new("/a/fixes.toml")), PathBuf::from("/a"));
    }
}
