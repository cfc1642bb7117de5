//! Conveyor compiler CLI

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use conveyor_compiler::{
    compile_all, BuildOutput, CommandSpec, CompileOptions, Compiler, Config, Preset,
    ProcessCompiler, SourceUnit,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "conveyorc")]
#[command(about = "Conveyor compiler - runs sources through an external compiler")]
#[command(version)]
struct Args {
    /// Input source files
    #[arg(value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// Compiler program speaking the JSON stdio protocol
    #[arg(long, value_name = "PROGRAM")]
    compiler: Option<PathBuf>,

    /// Extra argument for the compiler program (repeatable)
    #[arg(long = "arg", value_name = "ARG", allow_hyphen_values = true)]
    compiler_args: Vec<String>,

    /// Strip the module wrapper from the output
    #[arg(long, conflicts_with = "preset")]
    bare: bool,

    /// Named option preset
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Output directory for compiled files
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Settings after merging the config file with command-line flags.
struct Settings {
    command: CommandSpec,
    options: CompileOptions,
    output_dir: Option<PathBuf>,
}

fn settings(args: &Args) -> anyhow::Result<Settings> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let command = match (&args.compiler, config.compiler) {
        (Some(program), _) => CommandSpec {
            program: program.clone(),
            args: args.compiler_args.clone(),
        },
        (None, Some(mut command)) => {
            command.args.extend(args.compiler_args.iter().cloned());
            command
        }
        (None, None) => bail!("no compiler given; pass --compiler or set \"compiler\" in --config"),
    };

    let options = if args.bare {
        CompileOptions::preset(Preset::Bare)
    } else if let Some(preset) = args.preset {
        CompileOptions::preset(preset)
    } else {
        CompileOptions::preset(config.preset.unwrap_or_default())
    };

    Ok(Settings {
        command,
        options,
        output_dir: args.output.clone().or(config.output_dir),
    })
}

fn read_sources(inputs: &[PathBuf]) -> anyhow::Result<Vec<SourceUnit>> {
    inputs
        .iter()
        .map(|path| {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(SourceUnit::new(path.display().to_string(), text))
        })
        .collect()
}

fn output_path(dir: &Path, source_name: &str) -> PathBuf {
    let stem = Path::new(source_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_name.to_string());
    dir.join(format!("{}.js", stem))
}

/// Output path for each source name, refusing two sources that would land on
/// the same file.
fn output_paths<'a, I>(dir: &Path, source_names: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut claimed: HashMap<PathBuf, &str> = HashMap::new();
    let mut paths = Vec::new();
    for name in source_names {
        let path = output_path(dir, name);
        if let Some(first) = claimed.insert(path.clone(), name) {
            bail!(
                "{} and {} would both be written to {}",
                first,
                name,
                path.display()
            );
        }
        paths.push(path);
    }
    Ok(paths)
}

fn write_outputs(outputs: &[BuildOutput], dir: &Path) -> anyhow::Result<()> {
    let paths = output_paths(dir, outputs.iter().map(|o| o.source_name.as_str()))?;
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    for (output, path) in outputs.iter().zip(paths) {
        if let Ok(javascript) = &output.result {
            fs::write(&path, javascript)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Wrote: {}", path.display());
        }
    }
    Ok(())
}

/// Returns whether every input compiled.
async fn run(args: Args) -> anyhow::Result<bool> {
    let settings = settings(&args)?;
    let units = read_sources(&args.inputs)?;
    if let Some(dir) = &settings.output_dir {
        output_paths(dir, units.iter().map(SourceUnit::name))?;
    }

    tracing::debug!(
        program = %settings.command.program.display(),
        bare = settings.options.is_bare(),
        "compiling {} file(s)",
        units.len()
    );

    let compiler = Arc::new(Compiler::new(ProcessCompiler::from(settings.command)));
    let outputs = compile_all(compiler, units, settings.options).await;

    for output in &outputs {
        if let Err(e) = &output.result {
            eprintln!("{}", e);
        }
    }

    match &settings.output_dir {
        Some(dir) => write_outputs(&outputs, dir)?,
        None => {
            for output in &outputs {
                if let Ok(javascript) = &output.result {
                    println!("{}", javascript);
                }
            }
        }
    }

    let failed = outputs.iter().filter(|o| !o.is_ok()).count();
    if failed > 0 {
        tracing::info!("{} of {} file(s) failed", failed, outputs.len());
    } else {
        tracing::info!("Compilation successful!");
    }
    Ok(failed == 0)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Compilation failed: {:#}", e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_bare_flag_selects_bare_preset() {
        let args = parse(&["conveyorc", "--compiler", "cc", "--bare", "a.coffee"]);
        let settings = settings(&args).unwrap();
        assert!(settings.options.is_bare());
        assert_eq!(settings.command.program, PathBuf::from("cc"));
    }

    #[test]
    fn test_bare_conflicts_with_preset() {
        let result =
            Args::try_parse_from(["conveyorc", "--bare", "--preset", "wrapped", "a.coffee"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_compiler_is_an_error() {
        let args = parse(&["conveyorc", "a.coffee"]);
        assert!(settings(&args).is_err());
    }

    #[test]
    fn test_output_path_uses_stem() {
        let path = output_path(Path::new("out"), "src/app.coffee");
        assert_eq!(path, PathBuf::from("out/app.js"));
    }

    #[test]
    fn test_config_file_supplies_compiler() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("conveyor.json");
        fs::write(
            &config,
            r#"{"compiler": {"program": "coffee-json", "args": ["-s"]}, "preset": "bare"}"#,
        )
        .unwrap();
        let args = parse(&[
            "conveyorc",
            "--config",
            config.to_str().unwrap(),
            "--arg",
            "--fast",
            "a.coffee",
        ]);
        let settings = settings(&args).unwrap();
        assert_eq!(settings.command.program, PathBuf::from("coffee-json"));
        assert_eq!(settings.command.args, ["-s", "--fast"]);
        assert!(settings.options.is_bare());
        assert!(settings.output_dir.is_none());
    }

    #[test]
    fn test_same_stem_outputs_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let outputs = [
            BuildOutput {
                source_name: "src/a/app.coffee".to_string(),
                result: Ok("A".to_string()),
            },
            BuildOutput {
                source_name: "src/b/app.coffee".to_string(),
                result: Ok("B".to_string()),
            },
        ];

        let err = write_outputs(&outputs, dir.path()).unwrap_err().to_string();

        assert!(err.contains("src/a/app.coffee"));
        assert!(err.contains("src/b/app.coffee"));
        assert!(!dir.path().join("app.js").exists());
    }

    #[test]
    fn test_distinct_stems_all_written() {
        let dir = tempfile::tempdir().unwrap();
        let outputs = [
            BuildOutput {
                source_name: "src/app.coffee".to_string(),
                result: Ok("A".to_string()),
            },
            BuildOutput {
                source_name: "src/util.coffee".to_string(),
                result: Ok("U".to_string()),
            },
        ];

        write_outputs(&outputs, dir.path()).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("app.js")).unwrap(), "A");
        assert_eq!(fs::read_to_string(dir.path().join("util.js")).unwrap(), "U");
    }

    /// Stand-in compiler: fails on any source containing `(`, otherwise
    /// answers with a fixed program.
    #[cfg(unix)]
    const PAREN_CHECKER: &str = r#"input=$(cat)
case "$input" in
  *'('*) echo '{"error":{"message":"unexpected end of input"}}' ;;
  *) echo '{"output":"var ok = true;"}' ;;
esac"#;

    #[cfg(unix)]
    fn run_args(out: &Path, inputs: &[PathBuf]) -> Args {
        let mut argv = vec![
            "conveyorc".to_string(),
            "--compiler".to_string(),
            "sh".to_string(),
            "--arg".to_string(),
            "-c".to_string(),
            "--arg".to_string(),
            PAREN_CHECKER.to_string(),
            "-o".to_string(),
            out.display().to_string(),
        ];
        argv.extend(inputs.iter().map(|p| p.display().to_string()));
        Args::try_parse_from(argv).unwrap()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_mixed_batch_writes_only_successes() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let good = src.path().join("good.coffee");
        let bad = src.path().join("bad.coffee");
        fs::write(&good, "a = 1").unwrap();
        fs::write(&bad, "b = (").unwrap();

        let all_ok = run(run_args(out.path(), &[good, bad])).await.unwrap();

        assert!(!all_ok);
        assert_eq!(
            fs::read_to_string(out.path().join("good.js")).unwrap(),
            "var ok = true;"
        );
        assert!(!out.path().join("bad.js").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_all_good() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let one = src.path().join("one.coffee");
        let two = src.path().join("two.coffee");
        fs::write(&one, "a = 1").unwrap();
        fs::write(&two, "b = 2").unwrap();

        let all_ok = run(run_args(out.path(), &[one, two])).await.unwrap();

        assert!(all_ok);
        assert!(out.path().join("one.js").exists());
        assert!(out.path().join("two.js").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_rejects_colliding_inputs_before_compiling() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::create_dir_all(src.path().join("a")).unwrap();
        fs::create_dir_all(src.path().join("b")).unwrap();
        let first = src.path().join("a/app.coffee");
        let second = src.path().join("b/app.coffee");
        fs::write(&first, "a = 1").unwrap();
        fs::write(&second, "b = 2").unwrap();

        let err = run(run_args(out.path(), &[first, second])).await.unwrap_err();

        assert!(err.to_string().contains("would both be written to"));
        assert!(!out.path().join("app.js").exists());
    }
}
