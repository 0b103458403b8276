use clap::Parser;
use colored::Colorize;
use miette::{IntoDiagnostic, Result, WrapErr};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::info;

use overridelint::analysis::{DeclarationForm, PolicyStyle};
use overridelint::baseline::Baseline;
use overridelint::discovery::SnapshotFile;
use overridelint::fix::{FileFixes, FixApplier, PendingFix};
use overridelint::{AnalysisUnit, Config, Driver, FileFinder, FileReport, Finding, ReportFormat, Reporter};

/// overridelint - Enforce consistent @override tags and override keywords
#[derive(Parser, Debug)]
#[command(name = "overridelint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project directory or single snapshot file to check
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target directories to search for snapshots (can be specified multiple times)
    #[arg(short, long)]
    target: Vec<PathBuf>,

    /// Patterns to exclude (can be specified multiple times)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Which override declarations are required
    #[arg(long, value_enum)]
    style: Option<PolicyStyle>,

    /// Form inserted by fixes when either form is acceptable
    #[arg(long, value_enum)]
    prefer: Option<DeclarationForm>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<ReportFormat>,

    /// Output file (for json/sarif formats)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Apply fixes to the source files
    #[arg(long)]
    fix: bool,

    /// Show what --fix would change without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Confirm fixes file by file
    #[arg(long)]
    interactive: bool,

    /// Write a shell script restoring every file --fix changes
    #[arg(long, value_name = "FILE")]
    undo_script: Option<PathBuf>,

    /// Baseline file for ignoring existing issues
    /// Only issues not in the baseline are reported
    #[arg(long, value_name = "FILE")]
    baseline: Option<PathBuf>,

    /// Generate a baseline file from current results
    #[arg(long, value_name = "FILE")]
    generate_baseline: Option<PathBuf>,

    /// Load and check snapshots in parallel
    #[arg(long)]
    parallel: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("overridelint v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let unfixed = run(&config, &cli)?;

    if unfixed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // stdout carries the report
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        let root = if cli.path.is_file() {
            cli.path.parent().map(PathBuf::from).unwrap_or_default()
        } else {
            cli.path.clone()
        };
        Config::from_default_locations(&root)?
    };

    if !cli.target.is_empty() {
        config.targets = cli.target.clone();
    }
    if !cli.exclude.is_empty() {
        config.exclude.extend(cli.exclude.clone());
    }
    if let Some(style) = cli.style {
        config.policy.style = style;
    }
    if let Some(prefer) = cli.prefer {
        config.policy.prefer = prefer;
    }

    Ok(config)
}

/// Runs one check and returns the number of findings left unfixed
fn run(config: &Config, cli: &Cli) -> Result<usize> {
    use std::time::Instant;

    let start_time = Instant::now();

    info!("Discovering snapshots...");
    let files = FileFinder::new(config).find_files(&cli.path)?;
    info!("Found {} snapshots", files.len());

    if files.is_empty() {
        if !cli.quiet {
            eprintln!("{}", "No snapshots found.".yellow());
        }
        return Ok(0);
    }

    let driver = Driver::from_config(config);
    let (units, mut reports) = if cli.parallel {
        let units = files
            .par_iter()
            .map(load_unit)
            .collect::<Result<Vec<_>>>()?;
        let reports = driver.run_all(&units);
        (units, reports)
    } else {
        check_sequential(&driver, &files, cli.quiet)?
    };

    let project_root = if cli.path.is_file() {
        cli.path.parent().map(PathBuf::from).unwrap_or_default()
    } else {
        cli.path.clone()
    };

    if let Some(path) = &cli.generate_baseline {
        let baseline = Baseline::from_findings(
            reports.iter().flat_map(|r| r.findings.iter()),
            &project_root,
        );
        baseline
            .save(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to write baseline {}", path.display()))?;
        if !cli.quiet {
            eprintln!(
                "{}",
                format!(
                    "Baseline with {} issues written to {}",
                    baseline.issues.len(),
                    path.display()
                )
                .green()
            );
        }
        return Ok(0);
    }

    if let Some(path) = &cli.baseline {
        let baseline = Baseline::load(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to load baseline {}", path.display()))?;

        let mut baselined = 0;
        for report in &mut reports {
            baselined += baseline
                .retain_new(&mut report.findings, &project_root)
                .baselined_found;
        }
        if !cli.quiet {
            let new_issues: usize = reports.iter().map(|r| r.findings.len()).sum();
            eprintln!(
                "{}",
                format!(
                    "Baseline: {} new issues ({} baselined, {} in baseline file)",
                    new_issues,
                    baselined,
                    baseline.issues.len()
                )
                .cyan()
            );
        }
    }

    let findings: Vec<Finding> = reports
        .iter()
        .flat_map(|r| r.findings.iter().cloned())
        .collect();

    let format = match cli.format {
        Some(format) => format,
        None => config
            .report
            .format
            .parse::<ReportFormat>()
            .map_err(|e| miette::miette!("{}", e))?,
    };
    Reporter::new(format, cli.output.clone())
        .with_fix_hints(config.report.show_fix_hints)
        .report(&findings, units.len())?;

    info!("Check completed in {:.2}s", start_time.elapsed().as_secs_f64());

    if !cli.fix || findings.is_empty() {
        return Ok(findings.len());
    }

    let file_fixes: Vec<FileFixes> = units
        .iter()
        .zip(&reports)
        .map(|(unit, report)| pending_fixes(unit, report))
        .filter(|file| !file.fixes.is_empty())
        .collect();

    let applier = FixApplier::new(cli.interactive, cli.dry_run, cli.undo_script.clone());
    let summary = applier.apply(&file_fixes)?;

    if !cli.dry_run && !cli.quiet {
        eprintln!();
        eprintln!(
            "{}",
            format!(
                "Fixed {} issues in {} files ({} skipped)",
                summary.fixes_applied, summary.files_changed, summary.fixes_skipped
            )
            .green()
        );
    }

    if cli.dry_run {
        Ok(findings.len())
    } else {
        Ok(findings.len().saturating_sub(summary.fixes_applied))
    }
}

fn load_unit(file: &SnapshotFile) -> Result<AnalysisUnit> {
    AnalysisUnit::load(&file.path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to load snapshot {}", file.path.display()))
}

fn check_sequential(
    driver: &Driver,
    files: &[SnapshotFile],
    quiet: bool,
) -> Result<(Vec<AnalysisUnit>, Vec<FileReport>)> {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(files.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .into_diagnostic()?
            .progress_chars("#>-"),
    );

    info!("Checking snapshots...");
    let mut units = Vec::with_capacity(files.len());
    let mut reports = Vec::with_capacity(files.len());
    for file in files {
        let unit = load_unit(file)?;
        reports.push(driver.run_unit(&unit));
        units.push(unit);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok((units, reports))
}

fn pending_fixes<'a>(unit: &'a AnalysisUnit, report: &'a FileReport) -> FileFixes<'a> {
    let fixes = report
        .findings
        .iter()
        .filter_map(|finding| {
            let fix = finding.diagnostic.fix.as_ref()?;
            Some(PendingFix {
                label: format!(
                    "{}:{} [{}] {} '{}'",
                    finding.line,
                    finding.column,
                    finding.diagnostic.message_kind.code(),
                    finding.diagnostic.message_kind,
                    finding.diagnostic.member_name
                ),
                fix,
            })
        })
        .collect();

    FileFixes {
        path: report.file.clone(),
        expected_source: &unit.source,
        fixes,
    }
}
