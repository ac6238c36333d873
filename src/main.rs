use log::{error, LevelFilter, Log, Metadata, Record};
use std::io::{self, Write};
use std::process;

use trapz_romberg::prelude::*;

const USAGE: &str = "usage: trapz-romberg <input-file> [--plot] [--verbose]";

/// Plot margin around the integration interval.
const PLOT_DELTA: f64 = 0.1;

/// Writes log records to stderr.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

struct Options {
    path: String,
    plot: bool,
    verbose: bool,
}

fn parse_args<I: Iterator<Item = String>>(args: I) -> Option<Options> {
    let mut path = None;
    let mut plot = false;
    let mut verbose = false;
    for arg in args {
        match arg.as_str() {
            "--plot" => plot = true,
            "-v" | "--verbose" => verbose = true,
            _ if arg.starts_with('-') => return None,
            _ if path.is_none() => path = Some(arg),
            _ => return None,
        }
    }
    path.map(|path| Options {
        path,
        plot,
        verbose,
    })
}

fn run(options: &Options) -> Result<()> {
    let problem = Problem::from_path(&options.path)?;
    let config = RombergConfig::default();

    let table = build_romberg_table(
        &problem.form,
        problem.a,
        problem.b,
        problem.segments,
        &config,
    )?;
    let adaptive = AdaptiveTrapezoidBuilder::default()
        .reltol(problem.tolerance)
        .initial_segments(problem.segments)
        .build()
        .integrate(&problem.form, problem.a, problem.b)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for s in 0..table.levels() {
        if let (Some(nseg), Some(value)) = (table.segments(s), table.value(s, 0)) {
            writeln!(
                out,
                "{}\t({} segments)",
                integral_line(&problem.form, problem.a, problem.b, value),
                nseg
            )?;
        }
    }
    writeln!(
        out,
        "{}\t(adaptive, {} segments)",
        integral_line(&problem.form, problem.a, problem.b, adaptive.val),
        adaptive.segments
    )?;
    writeln!(out)?;
    writeln!(out, "Approximate values of the integral:")?;
    write!(out, "{}", triangular(&table, TableKind::Values))?;
    writeln!(out, "Error estimates:")?;
    write!(out, "{}", triangular(&table, TableKind::Errors))?;

    if options.plot {
        let request = PlotRequest {
            a: problem.a,
            b: problem.b,
            delta: PLOT_DELTA,
            samples: problem.segments.max(2).min(120),
        };
        let plot = Plot::new(&problem.form, &request)?;
        TextPlotter::new(&mut out, 24).draw(&plot)?;
    }

    Ok(())
}

fn main() {
    let options = match parse_args(std::env::args().skip(1)) {
        Some(options) => options,
        None => {
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };

    let level = if options.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }

    if let Err(err) = run(&options) {
        error!("{} ({})", err, err.kind());
        process::exit(1);
    }
}
