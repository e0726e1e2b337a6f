extern crate clap;
extern crate failure;
extern crate mandelfarm;
extern crate num;
extern crate num_cpus;
#[macro_use]
extern crate tracing;
extern crate tracing_subscriber;

use clap::{App, Arg, ArgMatches};
use mandelfarm::canvas::check_output_path;
use mandelfarm::{launch, render_sequential, ComplexPlane, Palette, RenderConfig};
use num::Complex;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    parse_pair(s, ',').map(|(re, im)| Complex { re, im })
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const PROCESSES: &str = "processes";
const GRANULARITY: &str = "granularity";
const ITERATIONS: &str = "iterations";
const SEQUENTIAL: &str = "sequential";

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandelfarm")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Mandelbrot renderer with a demand-driven worker farm")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .env("MANDELFARM_OUTPUT")
                .default_value("mandelbrot.png")
                .help("Output file (.png, .ppm or .bmp)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .env("MANDELFARM_SIZE")
                .default_value("1200x800")
                .validator(|s| validate_pair::<u32>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .env("MANDELFARM_LEFTLOWER")
                .default_value("-2,-1")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .env("MANDELFARM_RIGHTUPPER")
                .default_value("1,1")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(PROCESSES)
                .long(PROCESSES)
                .short("p")
                .takes_value(true)
                .env("MANDELFARM_PROCESSES")
                .validator(|s| {
                    validate_range(
                        &s,
                        2,
                        4096,
                        "Could not parse process count",
                        "Process count must be between 2 and 4096",
                    )
                })
                .help("Number of processes, controller included (default: one worker per CPU)"),
        )
        .arg(
            Arg::with_name(GRANULARITY)
                .long(GRANULARITY)
                .short("g")
                .takes_value(true)
                .env("MANDELFARM_GRANULARITY")
                .default_value("1")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        u32::max_value() as usize,
                        "Could not parse rows per work unit",
                        "Rows per work unit must be at least 1",
                    )
                })
                .help("Rows of the image in each work unit"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .env("MANDELFARM_ITERATIONS")
                .default_value("256")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 200000",
                    )
                })
                .help("Iterations before a point is taken to be in the set"),
        )
        .arg(
            Arg::with_name(SEQUENTIAL)
                .long(SEQUENTIAL)
                .help("Render on a single thread, without the scheduler"),
        )
        .get_matches()
}

fn value<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str, failure::Error> {
    matches
        .value_of(name)
        .ok_or_else(|| failure::err_msg(format!("missing --{}", name)))
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    let (width, height) = parse_pair::<usize>(value(matches, SIZE)?, 'x')
        .ok_or_else(|| failure::err_msg("Error parsing image dimensions"))?;
    let leftlower = parse_complex(value(matches, LEFTLOWER)?)
        .ok_or_else(|| failure::err_msg("Error parsing left lower point"))?;
    let rightupper = parse_complex(value(matches, RIGHTUPPER)?)
        .ok_or_else(|| failure::err_msg("Error parsing right upper point"))?;
    let granularity = usize::from_str(value(matches, GRANULARITY)?)?;
    let iterations = u32::from_str(value(matches, ITERATIONS)?)?;
    let processes = match matches.value_of(PROCESSES) {
        Some(p) => usize::from_str(p)?,
        None => num_cpus::get() + 1,
    };
    let sequential = matches.is_present(SEQUENTIAL);
    let output = Path::new(value(matches, OUTPUT)?);

    // Everything that can be refused is refused before any work starts.
    let config = RenderConfig::new(
        width,
        height,
        ComplexPlane(leftlower, rightupper),
        granularity,
        iterations,
    )?;
    check_output_path(output)?;
    if !sequential {
        config.check_group(processes)?;
    }

    let start = Instant::now();
    let (canvas, workers) = if sequential {
        (render_sequential(&config), 1)
    } else {
        (launch(&config, processes)?.canvas, processes - 1)
    };
    let elapsed = start.elapsed();
    let seconds = elapsed.as_secs() as f64 + f64::from(elapsed.subsec_nanos()) * 1e-9;
    info!(workers, seconds, "render complete");

    canvas.save(output, &Palette::default())?;
    println!("{} {}x{} {:.6} seconds", workers, width, height, seconds);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
