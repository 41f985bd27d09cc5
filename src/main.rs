#![deny(unsafe_code)]
pub mod commands;

use anyhow::Error;
use bam2fastq_lib::errors::{Bam2FastqError, EXIT_FATAL, EXIT_SUCCESS};
use commands::bam2fastq::{Bam2Fastq, Invocation};
use commands::command::Command;
use env_logger::Env;
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let status = match Bam2Fastq::parse_invocation(std::env::args_os()) {
        Ok(Invocation::Help) => {
            print!("{}", Bam2Fastq::usage());
            EXIT_SUCCESS
        }
        Ok(Invocation::Run(cmd)) => {
            info!("Running bam2fastq version {}", env!("CARGO_PKG_VERSION"));
            match cmd.execute() {
                Ok(()) => EXIT_SUCCESS,
                Err(e) => report_failure(&e),
            }
        }
        Err(e) => report_failure(&Error::from(e)),
    };

    ExitCode::from(status)
}

/// Prints the diagnostic for a failed run and returns the exit status.
fn report_failure(err: &Error) -> u8 {
    let Some(typed) = err.downcast_ref::<Bam2FastqError>() else {
        eprintln!("Error thrown when attempting to generate the FASTQ file");
        print_causes(err);
        return EXIT_FATAL;
    };

    match typed {
        Bam2FastqError::ArgumentCount { .. } => {
            eprintln!("{typed}");
            eprint!("{}", Bam2Fastq::usage());
        }
        Bam2FastqError::DecoderUnavailable { remediation, .. } => {
            eprintln!("Error thrown when attempting to decode the CCS reads");
            eprintln!("{remediation}");
            print_causes(err);
        }
        _ => eprintln!("{typed}"),
    }
    typed.exit_code()
}

fn print_causes(err: &Error) {
    eprintln!("Error: {err}");
    for cause in err.chain().skip(1) {
        eprintln!("Caused by: {cause}");
    }
}
