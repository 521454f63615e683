use std::process::ExitCode;

fn main() -> ExitCode {
    drugcheck_arch::cli::run()
}
