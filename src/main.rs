use std::process::ExitCode;

fn main() -> ExitCode {
    match locale_patch::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(locale_patch::errors::get_exit_code(&e))
        }
    }
}
