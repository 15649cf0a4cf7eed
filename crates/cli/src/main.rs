use std::process::ExitCode;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    goldapi_cli::run()
}
